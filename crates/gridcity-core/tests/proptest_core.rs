//! Property-based tests for the gridcity core.
//!
//! Generates random placement sequences and labor pools, then verifies the
//! structural invariants: footprints stay disjoint, the allocator never
//! over-spends the pool, and road extension never disconnects anything.

use gridcity_core::grid::TilePos;
use gridcity_core::id::{FacilityId, FacilityTypeId};
use gridcity_core::test_utils::*;
use gridcity_core::workforce;
use proptest::prelude::*;
use std::collections::HashSet;

// ===========================================================================
// Generators
// ===========================================================================

fn arb_kind() -> impl Strategy<Value = FacilityTypeId> {
    prop_oneof![
        Just(road()),
        Just(house()),
        Just(estate()),
        Just(park()),
        Just(bazaar()),
        Just(mill()),
    ]
}

fn arb_placements(max: usize) -> impl Strategy<Value = Vec<(FacilityTypeId, i32, i32)>> {
    proptest::collection::vec((arb_kind(), 0..20i32, 0..20i32), 1..=max)
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// No sequence of accepted placements ever produces overlapping
    /// footprints; rejected attempts leave no trace.
    #[test]
    fn accepted_placements_stay_disjoint(ops in arb_placements(40)) {
        let mut city = test_city(20, 20);
        for (kind, x, y) in ops {
            let _ = city.place(kind, TilePos::new(x, y));
        }
        let mut seen = HashSet::new();
        for facility in city.store().iter() {
            for tile in &facility.occupied_tiles {
                prop_assert!(seen.insert(*tile), "tile {tile:?} occupied twice");
            }
        }
    }

    /// The allocator never assigns more than the pool, and every efficiency
    /// obeys the min/max ramp exactly.
    #[test]
    fn allocator_respects_pool_and_ramp(ops in arb_placements(25), pool in 0..200u32) {
        let mut city = test_city(20, 20);
        for (kind, x, y) in ops {
            let _ = city.place(kind, TilePos::new(x, y));
        }
        let allocations = workforce::allocate(city.store(), city.registry(), pool);

        let total: u32 = allocations.iter().map(|a| a.assigned).sum();
        prop_assert!(total <= pool);

        for allocation in &allocations {
            let facility = city.store().get(allocation.facility).unwrap();
            let bounds = city.registry().get(facility.kind).unwrap().workforce.unwrap();
            if allocation.assigned < bounds.min {
                prop_assert_eq!(allocation.efficiency, 0.0);
            } else if allocation.assigned >= bounds.max {
                prop_assert_eq!(allocation.efficiency, 1.0);
            } else {
                prop_assert_eq!(
                    allocation.efficiency,
                    f64::from(allocation.assigned) / f64::from(bounds.max)
                );
            }
        }
    }

    /// Repeated allocation over the same city is bit-identical.
    #[test]
    fn allocation_is_deterministic(ops in arb_placements(25), pool in 0..200u32) {
        let mut city = test_city(20, 20);
        for (kind, x, y) in ops {
            let _ = city.place(kind, TilePos::new(x, y));
        }
        let a = workforce::allocate(city.store(), city.registry(), pool);
        let b = workforce::allocate(city.store(), city.registry(), pool);
        prop_assert_eq!(a, b);
    }

    /// Purely additive road placement can only grow the connected set.
    #[test]
    fn road_extension_is_monotonic(
        base in arb_placements(25),
        extra_roads in proptest::collection::vec((0..20i32, 0..20i32), 1..15),
    ) {
        let mut city = test_city(20, 20);
        for (kind, x, y) in base {
            let _ = city.place(kind, TilePos::new(x, y));
        }
        city.recompute_connectivity();
        let connected_before: HashSet<FacilityId> = city
            .store()
            .iter()
            .filter(|f| f.is_connected)
            .map(|f| f.id)
            .collect();

        for (x, y) in extra_roads {
            let _ = city.place(road(), TilePos::new(x, y));
        }
        city.recompute_connectivity();
        let connected_after: HashSet<FacilityId> = city
            .store()
            .iter()
            .filter(|f| f.is_connected)
            .map(|f| f.id)
            .collect();

        prop_assert!(connected_before.is_subset(&connected_after));
    }

    /// Roads always come out of a recompute pass connected and active.
    #[test]
    fn roads_are_always_connected(ops in arb_placements(30)) {
        let mut city = test_city(20, 20);
        for (kind, x, y) in ops {
            let _ = city.place(kind, TilePos::new(x, y));
        }
        city.recompute_connectivity();
        for facility in city.store().iter().filter(|f| f.kind == road()) {
            prop_assert!(facility.is_connected);
            prop_assert!(facility.is_active);
        }
    }
}
