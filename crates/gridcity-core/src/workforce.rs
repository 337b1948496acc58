//! Workforce allocation.
//!
//! A single scalar labor pool is distributed greedily by priority: facilities
//! are sorted by registry attractiveness (stable, so ties keep store order)
//! and each takes `min(remaining, max)` if the remainder covers its minimum.
//! A high-priority facility may therefore consume up to its maximum and
//! starve a lower-priority one whose minimum could otherwise have been met;
//! that no-rebalancing policy is intentional. Insufficient pool degrades
//! individual facilities to zero, never the whole allocation.

use crate::id::FacilityId;
use crate::registry::Registry;
use crate::store::FacilityStore;

/// One facility's share of the labor pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub facility: FacilityId,
    pub assigned: u32,
    /// 0 below the minimum, exactly 1.0 at or above the maximum, linear
    /// ramp in between. Facilities without workforce bounds never appear
    /// here; their implicit efficiency is 1.0.
    pub efficiency: f64,
}

/// Distribute `pool` across every facility whose definition declares
/// workforce bounds. Deterministic: same store and pool, same output.
pub fn allocate(store: &FacilityStore, registry: &Registry, pool: u32) -> Vec<Allocation> {
    let mut candidates: Vec<(FacilityId, u32, u32, u32)> = store
        .iter()
        .filter_map(|facility| {
            let def = registry.get(facility.kind)?;
            let bounds = def.workforce?;
            let attractiveness = def.attractiveness.unwrap_or(0);
            Some((facility.id, bounds.min, bounds.max, attractiveness))
        })
        .collect();

    // sort_by is stable: equal attractiveness keeps original store order.
    candidates.sort_by(|a, b| b.3.cmp(&a.3));

    let mut remaining = pool;
    let mut allocations = Vec::with_capacity(candidates.len());
    for (facility, min, max, _) in candidates {
        let assigned = if remaining >= min {
            let take = remaining.min(max);
            remaining -= take;
            take
        } else {
            0
        };
        allocations.push(Allocation {
            facility,
            assigned,
            efficiency: efficiency(assigned, min, max),
        });
    }
    allocations
}

fn efficiency(assigned: u32, min: u32, max: u32) -> f64 {
    if assigned < min {
        0.0
    } else if assigned >= max {
        1.0
    } else {
        f64::from(assigned) / f64::from(max)
    }
}

/// How far the city falls short of fully *minimally* staffing its workforce
/// consumers: the sum of declared minimums minus the sum assigned,
/// saturating at zero.
pub fn total_shortfall(
    store: &FacilityStore,
    registry: &Registry,
    allocations: &[Allocation],
) -> u32 {
    let required: u32 = store
        .iter()
        .filter_map(|f| registry.get(f.kind).and_then(|def| def.workforce))
        .map(|bounds| bounds.min)
        .sum();
    let assigned: u32 = allocations.iter().map(|a| a.assigned).sum();
    required.saturating_sub(assigned)
}

// ===========================================================================
// Tests
// ===========================================================================
