//! Service coverage queries.
//!
//! A residential facility is covered by a service when the Euclidean
//! distance from the service's center to the *nearest tile* of the
//! residential footprint is within the service's effect radius (inclusive).
//! Only active services project coverage. These queries run on demand at the
//! scheduler's coarse cadence, so nothing here is cached.

use crate::facility::Facility;
use crate::grid::TilePos;
use crate::id::FacilityId;
use crate::registry::{FacilityCategory, Registry};
use crate::store::FacilityStore;

/// Euclidean distance from `from` to the nearest tile of `footprint`.
/// Returns infinity for an empty footprint (cannot happen for a real
/// facility).
pub fn distance_to_footprint(from: TilePos, footprint: &[TilePos]) -> f64 {
    footprint
        .iter()
        .map(|&tile| from.distance_to(tile))
        .fold(f64::INFINITY, f64::min)
}

/// Whether `service` covers `target`. Inactive services cover nothing;
/// services without an effect radius cover nothing.
pub fn covers(service: &Facility, target: &Facility) -> bool {
    if !service.is_active {
        return false;
    }
    let Some(radius) = service.effect_radius else {
        return false;
    };
    distance_to_footprint(service.position, &target.occupied_tiles) <= radius
}

/// Whether any active facility of `service_category` covers `target`.
pub fn is_covered(
    store: &FacilityStore,
    registry: &Registry,
    target: &Facility,
    service_category: FacilityCategory,
) -> bool {
    store
        .iter()
        .filter(|f| {
            registry
                .get(f.kind)
                .is_some_and(|def| def.category == service_category)
        })
        .any(|service| covers(service, target))
}

/// Every residential facility not covered by any active facility of
/// `service_category`, in placement order.
pub fn uncovered_residentials(
    store: &FacilityStore,
    registry: &Registry,
    service_category: FacilityCategory,
) -> Vec<FacilityId> {
    store
        .iter()
        .filter(|f| {
            registry
                .get(f.kind)
                .is_some_and(|def| def.category == FacilityCategory::Residential)
        })
        .filter(|residential| !is_covered(store, registry, residential, service_category))
        .map(|f| f.id)
        .collect()
}

/// Fraction of residentials covered, in [0, 1]. A city with no residentials
/// counts as fully covered.
pub fn coverage_ratio(
    store: &FacilityStore,
    registry: &Registry,
    service_category: FacilityCategory,
) -> f64 {
    let total = store
        .iter()
        .filter(|f| {
            registry
                .get(f.kind)
                .is_some_and(|def| def.category == FacilityCategory::Residential)
        })
        .count();
    if total == 0 {
        return 1.0;
    }
    let uncovered = uncovered_residentials(store, registry, service_category).len();
    (total - uncovered) as f64 / total as f64
}

// ===========================================================================
// Tests
// ===========================================================================
