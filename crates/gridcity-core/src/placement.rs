//! The placement validator.
//!
//! Validation is a pure function over a snapshot of the grid, registry,
//! store, and funds: it never mutates anything, so collaborators can run it
//! speculatively for previews. An accepted placement comes back as a
//! [`PlacementPlan`]; only [`crate::store::FacilityStore::commit`] turns a
//! plan into a facility, and only the caller deducts funds afterwards.

use crate::facility::footprint_tiles;
use crate::grid::{TileGrid, TilePos};
use crate::id::FacilityTypeId;
use crate::registry::{FacilityDef, Registry};
use crate::store::FacilityStore;

/// Fraction of the build cost refunded on demolition.
pub const DEMOLITION_REFUND: f64 = 0.5;

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

/// Why a placement was refused. Rejections are expected, recoverable
/// outcomes returned as values; they never mutate state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementRejection {
    #[error("footprint extends outside the grid")]
    OutOfBounds,
    #[error("terrain under the footprint is not buildable")]
    UnbuildableTerrain,
    #[error("footprint overlaps an existing facility")]
    Occupied,
    #[error("insufficient funds: cost {cost}, available {available}")]
    InsufficientFunds { cost: i64, available: i64 },
    #[error("a unique facility of this type already exists")]
    DuplicateUnique,
}

// ---------------------------------------------------------------------------
// Accepted output
// ---------------------------------------------------------------------------

/// A validator-accepted placement: everything a facility needs except its
/// identity. The store mints the id (and the caller draws the art variant)
/// when the plan is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPlan {
    pub kind: FacilityTypeId,
    pub position: TilePos,
    pub tiles: Vec<TilePos>,
    pub cost: i64,
    pub effect_radius: Option<f64>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate placing `kind` centered at `center`.
///
/// Checks run in a fixed order: bounds, terrain, occupancy, funds,
/// uniqueness. The first failure wins. Calling twice with identical inputs
/// returns an identical result.
pub fn validate(
    grid: &TileGrid,
    registry: &Registry,
    store: &FacilityStore,
    def: &FacilityDef,
    kind: FacilityTypeId,
    funds: i64,
    center: TilePos,
) -> Result<PlacementPlan, PlacementRejection> {
    let tiles = footprint_tiles(center, def.size);

    for &tile in &tiles {
        if !grid.contains(tile) {
            return Err(PlacementRejection::OutOfBounds);
        }
    }
    for &tile in &tiles {
        // terrain_at cannot fail here; bounds were just checked.
        if let Some(terrain) = grid.terrain_at(tile) {
            if !registry.is_buildable(terrain) {
                return Err(PlacementRejection::UnbuildableTerrain);
            }
        }
    }
    for &tile in &tiles {
        if store.is_occupied(tile) {
            return Err(PlacementRejection::Occupied);
        }
    }
    if funds < def.cost {
        return Err(PlacementRejection::InsufficientFunds {
            cost: def.cost,
            available: funds,
        });
    }
    if def.unique && store.count_of_type(kind) > 0 {
        return Err(PlacementRejection::DuplicateUnique);
    }

    Ok(PlacementPlan {
        kind,
        position: center,
        tiles,
        cost: def.cost,
        effect_radius: def.effect_radius,
    })
}

/// What demolishing a facility of this type credits back.
pub fn refund_value(def: &FacilityDef) -> i64 {
    (def.cost as f64 * DEMOLITION_REFUND) as i64
}

// ===========================================================================
// Tests
// ===========================================================================
