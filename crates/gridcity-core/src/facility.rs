//! Placed facility instances and footprint derivation.

use crate::grid::TilePos;
use crate::id::{FacilityId, FacilityTypeId};

/// A facility placed on the grid.
///
/// Instances are created only from a validator-accepted plan (see
/// [`crate::store::FacilityStore::commit`]) and removed by id. Position and
/// footprint never change in place; `is_connected` / `is_active` are the only
/// fields rewritten after creation, and only by the connectivity recompute
/// pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    pub id: FacilityId,
    pub kind: FacilityTypeId,
    /// Footprint center.
    pub position: TilePos,
    /// Every tile the footprint covers. Derived from `position` and the
    /// registry size at creation; pairwise disjoint across the store.
    pub occupied_tiles: Vec<TilePos>,
    /// Art variant. Rendering hint, not simulation-relevant.
    pub variant: u8,
    /// Coverage radius copied from the registry at creation.
    pub effect_radius: Option<f64>,
    /// Whether the facility reaches the grid boundary through the road
    /// network. Stale until the next recompute pass.
    pub is_connected: bool,
    /// Roads are always active; everything else is active iff connected.
    pub is_active: bool,
}

/// All tiles within `floor(size / 2)` of `center`, row by row.
///
/// `size` must be odd (enforced by the registry), so the footprint is
/// symmetric around the center and has cardinality `size * size`.
pub fn footprint_tiles(center: TilePos, size: u32) -> Vec<TilePos> {
    let radius = (size / 2) as i32;
    let mut tiles = Vec::with_capacity((size * size) as usize);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            tiles.push(TilePos::new(center.x + dx, center.y + dy));
        }
    }
    tiles
}
