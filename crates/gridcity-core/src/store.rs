//! The authoritative set of placed facilities.
//!
//! Single-writer model: only the store's own entry points change the
//! facility list, and the only two mutations are committing an accepted
//! placement plan and removing by id. A tile occupancy index is kept in
//! lockstep with the list so overlap checks don't scan every facility.

use crate::facility::Facility;
use crate::grid::TilePos;
use crate::id::{FacilityId, FacilityTypeId};
use crate::placement::PlacementPlan;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct FacilityStore {
    facilities: Vec<Facility>,
    /// tile -> occupant. Mirrors `occupied_tiles` of every facility.
    occupancy: BTreeMap<TilePos, FacilityId>,
    /// Next id to mint. Ids are never reused after removal.
    next_id: u64,
}

impl FacilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn a validator-accepted plan into a placed facility.
    ///
    /// The new facility starts disconnected and inactive; connectivity is
    /// resolved by the next recompute pass, never inline.
    pub fn commit(&mut self, plan: PlacementPlan, variant: u8) -> FacilityId {
        let id = FacilityId(self.next_id);
        self.next_id += 1;

        for &tile in &plan.tiles {
            self.occupancy.insert(tile, id);
        }
        debug!(?id, kind = ?plan.kind, position = ?plan.position, "facility placed");
        self.facilities.push(Facility {
            id,
            kind: plan.kind,
            position: plan.position,
            occupied_tiles: plan.tiles,
            variant,
            effect_radius: plan.effect_radius,
            is_connected: false,
            is_active: false,
        });
        id
    }

    /// Remove a facility by id. Returns the removed facility, or `None` if
    /// the id is unknown (already removed ids stay unknown forever).
    pub fn remove(&mut self, id: FacilityId) -> Option<Facility> {
        let index = self.facilities.iter().position(|f| f.id == id)?;
        let facility = self.facilities.remove(index);
        for tile in &facility.occupied_tiles {
            self.occupancy.remove(tile);
        }
        debug!(?id, "facility removed");
        Some(facility)
    }

    pub fn get(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    /// Facilities in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Facility> {
        self.facilities.iter()
    }

    /// Mutable access for the connectivity recompute pass only.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Facility> {
        self.facilities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn is_occupied(&self, tile: TilePos) -> bool {
        self.occupancy.contains_key(&tile)
    }

    pub fn occupant_of(&self, tile: TilePos) -> Option<FacilityId> {
        self.occupancy.get(&tile).copied()
    }

    pub fn count_of_type(&self, kind: FacilityTypeId) -> usize {
        self.facilities.iter().filter(|f| f.kind == kind).count()
    }

    /// The id the next commit would mint.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Rebuild a store from persisted parts. The caller (save loading) has
    /// already validated disjoint footprints and id uniqueness.
    pub(crate) fn from_parts(facilities: Vec<Facility>, next_id: u64) -> Self {
        let mut occupancy = BTreeMap::new();
        for facility in &facilities {
            for &tile in &facility.occupied_tiles {
                occupancy.insert(tile, facility.id);
            }
        }
        Self {
            facilities,
            occupancy,
            next_id,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
