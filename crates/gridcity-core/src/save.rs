//! Versioned save documents.
//!
//! A saved session is a JSON document: the facility list, the unlocked type
//! set, and the city's scalar state. Two kinds of imperfect input get
//! opposite treatment. Schema-evolution gaps (a missing `is_active`, a
//! missing `unlocked` list) are forward compatibility and default silently;
//! invariant violations (overlapping footprints, duplicate ids, unknown type
//! names) are corruption and fail loudly -- silently "fixing" them would
//! hide data loss.

use crate::city::{City, CitySettings};
use crate::facility::Facility;
use crate::feed::FeedLog;
use crate::grid::{TileGrid, TilePos};
use crate::network::ConnectivityCache;
use crate::registry::Registry;
use crate::rng::SimRng;
use crate::store::FacilityStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Current save format version. Increment on breaking document changes.
pub const SAVE_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("save document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("save from future version {0} (this build supports up to {SAVE_VERSION})")]
    FutureVersion(u32),
    #[error("unknown facility type name '{0}'")]
    UnknownType(String),
    #[error("duplicate facility id {0}")]
    DuplicateId(u64),
    #[error("facility id {id} is not below the id counter {next}")]
    IdCounterBehind { id: u64, next: u64 },
    #[error("facilities {a} and {b} overlap at ({x}, {y})")]
    OverlappingFootprints { a: u64, b: u64, x: i32, y: i32 },
    #[error("facility {id} occupies out-of-bounds tile ({x}, {y})")]
    OutOfBounds { id: u64, x: i32, y: i32 },
}

// ---------------------------------------------------------------------------
// Document shape
// ---------------------------------------------------------------------------

/// One persisted facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFacility {
    pub id: u64,
    /// Type name, stable across registry reorderings.
    pub kind: String,
    pub position: TilePos,
    pub occupied_tiles: Vec<TilePos>,
    pub variant: u8,
    #[serde(default)]
    pub effect_radius: Option<f64>,
    pub is_connected: bool,
    /// Absent in older saves; defaults to `is_connected` on load.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// The whole persisted session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDocument {
    pub version: u32,
    pub funds: i64,
    pub satisfaction: f64,
    pub goods: i64,
    pub workforce_pool: u32,
    pub next_facility_id: u64,
    pub facilities: Vec<SavedFacility>,
    /// Absent in older saves; defaults to the registry's initially-unlocked
    /// set on load.
    #[serde(default)]
    pub unlocked: Option<Vec<String>>,
}

impl SaveDocument {
    /// Snapshot a city. Infallible: a live city always satisfies the
    /// invariants the loader checks.
    pub fn capture(city: &City) -> Self {
        let facilities = city
            .store()
            .iter()
            .map(|f| SavedFacility {
                id: f.id.0,
                kind: city
                    .registry()
                    .get(f.kind)
                    .map(|def| def.name.clone())
                    .unwrap_or_default(),
                position: f.position,
                occupied_tiles: f.occupied_tiles.clone(),
                variant: f.variant,
                effect_radius: f.effect_radius,
                is_connected: f.is_connected,
                is_active: Some(f.is_active),
            })
            .collect();
        let unlocked = city
            .unlocked_types()
            .filter_map(|id| city.registry().get(id).map(|def| def.name.clone()))
            .collect();
        SaveDocument {
            version: SAVE_VERSION,
            funds: city.funds(),
            satisfaction: city.satisfaction(),
            goods: city.goods(),
            workforce_pool: city.workforce_pool(),
            next_facility_id: city.store().next_id(),
            facilities,
            unlocked: Some(unlocked),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and version-gate a document without restoring it.
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let doc: SaveDocument = serde_json::from_str(json)?;
        if doc.version > SAVE_VERSION {
            return Err(SaveError::FutureVersion(doc.version));
        }
        Ok(doc)
    }
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

/// Rebuild a city from a document. The grid and registry are session inputs,
/// not part of the save. `settings` supplies whatever the document does not
/// carry (feed capacity, RNG seed).
pub fn restore(
    grid: TileGrid,
    registry: Registry,
    doc: &SaveDocument,
    settings: &CitySettings,
) -> Result<City, SaveError> {
    if doc.version > SAVE_VERSION {
        return Err(SaveError::FutureVersion(doc.version));
    }

    let mut facilities = Vec::with_capacity(doc.facilities.len());
    let mut seen_ids = BTreeSet::new();
    let mut occupancy: BTreeMap<TilePos, u64> = BTreeMap::new();

    for saved in &doc.facilities {
        let kind = registry
            .type_id(&saved.kind)
            .ok_or_else(|| SaveError::UnknownType(saved.kind.clone()))?;
        if !seen_ids.insert(saved.id) {
            return Err(SaveError::DuplicateId(saved.id));
        }
        if saved.id >= doc.next_facility_id {
            return Err(SaveError::IdCounterBehind {
                id: saved.id,
                next: doc.next_facility_id,
            });
        }
        for &tile in &saved.occupied_tiles {
            if !grid.contains(tile) {
                return Err(SaveError::OutOfBounds {
                    id: saved.id,
                    x: tile.x,
                    y: tile.y,
                });
            }
            if let Some(&other) = occupancy.get(&tile) {
                return Err(SaveError::OverlappingFootprints {
                    a: other,
                    b: saved.id,
                    x: tile.x,
                    y: tile.y,
                });
            }
            occupancy.insert(tile, saved.id);
        }

        facilities.push(Facility {
            id: crate::id::FacilityId(saved.id),
            kind,
            position: saved.position,
            occupied_tiles: saved.occupied_tiles.clone(),
            variant: saved.variant,
            effect_radius: saved.effect_radius,
            is_connected: saved.is_connected,
            // Schema migration tolerance: older saves predate the flag.
            is_active: saved.is_active.unwrap_or(saved.is_connected),
        });
    }

    let unlocked: BTreeSet<_> = match &doc.unlocked {
        Some(names) => {
            let mut set = BTreeSet::new();
            for name in names {
                let id = registry
                    .type_id(name)
                    .ok_or_else(|| SaveError::UnknownType(name.clone()))?;
                set.insert(id);
            }
            set
        }
        None => registry.initially_unlocked().collect(),
    };

    Ok(City {
        grid,
        registry,
        store: FacilityStore::from_parts(facilities, doc.next_facility_id),
        connectivity: ConnectivityCache::new(),
        funds: doc.funds,
        satisfaction: doc.satisfaction,
        goods: doc.goods,
        workforce_pool: doc.workforce_pool,
        unlocked,
        feed: FeedLog::new(settings.feed_capacity),
        rng: SimRng::new(settings.rng_seed),
    })
}

// ===========================================================================
// Tests
// ===========================================================================
