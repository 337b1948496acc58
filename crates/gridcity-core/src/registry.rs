//! The immutable facility and terrain registry.
//!
//! Facility metadata (footprint size, cost, workforce bounds, effect radius)
//! and terrain buildability flags are injected once at startup and never
//! mutated at runtime. Construction goes through [`RegistryBuilder`]:
//! register everything, then [`RegistryBuilder::build`] validates and freezes.

use crate::grid::Terrain;
use crate::id::FacilityTypeId;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Broad facility grouping used by connectivity, allocation, and coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityCategory {
    /// The infrastructure backbone. Road tiles are trivially connected.
    Road,
    Residential,
    Service,
    Industrial,
    Civic,
}

/// Labor bounds for a facility that employs workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WorkforceBounds {
    /// Below this many workers the facility does not operate at all.
    pub min: u32,
    /// Staffing beyond this many workers has no effect.
    pub max: u32,
}

/// A facility definition. Optional fields mean the feature is inapplicable
/// to the type, never zero.
#[derive(Debug, Clone)]
pub struct FacilityDef {
    pub name: String,
    pub category: FacilityCategory,
    /// Footprint side length. Must be odd so the footprint has a center tile.
    pub size: u32,
    pub cost: i64,
    pub maintenance_cost: i64,
    pub workforce: Option<WorkforceBounds>,
    /// Service coverage radius in tiles (Euclidean, inclusive).
    pub effect_radius: Option<f64>,
    /// Priority weight for workforce allocation. Missing sorts as zero.
    pub attractiveness: Option<u32>,
    pub infra_demand: Option<u32>,
    pub infra_supply: Option<u32>,
    /// Goods produced per month while active.
    pub goods_output: Option<u32>,
    /// Singleton types (e.g. the city hall) may exist at most once.
    pub unique: bool,
    /// Member of the initially-unlocked set.
    pub unlocked: bool,
    /// Number of art variants. Rendering hint only.
    pub variants: u8,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for an immutable [`Registry`]. Register definitions and terrain
/// flags, then freeze with [`RegistryBuilder::build`].
#[derive(Debug)]
pub struct RegistryBuilder {
    defs: Vec<FacilityDef>,
    name_to_id: HashMap<String, FacilityTypeId>,
    terrain_buildable: [bool; Terrain::ALL.len()],
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        let mut terrain_buildable = [true; Terrain::ALL.len()];
        // Water and slope tiles reject construction unless a data file says
        // otherwise.
        terrain_buildable[Terrain::Water.index()] = false;
        terrain_buildable[Terrain::Slope.index()] = false;
        Self {
            defs: Vec::new(),
            name_to_id: HashMap::new(),
            terrain_buildable,
        }
    }

    /// Register a facility definition. Returns its ID.
    pub fn register(&mut self, def: FacilityDef) -> FacilityTypeId {
        let id = FacilityTypeId(self.defs.len() as u32);
        self.name_to_id.insert(def.name.clone(), id);
        self.defs.push(def);
        id
    }

    /// Override the buildability flag for a terrain kind.
    pub fn set_terrain_buildable(&mut self, terrain: Terrain, buildable: bool) {
        self.terrain_buildable[terrain.index()] = buildable;
    }

    /// Lookup a registered type ID by name.
    pub fn type_id(&self, name: &str) -> Option<FacilityTypeId> {
        self.name_to_id.get(name).copied()
    }

    /// Validate and freeze the registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut seen = HashMap::new();
        for (index, def) in self.defs.iter().enumerate() {
            if let Some(&first) = seen.get(def.name.as_str()) {
                return Err(RegistryError::DuplicateName {
                    name: def.name.clone(),
                    first: FacilityTypeId(first),
                    second: FacilityTypeId(index as u32),
                });
            }
            seen.insert(def.name.as_str(), index as u32);

            if def.size == 0 || def.size % 2 == 0 {
                return Err(RegistryError::InvalidFootprint {
                    name: def.name.clone(),
                    size: def.size,
                });
            }
            if let Some(radius) = def.effect_radius {
                if radius < 0.0 || radius.is_nan() {
                    return Err(RegistryError::InvalidEffectRadius {
                        name: def.name.clone(),
                        radius,
                    });
                }
            }
            if let Some(bounds) = def.workforce {
                if bounds.max == 0 || bounds.min > bounds.max {
                    return Err(RegistryError::InvalidWorkforceBounds {
                        name: def.name.clone(),
                        min: bounds.min,
                        max: bounds.max,
                    });
                }
            }
        }

        Ok(Registry {
            defs: self.defs,
            name_to_id: self.name_to_id,
            terrain_buildable: self.terrain_buildable,
        })
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable registry. Frozen after build; only reads from here on.
#[derive(Debug)]
pub struct Registry {
    defs: Vec<FacilityDef>,
    name_to_id: HashMap<String, FacilityTypeId>,
    terrain_buildable: [bool; Terrain::ALL.len()],
}

impl Registry {
    pub fn get(&self, id: FacilityTypeId) -> Option<&FacilityDef> {
        self.defs.get(id.0 as usize)
    }

    pub fn type_id(&self, name: &str) -> Option<FacilityTypeId> {
        self.name_to_id.get(name).copied()
    }

    pub fn def_count(&self) -> usize {
        self.defs.len()
    }

    /// Iterate all definitions with their IDs.
    pub fn defs(&self) -> impl Iterator<Item = (FacilityTypeId, &FacilityDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (FacilityTypeId(i as u32), def))
    }

    pub fn is_buildable(&self, terrain: Terrain) -> bool {
        self.terrain_buildable[terrain.index()]
    }

    /// The type IDs flagged as unlocked from the start of a session.
    pub fn initially_unlocked(&self) -> impl Iterator<Item = FacilityTypeId> + '_ {
        self.defs().filter(|(_, def)| def.unlocked).map(|(id, _)| id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate facility name '{name}' ({first:?} and {second:?})")]
    DuplicateName {
        name: String,
        first: FacilityTypeId,
        second: FacilityTypeId,
    },
    #[error("facility '{name}' has footprint size {size}; sizes must be odd and positive")]
    InvalidFootprint { name: String, size: u32 },
    #[error("facility '{name}' has negative effect radius {radius}")]
    InvalidEffectRadius { name: String, radius: f64 },
    #[error("facility '{name}' has workforce bounds min {min} > max {max}")]
    InvalidWorkforceBounds { name: String, min: u32, max: u32 },
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_def(name: &str, size: u32) -> FacilityDef {
        FacilityDef {
            name: name.to_string(),
            category: FacilityCategory::Residential,
            size,
            cost: 100,
            maintenance_cost: 1,
            workforce: None,
            effect_radius: None,
            attractiveness: None,
            infra_demand: None,
            infra_supply: None,
            goods_output: None,
            unique: false,
            unlocked: false,
            variants: 1,
        }
    }

    #[test]
    fn register_and_build() {
        let mut b = RegistryBuilder::new();
        let hut = b.register(plain_def("hut", 1));
        let manor = b.register(plain_def("manor", 3));
        let reg = b.build().unwrap();
        assert_eq!(reg.def_count(), 2);
        assert_eq!(reg.type_id("hut"), Some(hut));
        assert_eq!(reg.get(manor).unwrap().size, 3);
        assert_eq!(reg.type_id("nonexistent"), None);
    }

    #[test]
    fn even_footprint_rejected() {
        let mut b = RegistryBuilder::new();
        b.register(plain_def("slab", 2));
        assert!(matches!(
            b.build(),
            Err(RegistryError::InvalidFootprint { size: 2, .. })
        ));
    }

    #[test]
    fn zero_footprint_rejected() {
        let mut b = RegistryBuilder::new();
        b.register(plain_def("void", 0));
        assert!(b.build().is_err());
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut b = RegistryBuilder::new();
        b.register(plain_def("hut", 1));
        b.register(plain_def("hut", 1));
        assert!(matches!(
            b.build(),
            Err(RegistryError::DuplicateName { .. })
        ));
    }

    #[test]
    fn negative_effect_radius_rejected() {
        let mut b = RegistryBuilder::new();
        let mut def = plain_def("fountain", 1);
        def.effect_radius = Some(-2.0);
        b.register(def);
        assert!(matches!(
            b.build(),
            Err(RegistryError::InvalidEffectRadius { .. })
        ));
    }

    #[test]
    fn inverted_workforce_bounds_rejected() {
        let mut b = RegistryBuilder::new();
        let mut def = plain_def("forge", 1);
        def.workforce = Some(WorkforceBounds { min: 9, max: 3 });
        b.register(def);
        assert!(matches!(
            b.build(),
            Err(RegistryError::InvalidWorkforceBounds { .. })
        ));
    }

    #[test]
    fn default_terrain_flags() {
        let reg = RegistryBuilder::new().build().unwrap();
        assert!(reg.is_buildable(Terrain::Grass));
        assert!(reg.is_buildable(Terrain::Sand));
        assert!(!reg.is_buildable(Terrain::Water));
        assert!(!reg.is_buildable(Terrain::Slope));
    }

    #[test]
    fn terrain_flag_override() {
        let mut b = RegistryBuilder::new();
        b.set_terrain_buildable(Terrain::Slope, true);
        let reg = b.build().unwrap();
        assert!(reg.is_buildable(Terrain::Slope));
    }

    #[test]
    fn initially_unlocked_set() {
        let mut b = RegistryBuilder::new();
        let mut open = plain_def("hut", 1);
        open.unlocked = true;
        let open_id = b.register(open);
        b.register(plain_def("manor", 3));
        let reg = b.build().unwrap();
        let unlocked: Vec<_> = reg.initially_unlocked().collect();
        assert_eq!(unlocked, vec![open_id]);
    }
}
