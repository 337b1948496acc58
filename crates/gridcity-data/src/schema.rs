//! Serde structs defining the on-disk registry document format.
//!
//! These mirror [`gridcity_core::registry::FacilityDef`] field for field, but
//! every optional or defaultable field is `#[serde(default)]` so content
//! files only spell out what applies to a type.

use gridcity_core::grid::Terrain;
use gridcity_core::registry::FacilityCategory;
use serde::Deserialize;

/// Top-level registry document.
#[derive(Debug, Deserialize)]
pub struct RegistryData {
    #[serde(default)]
    pub facilities: Vec<FacilityData>,
    #[serde(default)]
    pub terrain: Vec<TerrainData>,
}

/// One facility definition in a data file.
#[derive(Debug, Deserialize)]
pub struct FacilityData {
    pub name: String,
    pub category: FacilityCategory,
    pub size: u32,
    pub cost: i64,
    #[serde(default)]
    pub maintenance_cost: i64,
    #[serde(default)]
    pub workforce: Option<WorkforceData>,
    #[serde(default)]
    pub effect_radius: Option<f64>,
    #[serde(default)]
    pub attractiveness: Option<u32>,
    #[serde(default)]
    pub infra_demand: Option<u32>,
    #[serde(default)]
    pub infra_supply: Option<u32>,
    #[serde(default)]
    pub goods_output: Option<u32>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default = "default_variants")]
    pub variants: u8,
}

/// Workforce bounds in a data file.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WorkforceData {
    pub min: u32,
    pub max: u32,
}

/// A terrain buildability override.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TerrainData {
    pub terrain: Terrain,
    pub buildable: bool,
}

fn default_variants() -> u8 {
    1
}
