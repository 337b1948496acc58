//! Resolution pipeline: JSON document -> builder -> frozen registry.

use crate::schema::RegistryData;
use gridcity_core::registry::{FacilityDef, Registry, RegistryBuilder, RegistryError, WorkforceBounds};

/// Errors that can occur while loading registry data.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Load a registry from a JSON string.
pub fn load_registry_json(json: &str) -> Result<Registry, DataLoadError> {
    let data: RegistryData = serde_json::from_str(json)?;
    build_registry(data)
}

/// Load a registry from JSON bytes.
pub fn load_registry_json_bytes(bytes: &[u8]) -> Result<Registry, DataLoadError> {
    let data: RegistryData = serde_json::from_slice(bytes)?;
    build_registry(data)
}

fn build_registry(data: RegistryData) -> Result<Registry, DataLoadError> {
    let mut builder = RegistryBuilder::new();
    for terrain in &data.terrain {
        builder.set_terrain_buildable(terrain.terrain, terrain.buildable);
    }
    for facility in data.facilities {
        builder.register(FacilityDef {
            name: facility.name,
            category: facility.category,
            size: facility.size,
            cost: facility.cost,
            maintenance_cost: facility.maintenance_cost,
            workforce: facility
                .workforce
                .map(|w| WorkforceBounds { min: w.min, max: w.max }),
            effect_radius: facility.effect_radius,
            attractiveness: facility.attractiveness,
            infra_demand: facility.infra_demand,
            infra_supply: facility.infra_supply,
            goods_output: facility.goods_output,
            unique: facility.unique,
            unlocked: facility.unlocked,
            variants: facility.variants,
        });
    }
    Ok(builder.build()?)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gridcity_core::grid::Terrain;
    use gridcity_core::registry::FacilityCategory;

    #[test]
    fn load_empty_document() {
        let reg = load_registry_json(r#"{}"#).unwrap();
        assert_eq!(reg.def_count(), 0);
    }

    #[test]
    fn load_minimal_facility() {
        let json = r#"{
            "facilities": [
                {"name": "shack", "category": "residential", "size": 1, "cost": 50}
            ]
        }"#;
        let reg = load_registry_json(json).unwrap();
        let id = reg.type_id("shack").unwrap();
        let def = reg.get(id).unwrap();
        assert_eq!(def.category, FacilityCategory::Residential);
        assert_eq!(def.maintenance_cost, 0);
        assert!(def.workforce.is_none());
        assert!(def.effect_radius.is_none());
        assert!(!def.unique);
        assert_eq!(def.variants, 1);
    }

    #[test]
    fn load_full_facility() {
        let json = r#"{
            "facilities": [{
                "name": "grand_bazaar",
                "category": "service",
                "size": 3,
                "cost": 2500,
                "maintenance_cost": 12,
                "workforce": {"min": 8, "max": 24},
                "effect_radius": 7.5,
                "attractiveness": 9,
                "infra_demand": 6,
                "unique": true,
                "unlocked": true,
                "variants": 2
            }]
        }"#;
        let reg = load_registry_json(json).unwrap();
        let def = reg.get(reg.type_id("grand_bazaar").unwrap()).unwrap();
        assert_eq!(def.workforce.unwrap().max, 24);
        assert_eq!(def.effect_radius, Some(7.5));
        assert_eq!(def.attractiveness, Some(9));
        assert!(def.unique);
        assert!(def.unlocked);
        assert_eq!(def.variants, 2);
    }

    #[test]
    fn terrain_overrides_apply() {
        let json = r#"{
            "terrain": [
                {"terrain": "slope", "buildable": true},
                {"terrain": "sand", "buildable": false}
            ]
        }"#;
        let reg = load_registry_json(json).unwrap();
        assert!(reg.is_buildable(Terrain::Slope));
        assert!(!reg.is_buildable(Terrain::Sand));
        assert!(!reg.is_buildable(Terrain::Water));
    }

    #[test]
    fn invalid_definition_is_a_registry_error() {
        // Even footprint size fails registry validation, not parsing.
        let json = r#"{
            "facilities": [
                {"name": "slab", "category": "civic", "size": 2, "cost": 10}
            ]
        }"#;
        assert!(matches!(
            load_registry_json(json),
            Err(DataLoadError::Registry(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            load_registry_json("not json {{{"),
            Err(DataLoadError::JsonParse(_))
        ));
    }

    #[test]
    fn bytes_and_str_agree() {
        let json = r#"{"facilities": [{"name": "hut", "category": "residential", "size": 1, "cost": 5}]}"#;
        let a = load_registry_json(json).unwrap();
        let b = load_registry_json_bytes(json.as_bytes()).unwrap();
        assert_eq!(a.def_count(), b.def_count());
        assert_eq!(a.type_id("hut"), b.type_id("hut"));
    }
}
