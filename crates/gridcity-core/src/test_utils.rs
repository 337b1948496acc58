//! Shared test helpers for unit, integration, and property tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so the same
//! fixtures serve in-crate tests and the integration-test crate.

use crate::city::{City, CitySettings};
use crate::grid::{Terrain, TileGrid};
use crate::id::FacilityTypeId;
use crate::registry::{FacilityCategory, FacilityDef, Registry, RegistryBuilder, WorkforceBounds};

// ===========================================================================
// Facility type constructors
// ===========================================================================

// IDs follow registration order in `test_registry`.

pub fn road() -> FacilityTypeId {
    FacilityTypeId(0)
}
pub fn house() -> FacilityTypeId {
    FacilityTypeId(1)
}
pub fn estate() -> FacilityTypeId {
    FacilityTypeId(2)
}
pub fn park() -> FacilityTypeId {
    FacilityTypeId(3)
}
pub fn bazaar() -> FacilityTypeId {
    FacilityTypeId(4)
}
pub fn mill() -> FacilityTypeId {
    FacilityTypeId(5)
}
pub fn waterworks() -> FacilityTypeId {
    FacilityTypeId(6)
}
pub fn city_hall() -> FacilityTypeId {
    FacilityTypeId(7)
}

fn def(name: &str, category: FacilityCategory, size: u32, cost: i64) -> FacilityDef {
    FacilityDef {
        name: name.to_string(),
        category,
        size,
        cost,
        maintenance_cost: 0,
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

/// A small but complete registry: the backbone road, two residential sizes,
/// a coverage service, two employers with distinct priorities, a utility
/// supplier, and a unique civic seat.
pub fn test_registry() -> Registry {
    let mut b = RegistryBuilder::new();

    let mut road = def("road", FacilityCategory::Road, 1, 10);
    road.maintenance_cost = 1;
    road.unlocked = true;
    b.register(road);

    let mut house = def("house", FacilityCategory::Residential, 1, 500);
    house.maintenance_cost = 2;
    house.infra_demand = Some(1);
    house.unlocked = true;
    house.variants = 3;
    b.register(house);

    let mut estate = def("estate", FacilityCategory::Residential, 3, 2000);
    estate.maintenance_cost = 6;
    estate.infra_demand = Some(4);
    b.register(estate);

    let mut park = def("park", FacilityCategory::Service, 1, 300);
    park.maintenance_cost = 1;
    park.effect_radius = Some(5.0);
    park.unlocked = true;
    b.register(park);

    let mut bazaar = def("bazaar", FacilityCategory::Service, 1, 800);
    bazaar.maintenance_cost = 3;
    bazaar.workforce = Some(WorkforceBounds { min: 5, max: 10 });
    bazaar.attractiveness = Some(2);
    b.register(bazaar);

    let mut mill = def("mill", FacilityCategory::Industrial, 3, 1200);
    mill.maintenance_cost = 5;
    mill.workforce = Some(WorkforceBounds { min: 10, max: 20 });
    mill.attractiveness = Some(5);
    mill.goods_output = Some(40);
    b.register(mill);

    let mut waterworks = def("waterworks", FacilityCategory::Civic, 1, 1000);
    waterworks.maintenance_cost = 4;
    waterworks.infra_supply = Some(50);
    b.register(waterworks);

    let mut city_hall = def("city_hall", FacilityCategory::Civic, 3, 3000);
    city_hall.maintenance_cost = 8;
    city_hall.unique = true;
    city_hall.unlocked = true;
    b.register(city_hall);

    b.build().expect("test registry is valid")
}

// ===========================================================================
// City constructors
// ===========================================================================

/// All-grass city with deep pockets; large enough for every scenario.
pub fn test_city(width: u32, height: u32) -> City {
    test_city_with(width, height, |_| {})
}

/// Like [`test_city`], with a settings tweak.
pub fn test_city_with(width: u32, height: u32, tweak: impl FnOnce(&mut CitySettings)) -> City {
    let mut settings = CitySettings {
        starting_funds: 1_000_000,
        ..CitySettings::default()
    };
    tweak(&mut settings);
    City::new(
        TileGrid::new(width, height, Terrain::Grass),
        test_registry(),
        settings,
    )
}
