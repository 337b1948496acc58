//! Full headless session driven by a data-file registry.
//!
//! Loads game content from JSON (gridcity-data), builds a city, grows it
//! through the placement / recompute / allocate cycle, drives the periodic
//! scheduler, and carries the session across a save/load boundary.

use gridcity_core::city::{City, CitySettings};
use gridcity_core::feed::FeedKind;
use gridcity_core::grid::{Terrain, TileGrid, TilePos};
use gridcity_core::registry::Registry;
use gridcity_core::save::{self, SaveDocument};
use gridcity_core::schedule::CityPulse;

const CONTENT: &str = r#"{
    "facilities": [
        {"name": "avenue", "category": "road", "size": 1, "cost": 10,
         "maintenance_cost": 1, "unlocked": true},
        {"name": "cottage", "category": "residential", "size": 1, "cost": 400,
         "maintenance_cost": 2, "infra_demand": 1, "unlocked": true, "variants": 3},
        {"name": "plaza", "category": "service", "size": 1, "cost": 600,
         "maintenance_cost": 2, "effect_radius": 4.0, "unlocked": true},
        {"name": "granary", "category": "industrial", "size": 3, "cost": 1500,
         "maintenance_cost": 6, "workforce": {"min": 6, "max": 12},
         "attractiveness": 4, "goods_output": 30},
        {"name": "pumphouse", "category": "civic", "size": 1, "cost": 900,
         "maintenance_cost": 3, "infra_supply": 20},
        {"name": "assembly_hall", "category": "civic", "size": 3, "cost": 2500,
         "maintenance_cost": 8, "unique": true, "unlocked": true}
    ],
    "terrain": [
        {"terrain": "sand", "buildable": true}
    ]
}"#;

fn content_registry() -> Registry {
    gridcity_data::load_registry_json(CONTENT).expect("content parses")
}

fn new_city() -> City {
    City::new(
        TileGrid::new(30, 30, Terrain::Grass),
        content_registry(),
        CitySettings {
            starting_funds: 50_000,
            workforce_pool: 10,
            rng_seed: 7,
            ..CitySettings::default()
        },
    )
}

#[test]
fn session_grows_saves_and_resumes() {
    let registry = content_registry();
    let avenue = registry.type_id("avenue").unwrap();
    let cottage = registry.type_id("cottage").unwrap();
    let plaza = registry.type_id("plaza").unwrap();
    let granary = registry.type_id("granary").unwrap();

    let mut city = new_city();

    // Main street from the west boundary.
    for x in 0..=12 {
        city.place(avenue, TilePos::new(x, 15)).unwrap();
    }
    let near = city.place(cottage, TilePos::new(5, 14)).unwrap();
    let far = city.place(cottage, TilePos::new(25, 25)).unwrap();
    city.place(plaza, TilePos::new(7, 14)).unwrap();
    let works = city.place(granary, TilePos::new(11, 13)).unwrap();

    city.recompute_connectivity();
    assert!(city.store().get(near).unwrap().is_active);
    assert!(!city.store().get(far).unwrap().is_connected);
    assert!(city.store().get(works).unwrap().is_active);

    // Pool of 10 covers the granary's minimum of 6 but not its maximum.
    let allocations = city.allocate_workforce();
    assert_eq!(allocations.len(), 1);
    assert_eq!(allocations[0].assigned, 10);
    assert_eq!(allocations[0].efficiency, 10.0 / 12.0);

    // The far cottage sits outside the plaza's radius.
    let uncovered = city.uncovered_residentials();
    assert!(uncovered.contains(&far));
    assert!(!uncovered.contains(&near));

    // Drive the scheduler: the uncovered cottage must surface in the feed.
    let mut pulse = CityPulse::with_intervals(1.0, 5.0);
    pulse.start();
    pulse.advance(&mut city, 1.0);
    assert!(city
        .feed()
        .iter()
        .any(|e| e.kind == FeedKind::UncoveredResidents));

    // A month of decay lowers satisfaction for the uncovered cottage.
    let before = city.satisfaction();
    pulse.advance(&mut city, 5.0);
    assert!(city.satisfaction() < before);
    pulse.stop();

    // Save, restore against a fresh grid + registry, and keep playing.
    let json = SaveDocument::capture(&city).to_json().unwrap();
    let doc = SaveDocument::from_json(&json).unwrap();
    let mut resumed = save::restore(
        TileGrid::new(30, 30, Terrain::Grass),
        content_registry(),
        &doc,
        &CitySettings::default(),
    )
    .unwrap();

    assert_eq!(resumed.funds(), city.funds());
    assert_eq!(resumed.store().len(), city.store().len());
    assert_eq!(resumed.store().next_id(), city.store().next_id());

    let extra = resumed.place(cottage, TilePos::new(5, 16)).unwrap();
    resumed.recompute_connectivity();
    assert!(resumed.store().get(extra).unwrap().is_active);
}

#[test]
fn severed_main_street_strands_the_district() {
    let registry = content_registry();
    let avenue = registry.type_id("avenue").unwrap();
    let cottage = registry.type_id("cottage").unwrap();

    let mut city = new_city();
    let mut street = Vec::new();
    for x in 0..=10 {
        street.push(city.place(avenue, TilePos::new(x, 10)).unwrap());
    }
    let home = city.place(cottage, TilePos::new(11, 10)).unwrap();

    city.recompute_connectivity();
    assert!(city.store().get(home).unwrap().is_connected);

    city.demolish(street[5]).unwrap();
    city.recompute_connectivity();
    assert!(!city.store().get(home).unwrap().is_connected);
    assert!(!city.store().get(home).unwrap().is_active);

    // Rebuilding the gap restores the link.
    city.place(avenue, TilePos::new(5, 10)).unwrap();
    city.recompute_connectivity();
    assert!(city.store().get(home).unwrap().is_connected);
}

#[test]
fn duplicate_assembly_hall_is_refused_after_reload() {
    let registry = content_registry();
    let hall = registry.type_id("assembly_hall").unwrap();

    let mut city = new_city();
    city.place(hall, TilePos::new(10, 10)).unwrap();

    let doc = SaveDocument::capture(&city);
    let mut resumed = save::restore(
        TileGrid::new(30, 30, Terrain::Grass),
        content_registry(),
        &doc,
        &CitySettings::default(),
    )
    .unwrap();

    // Uniqueness survives persistence.
    assert!(resumed.place(hall, TilePos::new(20, 20)).is_err());
}
