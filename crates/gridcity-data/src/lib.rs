//! Data-driven registry loading for Gridcity.
//!
//! Game content -- facility definitions and terrain buildability -- lives in
//! JSON documents that deserialize into the schema structs of [`schema`] and
//! resolve into a frozen [`gridcity_core::registry::Registry`] via [`loader`].

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, load_registry_json, load_registry_json_bytes};
pub use schema::{FacilityData, RegistryData, TerrainData, WorkforceData};
