//! Gridcity Core -- the simulation engine for a grid-based city builder.
//!
//! Players place facilities on a tile grid; the core validates placement,
//! decides which facilities are functionally connected to the road network,
//! distributes a scarce labor pool across competing facilities, and folds
//! spatial coverage into periodic satisfaction and narrative outcomes.
//!
//! # Mutation Discipline
//!
//! All state lives in an explicit [`city::City`] context struct; there are no
//! ambient singletons. The facility list changes through exactly two entry
//! points, [`city::City::place`] and [`city::City::demolish`], and both
//! invalidate the connectivity cache in full. Connectivity and activity flags
//! are rewritten only by the explicit recompute pass
//! ([`city::City::recompute_connectivity`]), never ad hoc -- callers tolerate
//! stale flags between a mutation batch and the next pass.
//!
//! # Key Types
//!
//! - [`city::City`] -- owning context: grid, registry, store, caches, funds,
//!   feed, RNG.
//! - [`registry::Registry`] -- immutable facility/terrain metadata (frozen at
//!   startup).
//! - [`placement`] -- pure placement validation returning a
//!   [`placement::PlacementPlan`] or a discriminated rejection.
//! - [`network::ConnectivityCache`] -- memoized road-reachability, invalidated
//!   in full on every mutation.
//! - [`workforce`] -- greedy priority allocation of the labor pool.
//! - [`coverage`] -- on-demand Euclidean service-coverage queries.
//! - [`schedule::CityPulse`] -- the two repeating timers (shortage/feed scan,
//!   monthly decay), the only concurrency in the system.
//! - [`save`] -- versioned, schema-tolerant JSON save documents.

pub mod city;
pub mod coverage;
pub mod facility;
pub mod feed;
pub mod grid;
pub mod id;
pub mod network;
pub mod placement;
pub mod registry;
pub mod rng;
pub mod save;
pub mod schedule;
pub mod store;
pub mod workforce;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
