//! The owning simulation context.
//!
//! `City` threads every component -- grid, registry, store, connectivity
//! cache, funds, feed, RNG -- through one explicit struct instead of ambient
//! singletons. It exposes the only two facility mutations ([`City::place`],
//! [`City::demolish`]); both run synchronously, leave no partial state on
//! rejection, and invalidate the connectivity cache in full on success.

use crate::coverage;
use crate::feed::FeedLog;
use crate::grid::{TileGrid, TilePos};
use crate::id::{FacilityId, FacilityTypeId};
use crate::network::{self, ConnectivityCache};
use crate::placement::{self, PlacementPlan, PlacementRejection};
use crate::registry::{FacilityCategory, Registry};
use crate::rng::SimRng;
use crate::store::FacilityStore;
use crate::workforce::{self, Allocation};
use std::collections::BTreeSet;
use tracing::trace;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Session-start knobs. Everything not covered by the registry.
#[derive(Debug, Clone)]
pub struct CitySettings {
    pub starting_funds: i64,
    pub starting_satisfaction: f64,
    pub starting_goods: i64,
    pub workforce_pool: u32,
    pub feed_capacity: usize,
    pub rng_seed: u64,
}

impl Default for CitySettings {
    fn default() -> Self {
        Self {
            starting_funds: 10_000,
            starting_satisfaction: 50.0,
            starting_goods: 100,
            workforce_pool: 100,
            feed_capacity: 20,
            rng_seed: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a place request failed.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// The type id does not exist in the registry. A programmer-visible
    /// defect, not a player-facing rejection.
    #[error("unknown facility type {0:?}")]
    UnknownType(FacilityTypeId),
    #[error(transparent)]
    Rejected(#[from] PlacementRejection),
}

#[derive(Debug, thiserror::Error)]
pub enum DemolishError {
    #[error("no facility with id {0:?}")]
    UnknownFacility(FacilityId),
}

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct City {
    pub(crate) grid: TileGrid,
    pub(crate) registry: Registry,
    pub(crate) store: FacilityStore,
    pub(crate) connectivity: ConnectivityCache,
    pub(crate) funds: i64,
    pub(crate) satisfaction: f64,
    pub(crate) goods: i64,
    pub(crate) workforce_pool: u32,
    pub(crate) unlocked: BTreeSet<FacilityTypeId>,
    pub(crate) feed: FeedLog,
    pub(crate) rng: SimRng,
}

impl City {
    pub fn new(grid: TileGrid, registry: Registry, settings: CitySettings) -> Self {
        let unlocked = registry.initially_unlocked().collect();
        Self {
            grid,
            registry,
            store: FacilityStore::new(),
            connectivity: ConnectivityCache::new(),
            funds: settings.starting_funds,
            satisfaction: settings.starting_satisfaction,
            goods: settings.starting_goods,
            workforce_pool: settings.workforce_pool,
            unlocked,
            feed: FeedLog::new(settings.feed_capacity),
            rng: SimRng::new(settings.rng_seed),
        }
    }

    // -- Mutations --

    /// Validate and place a facility. On success the cost is deducted and
    /// the connectivity cache invalidated; the new facility stays
    /// disconnected until the next recompute pass. On failure nothing
    /// changes.
    pub fn place(&mut self, kind: FacilityTypeId, center: TilePos) -> Result<FacilityId, PlaceError> {
        let def = self
            .registry
            .get(kind)
            .ok_or(PlaceError::UnknownType(kind))?;
        let plan = placement::validate(
            &self.grid,
            &self.registry,
            &self.store,
            def,
            kind,
            self.funds,
            center,
        )
        .inspect_err(|rejection| trace!(?kind, ?center, %rejection, "placement rejected"))?;

        let variant = self.rng.next_below(u32::from(def.variants.max(1))) as u8;
        let cost = plan.cost;
        let id = self.store.commit(plan, variant);
        self.funds -= cost;
        self.connectivity.invalidate_all();
        Ok(id)
    }

    /// Remove a facility by id, crediting the demolition refund.
    pub fn demolish(&mut self, id: FacilityId) -> Result<(), DemolishError> {
        let facility = self
            .store
            .remove(id)
            .ok_or(DemolishError::UnknownFacility(id))?;
        if let Some(def) = self.registry.get(facility.kind) {
            self.funds += placement::refund_value(def);
        }
        self.connectivity.invalidate_all();
        Ok(())
    }

    // -- Queries and passes --

    /// Speculative placement check. Pure: no funds move, nothing mutates.
    pub fn preview(&self, kind: FacilityTypeId, center: TilePos) -> Result<PlacementPlan, PlaceError> {
        let def = self
            .registry
            .get(kind)
            .ok_or(PlaceError::UnknownType(kind))?;
        Ok(placement::validate(
            &self.grid,
            &self.registry,
            &self.store,
            def,
            kind,
            self.funds,
            center,
        )?)
    }

    /// The explicit full connectivity pass. Callers run this after a batch
    /// of mutations; flags are stale until then.
    pub fn recompute_connectivity(&mut self) {
        network::recompute_pass(
            &mut self.store,
            &self.grid,
            &self.registry,
            &mut self.connectivity,
        );
    }

    /// Allocate the labor pool across the current facility list.
    pub fn allocate_workforce(&self) -> Vec<Allocation> {
        workforce::allocate(&self.store, &self.registry, self.workforce_pool)
    }

    /// Residentials with no active service coverage.
    pub fn uncovered_residentials(&self) -> Vec<FacilityId> {
        coverage::uncovered_residentials(&self.store, &self.registry, FacilityCategory::Service)
    }

    /// Total infrastructure (supply, demand) across active facilities.
    pub fn infra_balance(&self) -> (u64, u64) {
        let mut supply = 0u64;
        let mut demand = 0u64;
        for facility in self.store.iter().filter(|f| f.is_active) {
            if let Some(def) = self.registry.get(facility.kind) {
                supply += u64::from(def.infra_supply.unwrap_or(0));
                demand += u64::from(def.infra_demand.unwrap_or(0));
            }
        }
        (supply, demand)
    }

    // -- Unlocking --

    pub fn is_unlocked(&self, kind: FacilityTypeId) -> bool {
        self.unlocked.contains(&kind)
    }

    pub fn unlock(&mut self, kind: FacilityTypeId) {
        self.unlocked.insert(kind);
    }

    pub fn unlocked_types(&self) -> impl Iterator<Item = FacilityTypeId> + '_ {
        self.unlocked.iter().copied()
    }

    // -- Accessors --

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &FacilityStore {
        &self.store
    }

    pub fn connectivity_cache(&self) -> &ConnectivityCache {
        &self.connectivity
    }

    pub fn funds(&self) -> i64 {
        self.funds
    }

    pub fn satisfaction(&self) -> f64 {
        self.satisfaction
    }

    pub fn goods(&self) -> i64 {
        self.goods
    }

    pub fn workforce_pool(&self) -> u32 {
        self.workforce_pool
    }

    /// Labor supply changes with population; the pool is set externally.
    pub fn set_workforce_pool(&mut self, pool: u32) {
        self.workforce_pool = pool;
    }

    pub fn feed(&self) -> &FeedLog {
        &self.feed
    }
}

// ===========================================================================
// Tests
// ===========================================================================
