//! Periodic effects: the shortage/feed scan and the monthly decay.
//!
//! Repeating timers are the only concurrency in the system, and they are
//! modeled as explicit state machines (Stopped -> Running -> Stopped) rather
//! than ambient interval handles. [`PulseTimer::advance`] accumulates elapsed
//! wall-clock time and reports how many whole intervals passed; a stopped
//! timer accumulates nothing and never fires, so a torn-down scheduler is an
//! idempotent no-op.
//!
//! Handlers run synchronously between consistent states of the city: each
//! scan reads the store fresh and must not assume anything about what
//! happened since the previous tick.

use crate::city::City;
use crate::coverage;
use crate::feed::{self, FeedKind};
use crate::registry::FacilityCategory;
use crate::workforce;
use tracing::debug;

// ---------------------------------------------------------------------------
// Tuning constants
// ---------------------------------------------------------------------------

/// Cadence of the shortage/feed scan, in seconds of wall-clock time.
pub const SCAN_INTERVAL_SECS: f64 = 10.0;
/// Length of a simulated month, in seconds of wall-clock time. Independent
/// of any in-game date.
pub const MONTH_INTERVAL_SECS: f64 = 60.0;
/// Workforce shortfall up to this many workers is tolerated silently.
pub const WORKFORCE_SLACK: u32 = 5;
/// Goods stockpile below this is a shortage.
pub const GOODS_SHORTAGE_FLOOR: i64 = 0;
/// Feed thresholds for satisfaction commentary.
pub const SATISFACTION_LOW: f64 = 25.0;
pub const SATISFACTION_HIGH: f64 = 75.0;
/// Monthly satisfaction penalty per uncovered residential.
pub const UNCOVERED_PENALTY: f64 = 2.0;
/// Monthly goods consumed per residential facility.
pub const GOODS_PER_RESIDENTIAL: u32 = 3;

// ---------------------------------------------------------------------------
// PulseTimer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
}

/// A repeating fixed-interval timer driven by elapsed-time accumulation.
#[derive(Debug, Clone)]
pub struct PulseTimer {
    interval: f64,
    accumulator: f64,
    state: TimerState,
}

impl PulseTimer {
    /// Create a stopped timer. `interval_secs` must be positive.
    pub fn new(interval_secs: f64) -> Self {
        Self {
            interval: interval_secs,
            accumulator: 0.0,
            state: TimerState::Stopped,
        }
    }

    /// Begin ticking. A duplicate start is a no-op (the accumulator is
    /// preserved mid-cycle).
    pub fn start(&mut self) {
        self.state = TimerState::Running;
    }

    /// Stop ticking and discard any partial interval. Idempotent; no fire
    /// can happen after this until the next start.
    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Account for `dt` elapsed seconds; returns how many whole intervals
    /// fired. Always 0 while stopped.
    pub fn advance(&mut self, dt: f64) -> u32 {
        if self.state == TimerState::Stopped {
            return 0;
        }
        self.accumulator += dt;
        let fires = (self.accumulator / self.interval).floor() as u32;
        self.accumulator -= f64::from(fires) * self.interval;
        fires
    }
}

// ---------------------------------------------------------------------------
// CityPulse
// ---------------------------------------------------------------------------

/// The two independent repeating timers reading one city.
#[derive(Debug)]
pub struct CityPulse {
    scan: PulseTimer,
    monthly: PulseTimer,
}

impl Default for CityPulse {
    fn default() -> Self {
        Self::new()
    }
}

impl CityPulse {
    pub fn new() -> Self {
        Self::with_intervals(SCAN_INTERVAL_SECS, MONTH_INTERVAL_SECS)
    }

    /// Custom cadences, mainly for tests.
    pub fn with_intervals(scan_secs: f64, month_secs: f64) -> Self {
        Self {
            scan: PulseTimer::new(scan_secs),
            monthly: PulseTimer::new(month_secs),
        }
    }

    pub fn start(&mut self) {
        self.scan.start();
        self.monthly.start();
    }

    pub fn stop(&mut self) {
        self.scan.stop();
        self.monthly.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scan.is_running() || self.monthly.is_running()
    }

    /// Drive both timers by `dt` elapsed seconds, running the handlers for
    /// every interval that completed. The two cadences interleave freely
    /// with user mutations; each handler invocation sees a consistent city.
    pub fn advance(&mut self, city: &mut City, dt: f64) {
        for _ in 0..self.scan.advance(dt) {
            run_shortage_scan(city);
        }
        for _ in 0..self.monthly.advance(dt) {
            run_monthly_effects(city);
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// One shortage/feed scan: every condition that currently holds emits at
/// most one narrative event.
pub fn run_shortage_scan(city: &mut City) {
    if city.goods < GOODS_SHORTAGE_FLOOR {
        let event = feed::compose(FeedKind::GoodsShortage, &mut city.rng);
        city.feed.push(event);
    }

    let (supply, demand) = city.infra_balance();
    if supply < demand {
        let event = feed::compose(FeedKind::InfraShortage, &mut city.rng);
        city.feed.push(event);
    }

    let allocations = workforce::allocate(&city.store, &city.registry, city.workforce_pool);
    let shortfall = workforce::total_shortfall(&city.store, &city.registry, &allocations);
    if shortfall > WORKFORCE_SLACK {
        let event = feed::compose(FeedKind::WorkforceShortage, &mut city.rng);
        city.feed.push(event);
    }

    let uncovered =
        coverage::uncovered_residentials(&city.store, &city.registry, FacilityCategory::Service);
    if !uncovered.is_empty() {
        let event = feed::compose(FeedKind::UncoveredResidents, &mut city.rng);
        city.feed.push(event);
    }

    if city.satisfaction < SATISFACTION_LOW {
        let event = feed::compose(FeedKind::SatisfactionLow, &mut city.rng);
        city.feed.push(event);
    } else if city.satisfaction > SATISFACTION_HIGH {
        let event = feed::compose(FeedKind::SatisfactionHigh, &mut city.rng);
        city.feed.push(event);
    }
}

/// One simulated month: maintenance is charged, goods are produced and
/// consumed, and every uncovered residential costs a flat slice of
/// satisfaction.
pub fn run_monthly_effects(city: &mut City) {
    let maintenance: i64 = city
        .store
        .iter()
        .filter_map(|f| city.registry.get(f.kind))
        .map(|def| def.maintenance_cost)
        .sum();
    city.funds -= maintenance;

    let produced: i64 = city
        .store
        .iter()
        .filter(|f| f.is_active)
        .filter_map(|f| city.registry.get(f.kind))
        .map(|def| i64::from(def.goods_output.unwrap_or(0)))
        .sum();
    let residentials = city
        .store
        .iter()
        .filter(|f| {
            city.registry
                .get(f.kind)
                .is_some_and(|def| def.category == FacilityCategory::Residential)
        })
        .count();
    city.goods += produced - i64::from(GOODS_PER_RESIDENTIAL) * residentials as i64;

    let uncovered =
        coverage::uncovered_residentials(&city.store, &city.registry, FacilityCategory::Service)
            .len();
    city.satisfaction =
        (city.satisfaction - UNCOVERED_PENALTY * uncovered as f64).clamp(0.0, 100.0);

    debug!(
        maintenance,
        produced, residentials, uncovered, "monthly effects applied"
    );
}

// ===========================================================================
// Tests
// ===========================================================================
