//! The narrative feed: bounded event log plus per-condition message pools.
//!
//! The shortage scan emits at most one event per condition per tick; each
//! event's text is drawn pseudo-randomly from that condition's fixed pool
//! through the injected [`crate::rng::SimRng`], so a seeded run produces an
//! exact transcript. The log keeps the most recent N events and evicts the
//! oldest.

use crate::rng::SimRng;
use std::collections::VecDeque;
use tracing::debug;

/// The condition a feed event reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    GoodsShortage,
    InfraShortage,
    WorkforceShortage,
    UncoveredResidents,
    SatisfactionLow,
    SatisfactionHigh,
}

/// One narrative event shown to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub kind: FeedKind,
    pub message: &'static str,
}

/// Fixed message pool for a condition.
pub fn message_pool(kind: FeedKind) -> &'static [&'static str] {
    match kind {
        FeedKind::GoodsShortage => &[
            "Market stalls are running empty.",
            "Traders report bare shelves across the city.",
            "Goods reserves have run dry.",
        ],
        FeedKind::InfraShortage => &[
            "The utility grid is straining under demand.",
            "Parts of the city report service outages.",
        ],
        FeedKind::WorkforceShortage => &[
            "Workshops stand idle for lack of hands.",
            "Employers cannot fill their open positions.",
            "A labor shortage is slowing the city down.",
        ],
        FeedKind::UncoveredResidents => &[
            "Residents complain of nothing to do nearby.",
            "Outlying households feel cut off from city services.",
        ],
        FeedKind::SatisfactionLow => &[
            "Discontent is spreading through the streets.",
            "Citizens are grumbling about life in the city.",
        ],
        FeedKind::SatisfactionHigh => &[
            "Spirits are high across the city.",
            "Citizens praise the state of their neighborhoods.",
        ],
    }
}

/// Compose an event for `kind` by drawing from its pool.
pub fn compose(kind: FeedKind, rng: &mut SimRng) -> FeedEvent {
    // Pools are non-empty by construction.
    let message = rng
        .choose(message_pool(kind))
        .copied()
        .unwrap_or("The city hums along.");
    FeedEvent { kind, message }
}

// ---------------------------------------------------------------------------
// FeedLog
// ---------------------------------------------------------------------------

/// Bounded event log. Pushing beyond capacity evicts the oldest entry.
#[derive(Debug)]
pub struct FeedLog {
    events: VecDeque<FeedEvent>,
    capacity: usize,
}

impl FeedLog {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: FeedEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        debug!(kind = ?event.kind, message = event.message, "feed event");
        self.events.push_back(event);
    }

    /// Events oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &FeedEvent> {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&FeedEvent> {
        self.events.back()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
