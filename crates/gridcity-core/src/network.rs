//! Road-network connectivity analysis.
//!
//! A road tile is *edge-connected* when a breadth-first search over
//! road-adjacency (4-directional, roads only) reaches any tile on the grid
//! boundary -- the boundary stands in for the outside world. A non-road
//! facility is connected when any road tile 4-adjacent to its footprint is
//! edge-connected. Road facilities are connected by definition.
//!
//! Results are memoized in a [`ConnectivityCache`] owned by the city and
//! passed alongside the store. The cache is invalidated *in full* on every
//! facility mutation: adding or removing one road tile can flip
//! edge-connectivity for an entire component, so partial invalidation is
//! unsound. Flags on facilities are rewritten only by [`recompute_pass`],
//! which callers trigger explicitly after a batch of mutations.

use crate::grid::{TileGrid, TilePos};
use crate::id::{FacilityId, FacilityTypeId};
use crate::registry::{FacilityCategory, Registry};
use crate::store::FacilityStore;
use std::collections::{BTreeSet, HashMap, VecDeque};
use tracing::debug;

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Memoized connectivity results: per road tile and per facility id.
#[derive(Debug, Default)]
pub struct ConnectivityCache {
    tile_verdicts: HashMap<TilePos, bool>,
    facility_verdicts: HashMap<FacilityId, bool>,
}

impl ConnectivityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every memoized result. Called by every mutation path; removal
    /// also relies on this so no verdict for a dead id is left behind.
    pub fn invalidate_all(&mut self) {
        self.tile_verdicts.clear();
        self.facility_verdicts.clear();
    }

    /// The memoized verdict for a facility, if the last recompute pass
    /// produced one.
    pub fn facility_verdict(&self, id: FacilityId) -> Option<bool> {
        self.facility_verdicts.get(&id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.tile_verdicts.is_empty() && self.facility_verdicts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Recompute pass
// ---------------------------------------------------------------------------

/// One full connectivity pass over the store.
///
/// Rewrites `is_connected` and `is_active` on every facility: roads are
/// always connected and active; everything else is active iff connected.
/// This is the only code that touches those flags.
pub fn recompute_pass(
    store: &mut FacilityStore,
    grid: &TileGrid,
    registry: &Registry,
    cache: &mut ConnectivityCache,
) {
    let roads: BTreeSet<TilePos> = store
        .iter()
        .filter(|f| is_road(registry, f.kind))
        .flat_map(|f| f.occupied_tiles.iter().copied())
        .collect();

    // Two phases so the immutable road set outlives the flag rewrite.
    let mut verdicts: Vec<(FacilityId, bool)> = Vec::with_capacity(store.len());
    for facility in store.iter() {
        let connected = if is_road(registry, facility.kind) {
            true
        } else {
            facility
                .occupied_tiles
                .iter()
                .flat_map(|tile| tile.neighbours())
                .filter(|n| roads.contains(n))
                .any(|road_tile| edge_connected(cache, &roads, grid, road_tile))
        };
        verdicts.push((facility.id, connected));
    }

    for (facility, &(id, connected)) in store.iter_mut().zip(verdicts.iter()) {
        debug_assert_eq!(facility.id, id);
        facility.is_connected = connected;
        facility.is_active = connected || is_road(registry, facility.kind);
        cache.facility_verdicts.insert(id, connected);
    }

    debug!(
        facilities = verdicts.len(),
        connected = verdicts.iter().filter(|(_, c)| *c).count(),
        "connectivity recomputed"
    );
}

fn is_road(registry: &Registry, kind: FacilityTypeId) -> bool {
    registry
        .get(kind)
        .is_some_and(|def| def.category == FacilityCategory::Road)
}

/// Whether `start` (a road tile) reaches the grid boundary via roads.
///
/// Memoized per tile. The BFS always explores the whole component and marks
/// every visited tile with the shared verdict, so components are memoized
/// atomically and repeat queries inside one pass cost O(1).
fn edge_connected(
    cache: &mut ConnectivityCache,
    roads: &BTreeSet<TilePos>,
    grid: &TileGrid,
    start: TilePos,
) -> bool {
    if let Some(&verdict) = cache.tile_verdicts.get(&start) {
        return verdict;
    }

    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    let mut reached_boundary = false;

    while let Some(tile) = queue.pop_front() {
        if grid.is_boundary(tile) {
            reached_boundary = true;
        }
        for neighbour in tile.neighbours() {
            if roads.contains(&neighbour) && visited.insert(neighbour) {
                queue.push_back(neighbour);
            }
        }
    }

    for tile in visited {
        cache.tile_verdicts.insert(tile, reached_boundary);
    }
    reached_boundary
}

// ---------------------------------------------------------------------------
// Road piece classification (rendering hint)
// ---------------------------------------------------------------------------

/// Shape class of a road tile, derived from its 4-neighbour road pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadShape {
    Isolated,
    End,
    Horizontal,
    Vertical,
    Turn,
    Tee,
    Cross,
}

/// A road tile's shape plus rotation in quarter turns. Pure rendering hint;
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadPiece {
    pub shape: RoadShape,
    pub rotation: u8,
}

/// Classify the road tile at `tile` from the adjacency predicate.
pub fn classify_road(tile: TilePos, is_road_tile: impl Fn(TilePos) -> bool) -> RoadPiece {
    let [n, e, s, w] = tile.neighbours().map(is_road_tile);
    let (shape, rotation) = match (n, e, s, w) {
        (false, false, false, false) => (RoadShape::Isolated, 0),
        (true, false, false, false) => (RoadShape::End, 0),
        (false, true, false, false) => (RoadShape::End, 1),
        (false, false, true, false) => (RoadShape::End, 2),
        (false, false, false, true) => (RoadShape::End, 3),
        (true, false, true, false) => (RoadShape::Vertical, 0),
        (false, true, false, true) => (RoadShape::Horizontal, 0),
        (true, true, false, false) => (RoadShape::Turn, 0),
        (false, true, true, false) => (RoadShape::Turn, 1),
        (false, false, true, true) => (RoadShape::Turn, 2),
        (true, false, false, true) => (RoadShape::Turn, 3),
        (true, true, true, false) => (RoadShape::Tee, 0),
        (false, true, true, true) => (RoadShape::Tee, 1),
        (true, false, true, true) => (RoadShape::Tee, 2),
        (true, true, false, true) => (RoadShape::Tee, 3),
        (true, true, true, true) => (RoadShape::Cross, 0),
    };
    RoadPiece { shape, rotation }
}

// ===========================================================================
// Tests
// ===========================================================================
