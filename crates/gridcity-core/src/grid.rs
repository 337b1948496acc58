//! Tile coordinates and the fixed-size terrain grid.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// A position on the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four cardinal neighbours (no diagonals).
    pub fn neighbours(&self) -> [TilePos; 4] {
        [
            TilePos::new(self.x, self.y - 1),
            TilePos::new(self.x + 1, self.y),
            TilePos::new(self.x, self.y + 1),
            TilePos::new(self.x - 1, self.y),
        ]
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: TilePos) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

// ---------------------------------------------------------------------------
// Terrain
// ---------------------------------------------------------------------------

/// Per-tile terrain kind. Buildability of each kind is declared by the
/// registry, not hard-coded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Grass,
    Sand,
    Water,
    Slope,
}

impl Terrain {
    /// All terrain kinds, in declaration order.
    pub const ALL: [Terrain; 4] = [Terrain::Grass, Terrain::Sand, Terrain::Water, Terrain::Slope];

    /// Index into per-kind tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// TileGrid
// ---------------------------------------------------------------------------

/// A fixed-size rectangular grid with a dense row-major terrain layer.
///
/// Valid positions are `[0, width) x [0, height)`. The grid is created once
/// per session (terrain edits are a world-generation concern) and read by
/// every other component.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: u32,
    height: u32,
    terrain: Vec<Terrain>,
}

impl TileGrid {
    /// Create a grid with every tile set to `fill`.
    pub fn new(width: u32, height: u32, fill: Terrain) -> Self {
        Self {
            width,
            height,
            terrain: vec![fill; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the position lies inside the grid bounds.
    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Whether the position lies on the grid boundary (the edge of the world).
    pub fn is_boundary(&self, pos: TilePos) -> bool {
        self.contains(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x as u32 == self.width - 1
                || pos.y as u32 == self.height - 1)
    }

    /// Terrain at a position, or `None` when out of bounds.
    pub fn terrain_at(&self, pos: TilePos) -> Option<Terrain> {
        if !self.contains(pos) {
            return None;
        }
        Some(self.terrain[(pos.y as usize) * (self.width as usize) + pos.x as usize])
    }

    /// Overwrite the terrain at a position. Out-of-bounds writes are ignored.
    /// World-generation only; never called during simulation.
    pub fn set_terrain(&mut self, pos: TilePos, terrain: Terrain) {
        if self.contains(pos) {
            self.terrain[(pos.y as usize) * (self.width as usize) + pos.x as usize] = terrain;
        }
    }
}
