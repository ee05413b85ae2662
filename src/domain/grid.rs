//! Tile grid: the static per-level tile lookup.
//!
//! Tiles are stored row-major. Lookups outside the grid never panic,
//! they classify as `TileKind::Empty`. The per-edge collision flags
//! are the only runtime-mutable tile state, and the only writer is
//! `domain::mask` (plus the initial build).

use glam::Vec2;

use super::tile::{CollisionEdges, Tile, TileKind, TILE_SIZE};

/// Axis-aligned box in world units (y grows downwards).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb { min, max }
    }

    pub fn from_tile(tile: &Tile) -> Self {
        let min = Vec2::new(tile.world_x(), tile.world_y());
        Aabb { min, max: min + Vec2::splat(TILE_SIZE) }
    }

    /// Intersection test that also accepts touching edges.
    pub fn touches(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

#[derive(Clone, Debug)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// A grid of empty tiles.
    pub fn new(width: usize, height: usize) -> Self {
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::new(x, y, TileKind::Empty)))
            .collect();
        TileGrid { width, height, tiles }
    }

    /// Build from rows of kinds. Short rows are padded with empty tiles.
    pub fn from_rows(rows: &[Vec<TileKind>]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut grid = TileGrid::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &kind) in row.iter().enumerate() {
                grid.tiles[y * width + x] = Tile::new(x, y, kind);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// World size in world units.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32 * TILE_SIZE, self.height as f32 * TILE_SIZE)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        if x < self.width && y < self.height {
            self.tiles.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Tile kind at (x, y). Out of bounds = empty.
    #[inline]
    pub fn kind_at(&self, x: usize, y: usize) -> TileKind {
        self.get(x, y).map(|t| t.kind).unwrap_or_default()
    }

    /// Collision edges at signed cell coordinates. Out of bounds = no edges;
    /// world bounds are handled by the physics pass.
    #[inline]
    pub fn edges_at(&self, x: i32, y: i32) -> CollisionEdges {
        if x < 0 || y < 0 {
            return CollisionEdges::NONE;
        }
        self.get(x as usize, y as usize)
            .map(|t| t.collides)
            .unwrap_or(CollisionEdges::NONE)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Set the collision edges of every tile of `kind`.
    /// Returns how many tiles actually changed.
    pub fn set_collision(&mut self, kind: TileKind, edges: CollisionEdges) -> usize {
        let mut changed = 0;
        for tile in self.tiles.iter_mut().filter(|t| t.kind == kind) {
            if tile.collides != edges {
                tile.collides = edges;
                changed += 1;
            }
        }
        changed
    }

    /// All tiles whose cell touches `area`, row by row.
    pub fn tiles_touching(&self, area: &Aabb) -> Vec<Tile> {
        if self.width == 0 || self.height == 0 {
            return vec![];
        }
        let cell_range = |lo: f32, hi: f32, len: usize| {
            let first = (lo / TILE_SIZE).floor().max(0.0) as usize;
            let last = ((hi / TILE_SIZE).floor().max(0.0) as usize).min(len - 1);
            first..=last
        };
        let xs = cell_range(area.min.x, area.max.x, self.width);
        let ys = cell_range(area.min.y, area.max.y, self.height);

        let mut out = vec![];
        for y in ys {
            for x in xs.clone() {
                if let Some(tile) = self.get(x, y) {
                    if Aabb::from_tile(tile).touches(area) {
                        out.push(*tile);
                    }
                }
            }
        }
        out
    }
}

/// Centre of the tile column containing world x.
#[inline]
pub fn column_center(x: f32) -> f32 {
    (x / TILE_SIZE).floor() * TILE_SIZE + TILE_SIZE / 2.0
}
