//! Tile kinds and their properties.
//! Properties are queried via methods, not stored as flags,
//! so tile semantics are centralized here. The one exception is
//! the per-edge collision mask, which is runtime state.

/// Edge length of a square tile in world units.
pub const TILE_SIZE: f32 = 16.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TileKind {
    #[default]
    Empty,
    Floor,     // Solid
    Brick,     // Solid wall
    Ladder,    // Climbable body
    LadderTop, // Climbable cap, solid unless someone is on the ladder
}

impl TileKind {
    /// Tile indices used by the level tileset.
    pub const FLOOR_INDEX: u32 = 2;
    pub const LADDER_TOP_INDEX: u32 = 3;
    pub const BRICK_INDEX: u32 = 8;
    pub const LADDER_INDEX: u32 = 9;

    /// Classify a tileset index. Anything unknown is empty space.
    pub fn from_index(index: u32) -> Self {
        match index {
            Self::FLOOR_INDEX => TileKind::Floor,
            Self::BRICK_INDEX => TileKind::Brick,
            Self::LADDER_INDEX => TileKind::Ladder,
            Self::LADDER_TOP_INDEX => TileKind::LadderTop,
            _ => TileKind::Empty,
        }
    }

    /// Does this tile block movement when the level is first built?
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Brick | TileKind::LadderTop)
    }

    /// Can the character climb while overlapping this tile?
    pub fn is_climbable(self) -> bool {
        matches!(self, TileKind::Ladder | TileKind::LadderTop)
    }

    pub fn is_ladder_top(self) -> bool {
        matches!(self, TileKind::LadderTop)
    }
}

/// Which faces of a tile stop a moving body.
///
/// `up` is the top face (stops bodies falling onto the tile),
/// `down` the bottom face (stops bodies rising into it).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CollisionEdges {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl CollisionEdges {
    pub const NONE: CollisionEdges = CollisionEdges::all(false);
    pub const SOLID: CollisionEdges = CollisionEdges::all(true);

    pub const fn all(enabled: bool) -> Self {
        CollisionEdges { up: enabled, down: enabled, left: enabled, right: enabled }
    }

    pub fn any(self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tile {
    pub x: usize,
    pub y: usize,
    pub kind: TileKind,
    pub collides: CollisionEdges,
}

impl Tile {
    pub fn new(x: usize, y: usize, kind: TileKind) -> Self {
        let collides = if kind.is_solid() { CollisionEdges::SOLID } else { CollisionEdges::NONE };
        Tile { x, y, kind, collides }
    }

    /// World x of the tile's left edge.
    pub fn world_x(&self) -> f32 {
        self.x as f32 * TILE_SIZE
    }

    /// World y of the tile's top edge.
    pub fn world_y(&self) -> f32 {
        self.y as f32 * TILE_SIZE
    }
}
