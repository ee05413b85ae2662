//! Ladder overlap detection.
//!
//! Runs once per tick after the collision pass. Both flags are cleared
//! first, then every candidate tile may set them; several ladder tiles
//! in one tick combine by OR. A tick with no qualifying candidate
//! therefore always ends with both flags false.
//!
//! Measurements, with `x` the character's centre and `feet` its bottom:
//!   dx = |x - (tile_left + 8)|       horizontal distance to the column centre
//!   dy = |feet - tile_top|           how far the feet are from the tile's top edge
//!
//!   LadderTop  dx <= 8 && dy <= 2  → on_ladder_top (and on_ladder_tile below)
//!   Ladder*    dx <= 8             → on_ladder_tile

use super::entity::Character;
use super::tile::{Tile, TileKind, TILE_SIZE};

/// Max horizontal distance from the column centre that still counts as "on" the ladder.
pub const LADDER_REACH_X: f32 = TILE_SIZE / 2.0;
/// Max distance between the feet and a cap's top edge for "standing on the cap".
pub const LADDER_TOP_REACH_Y: f32 = 2.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LadderFlags {
    pub on_ladder_tile: bool,
    pub on_ladder_top: bool,
}

/// Classify one candidate tile against the character.
pub fn classify(c: &Character, tile: &Tile) -> LadderFlags {
    let dx = (c.position.x - tile.world_x() - TILE_SIZE / 2.0).abs();
    let dy = (c.feet_y() - tile.world_y()).abs();

    let mut flags = LadderFlags::default();
    match tile.kind {
        TileKind::LadderTop => {
            flags.on_ladder_top = dx <= LADDER_REACH_X && dy <= LADDER_TOP_REACH_Y;
            flags.on_ladder_tile = dx <= LADDER_REACH_X;
        }
        TileKind::Ladder => {
            flags.on_ladder_tile = dx <= LADDER_REACH_X;
        }
        _ => {}
    }
    flags
}

/// Reset the character's ladder flags, then set them from `candidates`.
pub fn detect(c: &mut Character, candidates: &[Tile]) -> LadderFlags {
    c.on_ladder_tile = false;
    c.on_ladder_top = false;

    for tile in candidates {
        let hit = classify(c, tile);
        c.on_ladder_tile |= hit.on_ladder_tile;
        c.on_ladder_top |= hit.on_ladder_top;
    }

    LadderFlags { on_ladder_tile: c.on_ladder_tile, on_ladder_top: c.on_ladder_top }
}
