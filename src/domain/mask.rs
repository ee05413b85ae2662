//! Collision mask for ladder caps.
//!
//! Ladder-top tiles are floor for anyone walking over them and passable
//! for anyone on the ladder. The sweep covers the whole grid; it is the
//! only writer of tile collision edges after the level is built.

use tracing::trace;

use super::entity::PlayerState;
use super::grid::TileGrid;
use super::tile::{CollisionEdges, TileKind};

/// Edges a ladder cap should have while the character is in `state`.
pub fn ladder_top_edges(state: PlayerState) -> CollisionEdges {
    CollisionEdges::all(!state.is_on_ladder())
}

/// Set every ladder cap's edges for `state`. Returns how many tiles changed.
pub fn apply(grid: &mut TileGrid, state: PlayerState) -> usize {
    let changed = grid.set_collision(TileKind::LadderTop, ladder_top_edges(state));
    if changed > 0 {
        trace!(state = state.name(), changed, "ladder caps toggled");
    }
    changed
}
