//! Arcade physics: the collision pass that feeds the state machine.
//!
//! ## Per call
//!   1. Gravity (if the character's gravity flag is on)
//!   2. Move along x, stop at tile faces whose edge flag is enabled
//!   3. Move along y, same rule; blocked below = grounded
//!   4. Clamp to world bounds (the bottom bound counts as floor)
//!   5. Collect overlap candidates: every tile touching the body
//!
//! ## Face crossing
//! A face only blocks a body that crosses it during this move. A body
//! already inside a tile by more than `TILE_BIAS` passes on, so caps
//! that turn solid while someone is halfway through do not trap them,
//! while a body resting a pixel or two into a cap is pushed back out.

use std::ops::RangeInclusive;

use super::entity::Character;
use super::grid::{Aabb, TileGrid};
use super::tile::{Tile, TILE_SIZE};

/// Downward acceleration (world units / second²).
pub const GRAVITY: f32 = 512.0;
/// Penetration depth still resolved back to the face.
pub const TILE_BIAS: f32 = 4.0;

const SKIN: f32 = 0.001;

/// Which sides of the body hit something during the last move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Blocked {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Result of one collision pass.
#[derive(Clone, Debug, Default)]
pub struct Contact {
    /// Floor contact this tick.
    pub grounded: bool,
    pub blocked: Blocked,
    /// Tiles touching the body after the move.
    pub candidates: Vec<Tile>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ArcadePhysics;

impl ArcadePhysics {
    /// Integrate the character's velocity over `dt` against `grid`.
    pub fn move_and_collide(&self, c: &mut Character, grid: &TileGrid, dt: f32) -> Contact {
        if c.gravity {
            c.velocity.y += GRAVITY * dt;
        }

        let mut blocked = Blocked::default();
        let mut body = c.aabb();

        let dx = c.velocity.x * dt;
        if dx != 0.0 && sweep_x(&mut body, dx, grid, &mut blocked) {
            c.velocity.x = 0.0;
        }

        let dy = c.velocity.y * dt;
        if dy != 0.0 && sweep_y(&mut body, dy, grid, &mut blocked) {
            c.velocity.y = 0.0;
        }

        if clamp_to_world(&mut body, grid, &mut blocked) && blocked.down && c.velocity.y > 0.0 {
            c.velocity.y = 0.0;
        }

        c.set_aabb_min(body.min);
        let candidates = grid.tiles_touching(&c.aabb());

        Contact { grounded: blocked.down, blocked, candidates }
    }
}

#[inline]
fn cell(v: f32) -> i32 {
    (v / TILE_SIZE).floor() as i32
}

/// Cells covered by the open interval (lo, hi).
#[inline]
fn span(lo: f32, hi: f32) -> RangeInclusive<i32> {
    cell(lo + SKIN)..=cell(hi - SKIN)
}

fn shift(body: &mut Aabb, dx: f32, dy: f32) {
    body.min.x += dx;
    body.max.x += dx;
    body.min.y += dy;
    body.max.y += dy;
}

/// Horizontal move. Returns true if a face stopped the body.
fn sweep_x(body: &mut Aabb, dx: f32, grid: &TileGrid, blocked: &mut Blocked) -> bool {
    let rows = span(body.min.y, body.max.y);

    if dx > 0.0 {
        let old = body.max.x;
        let new = old + dx;
        for tx in cell(old - TILE_BIAS)..=cell(new) {
            let face = tx as f32 * TILE_SIZE;
            if face < old - TILE_BIAS || face >= new {
                continue;
            }
            if rows.clone().any(|ty| grid.edges_at(tx, ty).left) {
                shift(body, face - old, 0.0);
                blocked.right = true;
                return true;
            }
        }
    } else {
        let old = body.min.x;
        let new = old + dx;
        for tx in (cell(new)..=cell(old + TILE_BIAS)).rev() {
            let face = (tx + 1) as f32 * TILE_SIZE;
            if face > old + TILE_BIAS || face <= new {
                continue;
            }
            if rows.clone().any(|ty| grid.edges_at(tx, ty).right) {
                shift(body, face - old, 0.0);
                blocked.left = true;
                return true;
            }
        }
    }

    shift(body, dx, 0.0);
    false
}

/// Vertical move. Returns true if a face stopped the body.
fn sweep_y(body: &mut Aabb, dy: f32, grid: &TileGrid, blocked: &mut Blocked) -> bool {
    let cols = span(body.min.x, body.max.x);

    if dy > 0.0 {
        let old = body.max.y;
        let new = old + dy;
        for ty in cell(old - TILE_BIAS)..=cell(new) {
            let face = ty as f32 * TILE_SIZE;
            if face < old - TILE_BIAS || face >= new {
                continue;
            }
            if cols.clone().any(|tx| grid.edges_at(tx, ty).up) {
                shift(body, 0.0, face - old);
                blocked.down = true;
                return true;
            }
        }
    } else {
        let old = body.min.y;
        let new = old + dy;
        for ty in (cell(new)..=cell(old + TILE_BIAS)).rev() {
            let face = (ty + 1) as f32 * TILE_SIZE;
            if face > old + TILE_BIAS || face <= new {
                continue;
            }
            if cols.clone().any(|tx| grid.edges_at(tx, ty).down) {
                shift(body, 0.0, face - old);
                blocked.up = true;
                return true;
            }
        }
    }

    shift(body, 0.0, dy);
    false
}

/// Keep the body inside the level. Returns true if it had to move.
fn clamp_to_world(body: &mut Aabb, grid: &TileGrid, blocked: &mut Blocked) -> bool {
    let world = grid.world_size();
    if world.x <= 0.0 || world.y <= 0.0 {
        return false;
    }

    let mut moved = false;
    if body.min.x < 0.0 {
        shift(body, -body.min.x, 0.0);
        blocked.left = true;
        moved = true;
    } else if body.max.x > world.x {
        shift(body, world.x - body.max.x, 0.0);
        blocked.right = true;
        moved = true;
    }

    if body.min.y < 0.0 {
        shift(body, 0.0, -body.min.y);
        blocked.up = true;
        moved = true;
    } else if body.max.y >= world.y {
        // Resting exactly on the bottom bound still counts as floor
        let overshoot = body.max.y > world.y;
        shift(body, 0.0, world.y - body.max.y);
        blocked.down = true;
        moved = overshoot;
    }
    moved
}
