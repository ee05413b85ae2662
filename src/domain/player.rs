//! Player state machine: applies the transition rules to a `Character`.
//!
//! ## Per tick
//!   1. `update_state`:    first satisfied guard picks the next state
//!   2. `update_velocity`: velocity, facing and ladder grid-lock for the state
//!
//! ## State entry (`set_state`)
//! Every entry applies the same bundle: body profile, gravity, animation,
//! and cancellation of any pending jump timer. Entering `Jumping` also
//! applies the upward impulse and schedules the forced fall.

use tracing::debug;

use super::animation::clip_for;
use super::entity::{
    BodyProfile, Character, Facing, InputSnapshot, PlayerState, CLIMB_SPEED, JUMP_DURATION,
    JUMP_VELOCITY, WALK_SPEED,
};
use super::grid::column_center;
use super::rules::{self, GuardContext};
use super::timer::{Scheduler, TimerHandle};

/// What the presentation layer needs to know when the state changes.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct StateChange {
    pub from: PlayerState,
    pub to: PlayerState,
    pub animation: &'static str,
    pub facing: Facing,
    pub body: BodyProfile,
}

/// Enter `to`, applying its side effects.
pub fn set_state(c: &mut Character, to: PlayerState, scheduler: &mut Scheduler) -> StateChange {
    let from = c.state;
    debug!(from = from.name(), to = to.name(), "player state");

    if let Some(handle) = c.jump_timer.take() {
        scheduler.cancel(handle);
    }

    c.state = to;
    c.body = to.body();
    c.gravity = !to.is_on_ladder();
    c.animation = clip_for(to).name;

    if to == PlayerState::Jumping {
        c.velocity.y = JUMP_VELOCITY;
        c.jump_timer = Some(scheduler.schedule(JUMP_DURATION));
    }

    StateChange { from, to, animation: c.animation, facing: c.facing, body: c.body }
}

/// Evaluate this tick's transition. None = remain in the current state.
pub fn update_state(
    c: &mut Character,
    ctx: &GuardContext,
    scheduler: &mut Scheduler,
) -> Option<StateChange> {
    let to = rules::next_state(c.state, ctx)?;
    Some(set_state(c, to, scheduler))
}

/// A scheduler timer fired. If it is this character's jump timer and the
/// jump is still in progress, the jump becomes a fall.
pub fn on_timer(
    c: &mut Character,
    fired: TimerHandle,
    scheduler: &mut Scheduler,
) -> Option<StateChange> {
    if c.jump_timer != Some(fired) {
        return None;
    }
    c.jump_timer = None;
    if c.state != PlayerState::Jumping {
        return None;
    }
    Some(set_state(c, PlayerState::Falling, scheduler))
}

/// Resolve velocity for the current state from this tick's input.
pub fn update_velocity(c: &mut Character, input: &InputSnapshot) {
    let dir_x = input.axis_x();
    let dir_y = input.axis_y();

    if dir_x < 0.0 {
        c.facing = Facing::Left;
    } else if dir_x > 0.0 {
        c.facing = Facing::Right;
    }

    match c.state {
        PlayerState::Climbing => {
            c.velocity.x = 0.0;
            c.velocity.y = dir_y * CLIMB_SPEED;
            c.position.x = column_center(c.position.x);
        }
        PlayerState::OnLadder => {
            c.velocity.x = 0.0;
            c.velocity.y = 0.0;
            c.position.x = column_center(c.position.x);
        }
        PlayerState::Walking => {
            c.velocity.y = 0.0;
            c.velocity.x = dir_x * WALK_SPEED;
        }
        PlayerState::Falling | PlayerState::Jumping => {
            c.velocity.x = dir_x * WALK_SPEED;
        }
        PlayerState::Standing | PlayerState::Crouching => {
            c.velocity.x = 0.0;
            c.velocity.y = 0.0;
        }
    }
}
