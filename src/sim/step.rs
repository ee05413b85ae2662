/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Timers (a due jump timer turns `Jumping` into `Falling`)
///   2. Physics: gravity, tile collision → `Contact`
///   3. Ladder overlap flags (reset, then recompute)
///   4. Ladder-cap mask, `MaskTiming::Lagged` (last tick's state)
///   5. State transition
///   6. Velocity for the resulting state
///   7. Ladder-cap mask, `MaskTiming::Immediate` (this tick's state)
///   8. Animation clock
///
/// Steps 3–8 only depend on the `Contact`, so `apply_contact` runs them
/// on their own for callers that supply contact data directly.

use crate::domain::animation::clip_for;
use crate::domain::entity::InputSnapshot;
use crate::domain::mask;
use crate::domain::overlap;
use crate::domain::physics::Contact;
use crate::domain::player::{self, StateChange};
use crate::domain::rules::GuardContext;
use super::event::SimEvent;
use super::world::{MaskTiming, World};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut World, input: InputSnapshot) -> Vec<SimEvent> {
    let mut events: Vec<SimEvent> = Vec::new();
    world.tick += 1;

    resolve_timers(world, &mut events);

    let dt = world.options.dt;
    let contact = world.physics.move_and_collide(&mut world.player, &world.grid, dt);

    events.extend(apply_contact(world, input, &contact));
    events
}

/// Overlap, mask, state, velocity and animation for one tick's contact.
pub fn apply_contact(world: &mut World, input: InputSnapshot, contact: &Contact) -> Vec<SimEvent> {
    let mut events: Vec<SimEvent> = Vec::new();
    world.grounded = contact.grounded;

    overlap::detect(&mut world.player, &contact.candidates);

    if world.options.mask_timing == MaskTiming::Lagged {
        resolve_mask(world, &mut events);
    }

    resolve_state(world, input, contact, &mut events);
    player::update_velocity(&mut world.player, &input);

    if world.options.mask_timing == MaskTiming::Immediate {
        resolve_mask(world, &mut events);
    }

    resolve_animation(world);
    events
}

// ══════════════════════════════════════════════════════════════
// Resolvers
// ══════════════════════════════════════════════════════════════

fn resolve_timers(world: &mut World, events: &mut Vec<SimEvent>) {
    let fired = world.scheduler.advance(world.options.dt);
    for handle in fired {
        if let Some(change) = player::on_timer(&mut world.player, handle, &mut world.scheduler) {
            events.push(state_changed(change));
        }
    }
}

fn resolve_mask(world: &mut World, events: &mut Vec<SimEvent>) {
    let state = world.player.state;
    let changed = mask::apply(&mut world.grid, state);
    if changed > 0 {
        events.push(SimEvent::LadderCapsToggled { changed, solid: !state.is_on_ladder() });
    }
}

fn resolve_state(world: &mut World, input: InputSnapshot, contact: &Contact, events: &mut Vec<SimEvent>) {
    let ctx = GuardContext {
        input,
        grounded: contact.grounded,
        on_ladder_tile: world.player.on_ladder_tile,
        on_ladder_top: world.player.on_ladder_top,
    };
    if let Some(change) = player::update_state(&mut world.player, &ctx, &mut world.scheduler) {
        events.push(state_changed(change));
    }
}

fn resolve_animation(world: &mut World) {
    world.animator.play(clip_for(world.player.state));
    world.animator.advance(world.options.dt);
}

fn state_changed(change: StateChange) -> SimEvent {
    SimEvent::StateChanged {
        from: change.from,
        to: change.to,
        animation: change.animation,
        facing: change.facing,
        body: change.body,
    }
}

/// Reset the world to the start of its level.
pub fn restart(world: &mut World) -> Vec<SimEvent> {
    world.restart();
    vec![SimEvent::Restarted]
}
