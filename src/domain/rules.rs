//! Transition rules: guard predicates and the per-state priority table.
//!
//! Guards are pure functions of one tick's inputs. Each state owns an
//! ordered list of `(guard, target)` pairs; the first guard that holds
//! decides the transition and later guards are not consulted. A state
//! whose list has no satisfied guard stays where it is.

use super::entity::{InputSnapshot, PlayerState};

/// Everything a guard may look at for one tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct GuardContext {
    pub input: InputSnapshot,
    /// Floor contact reported by this tick's collision pass.
    pub grounded: bool,
    pub on_ladder_tile: bool,
    pub on_ladder_top: bool,
}

impl GuardContext {
    pub fn airborne(&self) -> bool {
        !self.grounded
    }

    pub fn walking_input(&self) -> bool {
        (self.input.left || self.input.right) && self.grounded
    }

    pub fn crouch_input(&self) -> bool {
        self.input.down && self.grounded
    }

    pub fn crouch_released(&self) -> bool {
        !self.input.down
    }

    pub fn jump_eligible(&self) -> bool {
        self.input.jump && (self.grounded || self.on_ladder_tile)
    }

    /// Hanging on a ladder body: overlapping ladder, off the floor, below the cap.
    pub fn on_ladder_body(&self) -> bool {
        self.on_ladder_tile && !self.grounded && !self.on_ladder_top
    }

    pub fn on_ladder_stationary(&self) -> bool {
        self.on_ladder_body() && !self.input.up && !self.input.down
    }

    /// Up from the floor onto a ladder.
    pub fn climbing_up_from_floor(&self) -> bool {
        self.on_ladder_tile && self.grounded && !self.on_ladder_top && self.input.up
    }

    /// Down through a ladder cap.
    pub fn climbing_down_through_top(&self) -> bool {
        self.on_ladder_top && self.input.down
    }

    /// Vertical input while already on the ladder body.
    pub fn climbing_on_body(&self) -> bool {
        self.on_ladder_body() && (self.input.up || self.input.down)
    }

    pub fn climb_eligible(&self) -> bool {
        self.climbing_up_from_floor() || self.climbing_down_through_top() || self.climbing_on_body()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Guard {
    JumpEligible,
    WalkingInput,
    NoWalkingInput,
    ClimbEligible,
    OnLadderStationary,
    CrouchInput,
    CrouchReleased,
    Airborne,
    Grounded,
    LeavesLadderBody,
    StopsClimbingOnLadderBody,
    StopsClimbing,
}

impl Guard {
    pub fn holds(self, ctx: &GuardContext) -> bool {
        match self {
            Guard::JumpEligible => ctx.jump_eligible(),
            Guard::WalkingInput => ctx.walking_input(),
            Guard::NoWalkingInput => !ctx.walking_input(),
            Guard::ClimbEligible => ctx.climb_eligible(),
            Guard::OnLadderStationary => ctx.on_ladder_stationary(),
            Guard::CrouchInput => ctx.crouch_input(),
            Guard::CrouchReleased => ctx.crouch_released(),
            Guard::Airborne => ctx.airborne(),
            Guard::Grounded => ctx.grounded,
            Guard::LeavesLadderBody => !ctx.on_ladder_body(),
            Guard::StopsClimbingOnLadderBody => !ctx.climb_eligible() && ctx.on_ladder_body(),
            Guard::StopsClimbing => !ctx.climb_eligible(),
        }
    }
}

use Guard as G;
use PlayerState as S;

const STANDING: &[(Guard, PlayerState)] = &[
    (G::JumpEligible, S::Jumping),
    (G::WalkingInput, S::Walking),
    (G::ClimbEligible, S::Climbing),
    (G::OnLadderStationary, S::OnLadder),
    (G::CrouchInput, S::Crouching),
    (G::Airborne, S::Falling),
];

const WALKING: &[(Guard, PlayerState)] = &[
    (G::JumpEligible, S::Jumping),
    (G::ClimbEligible, S::Climbing),
    (G::OnLadderStationary, S::OnLadder),
    (G::NoWalkingInput, S::Standing),
    (G::Airborne, S::Falling),
];

const JUMPING: &[(Guard, PlayerState)] = &[(G::Grounded, S::Standing)];

const FALLING: &[(Guard, PlayerState)] = &[
    (G::ClimbEligible, S::Climbing),
    (G::Grounded, S::Standing),
];

const CROUCHING: &[(Guard, PlayerState)] = &[
    (G::JumpEligible, S::Jumping),
    (G::ClimbEligible, S::Climbing),
    (G::CrouchReleased, S::Standing),
    (G::Airborne, S::Falling),
];

const ON_LADDER: &[(Guard, PlayerState)] = &[
    (G::JumpEligible, S::Jumping),
    (G::ClimbEligible, S::Climbing),
    (G::LeavesLadderBody, S::Falling),
];

const CLIMBING: &[(Guard, PlayerState)] = &[
    (G::JumpEligible, S::Jumping),
    (G::StopsClimbingOnLadderBody, S::OnLadder),
    (G::StopsClimbing, S::Standing),
];

/// Ordered guard list for `state`.
pub fn transitions(state: PlayerState) -> &'static [(Guard, PlayerState)] {
    match state {
        S::Standing => STANDING,
        S::Walking => WALKING,
        S::Jumping => JUMPING,
        S::Falling => FALLING,
        S::Crouching => CROUCHING,
        S::OnLadder => ON_LADDER,
        S::Climbing => CLIMBING,
    }
}

/// First satisfied guard's target, or None to remain in `state`.
pub fn next_state(state: PlayerState, ctx: &GuardContext) -> Option<PlayerState> {
    transitions(state)
        .iter()
        .find(|(guard, _)| guard.holds(ctx))
        .map(|&(_, target)| target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(input: InputSnapshot, grounded: bool, tile: bool, top: bool) -> GuardContext {
        GuardContext { input, grounded, on_ladder_tile: tile, on_ladder_top: top }
    }

    fn keys(left: bool, right: bool, up: bool, down: bool, jump: bool) -> InputSnapshot {
        InputSnapshot { left, right, up, down, jump }
    }

    const NONE: InputSnapshot = InputSnapshot { left: false, right: false, up: false, down: false, jump: false };
    const UP: InputSnapshot = InputSnapshot { left: false, right: false, up: true, down: false, jump: false };
    const DOWN: InputSnapshot = InputSnapshot { left: false, right: false, up: false, down: true, jump: false };

    /// Every combination of the six inputs and two ladder flags.
    fn all_contexts() -> impl Iterator<Item = GuardContext> {
        (0u32..256).map(|bits| {
            let b = |i: u32| bits & (1 << i) != 0;
            ctx(keys(b(0), b(1), b(2), b(3), b(4)), b(5), b(6), b(7))
        })
    }

    // ── Guard predicates ──

    #[test]
    fn jump_needs_floor_or_ladder() {
        let jump = keys(false, false, false, false, true);
        assert!(ctx(jump, true, false, false).jump_eligible());
        assert!(ctx(jump, false, true, false).jump_eligible());
        assert!(!ctx(jump, false, false, true).jump_eligible());
        assert!(!ctx(NONE, true, true, false).jump_eligible());
    }

    #[test]
    fn ladder_body_excludes_floor_and_cap() {
        assert!(ctx(NONE, false, true, false).on_ladder_body());
        assert!(!ctx(NONE, true, true, false).on_ladder_body());
        assert!(!ctx(NONE, false, true, true).on_ladder_body());
        assert!(!ctx(NONE, false, false, false).on_ladder_body());
    }

    #[test]
    fn climb_up_from_floor_requires_no_cap() {
        assert!(ctx(UP, true, true, false).climb_eligible());
        assert!(!ctx(UP, true, true, true).climb_eligible());
    }

    #[test]
    fn down_on_cap_is_climbing() {
        assert!(ctx(DOWN, true, true, true).climb_eligible());
        assert!(ctx(DOWN, false, false, true).climb_eligible());
        assert!(!ctx(UP, false, false, true).climb_eligible());
    }

    #[test]
    fn walking_requires_floor() {
        let left = keys(true, false, false, false, false);
        assert!(ctx(left, true, false, false).walking_input());
        assert!(!ctx(left, false, false, false).walking_input());
    }

    // ── Priority table ──

    #[test]
    fn standing_up_on_ladder_climbs() {
        let c = ctx(UP, true, true, false);
        assert_eq!(next_state(S::Standing, &c), Some(S::Climbing));
    }

    #[test]
    fn standing_walk_beats_climb() {
        let c = ctx(keys(true, false, true, false, false), true, true, false);
        assert_eq!(next_state(S::Standing, &c), Some(S::Walking));
    }

    #[test]
    fn walking_climb_beats_stop() {
        let c = ctx(keys(false, true, true, false, false), true, true, false);
        assert_eq!(next_state(S::Walking, &c), Some(S::Climbing));
    }

    #[test]
    fn walking_off_ledge_stops_before_falling() {
        let c = ctx(keys(true, false, false, false, false), false, false, false);
        assert_eq!(next_state(S::Walking, &c), Some(S::Standing));
    }

    #[test]
    fn standing_on_floor_without_input_stays() {
        assert_eq!(next_state(S::Standing, &ctx(NONE, true, false, false)), None);
    }

    #[test]
    fn standing_in_air_falls() {
        assert_eq!(next_state(S::Standing, &ctx(NONE, false, false, false)), Some(S::Falling));
    }

    #[test]
    fn standing_in_air_on_ladder_hangs() {
        assert_eq!(next_state(S::Standing, &ctx(NONE, false, true, false)), Some(S::OnLadder));
    }

    #[test]
    fn standing_down_on_cap_climbs_not_crouches() {
        assert_eq!(next_state(S::Standing, &ctx(DOWN, true, true, true)), Some(S::Climbing));
        assert_eq!(next_state(S::Standing, &ctx(DOWN, true, false, false)), Some(S::Crouching));
    }

    #[test]
    fn jumping_only_lands() {
        for c in all_contexts() {
            let expected = if c.grounded { Some(S::Standing) } else { None };
            assert_eq!(next_state(S::Jumping, &c), expected, "{c:?}");
        }
    }

    #[test]
    fn falling_grabs_ladder_before_landing() {
        assert_eq!(next_state(S::Falling, &ctx(UP, false, true, false)), Some(S::Climbing));
        assert_eq!(next_state(S::Falling, &ctx(NONE, false, true, false)), None);
        assert_eq!(next_state(S::Falling, &ctx(NONE, true, false, false)), Some(S::Standing));
    }

    #[test]
    fn crouching_release_stands() {
        assert_eq!(next_state(S::Crouching, &ctx(DOWN, true, false, false)), None);
        assert_eq!(next_state(S::Crouching, &ctx(NONE, true, false, false)), Some(S::Standing));
        assert_eq!(next_state(S::Crouching, &ctx(DOWN, false, false, false)), Some(S::Falling));
    }

    #[test]
    fn on_ladder_without_flags_falls() {
        assert_eq!(next_state(S::OnLadder, &ctx(NONE, false, false, false)), Some(S::Falling));
        assert_eq!(next_state(S::OnLadder, &ctx(NONE, false, true, false)), None);
    }

    #[test]
    fn climbing_release_hangs_or_stands() {
        assert_eq!(next_state(S::Climbing, &ctx(NONE, false, true, false)), Some(S::OnLadder));
        assert_eq!(next_state(S::Climbing, &ctx(UP, false, true, true)), Some(S::Standing));
        assert_eq!(next_state(S::Climbing, &ctx(UP, false, true, false)), None);
    }

    #[test]
    fn jump_off_ladder() {
        let jump = keys(false, false, false, false, true);
        assert_eq!(next_state(S::OnLadder, &ctx(jump, false, true, false)), Some(S::Jumping));
        assert_eq!(next_state(S::Climbing, &ctx(jump, false, true, false)), Some(S::Jumping));
    }

    // ── Exhaustive: every state, every context ──

    /// The transition table written out as plain if/else chains over the
    /// raw context fields, with no shared predicates.
    fn reference(state: PlayerState, c: &GuardContext) -> Option<PlayerState> {
        let i = c.input;
        let g = c.grounded;
        let tile = c.on_ladder_tile;
        let top = c.on_ladder_top;

        let jump = i.jump && (g || tile);
        let walk = (i.left || i.right) && g;
        let body = tile && !g && !top;
        let hang = body && !i.up && !i.down;
        let climb = (tile && g && !top && i.up) || (top && i.down) || (body && (i.up || i.down));

        match state {
            S::Standing => {
                if jump {
                    Some(S::Jumping)
                } else if walk {
                    Some(S::Walking)
                } else if climb {
                    Some(S::Climbing)
                } else if hang {
                    Some(S::OnLadder)
                } else if i.down && g {
                    Some(S::Crouching)
                } else if !g {
                    Some(S::Falling)
                } else {
                    None
                }
            }
            S::Walking => {
                if jump {
                    Some(S::Jumping)
                } else if climb {
                    Some(S::Climbing)
                } else if hang {
                    Some(S::OnLadder)
                } else if !walk {
                    Some(S::Standing)
                } else if !g {
                    Some(S::Falling)
                } else {
                    None
                }
            }
            S::Jumping => g.then_some(S::Standing),
            S::Falling => {
                if climb {
                    Some(S::Climbing)
                } else if g {
                    Some(S::Standing)
                } else {
                    None
                }
            }
            S::Crouching => {
                if jump {
                    Some(S::Jumping)
                } else if climb {
                    Some(S::Climbing)
                } else if !i.down {
                    Some(S::Standing)
                } else if !g {
                    Some(S::Falling)
                } else {
                    None
                }
            }
            S::OnLadder => {
                if jump {
                    Some(S::Jumping)
                } else if climb {
                    Some(S::Climbing)
                } else if !body {
                    Some(S::Falling)
                } else {
                    None
                }
            }
            S::Climbing => {
                if jump {
                    Some(S::Jumping)
                } else if !climb && body {
                    Some(S::OnLadder)
                } else if !climb {
                    Some(S::Standing)
                } else {
                    None
                }
            }
        }
    }

    #[test]
    fn decision_matches_reference_chains() {
        for state in PlayerState::ALL {
            for c in all_contexts() {
                assert_eq!(next_state(state, &c), reference(state, &c), "{state:?} {c:?}");
            }
        }
    }

    #[test]
    fn decision_is_deterministic() {
        for state in PlayerState::ALL {
            for c in all_contexts() {
                assert_eq!(next_state(state, &c), next_state(state, &c));
            }
        }
    }

    #[test]
    fn no_state_transitions_to_itself() {
        for state in PlayerState::ALL {
            assert!(transitions(state).iter().all(|&(_, to)| to != state), "{state:?}");
        }
    }

    #[test]
    fn ladder_states_never_left_without_cause() {
        // Hanging on the body with no input keeps OnLadder
        for c in all_contexts().filter(|c| c.on_ladder_stationary() && !c.input.jump) {
            assert_eq!(next_state(S::OnLadder, &c), None, "{c:?}");
        }
    }
}
