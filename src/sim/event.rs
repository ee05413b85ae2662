/// Events emitted during a simulation step.
/// The presentation layer consumes these for animation and the status line.

use crate::domain::entity::{BodyProfile, Facing, PlayerState};

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    /// The player entered a new state (re-entering `Jumping` counts).
    StateChanged {
        from: PlayerState,
        to: PlayerState,
        animation: &'static str,
        facing: Facing,
        body: BodyProfile,
    },
    /// The mask sweep changed this many ladder caps.
    LadderCapsToggled { changed: usize, solid: bool },
    /// The world was reset to the level's initial state.
    Restarted,
}
