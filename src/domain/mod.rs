//! Movement core: tiles, the character, its state machine and the
//! passes that feed it. Nothing in here touches the terminal or the
//! filesystem.

pub mod animation;
pub mod entity;
pub mod grid;
pub mod mask;
pub mod overlap;
pub mod physics;
pub mod player;
pub mod rules;
pub mod tile;
pub mod timer;
