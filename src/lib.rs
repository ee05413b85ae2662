//! Ladders: a tile-based platformer movement core.
//!
//! `domain` holds the character state machine and the passes that feed it,
//! `sim` runs them per tick over a loaded level, `config` and `logging`
//! carry the ambient setup for the terminal front end in `main.rs`.

pub mod config;
pub mod domain;
pub mod logging;
pub mod sim;
