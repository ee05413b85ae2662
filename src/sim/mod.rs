//! Simulation layer: the per-level world, the tick pipeline and level loading.

pub mod event;
pub mod level;
pub mod step;
pub mod world;
