/// World: the complete state of a running level.
///
/// ## Tile Architecture
///
/// Two copies of the grid:
///   - `base_grid`: the level as built. **Never mutated** after load.
///   - `grid`:      the live grid; only ladder-cap collision edges change.
///
/// `restart` resets `grid = base_grid.clone()` and respawns the player.

use tracing::info;

use crate::domain::animation::Animator;
use crate::domain::entity::Character;
use crate::domain::grid::TileGrid;
use crate::domain::physics::ArcadePhysics;
use crate::domain::timer::Scheduler;

use super::level::LevelDef;

/// When the ladder-cap mask sweep runs relative to the state decision.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MaskTiming {
    /// After the state machine, using this tick's state. Physics on the
    /// next tick sees the new state's caps.
    #[default]
    Immediate,
    /// Before the state machine, using last tick's state. Caps trail a
    /// state change by one extra tick.
    Lagged,
}

impl MaskTiming {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lagged" => Some(MaskTiming::Lagged),
            "immediate" => Some(MaskTiming::Immediate),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SimOptions {
    pub mask_timing: MaskTiming,
    /// Simulated seconds per tick.
    pub dt: f32,
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions { mask_timing: MaskTiming::Immediate, dt: 1.0 / 60.0 }
    }
}

impl SimOptions {
    pub fn from_tick_rate(tick_rate_ms: u64, mask_timing: MaskTiming) -> Self {
        SimOptions { mask_timing, dt: tick_rate_ms.max(1) as f32 / 1000.0 }
    }
}

pub struct World {
    // ── Tile layers ──
    /// Level as built. Never mutated after `from_level`.
    base_grid: TileGrid,
    /// Live grid; ladder-cap edges follow the player's state.
    pub grid: TileGrid,

    // ── Player ──
    pub player: Character,
    pub animator: Animator,
    /// Floor contact from the last physics pass (for display).
    pub grounded: bool,

    // ── Collaborators ──
    pub scheduler: Scheduler,
    pub physics: ArcadePhysics,
    pub options: SimOptions,

    // ── Meta ──
    pub level_name: String,
    pub spawn: (usize, usize),
    pub tick: u64,
}

impl World {
    /// Build a world from a parsed level. Floor, brick and ladder-cap
    /// edges start enabled; the player starts `Standing` at the spawn cell.
    pub fn from_level(def: &LevelDef, options: SimOptions) -> Self {
        let grid = TileGrid::from_rows(&def.rows);
        info!(
            level = %def.name,
            width = grid.width(),
            height = grid.height(),
            spawn_x = def.spawn.0,
            spawn_y = def.spawn.1,
            "world built"
        );

        World {
            base_grid: grid.clone(),
            grid,
            player: Character::spawn_at_cell(def.spawn.0, def.spawn.1),
            animator: Animator::default(),
            grounded: false,
            scheduler: Scheduler::new(),
            physics: ArcadePhysics,
            options,
            level_name: def.name.clone(),
            spawn: def.spawn,
            tick: 0,
        }
    }

    /// Reset grid, player, timers and the tick counter.
    pub fn restart(&mut self) {
        self.grid = self.base_grid.clone();
        self.player = Character::spawn_at_cell(self.spawn.0, self.spawn.1);
        self.animator = Animator::default();
        self.grounded = false;
        self.scheduler.clear();
        self.tick = 0;
        info!(level = %self.level_name, "world restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::PlayerState;
    use crate::domain::mask;
    use crate::domain::tile::{CollisionEdges, TileKind};
    use crate::sim::level;

    #[test]
    fn mask_timing_names() {
        assert_eq!(MaskTiming::from_name("lagged"), Some(MaskTiming::Lagged));
        assert_eq!(MaskTiming::from_name(" Immediate "), Some(MaskTiming::Immediate));
        assert_eq!(MaskTiming::from_name("later"), None);
    }

    #[test]
    fn tick_rate_sets_dt() {
        let o = SimOptions::from_tick_rate(20, MaskTiming::Immediate);
        assert_eq!(o.dt, 0.02);
        assert_eq!(o.mask_timing, MaskTiming::Immediate);
    }

    #[test]
    fn from_level_builds_solid_caps_and_spawn() {
        let def = level::embedded();
        let w = World::from_level(&def, SimOptions::default());
        assert_eq!(w.grid.width(), def.width());
        assert!(w
            .grid
            .iter()
            .filter(|t| t.kind == TileKind::LadderTop)
            .all(|t| t.collides == CollisionEdges::SOLID));
        assert_eq!(w.player.state, PlayerState::Standing);
        assert_eq!(w.player.feet_y(), (def.spawn.1 + 1) as f32 * 16.0);
    }

    #[test]
    fn restart_restores_grid_and_player() {
        let def = level::embedded();
        let mut w = World::from_level(&def, SimOptions::default());
        mask::apply(&mut w.grid, PlayerState::Climbing);
        w.player.position.x += 40.0;
        w.player.state = PlayerState::Climbing;
        w.scheduler.schedule(1.0);
        w.tick = 99;

        w.restart();
        assert!(w
            .grid
            .iter()
            .filter(|t| t.kind == TileKind::LadderTop)
            .all(|t| t.collides == CollisionEdges::SOLID));
        assert_eq!(w.player.state, PlayerState::Standing);
        assert_eq!(w.player.position, Character::spawn_at_cell(2, 12).position);
        assert_eq!(w.tick, 0);
        assert!(w.scheduler.advance(2.0).is_empty());
    }
}
