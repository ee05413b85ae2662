//! The player character and the values it is driven by.
//! Seven states, two body profiles, one pending jump timer at most.

use glam::Vec2;

use super::grid::Aabb;
use super::timer::TimerHandle;

/// Sprite frame size in world units. Position is the sprite centre.
pub const SPRITE_SIZE: Vec2 = Vec2::new(16.0, 32.0);

/// Walking speed (world units / second).
pub const WALK_SPEED: f32 = 96.0;
/// Ladder climbing speed.
pub const CLIMB_SPEED: f32 = 64.0;
/// Upward impulse applied when entering `Jumping` (negative = up).
pub const JUMP_VELOCITY: f32 = -224.0;
/// Seconds after a jump starts before it forcibly becomes a fall.
pub const JUMP_DURATION: f32 = 0.5;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum PlayerState {
    #[default]
    Standing,
    Walking,
    Jumping,
    Falling,
    Crouching,
    OnLadder,
    Climbing,
}

impl PlayerState {
    pub const ALL: [PlayerState; 7] = [
        PlayerState::Standing,
        PlayerState::Walking,
        PlayerState::Jumping,
        PlayerState::Falling,
        PlayerState::Crouching,
        PlayerState::OnLadder,
        PlayerState::Climbing,
    ];

    /// States in which the character hangs on a ladder:
    /// gravity off, ladder caps passable.
    pub fn is_on_ladder(self) -> bool {
        matches!(self, PlayerState::OnLadder | PlayerState::Climbing)
    }

    pub fn body(self) -> BodyProfile {
        match self {
            PlayerState::Crouching => BodyProfile::CROUCHING,
            _ => BodyProfile::STANDARD,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerState::Standing => "standing",
            PlayerState::Walking => "walking",
            PlayerState::Jumping => "jumping",
            PlayerState::Falling => "falling",
            PlayerState::Crouching => "crouching",
            PlayerState::OnLadder => "ladder",
            PlayerState::Climbing => "climbing",
        }
    }
}

/// Horizontal facing. Sticky: no horizontal input keeps the last value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The five level-triggered input signals for one tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
}

impl InputSnapshot {
    /// Horizontal axis: left wins over right.
    pub fn axis_x(&self) -> f32 {
        if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        }
    }

    /// Vertical axis in world space (up is negative y): up wins over down.
    pub fn axis_y(&self) -> f32 {
        if self.up {
            -1.0
        } else if self.down {
            1.0
        } else {
            0.0
        }
    }
}

/// Collision body relative to the sprite's top-left corner.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BodyProfile {
    pub width: f32,
    pub height: f32,
    pub offset_y: f32,
}

impl BodyProfile {
    pub const STANDARD: BodyProfile = BodyProfile { width: 16.0, height: 24.0, offset_y: 8.0 };
    pub const CROUCHING: BodyProfile = BodyProfile { width: 16.0, height: 16.0, offset_y: 16.0 };
}

#[derive(Clone, Debug)]
pub struct Character {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub state: PlayerState,
    pub body: BodyProfile,
    pub gravity: bool,
    pub alive: bool,
    pub animation: &'static str,

    // ── Per-tick overlap flags (reset before every detection pass) ──
    pub on_ladder_tile: bool,
    pub on_ladder_top: bool,

    /// Pending jump-to-fall timer, if a jump is in progress.
    pub jump_timer: Option<TimerHandle>,
}

impl Character {
    pub fn new(position: Vec2) -> Self {
        Character {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            state: PlayerState::Standing,
            body: BodyProfile::STANDARD,
            gravity: true,
            alive: true,
            animation: "stand",
            on_ladder_tile: false,
            on_ladder_top: false,
            jump_timer: None,
        }
    }

    /// Place the character so its feet rest on the top edge of cell row `y + 1`,
    /// centred in column `x`.
    pub fn spawn_at_cell(x: usize, y: usize) -> Self {
        let tile = super::tile::TILE_SIZE;
        let centre_x = x as f32 * tile + tile / 2.0;
        let feet_y = (y + 1) as f32 * tile;
        Character::new(Vec2::new(centre_x, feet_y - SPRITE_SIZE.y / 2.0))
    }

    /// Collision box in world space.
    pub fn aabb(&self) -> Aabb {
        let left = self.position.x - SPRITE_SIZE.x / 2.0;
        let top = self.position.y - SPRITE_SIZE.y / 2.0 + self.body.offset_y;
        Aabb::new(
            Vec2::new(left, top),
            Vec2::new(left + self.body.width, top + self.body.height),
        )
    }

    /// World y of the sprite's bottom edge. The same for both body profiles.
    pub fn feet_y(&self) -> f32 {
        self.position.y + SPRITE_SIZE.y / 2.0
    }

    /// Move so the collision box's top-left lands on `min`.
    pub fn set_aabb_min(&mut self, min: Vec2) {
        self.position.x = min.x + SPRITE_SIZE.x / 2.0;
        self.position.y = min.y + SPRITE_SIZE.y / 2.0 - self.body.offset_y;
    }
}
