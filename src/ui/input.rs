/// Keyboard state tracker.
///
/// The simulation reads input level-triggered: every tick it needs to know
/// which keys are down right now. Terminals only send Press/Repeat (and
/// Release, with keyboard enhancement), so this tracks a held set:
///   - Release events remove a key when the terminal reports them
///   - Otherwise a key expires `HOLD_TIMEOUT` after its last Press/Repeat
///
/// Meta keys (restart, quit) are edge-triggered via `any_pressed`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use ladders::domain::entity::InputSnapshot;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Key bindings ──

pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_UP: &[KeyCode] = &[KeyCode::Up];
pub const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
pub const KEYS_JUMP: &[KeyCode] = &[KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Char(' ')];
pub const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the last drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply(key, Instant::now());
            }
        }
        self.expire(Instant::now());
    }

    fn apply(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            // Without enhancement, releases are unreliable; rely on expiry
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held_at(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        let now = Instant::now();
        codes.iter().any(|c| self.is_held_at(*c, now))
    }

    /// Was any of these keys freshly pressed this frame? (edge trigger)
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    /// The five movement signals as currently held.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left: self.any_held(KEYS_LEFT),
            right: self.any_held(KEYS_RIGHT),
            up: self.any_held(KEYS_UP),
            down: self.any_held(KEYS_DOWN),
            jump: self.any_held(KEYS_JUMP),
        }
    }

    // ── Internal ──

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}
