/// Gamepad input tracker using gilrs.
///
/// The jump mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Movement (left/right/up/down)
///   A / B                 →  Jump
///   Start                 →  Restart
///   Select                →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use ladders::config::GamepadConfig;
use ladders::domain::entity::InputSnapshot;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

/// Directional pad, digital.
#[derive(Clone, Copy, Debug, Default)]
struct Dirs {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],
    dpad: Dirs,
    stick_x: f32,
    stick_y: f32,

    jump: Vec<Btn>,

    pub connected: bool,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(_) => (None, false),
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: Dirs::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            jump: vec![Btn::A, Btn::B],
            connected,
        }
    }

    /// Load the jump mapping from config. Unknown names are skipped;
    /// an empty result keeps the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let jump: Vec<Btn> = cfg.jump.iter().filter_map(|s| Btn::from_name(s)).collect();
        if !jump.is_empty() {
            self.jump = jump;
        }
    }

    pub fn update(&mut self) {
        for b in &mut self.buttons {
            b.just_pressed = false;
        }

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => self.connected = true,
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        match gilrs_btn {
            Button::DPadUp => self.dpad.up = held,
            Button::DPadDown => self.dpad.down = held,
            Button::DPadLeft => self.dpad.left = held,
            Button::DPadRight => self.dpad.right = held,
            other => {
                if let Some(btn) = Btn::from_gilrs(other) {
                    self.press(btn, held);
                }
            }
        }
    }

    fn press(&mut self, btn: Btn, held: bool) {
        let state = &mut self.buttons[btn_index(btn)];
        if held && !state.held {
            state.just_pressed = true;
        }
        state.held = held;
    }

    // ── Queries ──

    /// D-pad or stick direction; stick y is positive up.
    fn dirs(&self) -> Dirs {
        Dirs {
            up: self.dpad.up || self.stick_y > STICK_DEADZONE,
            down: self.dpad.down || self.stick_y < -STICK_DEADZONE,
            left: self.dpad.left || self.stick_x < -STICK_DEADZONE,
            right: self.dpad.right || self.stick_x > STICK_DEADZONE,
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        let d = self.dirs();
        InputSnapshot {
            left: d.left,
            right: d.right,
            up: d.up,
            down: d.down,
            jump: self.jump.iter().any(|&b| self.buttons[btn_index(b)].held),
        }
    }

    pub fn restart_pressed(&self) -> bool {
        self.buttons[btn_index(Btn::Start)].just_pressed
    }

    pub fn quit_pressed(&self) -> bool {
        self.buttons[btn_index(Btn::Select)].just_pressed
    }

    // ── Internal ──

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); BTN_COUNT];
        self.dpad = Dirs::default();
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

/// Merge keyboard and gamepad: a signal is on if either source has it.
pub fn merge(a: InputSnapshot, b: InputSnapshot) -> InputSnapshot {
    InputSnapshot {
        left: a.left || b.left,
        right: a.right || b.right,
        up: a.up || b.up,
        down: a.down || b.down,
        jump: a.jump || b.jump,
    }
}
