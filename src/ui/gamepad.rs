/// Gamepad input via gilrs.
///
/// Jump and quit buttons come from the `[gamepad]` config section. Walking
/// is always the D-pad or the left stick.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Physical controls we track. Each one is a bit in a `PadBits` mask.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
    DPadUp,
    DPadLeft,
    DPadRight,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        let btn = match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Btn::A,
            "B" | "EAST" => Btn::B,
            "X" | "WEST" => Btn::X,
            "Y" | "NORTH" => Btn::Y,
            "L1" | "LB" => Btn::L1,
            "R1" | "RB" => Btn::R1,
            "L2" | "LT" => Btn::L2,
            "R2" | "RT" => Btn::R2,
            "START" => Btn::Start,
            "SELECT" | "BACK" => Btn::Select,
            "UP" | "DPADUP" => Btn::DPadUp,
            _ => return None,
        };
        Some(btn)
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        let btn = match btn {
            Button::South => Btn::A,
            Button::East => Btn::B,
            Button::West => Btn::X,
            Button::North => Btn::Y,
            Button::LeftTrigger => Btn::L1,
            Button::RightTrigger => Btn::R1,
            Button::LeftTrigger2 => Btn::L2,
            Button::RightTrigger2 => Btn::R2,
            Button::Start => Btn::Start,
            Button::Select => Btn::Select,
            Button::DPadUp => Btn::DPadUp,
            Button::DPadLeft => Btn::DPadLeft,
            Button::DPadRight => Btn::DPadRight,
            _ => return None,
        };
        Some(btn)
    }

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
struct PadBits(u16);

impl PadBits {
    fn set(&mut self, btn: Btn, on: bool) {
        if on {
            self.0 |= btn.bit();
        } else {
            self.0 &= !btn.bit();
        }
    }

    fn has(self, btn: Btn) -> bool {
        self.0 & btn.bit() != 0
    }

    fn any(self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.has(b))
    }
}

/// Which buttons trigger each action.
#[derive(Debug, PartialEq)]
struct ActionMap {
    jump: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            jump: vec![Btn::A, Btn::B, Btn::DPadUp],
            quit: vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// A config list with at least one known name replaces the default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        let defaults = ActionMap::default();
        ActionMap {
            jump: buttons_or(&cfg.jump, defaults.jump),
            quit: buttons_or(&cfg.quit, defaults.quit),
        }
    }
}

fn buttons_or(names: &[String], fallback: Vec<Btn>) -> Vec<Btn> {
    let parsed: Vec<Btn> = names
        .iter()
        .filter_map(|name| {
            let btn = Btn::from_name(name);
            if btn.is_none() {
                log::warn!("unknown gamepad button name `{name}` in config");
            }
            btn
        })
        .collect();
    if parsed.is_empty() { fallback } else { parsed }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    held: PadBits,
    /// Went down since the previous `update`.
    pressed: PadBits,
    stick_x: f32,

    actions: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                log::info!("gamepad support ready (pad connected: {has_pad})");
                (Some(g), has_pad)
            }
            Err(e) => {
                log::warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            held: PadBits::default(),
            pressed: PadBits::default(),
            stick_x: 0.0,
            actions: ActionMap::default(),
            connected,
        }
    }

    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.actions = ActionMap::from_config(cfg);
    }

    /// Drain pending pad events. Call once per loop iteration.
    pub fn update(&mut self) {
        self.pressed = PadBits::default();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = &mut self.gilrs else { return };
        let events: Vec<EventType> = std::iter::from_fn(|| gilrs.next_event())
            .map(|e| e.event)
            .collect();

        for event in events {
            match event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    if let Some(btn) = Btn::from_gilrs(btn) {
                        self.press(btn);
                    }
                }
                EventType::ButtonReleased(btn, _) => {
                    if let Some(btn) = Btn::from_gilrs(btn) {
                        self.held.set(btn, false);
                    }
                }
                EventType::AxisChanged(Axis::LeftStickX, value, _) => {
                    self.connected = true;
                    self.stick_x = value;
                }
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.held = PadBits::default();
                    self.stick_x = 0.0;
                }
                _ => {}
            }
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn press(&mut self, btn: Btn) {
        if !self.held.has(btn) {
            self.pressed.set(btn, true);
        }
        self.held.set(btn, true);
    }

    pub fn jump_pressed(&self) -> bool {
        self.pressed.any(&self.actions.jump)
    }

    pub fn quit_pressed(&self) -> bool {
        self.pressed.any(&self.actions.quit)
    }

    pub fn left_held(&self) -> bool {
        self.held.has(Btn::DPadLeft) || self.stick_x < -STICK_DEADZONE
    }

    pub fn right_held(&self) -> bool {
        self.held.has(Btn::DPadRight) || self.stick_x > STICK_DEADZONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(jump: &[&str], quit: &[&str]) -> GamepadConfig {
        GamepadConfig {
            jump: jump.iter().map(|s| s.to_string()).collect(),
            quit: quit.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn offline() -> GamepadState {
        let mut gp = GamepadState::new();
        #[cfg(feature = "gamepad")]
        {
            gp.gilrs = None;
        }
        gp.update();
        gp
    }

    #[test]
    fn button_names_are_case_insensitive_with_aliases() {
        assert_eq!(Btn::from_name("a"), Some(Btn::A));
        assert_eq!(Btn::from_name("South"), Some(Btn::A));
        assert_eq!(Btn::from_name("rb"), Some(Btn::R1));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("up"), Some(Btn::DPadUp));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn config_replaces_mapping() {
        let map = ActionMap::from_config(&cfg(&["X", "R1"], &["Start"]));
        assert_eq!(map.jump, vec![Btn::X, Btn::R1]);
        assert_eq!(map.quit, vec![Btn::Start]);
    }

    #[test]
    fn unusable_config_keeps_defaults() {
        let map = ActionMap::from_config(&cfg(&["turbo"], &[]));
        assert_eq!(map, ActionMap::default());
    }

    #[test]
    fn press_is_an_edge_and_hold_persists() {
        let mut gp = offline();
        gp.press(Btn::A);
        gp.press(Btn::DPadLeft);
        assert!(gp.jump_pressed());
        assert!(gp.left_held());

        gp.update();
        assert!(!gp.jump_pressed(), "jump fires once per press");
        assert!(gp.left_held());

        gp.press(Btn::A);
        assert!(!gp.jump_pressed(), "still held, not a new press");
    }

    #[test]
    fn stick_outside_deadzone_walks() {
        let mut gp = offline();
        gp.stick_x = 0.1;
        assert!(!gp.left_held() && !gp.right_held());
        gp.stick_x = 0.8;
        assert!(gp.right_held());
        gp.stick_x = -0.8;
        assert!(gp.left_held());
    }
}
