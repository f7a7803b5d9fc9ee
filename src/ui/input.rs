/// Keyboard input tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Continuous walking while a direction key is held
///   - Edge-triggered jump (fires once per press, never on auto-repeat)
///
/// Release events are requested through crossterm's keyboard enhancement
/// protocol when the terminal supports it. Otherwise a key counts as released
/// once no Press/Repeat has arrived for `HOLD_TIMEOUT`.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};

use crate::domain::entity::Intent;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Key bindings ──

pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_JUMP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Char(' ')];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent
    /// drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain (Ctrl+C detection).
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    honor_release: bool,
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

    /// Ask the terminal for explicit key Release events. Call after raw mode
    /// is on. Falls back to timeout release if unsupported.
    pub fn enable_release_events<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(out, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))?;
            self.honor_release = true;
            log::info!("keyboard release events enabled");
        } else {
            log::info!("terminal has no keyboard enhancement, using hold timeout");
        }
        Ok(())
    }

    pub fn disable_release_events<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.honor_release {
            execute!(out, PopKeyboardEnhancementFlags)?;
            self.honor_release = false;
        }
        Ok(())
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per loop iteration, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply_key(key, Instant::now());
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        if !self.honor_release {
            let now = Instant::now();
            self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
        }
    }

    fn apply_key(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            // Unconfirmed release reports are ignored; the timeout expires the key.
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

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_at(code, Instant::now())
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed during the last drain? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Bound actions ──

    /// Held or just tapped: a tap shorter than one tick still moves.
    pub fn left_held(&self) -> bool {
        self.any_held(KEYS_LEFT) || self.any_pressed(KEYS_LEFT)
    }

    pub fn right_held(&self) -> bool {
        self.any_held(KEYS_RIGHT) || self.any_pressed(KEYS_RIGHT)
    }

    pub fn jump_pressed(&self) -> bool {
        self.any_pressed(KEYS_JUMP)
    }

    pub fn quit_pressed(&self) -> bool {
        self.ctrl_c_pressed() || self.any_pressed(KEYS_QUIT)
    }

    // ── Internal ──

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active.get(&code)
            .map(|t| self.honor_release || now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

/// Combine held directions into one intent. Both or neither means idle.
pub fn intent_from(left: bool, right: bool) -> Intent {
    match (left, right) {
        (true, false) => Intent::Left,
        (false, true) => Intent::Right,
        _ => Intent::Idle,
    }
}
