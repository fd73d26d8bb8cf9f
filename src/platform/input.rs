//! Keyboard to control-state mapping
//!
//! Hosts forward raw key codes (`KeyboardEvent.code` on the web) and pull a
//! normalized [`ControlState`] once per frame. Held keys persist; fire and
//! reset are edges that are cleared once taken.

use crate::sim::ControlState;

/// Logical action a key code maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Left,
    Right,
    Fire,
    Reset,
    ToggleIdle,
}

impl KeyAction {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(KeyAction::Left),
            "ArrowRight" | "KeyD" => Some(KeyAction::Right),
            "Space" => Some(KeyAction::Fire),
            "Enter" | "KeyR" => Some(KeyAction::Reset),
            "KeyI" => Some(KeyAction::ToggleIdle),
            _ => None,
        }
    }
}

/// Accumulates key events between frames
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    left: bool,
    right: bool,
    fire: bool,
    reset: bool,
    idle_mode: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed (auto-repeat included). Returns false for unmapped keys.
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(action) = KeyAction::from_code(code) else {
            return false;
        };
        match action {
            KeyAction::Left => self.left = true,
            KeyAction::Right => self.right = true,
            KeyAction::Fire => self.fire = true,
            KeyAction::Reset => self.reset = true,
            KeyAction::ToggleIdle => {
                self.idle_mode = !self.idle_mode;
                log::info!("Idle mode: {}", self.idle_mode);
            }
        }
        true
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        match KeyAction::from_code(code) {
            Some(KeyAction::Left) => self.left = false,
            Some(KeyAction::Right) => self.right = false,
            Some(_) => {}
            None => return false,
        }
        true
    }

    /// Window lost focus: nothing is held anymore
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
    }

    pub fn idle_mode(&self) -> bool {
        self.idle_mode
    }

    /// Controls for this frame; fire and reset edges are consumed
    pub fn take_controls(&mut self) -> ControlState {
        let controls = ControlState {
            move_left: self.left,
            move_right: self.right,
            fire_requested: self.fire,
            reset_requested: self.reset,
            idle_mode: self.idle_mode,
        };
        self.fire = false;
        self.reset = false;
        controls
    }
}
