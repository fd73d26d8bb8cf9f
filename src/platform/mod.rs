//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key codes to control state)

pub mod input;

pub use input::{KeyAction, KeyboardState};
