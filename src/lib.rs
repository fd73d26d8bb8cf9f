//! River Raid - A scrolling lane shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `driver`: Per-frame loop that feeds controls in and pushes snapshots out
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use driver::{FrameDriver, FrameSink, NullSink};
pub use tuning::{ArchetypeSpec, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Lateral lane bounds (visible width at z=0 for a 75° camera at z=5)
    pub const X_MIN: f32 = -3.7;
    pub const X_MAX: f32 = 3.7;

    /// Player placement - lane height and depth never change
    pub const PLAYER_Y: f32 = -2.0;
    pub const PLAYER_Z: f32 = 0.0;
    /// Player box: 0.5 wide, 0.2 tall, 1.5 deep
    pub const PLAYER_HALF_EXTENTS: [f32; 3] = [0.25, 0.1, 0.75];

    /// Per-tick speeds
    pub const PLAYER_SPEED: f32 = 0.1;
    pub const ENEMY_SPEED: f32 = 0.05;
    pub const PROJECTILE_SPEED: f32 = 0.3;
    /// Projectile: thin upright cylinder, radius 0.05, height 0.5
    pub const PROJECTILE_HALF_EXTENTS: [f32; 3] = [0.05, 0.25, 0.05];

    /// Camera depth; enemies leave once they pass it plus a margin
    pub const CAMERA_Z: f32 = 5.0;
    pub const ENEMY_EXIT_MARGIN: f32 = 1.0;
    /// Enemies appear this far ahead of the player
    pub const SPAWN_DISTANCE: f32 = 20.0;
    /// Projectiles leave once this far ahead of the player
    pub const PROJECTILE_RANGE: f32 = 30.0;

    /// Ticks between spawns (~2 seconds)
    pub const SPAWN_INTERVAL_TICKS: u32 = 120;
    /// Ticks between shots (0.3 seconds)
    pub const FIRE_COOLDOWN_TICKS: u32 = 18;

    pub const STARTING_LIVES: u8 = 3;

    /// Background scroll per tick (texture-space units, wraps at 1.0)
    pub const SCROLL_PER_TICK: f32 = 0.005;
}
