//! Data-driven game balance
//!
//! Every tunable the simulation reads lives in [`Tuning`]. The defaults mirror
//! `crate::consts`; a JSON document may override any subset of fields.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::*;
use crate::sim::Archetype;

/// Tolerance when checking that spawn weights sum to one
const WEIGHT_EPSILON: f32 = 1e-3;

/// Errors raised when tuning data is rejected
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    /// Tuning file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Archetype weights unusable for a weighted draw
    #[error("Invalid spawn weights: {0}")]
    InvalidWeights(String),

    /// Lateral bounds inverted or non-finite
    #[error("Invalid lane bounds: x_min={x_min}, x_max={x_max}")]
    InvalidBounds { x_min: f32, x_max: f32 },

    /// A speed or extent that must be positive is not
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    /// Spawn interval of zero ticks
    #[error("Spawn interval must be at least one tick")]
    ZeroSpawnInterval,

    /// Starting with no lives would begin in a game-over state
    #[error("Starting lives must be at least one")]
    ZeroLives,
}

/// Per-archetype balance data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    /// Bounding half-size on each axis
    pub half_extents: Vec3,
    /// Points awarded when a projectile destroys this enemy
    pub score_value: u32,
    /// Probability of being picked on a spawn tick
    pub spawn_weight: f32,
}

impl ArchetypeSpec {
    pub const LIGHT: Self = Self {
        half_extents: Vec3::splat(0.2),
        score_value: 10,
        spawn_weight: 0.60,
    };
    pub const MEDIUM: Self = Self {
        half_extents: Vec3::splat(0.3),
        score_value: 25,
        spawn_weight: 0.25,
    };
    pub const HEAVY: Self = Self {
        half_extents: Vec3::splat(0.45),
        score_value: 50,
        spawn_weight: 0.15,
    };
}

/// Archetype entry as written in a tuning file; absent fields keep the defaults
#[derive(Deserialize)]
struct ArchetypeOverride {
    half_extents: Option<Vec3>,
    score_value: Option<u32>,
    spawn_weight: Option<f32>,
}

impl ArchetypeOverride {
    fn apply(self, base: ArchetypeSpec) -> ArchetypeSpec {
        ArchetypeSpec {
            half_extents: self.half_extents.unwrap_or(base.half_extents),
            score_value: self.score_value.unwrap_or(base.score_value),
            spawn_weight: self.spawn_weight.unwrap_or(base.spawn_weight),
        }
    }
}

fn light_spec<'de, D: Deserializer<'de>>(d: D) -> Result<ArchetypeSpec, D::Error> {
    Ok(ArchetypeOverride::deserialize(d)?.apply(ArchetypeSpec::LIGHT))
}

fn medium_spec<'de, D: Deserializer<'de>>(d: D) -> Result<ArchetypeSpec, D::Error> {
    Ok(ArchetypeOverride::deserialize(d)?.apply(ArchetypeSpec::MEDIUM))
}

fn heavy_spec<'de, D: Deserializer<'de>>(d: D) -> Result<ArchetypeSpec, D::Error> {
    Ok(ArchetypeOverride::deserialize(d)?.apply(ArchetypeSpec::HEAVY))
}

/// The full balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub x_min: f32,
    pub x_max: f32,
    pub player_y: f32,
    pub player_z: f32,
    pub player_half_extents: Vec3,
    /// Lateral distance per tick while a direction is held
    pub player_speed: f32,
    /// Depth advance per tick toward the camera (+z)
    pub enemy_speed: f32,
    /// Depth advance per tick away from the camera (-z)
    pub projectile_speed: f32,
    pub projectile_half_extents: Vec3,
    pub camera_z: f32,
    pub enemy_exit_margin: f32,
    pub spawn_distance: f32,
    pub projectile_range: f32,
    pub spawn_interval_ticks: u32,
    pub fire_cooldown_ticks: u32,
    pub starting_lives: u8,
    pub scroll_per_tick: f32,
    #[serde(deserialize_with = "light_spec")]
    pub light: ArchetypeSpec,
    #[serde(deserialize_with = "medium_spec")]
    pub medium: ArchetypeSpec,
    #[serde(deserialize_with = "heavy_spec")]
    pub heavy: ArchetypeSpec,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            x_min: X_MIN,
            x_max: X_MAX,
            player_y: PLAYER_Y,
            player_z: PLAYER_Z,
            player_half_extents: Vec3::from_array(PLAYER_HALF_EXTENTS),
            player_speed: PLAYER_SPEED,
            enemy_speed: ENEMY_SPEED,
            projectile_speed: PROJECTILE_SPEED,
            projectile_half_extents: Vec3::from_array(PROJECTILE_HALF_EXTENTS),
            camera_z: CAMERA_Z,
            enemy_exit_margin: ENEMY_EXIT_MARGIN,
            spawn_distance: SPAWN_DISTANCE,
            projectile_range: PROJECTILE_RANGE,
            spawn_interval_ticks: SPAWN_INTERVAL_TICKS,
            fire_cooldown_ticks: FIRE_COOLDOWN_TICKS,
            starting_lives: STARTING_LIVES,
            scroll_per_tick: SCROLL_PER_TICK,
            light: ArchetypeSpec::LIGHT,
            medium: ArchetypeSpec::MEDIUM,
            heavy: ArchetypeSpec::HEAVY,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Balance data for one archetype
    pub fn archetype(&self, archetype: Archetype) -> &ArchetypeSpec {
        match archetype {
            Archetype::Light => &self.light,
            Archetype::Medium => &self.medium,
            Archetype::Heavy => &self.heavy,
        }
    }

    /// Spawn weights in `Archetype::ALL` order
    pub fn spawn_weights(&self) -> [f32; 3] {
        Archetype::ALL.map(|a| self.archetype(a).spawn_weight)
    }

    /// Depth past which enemies are dropped (behind the camera)
    pub fn enemy_exit_z(&self) -> f32 {
        self.camera_z + self.enemy_exit_margin
    }

    /// Depth past which projectiles are dropped (far ahead of the player)
    pub fn projectile_exit_z(&self) -> f32 {
        self.player_z - self.projectile_range
    }

    /// Depth at which enemies appear
    pub fn spawn_z(&self) -> f32 {
        self.player_z - self.spawn_distance
    }

    /// Lane center, where the player returns after a hit
    pub fn player_start(&self) -> Vec3 {
        Vec3::new(0.0_f32.clamp(self.x_min, self.x_max), self.player_y, self.player_z)
    }

    /// Reject balance data the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.x_min.is_finite() && self.x_max.is_finite() && self.x_min < self.x_max) {
            return Err(TuningError::InvalidBounds {
                x_min: self.x_min,
                x_max: self.x_max,
            });
        }

        let positives = [
            ("player_speed", self.player_speed),
            ("enemy_speed", self.enemy_speed),
            ("projectile_speed", self.projectile_speed),
            ("spawn_distance", self.spawn_distance),
            ("projectile_range", self.projectile_range),
        ];
        for (name, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NotPositive { name, value });
            }
        }

        let extents = [
            ("player_half_extents", self.player_half_extents),
            ("projectile_half_extents", self.projectile_half_extents),
            ("light.half_extents", self.light.half_extents),
            ("medium.half_extents", self.medium.half_extents),
            ("heavy.half_extents", self.heavy.half_extents),
        ];
        for (name, half) in extents {
            let smallest = half.min_element();
            if !(half.is_finite() && smallest > 0.0) {
                return Err(TuningError::NotPositive {
                    name,
                    value: smallest,
                });
            }
        }

        if self.spawn_interval_ticks == 0 {
            return Err(TuningError::ZeroSpawnInterval);
        }
        if self.starting_lives == 0 {
            return Err(TuningError::ZeroLives);
        }

        let weights = self.spawn_weights();
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(TuningError::InvalidWeights(format!(
                "weight {bad} is negative or not finite"
            )));
        }
        let sum: f32 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(TuningError::InvalidWeights(format!(
                "weights sum to {sum}, expected 1.0"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.spawn_weights(), [0.60, 0.25, 0.15]);
        assert_eq!(tuning.enemy_exit_z(), 6.0);
        assert_eq!(tuning.projectile_exit_z(), -30.0);
        assert_eq!(tuning.spawn_z(), -20.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "enemy_speed": 0.08, "starting_lives": 5 }"#)
            .expect("valid override");
        assert_eq!(tuning.enemy_speed, 0.08);
        assert_eq!(tuning.starting_lives, 5);
        assert_eq!(tuning.x_max, X_MAX);
        assert_eq!(tuning.light.score_value, 10);
    }

    #[test]
    fn test_partial_archetype_keeps_its_own_defaults() {
        let json = r#"{
            "light": { "spawn_weight": 0.5 },
            "medium": { "spawn_weight": 0.35 },
            "heavy": { "score_value": 80 }
        }"#;
        let tuning = Tuning::from_json(json).expect("valid override");
        assert_eq!(tuning.light.spawn_weight, 0.5);
        assert_eq!(tuning.light.score_value, 10);
        assert_eq!(tuning.light.half_extents, Vec3::splat(0.2));
        assert_eq!(tuning.medium.score_value, 25);
        assert_eq!(tuning.heavy.score_value, 80);
        assert_eq!(tuning.heavy.half_extents, Vec3::splat(0.45));
        assert_eq!(tuning.heavy.spawn_weight, 0.15);
    }

    #[test]
    fn test_load_reads_file() {
        let name = format!("river-raid-tuning-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, r#"{ "fire_cooldown_ticks": 12 }"#).unwrap();
        let loaded = Tuning::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap().fire_cooldown_ticks, 12);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("river-raid-no-such-tuning.json");
        assert!(matches!(Tuning::load(&path), Err(TuningError::Io(_))));
    }

    #[test]
    fn test_rejects_bad_weights() {
        let json = r#"{
            "light": { "half_extents": [0.2, 0.2, 0.2], "score_value": 10, "spawn_weight": 0.9 }
        }"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(TuningError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let json = r#"{ "x_min": 2.0, "x_max": -2.0 }"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(TuningError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_interval_and_lives() {
        assert!(matches!(
            Tuning::from_json(r#"{ "spawn_interval_ticks": 0 }"#),
            Err(TuningError::ZeroSpawnInterval)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "starting_lives": 0 }"#),
            Err(TuningError::ZeroLives)
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
