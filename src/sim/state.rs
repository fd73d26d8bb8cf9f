//! Game state and core simulation types
//!
//! `GameState` is the only place score, lives and phase change. Everything
//! else asks it to register hits, kills and resets.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Archetype, EntityId};
use super::geometry::{Aabb, bounding_box_of};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for an explicit reset
    GameOver,
}

/// Notifications for presentation and feedback layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    LivesChanged(u8),
    GameEnded,
    GameReset,
    /// A projectile destroyed an enemy
    EnemyDestroyed {
        id: EntityId,
        archetype: Archetype,
        score_value: u32,
    },
    /// An enemy rammed the player
    PlayerHit { enemy: EntityId },
    EnemySpawned { id: EntityId, archetype: Archetype },
    ProjectileFired { id: EntityId },
}

/// Score, lives and phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    score: u64,
    lives: u8,
    phase: GamePhase,
    starting_lives: u8,
}

impl GameState {
    pub fn new(starting_lives: u8) -> Self {
        debug_assert!(starting_lives > 0, "a run must start with lives");
        Self {
            score: 0,
            lives: starting_lives,
            phase: GamePhase::Playing,
            starting_lives,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Lose a life; the last one ends the run
    pub fn register_hit(&mut self, events: &mut Vec<GameEvent>) -> GamePhase {
        debug_assert!(self.is_playing(), "hit registered after game over");
        if !self.is_playing() {
            return self.phase;
        }

        self.lives = self.lives.saturating_sub(1);
        events.push(GameEvent::LivesChanged(self.lives));
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            events.push(GameEvent::GameEnded);
            log::info!("Game over with score {}", self.score);
        }
        self.phase
    }

    /// Credit a kill
    pub fn register_score(&mut self, value: u32, events: &mut Vec<GameEvent>) {
        debug_assert!(self.is_playing(), "score registered after game over");
        if !self.is_playing() {
            return;
        }

        self.score += u64::from(value);
        events.push(GameEvent::ScoreChanged(self.score));
    }

    /// Back to a fresh run. Safe to call from any phase.
    pub fn reset(&mut self, events: &mut Vec<GameEvent>) {
        self.score = 0;
        self.lives = self.starting_lives;
        self.phase = GamePhase::Playing;
        events.push(GameEvent::GameReset);
        events.push(GameEvent::ScoreChanged(0));
        events.push(GameEvent::LivesChanged(self.lives));
    }
}

/// The player's craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Ticks until the next shot is allowed (0 = ready)
    fire_cooldown: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: tuning.player_start(),
            half_extents: tuning.player_half_extents,
            fire_cooldown: 0,
        }
    }

    pub fn can_fire(&self) -> bool {
        self.fire_cooldown == 0
    }

    pub fn fire_cooldown(&self) -> u32 {
        self.fire_cooldown
    }

    /// Apply held directions, then clamp into the lane
    pub fn steer(&mut self, move_left: bool, move_right: bool, tuning: &Tuning) {
        if move_left {
            self.position.x -= tuning.player_speed;
        }
        if move_right {
            self.position.x += tuning.player_speed;
        }
        self.position.x = self.position.x.clamp(tuning.x_min, tuning.x_max);
    }

    /// Where shots leave the craft: the front face of its box
    pub fn muzzle(&self) -> Vec3 {
        self.position - Vec3::new(0.0, 0.0, self.half_extents.z)
    }

    pub fn bounding_box(&self) -> Aabb {
        bounding_box_of(self.position, self.half_extents)
    }

    /// Back to the lane center after a hit
    pub fn recenter(&mut self, tuning: &Tuning) {
        self.position.x = tuning.player_start().x;
    }

    pub fn start_cooldown(&mut self, ticks: u32) {
        self.fire_cooldown = ticks;
    }

    /// Count the cooldown down one tick
    pub fn cool_down(&mut self) {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
    }

    /// Fresh craft for a new run; clears any cooldown in flight
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }
}
