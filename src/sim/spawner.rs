//! Periodic weighted enemy spawning

use glam::Vec3;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Archetype, EntityId};
use super::registry::EntityRegistry;
use super::state::GamePhase;
use crate::tuning::{Tuning, TuningError};

/// Spawn timer plus the seeded RNG that picks what and where
#[derive(Debug, Clone)]
pub struct Spawner {
    frames_since_last_spawn: u32,
    spawn_interval: u32,
    weights: WeightedIndex<f32>,
    rng: Pcg32,
}

impl Spawner {
    pub fn new(tuning: &Tuning, seed: u64) -> Result<Self, TuningError> {
        let weights = WeightedIndex::new(tuning.spawn_weights())
            .map_err(|e| TuningError::InvalidWeights(e.to_string()))?;
        Ok(Self {
            frames_since_last_spawn: 0,
            spawn_interval: tuning.spawn_interval_ticks,
            weights,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn frames_since_last_spawn(&self) -> u32 {
        self.frames_since_last_spawn
    }

    pub fn spawn_interval(&self) -> u32 {
        self.spawn_interval
    }

    /// Single weighted draw over the archetype table
    pub fn draw_archetype(&mut self) -> Archetype {
        Archetype::ALL[self.weights.sample(&mut self.rng)]
    }

    /// Advance the timer one tick, spawning when the interval elapses.
    /// Does nothing once the game is over.
    pub fn tick(
        &mut self,
        phase: GamePhase,
        registry: &mut EntityRegistry,
        tuning: &Tuning,
    ) -> Option<(EntityId, Archetype)> {
        if phase != GamePhase::Playing {
            return None;
        }

        self.frames_since_last_spawn += 1;
        if self.frames_since_last_spawn < self.spawn_interval {
            return None;
        }
        self.frames_since_last_spawn = 0;

        let archetype = self.draw_archetype();
        let x = self.rng.random_range(tuning.x_min..=tuning.x_max);
        let position = Vec3::new(x, tuning.player_y, tuning.spawn_z());
        let id = registry.add_enemy(archetype, position);
        log::debug!("Spawned {} enemy {:?} at x={:.2}", archetype.as_str(), id, x);
        Some((id, archetype))
    }

    /// Restart the interval from zero (RNG stream continues)
    pub fn reset(&mut self) {
        self.frames_since_last_spawn = 0;
    }
}
