//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Per tick:
//! reset request, cooldown, then (while playing) player movement, spawning,
//! enemy pass against the player, projectile pass against enemies, and
//! last the fire request.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Archetype, EntityId};
use super::geometry::overlaps;
use super::registry::{EntityRegistry, Visit};
use super::snapshot::RenderSnapshot;
use super::spawner::Spawner;
use super::state::{GameEvent, GamePhase, GameState, Player};
use crate::tuning::{Tuning, TuningError};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    /// Held: steer left
    pub move_left: bool,
    /// Held: steer right
    pub move_right: bool,
    /// Edge: fire one shot
    pub fire_requested: bool,
    /// Edge: start a new run (only honored after game over)
    pub reset_requested: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl ControlState {
    /// Same held state, edges cleared (for substeps after the first)
    pub fn held_only(&self) -> Self {
        Self {
            fire_requested: false,
            reset_requested: false,
            ..*self
        }
    }
}

/// The whole game: state machine, player, entities and spawner
#[derive(Debug, Clone)]
pub struct Simulation {
    tuning: Tuning,
    state: GameState,
    player: Player,
    registry: EntityRegistry,
    spawner: Spawner,
    /// Simulation tick counter since the last reset
    time_ticks: u64,
    /// River texture scroll, wraps in [0, 1)
    scroll_offset: f32,
    /// Events raised since the last drain
    events: Vec<GameEvent>,
}

impl Simulation {
    /// Create a fresh run. Tuning is validated here.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let spawner = Spawner::new(&tuning, seed)?;
        log::info!("Simulation created with seed {}", seed);
        Ok(Self {
            state: GameState::new(tuning.starting_lives),
            player: Player::new(&tuning),
            registry: EntityRegistry::new(),
            spawner,
            time_ticks: 0,
            scroll_offset: 0.0,
            events: Vec::new(),
            tuning,
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Hand over every event raised since the previous drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(
            &self.state,
            &self.player,
            &self.registry,
            self.time_ticks,
            self.scroll_offset,
        )
    }

    /// Place an enemy directly (scripted waves, tests)
    pub fn spawn_enemy_at(&mut self, archetype: Archetype, position: Vec3) -> EntityId {
        let id = self.registry.add_enemy(archetype, position);
        self.events.push(GameEvent::EnemySpawned { id, archetype });
        id
    }

    /// Advance the game by one tick
    pub fn tick(&mut self, input: &ControlState) {
        let input = if input.idle_mode {
            self.autopilot()
        } else {
            *input
        };

        if input.reset_requested && self.request_reset() {
            return;
        }

        self.player.cool_down();

        if self.state.is_playing() {
            self.step(&input);
        }

        // New shots leave from where the craft ended up this tick
        if input.fire_requested {
            self.fire();
        }
    }

    /// Fire a shot if the cooldown allows it. Dropped silently otherwise.
    pub fn fire(&mut self) -> Option<EntityId> {
        if !self.state.is_playing() || !self.player.can_fire() {
            return None;
        }

        let id = self.registry.add_projectile(self.player.muzzle());
        self.player.start_cooldown(self.tuning.fire_cooldown_ticks);
        self.events.push(GameEvent::ProjectileFired { id });
        Some(id)
    }

    /// Reset if the run is over; ignored while playing
    pub fn request_reset(&mut self) -> bool {
        if self.state.is_playing() {
            log::debug!("Reset ignored while playing");
            return false;
        }
        self.reset();
        true
    }

    /// Coordinated reset: state machine, entities, player and timers
    pub fn reset(&mut self) {
        self.state.reset(&mut self.events);
        self.registry.clear();
        self.player.reset(&self.tuning);
        self.spawner.reset();
        self.time_ticks = 0;
        self.scroll_offset = 0.0;
        log::info!("Game reset");
    }

    /// One playing tick in fixed order
    fn step(&mut self, input: &ControlState) {
        let tuning = &self.tuning;

        self.time_ticks += 1;
        self.scroll_offset = (self.scroll_offset + tuning.scroll_per_tick).fract();

        // 1. Player movement, clamped into the lane
        self.player.steer(input.move_left, input.move_right, tuning);

        // 2. Spawner
        let phase = self.state.phase();
        if let Some((id, archetype)) = self.spawner.tick(phase, &mut self.registry, tuning) {
            self.events.push(GameEvent::EnemySpawned { id, archetype });
        }

        // 3. Player box, cached for the enemy pass
        let player_box = self.player.bounding_box();

        // 4. Enemies: advance, drop the ones behind the camera, ram the player.
        // At most one hit lands per tick.
        let state = &mut self.state;
        let player = &mut self.player;
        let events = &mut self.events;
        let enemy_exit_z = tuning.enemy_exit_z();
        let mut player_hit = false;
        self.registry.for_each_enemy(|enemy| {
            enemy.position.z += tuning.enemy_speed;
            if enemy.position.z > enemy_exit_z {
                return Visit::Remove;
            }
            if player_hit || !overlaps(&enemy.bounding_box(tuning), &player_box) {
                return Visit::Keep;
            }

            player_hit = true;
            events.push(GameEvent::PlayerHit { enemy: enemy.id });
            if state.register_hit(events) == GamePhase::GameOver {
                Visit::RemoveAndStop
            } else {
                player.recenter(tuning);
                Visit::Remove
            }
        });

        if !state.is_playing() {
            return;
        }

        // 5. Projectiles: advance, drop out-of-range ones, first enemy hit wins
        let (enemies, projectiles) = self.registry.split_mut();
        let projectile_exit_z = tuning.projectile_exit_z();
        projectiles.for_each_rev(|shot| {
            shot.position.z -= tuning.projectile_speed;
            if shot.position.z < projectile_exit_z {
                return Visit::Remove;
            }

            let shot_box = shot.bounding_box(tuning);
            let Some(enemy) =
                enemies.remove_first_rev(|e| overlaps(&e.bounding_box(tuning), &shot_box))
            else {
                return Visit::Keep;
            };

            let score_value = enemy.score_value(tuning);
            if let Some(archetype) = enemy.archetype() {
                events.push(GameEvent::EnemyDestroyed {
                    id: enemy.id,
                    archetype,
                    score_value,
                });
                log::debug!(
                    "{} enemy {:?} destroyed by {:?}",
                    archetype.as_str(),
                    enemy.id,
                    shot.id
                );
            }
            state.register_score(score_value, events);
            Visit::Remove
        });
    }

    /// Demo controls: line up under the closest incoming enemy and shoot
    pub fn autopilot(&self) -> ControlState {
        if !self.state.is_playing() {
            return ControlState {
                reset_requested: true,
                ..Default::default()
            };
        }

        let player_x = self.player.position.x;
        let target = self
            .registry
            .enemies()
            .iter()
            .filter(|e| e.position.z < self.player.position.z)
            .max_by(|a, b| {
                a.position
                    .z
                    .partial_cmp(&b.position.z)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let Some(target) = target else {
            // Drift back to the lane center while nothing is coming
            let center = self.tuning.player_start().x;
            return ControlState {
                move_left: player_x > center + self.tuning.player_speed,
                move_right: player_x < center - self.tuning.player_speed,
                ..Default::default()
            };
        };

        let dx = target.position.x - player_x;
        let aim_window =
            target.half_extents(&self.tuning).x + self.tuning.projectile_half_extents.x;
        ControlState {
            move_left: dx < -self.tuning.player_speed * 0.5,
            move_right: dx > self.tuning.player_speed * 0.5,
            fire_requested: dx.abs() <= aim_window && self.player.can_fire(),
            ..Default::default()
        }
    }
}
