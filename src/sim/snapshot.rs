//! Render snapshot handed to whatever draws the frame

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Archetype, EntityId};
use super::registry::EntityRegistry;
use super::state::{GamePhase, GameState, Player};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EntityId,
    pub position: Vec3,
    pub archetype: Archetype,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub position: Vec3,
}

/// Everything a renderer needs for one frame. Lists are oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub time_ticks: u64,
    /// River texture offset in [0, 1)
    pub scroll_offset: f32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub player: Vec3,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
}

impl RenderSnapshot {
    pub fn capture(
        state: &GameState,
        player: &Player,
        registry: &EntityRegistry,
        time_ticks: u64,
        scroll_offset: f32,
    ) -> Self {
        let enemies = registry
            .enemies()
            .iter()
            .filter_map(|e| {
                e.archetype().map(|archetype| EnemyView {
                    id: e.id,
                    position: e.position,
                    archetype,
                })
            })
            .collect();
        let projectiles = registry
            .projectiles()
            .iter()
            .map(|p| ProjectileView {
                id: p.id,
                position: p.position,
            })
            .collect();

        Self {
            time_ticks,
            scroll_offset,
            phase: state.phase(),
            score: state.score(),
            lives: state.lives(),
            player: player.position,
            enemies,
            projectiles,
        }
    }

    /// Compact JSON for a JS-side renderer
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_preserves_insertion_order() {
        let tuning = Tuning::default();
        let state = GameState::new(tuning.starting_lives);
        let player = Player::new(&tuning);
        let mut registry = EntityRegistry::new();
        let a = registry.add_enemy(Archetype::Heavy, Vec3::new(1.0, -2.0, -10.0));
        let shot = registry.add_projectile(Vec3::new(0.0, -2.0, -1.0));
        let b = registry.add_enemy(Archetype::Light, Vec3::new(-1.0, -2.0, -12.0));

        let snap = RenderSnapshot::capture(&state, &player, &registry, 9, 0.25);
        let ids: Vec<_> = snap.enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b]);
        assert_eq!(snap.enemies[0].archetype, Archetype::Heavy);
        assert_eq!(snap.projectiles.len(), 1);
        assert_eq!(snap.projectiles[0].id, shot);
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.player, tuning.player_start());
    }

    #[test]
    fn test_json_shape() {
        let tuning = Tuning::default();
        let state = GameState::new(tuning.starting_lives);
        let player = Player::new(&tuning);
        let mut registry = EntityRegistry::new();
        registry.add_enemy(Archetype::Medium, Vec3::new(0.5, -2.0, -20.0));

        let json = RenderSnapshot::capture(&state, &player, &registry, 1, 0.0)
            .to_json()
            .expect("snapshot serializes");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "Playing");
        assert_eq!(value["enemies"][0]["archetype"], "Medium");
        assert_eq!(value["player"][1], -2.0);
    }
}
