//! Entity records: enemies and projectiles

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, bounding_box_of};
use crate::tuning::Tuning;

/// Stable handle to a registry entry. Ids are never reused, so a handle to a
/// removed entity can never alias a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Small, common, cheap
    Light,
    Medium,
    /// Large, rare, valuable
    Heavy,
}

impl Archetype {
    /// Table order; spawn weights are indexed by this
    pub const ALL: [Archetype; 3] = [Archetype::Light, Archetype::Medium, Archetype::Heavy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Light => "Light",
            Archetype::Medium => "Medium",
            Archetype::Heavy => "Heavy",
        }
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Enemy(Archetype),
    Projectile,
}

/// A live enemy or projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Vec3,
    pub kind: EntityKind,
}

impl Entity {
    /// Archetype if this is an enemy
    pub fn archetype(&self) -> Option<Archetype> {
        match self.kind {
            EntityKind::Enemy(archetype) => Some(archetype),
            EntityKind::Projectile => None,
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy(_))
    }

    /// Fixed half-size for this entity's kind
    pub fn half_extents(&self, tuning: &Tuning) -> Vec3 {
        match self.kind {
            EntityKind::Enemy(archetype) => tuning.archetype(archetype).half_extents,
            EntityKind::Projectile => tuning.projectile_half_extents,
        }
    }

    /// Points awarded for destroying this entity (zero for projectiles)
    pub fn score_value(&self, tuning: &Tuning) -> u32 {
        match self.kind {
            EntityKind::Enemy(archetype) => tuning.archetype(archetype).score_value,
            EntityKind::Projectile => 0,
        }
    }

    pub fn bounding_box(&self, tuning: &Tuning) -> Aabb {
        bounding_box_of(self.position, self.half_extents(tuning))
    }
}
