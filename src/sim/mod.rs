//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod entity;
pub mod geometry;
pub mod registry;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use entity::{Archetype, Entity, EntityId, EntityKind};
pub use geometry::{Aabb, bounding_box_of, overlaps};
pub use registry::{EntityList, EntityRegistry, Visit};
pub use snapshot::{EnemyView, ProjectileView, RenderSnapshot};
pub use spawner::Spawner;
pub use state::{GameEvent, GamePhase, GameState, Player};
pub use tick::{ControlState, Simulation};
