//! Entity registry
//!
//! Owns every live enemy and projectile. Each list is kept in insertion order,
//! which is also id order since ids are handed out monotonically. Traversal
//! runs newest-first by index so removing the visited entry never shifts an
//! entry that has yet to be visited.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Archetype, Entity, EntityId, EntityKind};

/// What a traversal callback wants done with the visited entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Keep it and move on
    Keep,
    /// Drop it and move on
    Remove,
    /// Keep it and end the traversal
    Stop,
    /// Drop it and end the traversal
    RemoveAndStop,
}

/// An id-ordered list of entities of one kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityList {
    entries: Vec<Entity>,
}

impl EntityList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Entity> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entries
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |e| e.id).ok()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entries[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(move |i| &mut self.entries[i])
    }

    fn push(&mut self, entity: Entity) {
        debug_assert!(self.entries.last().is_none_or(|last| last.id < entity.id));
        self.entries.push(entity);
    }

    /// Remove by id. Removing an id that is already gone does nothing.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.index_of(id).map(|i| self.entries.remove(i))
    }

    /// Visit newest to oldest, applying each callback's verdict in place
    pub fn for_each_rev(&mut self, mut visit: impl FnMut(&mut Entity) -> Visit) {
        for i in (0..self.entries.len()).rev() {
            match visit(&mut self.entries[i]) {
                Visit::Keep => {}
                Visit::Remove => {
                    self.entries.remove(i);
                }
                Visit::Stop => break,
                Visit::RemoveAndStop => {
                    self.entries.remove(i);
                    break;
                }
            }
        }
    }

    /// Remove and return the newest entity matching `pred`
    pub fn remove_first_rev(&mut self, mut pred: impl FnMut(&Entity) -> bool) -> Option<Entity> {
        let i = self.entries.iter().rposition(|e| pred(e))?;
        Some(self.entries.remove(i))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Owner of all enemies and projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRegistry {
    enemies: EntityList,
    projectiles: EntityList,
    /// Next entity ID (never reset, so stale handles stay dead)
    next_id: u32,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            enemies: EntityList::default(),
            projectiles: EntityList::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_enemy(&mut self, archetype: Archetype, position: Vec3) -> EntityId {
        let id = self.next_entity_id();
        self.enemies.push(Entity {
            id,
            position,
            kind: EntityKind::Enemy(archetype),
        });
        id
    }

    pub fn add_projectile(&mut self, origin: Vec3) -> EntityId {
        let id = self.next_entity_id();
        self.projectiles.push(Entity {
            id,
            position: origin,
            kind: EntityKind::Projectile,
        });
        id
    }

    pub fn enemies(&self) -> &EntityList {
        &self.enemies
    }

    pub fn projectiles(&self) -> &EntityList {
        &self.projectiles
    }

    /// Both lists at once, for passes that pair projectiles with enemies
    pub fn split_mut(&mut self) -> (&mut EntityList, &mut EntityList) {
        (&mut self.enemies, &mut self.projectiles)
    }

    pub fn for_each_enemy(&mut self, visit: impl FnMut(&mut Entity) -> Visit) {
        self.enemies.for_each_rev(visit);
    }

    pub fn for_each_projectile(&mut self, visit: impl FnMut(&mut Entity) -> Visit) {
        self.projectiles.for_each_rev(visit);
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.enemies.get(id).or_else(|| self.projectiles.get(id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if self.enemies.contains(id) {
            self.enemies.get_mut(id)
        } else {
            self.projectiles.get_mut(id)
        }
    }

    /// Remove whichever entity `id` names. Idempotent.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.enemies
            .remove(id)
            .or_else(|| self.projectiles.remove(id))
    }

    pub fn len(&self) -> usize {
        self.enemies.len() + self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty() && self.projectiles.is_empty()
    }

    /// Drop every entity. Ids keep counting up.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_enemies(n: usize) -> (EntityRegistry, Vec<EntityId>) {
        let mut registry = EntityRegistry::new();
        let ids = (0..n)
            .map(|i| registry.add_enemy(Archetype::Light, Vec3::new(i as f32, 0.0, 0.0)))
            .collect();
        (registry, ids)
    }

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let mut registry = EntityRegistry::new();
        let a = registry.add_enemy(Archetype::Medium, Vec3::ZERO);
        let b = registry.add_projectile(Vec3::ZERO);
        let c = registry.add_enemy(Archetype::Heavy, Vec3::ZERO);
        assert!(a < b && b < c);
        assert_eq!(registry.enemies().len(), 2);
        assert_eq!(registry.projectiles().len(), 1);
        assert_eq!(registry.get(b).map(|e| e.kind), Some(EntityKind::Projectile));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut registry, ids) = registry_with_enemies(3);
        assert!(registry.remove(ids[1]).is_some());
        assert!(registry.remove(ids[1]).is_none());
        assert_eq!(registry.len(), 2);
        assert!(registry.get(ids[0]).is_some());
        assert!(registry.get(ids[2]).is_some());
    }

    #[test]
    fn test_for_each_visits_newest_first_exactly_once() {
        let (mut registry, ids) = registry_with_enemies(5);
        let mut seen = Vec::new();
        registry.for_each_enemy(|e| {
            seen.push(e.id);
            // Remove every other entity while walking
            if e.id.0 % 2 == 0 { Visit::Remove } else { Visit::Keep }
        });
        let expected: Vec<_> = ids.iter().rev().copied().collect();
        assert_eq!(seen, expected);
        let left: Vec<_> = registry.enemies().iter().map(|e| e.id.0).collect();
        assert_eq!(left, vec![1, 3, 5]);
    }

    #[test]
    fn test_stop_ends_traversal() {
        let (mut registry, ids) = registry_with_enemies(4);
        let mut visited = 0;
        registry.for_each_enemy(|e| {
            visited += 1;
            if e.id == ids[2] { Visit::RemoveAndStop } else { Visit::Keep }
        });
        assert_eq!(visited, 2);
        assert_eq!(registry.enemies().len(), 3);
        assert!(registry.get(ids[2]).is_none());
    }

    #[test]
    fn test_remove_first_rev_prefers_newest() {
        let (mut registry, ids) = registry_with_enemies(3);
        let (enemies, _) = registry.split_mut();
        let hit = enemies.remove_first_rev(|_| true);
        assert_eq!(hit.map(|e| e.id), Some(ids[2]));
        assert_eq!(enemies.len(), 2);
    }

    #[test]
    fn test_clear_keeps_id_counter() {
        let (mut registry, ids) = registry_with_enemies(2);
        registry.clear();
        assert!(registry.is_empty());
        let fresh = registry.add_projectile(Vec3::ZERO);
        assert!(fresh > ids[1]);
        assert!(registry.get(ids[0]).is_none());
    }

    #[test]
    fn test_get_mut_moves_entity() {
        let mut registry = EntityRegistry::new();
        let id = registry.add_projectile(Vec3::ZERO);
        if let Some(e) = registry.get_mut(id) {
            e.position.z -= 1.0;
        }
        assert_eq!(registry.get(id).map(|e| e.position.z), Some(-1.0));
    }
}
