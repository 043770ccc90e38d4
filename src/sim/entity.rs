//! Entity registry
//!
//! Maps stable ids to the records a renderer needs. One registry belongs to
//! exactly one generation; a reset swaps the whole table at once.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::physics::BodyHandle;

/// Stable entity identifier, unique within a generation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// What an entity looks like; the renderer owns the lookup from kind to sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Controllable,
    Boundary,
    /// Hangs from the top edge
    ObstacleTop,
    /// Rises from the bottom edge
    ObstacleBottom,
}

impl SpriteKind {
    /// Fill color used when no sprite is available
    pub fn default_color(&self) -> Rgb {
        match self {
            SpriteKind::Controllable => Rgb::RED,
            SpriteKind::Boundary | SpriteKind::ObstacleTop | SpriteKind::ObstacleBottom => {
                Rgb::GREEN
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 128, 0);
}

/// One renderable, collidable thing
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Same as the key it is registered under
    pub id: EntityId,
    pub body: BodyHandle,
    /// Visual size (width, height)
    pub size: DVec2,
    pub sprite: SpriteKind,
    pub color: Rgb,
    pub is_static: bool,
}

impl Entity {
    pub fn new(
        id: EntityId,
        body: BodyHandle,
        size: DVec2,
        sprite: SpriteKind,
        is_static: bool,
    ) -> Self {
        Self {
            id,
            body,
            size,
            sprite,
            color: sprite.default_color(),
            is_static,
        }
    }
}

/// Id → entity table for one generation
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    generation: u64,
    entries: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            entries: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entries.iter().find(|e| e.id == *id)
    }

    /// Insert, or replace in place keeping the original position
    ///
    /// `id` wins over whatever id the record carried.
    pub fn set(&mut self, id: EntityId, mut entity: Entity) {
        entity.id = id;
        match self.entries.iter_mut().find(|e| e.id == entity.id) {
            Some(slot) => *slot = entity,
            None => self.entries.push(entity),
        }
    }

    /// Install a whole new table, returning the one it replaces
    pub fn replace_all(&mut self, next: EntityRegistry) -> EntityRegistry {
        std::mem::replace(self, next)
    }

    pub fn for_each(&self, mut visitor: impl FnMut(&EntityId, &Entity)) {
        for entity in &self.entries {
            visitor(&entity.id, entity);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &Entity)> {
        self.entries.iter().map(|e| (&e.id, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(generation: u64, index: u32) -> BodyHandle {
        BodyHandle { generation, index }
    }

    fn entity(generation: u64, index: u32, sprite: SpriteKind) -> Entity {
        Entity::new(
            EntityId::new(format!("e{}", index)),
            handle(generation, index),
            DVec2::splat(50.0),
            sprite,
            true,
        )
    }

    #[test]
    fn test_set_and_get() {
        let mut registry = EntityRegistry::new(1);
        assert!(registry.is_empty());
        registry.set("bird".into(), entity(1, 0, SpriteKind::Controllable));
        registry.set("floor".into(), entity(1, 1, SpriteKind::Boundary));

        let bird = registry.get(&"bird".into()).unwrap();
        assert_eq!(bird.color, Rgb::RED);
        assert_eq!(registry.get(&"floor".into()).unwrap().color, Rgb::GREEN);
        assert!(registry.get(&"pipe1".into()).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut registry = EntityRegistry::new(1);
        registry.set("a".into(), entity(1, 0, SpriteKind::ObstacleTop));
        registry.set("b".into(), entity(1, 1, SpriteKind::ObstacleBottom));

        let mut taller = entity(1, 0, SpriteKind::ObstacleTop);
        taller.size = DVec2::new(100.0, 300.0);
        registry.set("a".into(), taller.clone());

        assert_eq!(registry.len(), 2);
        let order: Vec<_> = registry.iter().map(|(id, _)| id.as_str().to_owned()).collect();
        assert_eq!(order, ["a", "b"]);
        let stored = registry.get(&"a".into()).unwrap();
        assert_eq!(stored.size, taller.size);
        assert_eq!(stored.body, taller.body);
    }

    #[test]
    fn test_record_id_matches_key() {
        let mut registry = EntityRegistry::new(1);
        // Record built under another name is stored under the key it is set with
        registry.set("bird".into(), entity(1, 0, SpriteKind::Controllable));
        assert_eq!(registry.get(&"bird".into()).unwrap().id.as_str(), "bird");
        assert!(registry.get(&"e0".into()).is_none());
        registry.for_each(|id, e| assert_eq!(*id, e.id));
    }

    #[test]
    fn test_replace_all_swaps_generation() {
        let mut registry = EntityRegistry::new(1);
        registry.set("bird".into(), entity(1, 0, SpriteKind::Controllable));
        registry.set("pipe1".into(), entity(1, 1, SpriteKind::ObstacleTop));

        let mut next = EntityRegistry::new(2);
        next.set("bird".into(), entity(2, 0, SpriteKind::Controllable));

        let old = registry.replace_all(next);
        assert_eq!(old.generation(), 1);
        assert_eq!(old.len(), 2);
        assert_eq!(registry.generation(), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&"pipe1".into()).is_none());
        assert_eq!(registry.get(&"bird".into()).unwrap().body.generation, 2);
    }

    #[test]
    fn test_for_each_visits_all() {
        let mut registry = EntityRegistry::new(1);
        registry.set("bird".into(), entity(1, 0, SpriteKind::Controllable));
        registry.set("floor".into(), entity(1, 1, SpriteKind::Boundary));
        registry.set("ceiling".into(), entity(1, 2, SpriteKind::Boundary));

        let mut seen = Vec::new();
        registry.for_each(|id, e| seen.push((id.to_string(), e.sprite)));
        assert_eq!(seen.len(), 3);
        assert!(seen.contains(&("ceiling".to_string(), SpriteKind::Boundary)));
    }
}
