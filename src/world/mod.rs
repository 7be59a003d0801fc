//! Entity arena and component storage
//!
//! Entities are addressed by stable ids into a flat arena. Each entity
//! carries a typed table of optional components; systems query the slots
//! they need and skip entities that lack them. The light engine never
//! spawns or despawns entities - world mutation between frames belongs to
//! the scene layer.

pub mod components;

use serde::{Deserialize, Serialize};

pub use components::{
    CompletionRule, Emitter, Lantern, LightField, Mirror, MirrorKind, Puzzle, SourcePolicy,
    Sprite, Transform, Vitals,
};

/// Stable handle into the world's entity arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Broad classification used for aiming and puzzle source policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Beacon,
    Prop,
}

/// One world object: an id, a kind tag, and one slot per component kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub transform: Option<Transform>,
    pub sprite: Option<Sprite>,
    pub emitter: Option<Emitter>,
    pub light: Option<LightField>,
    pub mirror: Option<Mirror>,
    pub puzzle: Option<Puzzle>,
    pub lantern: Option<Lantern>,
    pub vitals: Option<Vitals>,
}

impl Entity {
    fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            transform: None,
            sprite: None,
            emitter: None,
            light: None,
            mirror: None,
            puzzle: None,
            lantern: None,
            vitals: None,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }
}

/// Flat entity storage with stable, strictly increasing ids
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: Vec<Entity>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entity and hand back a mutable slot to fill in
    pub fn spawn(&mut self, kind: EntityKind) -> &mut Entity {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity::new(id, kind));
        self.entities.last_mut().expect("just pushed")
    }

    /// Remove an entity; for scene-layer use between frames
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|index| &self.entities[index])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(|index| &mut self.entities[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// First player-kind entity, if any
    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_player())
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // Ids are assigned in spawn order and never reordered, so the arena
    // stays sorted and lookup is a binary search.
    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id.0, |e| e.id.0).ok()
    }
}
