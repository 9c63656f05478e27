use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Entity, EntityPatch};

/// Read-only world access.
///
/// The engine only ever looks entities up by name; hosts decide how names map onto their own
/// storage.
pub trait WorldView {
    fn entity(&self, name: &str) -> Option<&Entity>;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {
    /// Apply a partial update. Returns `false` when no entity has that name.
    fn update_entity(&mut self, name: &str, patch: EntityPatch) -> bool;

    /// Side-effect notification to the host (damage numbers, animation hooks, ...).
    fn emit(&mut self, event: &str, payload: Value);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmittedEvent {
    pub name: String,
    pub payload: Value,
}

/// In-memory reference world: named entities plus an append-only event log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimWorld {
    entities: BTreeMap<String, Entity>,
    events: Vec<EmittedEvent>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut world = Self::new();
        for entity in entities {
            world.insert(entity);
        }
        world
    }

    /// Insert or replace an entity, keyed by its name.
    pub fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.name.clone(), entity);
    }

    pub fn remove(&mut self, name: &str) -> Option<Entity> {
        self.entities.remove(name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.get_mut(name)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn events(&self) -> &[EmittedEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<EmittedEvent> {
        std::mem::take(&mut self.events)
    }
}

impl WorldView for SimWorld {
    fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }
}

impl WorldMut for SimWorld {
    fn update_entity(&mut self, name: &str, patch: EntityPatch) -> bool {
        match self.entities.get_mut(name) {
            Some(entity) => {
                entity.apply(&patch);
                true
            }
            None => false,
        }
    }

    fn emit(&mut self, event: &str, payload: Value) {
        self.events.push(EmittedEvent {
            name: event.to_string(),
            payload,
        });
    }
}

#[derive(Serialize, Deserialize)]
struct SimWorldData {
    #[serde(default)]
    entities: Vec<Entity>,
}

impl Serialize for SimWorld {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SimWorldData {
            entities: self.entities.values().cloned().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SimWorld {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = SimWorldData::deserialize(deserializer)?;
        Ok(SimWorld::with_entities(data.entities))
    }
}
