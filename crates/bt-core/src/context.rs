use serde_json::Value;

use crate::{Blackboard, Entity, EntityPatch, TickContext, WorldMut};

/// Everything one tick of a tree may read or write.
///
/// The acting entity is identified by name and resolved through the world on every access, so a
/// host can freely move or replace entities between ticks.
pub struct BehaviorContext<'a, W>
where
    W: WorldMut + ?Sized,
{
    pub tick: TickContext,
    pub agent: &'a str,
    pub world: &'a mut W,
    pub blackboard: &'a mut Blackboard,
}

impl<'a, W> BehaviorContext<'a, W>
where
    W: WorldMut + ?Sized,
{
    pub fn new(
        tick: TickContext,
        agent: &'a str,
        world: &'a mut W,
        blackboard: &'a mut Blackboard,
    ) -> Self {
        Self {
            tick,
            agent,
            world,
            blackboard,
        }
    }

    pub fn delta_time(&self) -> f32 {
        self.tick.delta()
    }

    /// The acting entity.
    pub fn entity(&self) -> Option<&Entity> {
        self.world.entity(self.agent)
    }

    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.world.entity(name)
    }

    pub fn update_entity(&mut self, name: &str, patch: EntityPatch) -> bool {
        self.world.update_entity(name, patch)
    }

    pub fn update_self(&mut self, patch: EntityPatch) -> bool {
        self.world.update_entity(self.agent, patch)
    }

    pub fn emit(&mut self, event: &str, payload: Value) {
        self.world.emit(event, payload);
    }
}
