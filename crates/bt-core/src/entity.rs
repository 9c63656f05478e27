use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Vec2;

/// Sight range assumed for entities that don't declare one.
pub const DEFAULT_SIGHT_RANGE: f32 = 300.0;

/// A named actor in the host world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default = "default_health")]
    pub health: f32,
    #[serde(default = "default_health")]
    pub max_health: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sight_range: Option<f32>,
    /// Host-specific fields the engine carries but never interprets.
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_health() -> f32 {
    100.0
}

impl Entity {
    pub fn new(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            name: name.into(),
            position,
            health: default_health(),
            max_health: default_health(),
            sight_range: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_health(mut self, health: f32, max_health: f32) -> Self {
        self.health = health;
        self.max_health = max_health;
        self
    }

    pub fn with_sight_range(mut self, sight_range: f32) -> Self {
        self.sight_range = Some(sight_range);
        self
    }

    /// Current health as a percentage of max health, or `None` when max health is not positive.
    pub fn health_percent(&self) -> Option<f32> {
        if self.max_health > 0.0 {
            Some(self.health / self.max_health * 100.0)
        } else {
            None
        }
    }

    pub fn sight_range(&self) -> f32 {
        self.sight_range.unwrap_or(DEFAULT_SIGHT_RANGE)
    }

    pub fn apply(&mut self, patch: &EntityPatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(health) = patch.health {
            self.health = health;
        }
        if let Some(max_health) = patch.max_health {
            self.max_health = max_health;
        }
        if let Some(sight_range) = patch.sight_range {
            self.sight_range = Some(sight_range);
        }
    }
}

/// Partial entity update; `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_health: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sight_range: Option<f32>,
}

impl EntityPatch {
    pub fn position(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn health(health: f32) -> Self {
        Self {
            health: Some(health),
            ..Self::default()
        }
    }
}
