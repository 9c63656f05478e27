//! Per-node continuation state.
//!
//! Resumability comes from this side table rather than from coroutines: a node that returns
//! `Running` stores whatever it needs here and picks it up again on the next tick.

use std::collections::HashMap;

use bt_core::Status;
use serde::{Deserialize, Serialize};

/// Continuation bookkeeping. Each node type uses only the fields it needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeMemory {
    /// Sequence / selector / random composites: next child position to tick.
    pub current_index: usize,
    /// Random composites: permutation of child indices for the current run.
    pub shuffled_indices: Option<Vec<usize>>,
    /// Repeaters: completed child runs.
    pub iteration: u32,
    /// Cooldown: `running_time` at the last completed child run (0 before the first).
    pub last_execution_time: f32,
    /// Timeout / idle / wait: seconds accumulated in the current run.
    pub elapsed: f32,
    /// Attack: `running_time` at the last landed attack.
    pub last_attack_time: Option<f32>,
    /// Patrol.
    pub waypoint_index: usize,
    pub waiting: bool,
    pub wait_elapsed: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeState {
    /// Status returned by the node's most recent tick.
    pub status: Status,
    /// Seconds accumulated over every tick of this node.
    pub running_time: f32,
    pub data: NodeMemory,
}

/// Map of node id to [`NodeState`], created lazily on a node's first tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeStateStore {
    states: HashMap<String, NodeState>,
}

impl NodeStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: &str) -> Option<&NodeState> {
        self.states.get(node_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeState)> {
        self.states.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn entry(&mut self, node_id: &str) -> &mut NodeState {
        self.states.entry(node_id.to_string()).or_default()
    }

    pub(crate) fn clear(&mut self) {
        self.states.clear();
    }
}
