//! Persisted tree model: nodes, ordered parent→child connections, a root, and a blackboard.
//!
//! Nodes never own their children. A node's children are all connections with that `parentId`,
//! sorted by `order`, resolved to nodes; unresolved endpoints are dropped.

use std::collections::{BTreeMap, HashMap, HashSet};

use bt_core::Blackboard;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TreeError;
use crate::registry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInstance {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

impl NodeInstance {
    /// Create a node with every parameter pre-filled from its definition's defaults.
    ///
    /// Unknown types produce a node with empty `data`; it will fail when ticked.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        let node_type = node_type.into();
        let data = registry::lookup(&node_type)
            .map(|def| {
                def.params
                    .iter()
                    .map(|p| (p.name.to_string(), p.default.to_value()))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            id: id.into(),
            node_type,
            data,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub parent_id: String,
    pub child_id: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub root_id: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeInstance>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub blackboard: Blackboard,
}

impl Tree {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a node and return its id. The first node added becomes the root if none is set.
    pub fn add_node(&mut self, node: NodeInstance) -> String {
        let id = node.id.clone();
        if self.root_id.is_none() {
            self.root_id = Some(id.clone());
        }
        self.nodes.push(node);
        id
    }

    pub fn set_root(&mut self, id: impl Into<String>) {
        self.root_id = Some(id.into());
    }

    /// Append `child` after the parent's current last child.
    pub fn connect(&mut self, parent: &str, child: &str) {
        let order = self
            .connections
            .iter()
            .filter(|c| c.parent_id == parent)
            .map(|c| c.order + 1)
            .max()
            .unwrap_or(0);
        self.connect_ordered(parent, child, order);
    }

    pub fn connect_ordered(&mut self, parent: &str, child: &str, order: i32) {
        self.connections.push(Connection {
            parent_id: parent.to_string(),
            child_id: child.to_string(),
            order,
        });
    }

    pub fn node(&self, id: &str) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeInstance> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn root(&self) -> Option<&NodeInstance> {
        self.root_id.as_deref().and_then(|id| self.node(id))
    }

    /// Resolved children of `parent`, in connection order.
    pub fn children_of(&self, parent: &str) -> Vec<&NodeInstance> {
        let mut conns: Vec<&Connection> = self
            .connections
            .iter()
            .filter(|c| c.parent_id == parent)
            .collect();
        conns.sort_by_key(|c| c.order);
        conns
            .into_iter()
            .filter_map(|c| self.node(&c.child_id))
            .collect()
    }

    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_value(value: Value) -> Result<Self, TreeError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value, TreeError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Structural check for hosts that want to reject a broken tree up front.
    ///
    /// The executor never calls this; it degrades the affected node to `Failure` instead.
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut ids = HashSet::new();
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(TreeError::DuplicateNode(node.id.clone()));
            }
            if registry::lookup(&node.node_type).is_none() {
                return Err(TreeError::UnknownNodeType {
                    node_id: node.id.clone(),
                    node_type: node.node_type.clone(),
                });
            }
        }

        let root = self.root_id.as_deref().ok_or(TreeError::MissingRoot)?;
        if !ids.contains(root) {
            return Err(TreeError::UnresolvedRoot(root.to_string()));
        }

        for conn in &self.connections {
            for end in [&conn.parent_id, &conn.child_id] {
                if !ids.contains(end.as_str()) {
                    return Err(TreeError::DanglingConnection {
                        parent_id: conn.parent_id.clone(),
                        child_id: conn.child_id.clone(),
                    });
                }
            }
        }

        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for conn in &self.connections {
            adjacency
                .entry(conn.parent_id.as_str())
                .or_default()
                .push(conn.child_id.as_str());
        }
        if let Some(node_id) = find_cycle(&self.nodes, &adjacency) {
            return Err(TreeError::Cycle(node_id));
        }

        for node in &self.nodes {
            let Some(def) = registry::lookup(&node.node_type) else {
                continue;
            };
            let count = adjacency.get(node.id.as_str()).map_or(0, |c| c.len());
            if !def.accepts_children(count) {
                return Err(TreeError::ChildCount {
                    node_id: node.id.clone(),
                    node_type: node.node_type.clone(),
                    count,
                    min: def.min_children,
                    max: def.max_children,
                });
            }
        }

        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

fn find_cycle(nodes: &[NodeInstance], adjacency: &HashMap<&str, Vec<&str>>) -> Option<String> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();

    for node in nodes {
        if marks.contains_key(node.id.as_str()) {
            continue;
        }
        // Iterative DFS: (node, next child index).
        let mut stack: Vec<(&str, usize)> = vec![(node.id.as_str(), 0)];
        marks.insert(node.id.as_str(), Mark::Visiting);

        while let Some((current, next)) = stack.last_mut() {
            let children = adjacency.get(*current).map(Vec::as_slice).unwrap_or(&[]);
            if *next >= children.len() {
                marks.insert(*current, Mark::Done);
                stack.pop();
                continue;
            }
            let child = children[*next];
            *next += 1;
            match marks.get(child) {
                Some(Mark::Visiting) => return Some(child.to_string()),
                Some(Mark::Done) => {}
                None => {
                    marks.insert(child, Mark::Visiting);
                    stack.push((child, 0));
                }
            }
        }
    }

    None
}
