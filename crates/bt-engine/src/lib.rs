//! Behavior tree executor built on `bt-core`.
//!
//! A [`Tree`] is flat data: nodes, ordered parent→child [`Connection`]s and a persisted
//! blackboard. The [`Executor`] walks it top-down once per frame and keeps per-node
//! continuation state in a [`NodeStateStore`], so a node that returns `Running` resumes where
//! it left off on the next tick.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod actions;
pub mod conditions;
pub mod error;
pub mod executor;
pub mod model;
pub mod registry;
pub mod state;

mod composite;
mod decorator;
mod params;

pub use actions::parse_waypoints;
pub use conditions::Comparison;
pub use error::TreeError;
pub use executor::{Executor, ExecutorConfig};
pub use model::{Connection, NodeInstance, Tree};
pub use registry::{NodeCategory, NodeDefinition, NodeKind, ParamDef, ParamDefault, ParamKind};
pub use state::{NodeMemory, NodeState, NodeStateStore};
