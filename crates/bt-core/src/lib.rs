//! Engine-agnostic behavior tree primitives.
//!
//! Everything a behavior tree touches outside of its own node graph lives here: the tri-state
//! [`Status`], the string-keyed [`Blackboard`], the per-tick [`BehaviorContext`], and the
//! [`WorldView`] / [`WorldMut`] traits a host implements to expose its entities.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod context;
pub mod entity;
pub mod math;
pub mod rng;
pub mod status;
pub mod tick;
pub mod world;

pub use blackboard::Blackboard;
pub use context::BehaviorContext;
pub use entity::{Entity, EntityPatch};
pub use math::Vec2;
pub use rng::{shuffle_indices, DeterministicRng, SplitMix64};
pub use status::Status;
pub use tick::TickContext;
pub use world::{EmittedEvent, SimWorld, WorldMut, WorldView};
