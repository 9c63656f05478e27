#![allow(dead_code)]

use bt_core::{BehaviorContext, Blackboard, Entity, SimWorld, Status, TickContext, Vec2};
use bt_engine::{Executor, ExecutorConfig, NodeInstance, Tree};

pub const AGENT: &str = "Agent";

/// A tree whose root is the first node, wired by `(parent, child)` pairs in order.
pub fn tree(nodes: Vec<NodeInstance>, edges: &[(&str, &str)]) -> Tree {
    let mut tree = Tree::new("test-tree", "Test");
    for node in nodes {
        tree.add_node(node);
    }
    for (parent, child) in edges {
        tree.connect(parent, child);
    }
    tree
}

pub fn node(id: &str, node_type: &str) -> NodeInstance {
    NodeInstance::new(id, node_type)
}

pub fn world_with_agent_at(position: Vec2) -> SimWorld {
    SimWorld::with_entities([Entity::new(AGENT, position)])
}

/// Host loop stand-in: owns the world and the tick blackboard between frames.
pub struct Harness {
    pub executor: Executor,
    pub world: SimWorld,
    pub blackboard: Blackboard,
    pub tick: u64,
}

impl Harness {
    pub fn new(tree: Tree, world: SimWorld) -> Self {
        Self {
            executor: Executor::with_config(tree, ExecutorConfig { seed: Some(7) }),
            world,
            blackboard: Blackboard::new(),
            tick: 0,
        }
    }

    pub fn solo(tree: Tree) -> Self {
        Self::new(tree, world_with_agent_at(Vec2::ZERO))
    }

    pub fn tick(&mut self, dt: f32) -> Status {
        let mut ctx = BehaviorContext::new(
            TickContext::new(self.tick, dt),
            AGENT,
            &mut self.world,
            &mut self.blackboard,
        );
        self.tick += 1;
        self.executor.execute(&mut ctx)
    }

    pub fn run(&mut self, ticks: usize, dt: f32) -> Vec<Status> {
        (0..ticks).map(|_| self.tick(dt)).collect()
    }

    pub fn running_time(&self, node_id: &str) -> Option<f32> {
        self.executor.states().get(node_id).map(|s| s.running_time)
    }
}
