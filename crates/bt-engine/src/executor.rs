use std::collections::HashMap;

use bt_core::rng::{derive_seed, stream_id};
use bt_core::{BehaviorContext, Blackboard, SplitMix64, Status, WorldMut};
use tracing::{debug, trace, warn};

use crate::model::{NodeInstance, Tree};
use crate::params::Params;
use crate::registry::{self, NodeCategory, NodeDefinition, NodeKind};
use crate::state::{NodeState, NodeStateStore};
use crate::{actions, composite, conditions, decorator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutorConfig {
    /// Seed for random composites and the `random` condition, mixed with the tree id so trees
    /// sharing a seed draw different streams. `None` seeds from the clock.
    pub seed: Option<u64>,
}

/// Adjacency derived from a [`Tree`]: node position → ordered child positions.
#[derive(Debug)]
struct TreeIndex {
    defs: Vec<Option<&'static NodeDefinition>>,
    children: Vec<Vec<usize>>,
    root: Option<usize>,
}

impl TreeIndex {
    fn build(tree: &Tree) -> Self {
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(tree.nodes.len());
        for (i, node) in tree.nodes.iter().enumerate() {
            positions.entry(node.id.as_str()).or_insert(i);
        }

        let mut connections: Vec<_> = tree.connections.iter().collect();
        connections.sort_by_key(|c| c.order);

        let mut children = vec![Vec::new(); tree.nodes.len()];
        for conn in connections {
            let parent = positions.get(conn.parent_id.as_str());
            let child = positions.get(conn.child_id.as_str());
            if let (Some(&parent), Some(&child)) = (parent, child) {
                children[parent].push(child);
            }
        }

        Self {
            defs: tree
                .nodes
                .iter()
                .map(|n| registry::lookup(&n.node_type))
                .collect(),
            children,
            root: tree
                .root_id
                .as_deref()
                .and_then(|id| positions.get(id).copied()),
        }
    }
}

/// Ticks a [`Tree`] once per frame, keeping per-node continuation state between ticks.
pub struct Executor {
    tree: Tree,
    index: Option<TreeIndex>,
    states: NodeStateStore,
    rng: SplitMix64,
}

impl Executor {
    pub fn new(tree: Tree) -> Self {
        Self::with_config(tree, ExecutorConfig::default())
    }

    pub fn with_config(tree: Tree, config: ExecutorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SplitMix64::new(derive_seed(seed, stream_id(&tree.id))),
            None => SplitMix64::from_entropy(),
        };
        Self {
            tree,
            index: None,
            states: NodeStateStore::new(),
            rng,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable access for editing between ticks. Child order is re-derived on the next tick;
    /// continuation state is kept for nodes whose ids survive the edit.
    pub fn tree_mut(&mut self) -> &mut Tree {
        self.index = None;
        &mut self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    pub fn states(&self) -> &NodeStateStore {
        &self.states
    }

    /// Replace all continuation state, e.g. to rewind to an earlier snapshot.
    pub fn restore_states(&mut self, states: NodeStateStore) {
        self.states = states;
    }

    /// Forget all continuation state. The tree, its blackboard and the RNG stream are untouched.
    pub fn reset(&mut self) {
        debug!(tree_id = %self.tree.id, "reset");
        self.states.clear();
    }

    /// Tick the tree once.
    ///
    /// Persisted blackboard entries are merged into `ctx.blackboard` first; keys already present
    /// in the context win.
    pub fn execute<W>(&mut self, ctx: &mut BehaviorContext<'_, W>) -> Status
    where
        W: WorldMut + ?Sized,
    {
        let tree = &mut self.tree;
        let index = self.index.get_or_insert_with(|| TreeIndex::build(tree));

        let Some(root) = index.root else {
            warn!(
                tree_id = %tree.id,
                root_id = ?tree.root_id,
                "tree has no resolvable root"
            );
            return Status::Failure;
        };

        ctx.blackboard.merge_missing(&tree.blackboard);

        let mut walker = Walker {
            nodes: &tree.nodes,
            index,
            states: &mut self.states,
            rng: &mut self.rng,
            persisted: &mut tree.blackboard,
        };
        let status = walker.tick(root, ctx, 0);

        debug!(
            tree_id = %tree.id,
            tick = ctx.tick.tick,
            agent = ctx.agent,
            status = ?status,
            "executed"
        );
        status
    }
}

/// Borrowed view of an executor for the duration of one tick.
pub(crate) struct Walker<'t> {
    nodes: &'t [NodeInstance],
    index: &'t TreeIndex,
    states: &'t mut NodeStateStore,
    pub(crate) rng: &'t mut SplitMix64,
    pub(crate) persisted: &'t mut Blackboard,
}

impl<'t> Walker<'t> {
    pub(crate) fn node(&self, node: usize) -> &'t NodeInstance {
        let nodes = self.nodes;
        &nodes[node]
    }

    pub(crate) fn children(&self, node: usize) -> &'t [usize] {
        let index = self.index;
        &index.children[node]
    }

    pub(crate) fn first_child(&self, node: usize) -> Option<usize> {
        self.children(node).first().copied()
    }

    pub(crate) fn state(&mut self, node: usize) -> &mut NodeState {
        let nodes = self.nodes;
        self.states.entry(&nodes[node].id)
    }

    pub(crate) fn tick<W>(
        &mut self,
        node: usize,
        ctx: &mut BehaviorContext<'_, W>,
        depth: usize,
    ) -> Status
    where
        W: WorldMut + ?Sized,
    {
        let instance = self.node(node);
        if depth > self.nodes.len() {
            warn!(
                node_id = %instance.id,
                "tree depth exceeds node count; connections form a cycle"
            );
            return Status::Failure;
        }

        let dt = ctx.delta_time();
        self.state(node).running_time += dt;

        let index = self.index;
        let status = match index.defs[node] {
            Some(def) => self.dispatch(def, node, ctx, depth),
            None => {
                warn!(
                    node_id = %instance.id,
                    node_type = %instance.node_type,
                    "unknown node type"
                );
                Status::Failure
            }
        };

        self.state(node).status = status;
        trace!(
            node_id = %instance.id,
            node_type = %instance.node_type,
            status = ?status,
            "tick"
        );
        status
    }

    fn dispatch<W>(
        &mut self,
        def: &'static NodeDefinition,
        node: usize,
        ctx: &mut BehaviorContext<'_, W>,
        depth: usize,
    ) -> Status
    where
        W: WorldMut + ?Sized,
    {
        if def.category == NodeCategory::Action && ctx.entity().is_none() {
            debug!(agent = ctx.agent, node_type = def.node_type, "acting entity not found");
            return Status::Failure;
        }

        let params = Params::new(self.node(node), def);
        match def.kind {
            NodeKind::Sequence => composite::sequence(self, node, ctx, depth),
            NodeKind::Selector => composite::selector(self, node, ctx, depth),
            NodeKind::Parallel => composite::parallel(self, node, params, ctx, depth),
            NodeKind::RandomSelector => composite::random_selector(self, node, ctx, depth),
            NodeKind::RandomSequence => composite::random_sequence(self, node, ctx, depth),

            NodeKind::Inverter => decorator::inverter(self, node, ctx, depth),
            NodeKind::Succeeder => decorator::succeeder(self, node, ctx, depth),
            NodeKind::Failer => decorator::failer(self, node, ctx, depth),
            NodeKind::Repeater => decorator::repeater(self, node, params, ctx, depth),
            NodeKind::RepeatUntilFail => {
                decorator::repeat_until(self, node, params, Status::Failure, ctx, depth)
            }
            NodeKind::RepeatUntilSuccess => {
                decorator::repeat_until(self, node, params, Status::Success, ctx, depth)
            }
            NodeKind::Cooldown => decorator::cooldown(self, node, params, ctx, depth),
            NodeKind::Timeout => decorator::timeout(self, node, params, ctx, depth),

            NodeKind::Move => actions::move_to(params, ctx),
            NodeKind::Attack => actions::attack(self, node, params, ctx),
            NodeKind::Flee => actions::flee(params, ctx),
            NodeKind::Patrol => actions::patrol(self, node, params, ctx),
            NodeKind::Idle => actions::wait(self, node, params, ctx, true),
            NodeKind::Wait => actions::wait(self, node, params, ctx, false),
            NodeKind::Log => actions::log(self.node(node), params, ctx),
            NodeKind::SetBlackboard => actions::set_blackboard(self, params, ctx),

            NodeKind::Always => Status::Success,
            NodeKind::Never => Status::Failure,
            NodeKind::Random => conditions::random(self, params),
            NodeKind::Distance | NodeKind::InRange => conditions::distance(params, ctx),
            NodeKind::Health => conditions::health(params, ctx),
            NodeKind::TargetHealth => conditions::target_health(params, ctx),
            NodeKind::HasTarget => conditions::has_target(params, ctx),
            NodeKind::IsMoving => conditions::is_moving(ctx),
            NodeKind::CanSee => conditions::can_see(params, ctx),
            NodeKind::CheckBlackboard => conditions::check_blackboard(params, ctx),
        }
    }
}
