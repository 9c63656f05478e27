//! Static catalog of node types.
//!
//! Each definition declares the node's category, its parameter schema (with defaults) and how
//! many children it accepts. The executor looks definitions up by the `type` string stored on a
//! [`NodeInstance`](crate::NodeInstance).

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Composite,
    Decorator,
    Action,
    Condition,
}

impl NodeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::Composite => "composite",
            NodeCategory::Decorator => "decorator",
            NodeCategory::Action => "action",
            NodeCategory::Condition => "condition",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "composite" => Some(NodeCategory::Composite),
            "decorator" => Some(NodeCategory::Decorator),
            "action" => Some(NodeCategory::Action),
            "condition" => Some(NodeCategory::Condition),
            _ => None,
        }
    }
}

/// Dispatch discriminator resolved from a node's `type` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Sequence,
    Selector,
    Parallel,
    RandomSelector,
    RandomSequence,

    Inverter,
    Succeeder,
    Failer,
    Repeater,
    RepeatUntilFail,
    RepeatUntilSuccess,
    Cooldown,
    Timeout,

    Move,
    Attack,
    Flee,
    Patrol,
    Idle,
    Wait,
    Log,
    SetBlackboard,

    Always,
    Never,
    Random,
    Distance,
    InRange,
    Health,
    TargetHealth,
    HasTarget,
    IsMoving,
    CanSee,
    CheckBlackboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Number,
    String,
    Select(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDefault {
    Number(f64),
    Text(&'static str),
}

impl ParamDefault {
    pub fn to_value(self) -> Value {
        match self {
            ParamDefault::Number(n) => Value::from(n),
            ParamDefault::Text(s) => Value::from(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDef {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: ParamDefault,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeDefinition {
    pub node_type: &'static str,
    pub kind: NodeKind,
    pub category: NodeCategory,
    pub params: &'static [ParamDef],
    pub min_children: usize,
    /// `None` means unbounded.
    pub max_children: Option<usize>,
}

impl NodeDefinition {
    pub fn param(&self, name: &str) -> Option<&'static ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn accepts_children(&self, count: usize) -> bool {
        count >= self.min_children && self.max_children.map_or(true, |max| count <= max)
    }
}

pub const COMPARISONS: &[&str] = &[
    "less",
    "less_equal",
    "greater",
    "greater_equal",
    "equals",
    "not_equals",
];
pub const BLACKBOARD_COMPARISONS: &[&str] = &["equals", "not_equals", "greater", "less", "exists"];
const POLICIES: &[&str] = &["one", "all"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const fn number(name: &'static str, default: f64) -> ParamDef {
    ParamDef {
        name,
        kind: ParamKind::Number,
        default: ParamDefault::Number(default),
    }
}

const fn text(name: &'static str, default: &'static str) -> ParamDef {
    ParamDef {
        name,
        kind: ParamKind::String,
        default: ParamDefault::Text(default),
    }
}

const fn select(
    name: &'static str,
    options: &'static [&'static str],
    default: &'static str,
) -> ParamDef {
    ParamDef {
        name,
        kind: ParamKind::Select(options),
        default: ParamDefault::Text(default),
    }
}

const fn composite(
    node_type: &'static str,
    kind: NodeKind,
    params: &'static [ParamDef],
) -> NodeDefinition {
    NodeDefinition {
        node_type,
        kind,
        category: NodeCategory::Composite,
        params,
        min_children: 1,
        max_children: None,
    }
}

const fn decorator(
    node_type: &'static str,
    kind: NodeKind,
    params: &'static [ParamDef],
) -> NodeDefinition {
    NodeDefinition {
        node_type,
        kind,
        category: NodeCategory::Decorator,
        params,
        min_children: 1,
        max_children: Some(1),
    }
}

const fn leaf(
    node_type: &'static str,
    kind: NodeKind,
    category: NodeCategory,
    params: &'static [ParamDef],
) -> NodeDefinition {
    NodeDefinition {
        node_type,
        kind,
        category,
        params,
        min_children: 0,
        max_children: Some(0),
    }
}

const fn action(
    node_type: &'static str,
    kind: NodeKind,
    params: &'static [ParamDef],
) -> NodeDefinition {
    leaf(node_type, kind, NodeCategory::Action, params)
}

const fn condition(
    node_type: &'static str,
    kind: NodeKind,
    params: &'static [ParamDef],
) -> NodeDefinition {
    leaf(node_type, kind, NodeCategory::Condition, params)
}

const PARALLEL_PARAMS: &[ParamDef] = &[
    select("successPolicy", POLICIES, "all"),
    select("failurePolicy", POLICIES, "one"),
];
const REPEATER_PARAMS: &[ParamDef] = &[number("count", 3.0)];
const REPEAT_UNTIL_PARAMS: &[ParamDef] = &[number("maxIterations", 100.0)];
const COOLDOWN_PARAMS: &[ParamDef] = &[number("duration", 1.0)];
const TIMEOUT_PARAMS: &[ParamDef] = &[number("timeout", 5.0)];

const MOVE_PARAMS: &[ParamDef] = &[
    number("targetX", 0.0),
    number("targetY", 0.0),
    number("speed", 100.0),
    number("arrivalThreshold", 5.0),
];
const ATTACK_PARAMS: &[ParamDef] = &[
    text("targetEntity", "Player"),
    number("damage", 10.0),
    number("attackRange", 50.0),
    number("attackCooldown", 1.0),
];
const FLEE_PARAMS: &[ParamDef] = &[
    text("targetEntity", "Player"),
    number("speed", 120.0),
    number("safeDistance", 200.0),
];
const PATROL_PARAMS: &[ParamDef] = &[
    text("waypoints", "0,0;100,0;100,100;0,100"),
    number("speed", 80.0),
    number("waitTime", 0.5),
    number("arrivalThreshold", 5.0),
];
const DURATION_PARAMS: &[ParamDef] = &[number("duration", 1.0)];
const LOG_PARAMS: &[ParamDef] = &[text("message", ""), select("level", LOG_LEVELS, "info")];
const SET_BLACKBOARD_PARAMS: &[ParamDef] = &[text("key", ""), text("value", "")];

const RANDOM_PARAMS: &[ParamDef] = &[number("threshold", 50.0)];
const DISTANCE_PARAMS: &[ParamDef] = &[
    text("targetEntity", "Player"),
    number("threshold", 100.0),
    select("comparison", COMPARISONS, "less"),
];
const HEALTH_PARAMS: &[ParamDef] = &[
    number("threshold", 50.0),
    select("comparison", COMPARISONS, "less"),
];
const TARGET_HEALTH_PARAMS: &[ParamDef] = &[
    text("targetEntity", "Player"),
    number("threshold", 50.0),
    select("comparison", COMPARISONS, "less"),
];
const TARGET_PARAMS: &[ParamDef] = &[text("targetEntity", "Player")];
const CHECK_BLACKBOARD_PARAMS: &[ParamDef] = &[
    text("key", ""),
    text("expectedValue", ""),
    select("comparison", BLACKBOARD_COMPARISONS, "equals"),
];

static DEFINITIONS: &[NodeDefinition] = &[
    composite("sequence", NodeKind::Sequence, &[]),
    composite("selector", NodeKind::Selector, &[]),
    composite("parallel", NodeKind::Parallel, PARALLEL_PARAMS),
    composite("random_selector", NodeKind::RandomSelector, &[]),
    composite("random_sequence", NodeKind::RandomSequence, &[]),
    decorator("inverter", NodeKind::Inverter, &[]),
    decorator("succeeder", NodeKind::Succeeder, &[]),
    decorator("failer", NodeKind::Failer, &[]),
    decorator("repeater", NodeKind::Repeater, REPEATER_PARAMS),
    decorator("repeat_until_fail", NodeKind::RepeatUntilFail, REPEAT_UNTIL_PARAMS),
    decorator("repeat_until_success", NodeKind::RepeatUntilSuccess, REPEAT_UNTIL_PARAMS),
    decorator("cooldown", NodeKind::Cooldown, COOLDOWN_PARAMS),
    decorator("timeout", NodeKind::Timeout, TIMEOUT_PARAMS),
    action("move", NodeKind::Move, MOVE_PARAMS),
    action("attack", NodeKind::Attack, ATTACK_PARAMS),
    action("flee", NodeKind::Flee, FLEE_PARAMS),
    action("patrol", NodeKind::Patrol, PATROL_PARAMS),
    action("idle", NodeKind::Idle, DURATION_PARAMS),
    action("wait", NodeKind::Wait, DURATION_PARAMS),
    action("log", NodeKind::Log, LOG_PARAMS),
    action("set_blackboard", NodeKind::SetBlackboard, SET_BLACKBOARD_PARAMS),
    condition("always", NodeKind::Always, &[]),
    condition("never", NodeKind::Never, &[]),
    condition("random", NodeKind::Random, RANDOM_PARAMS),
    condition("distance", NodeKind::Distance, DISTANCE_PARAMS),
    condition("in_range", NodeKind::InRange, DISTANCE_PARAMS),
    condition("health", NodeKind::Health, HEALTH_PARAMS),
    condition("target_health", NodeKind::TargetHealth, TARGET_HEALTH_PARAMS),
    condition("has_target", NodeKind::HasTarget, TARGET_PARAMS),
    condition("is_moving", NodeKind::IsMoving, &[]),
    condition("can_see", NodeKind::CanSee, TARGET_PARAMS),
    condition("check_blackboard", NodeKind::CheckBlackboard, CHECK_BLACKBOARD_PARAMS),
];

pub fn lookup(node_type: &str) -> Option<&'static NodeDefinition> {
    DEFINITIONS.iter().find(|d| d.node_type == node_type)
}

pub fn list_by_category(category: NodeCategory) -> Vec<&'static NodeDefinition> {
    DEFINITIONS.iter().filter(|d| d.category == category).collect()
}

pub fn all() -> &'static [NodeDefinition] {
    DEFINITIONS
}
