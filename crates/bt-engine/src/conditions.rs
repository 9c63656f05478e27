//! Leaf predicates. Conditions never mutate the world and never return `Running`.

use bt_core::blackboard::{value_as_f64, value_as_text};
use bt_core::{BehaviorContext, DeterministicRng, Status, WorldMut};

use crate::actions::{VELOCITY_X, VELOCITY_Y};
use crate::executor::Walker;
use crate::params::Params;
use crate::registry::ParamKind;

const MOVING_EPSILON: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equals,
    NotEquals,
    Exists,
}

impl Comparison {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "less" => Some(Comparison::Less),
            "less_equal" => Some(Comparison::LessEqual),
            "greater" => Some(Comparison::Greater),
            "greater_equal" => Some(Comparison::GreaterEqual),
            "equals" => Some(Comparison::Equals),
            "not_equals" => Some(Comparison::NotEquals),
            "exists" => Some(Comparison::Exists),
            _ => None,
        }
    }

    pub fn numbers(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Less => value < threshold,
            Comparison::LessEqual => value <= threshold,
            Comparison::Greater => value > threshold,
            Comparison::GreaterEqual => value >= threshold,
            Comparison::Equals => value == threshold,
            Comparison::NotEquals => value != threshold,
            Comparison::Exists => true,
        }
    }

    fn text(self, value: &str, expected: &str) -> bool {
        match self {
            Comparison::Less => value < expected,
            Comparison::Greater => value > expected,
            Comparison::LessEqual => value <= expected,
            Comparison::GreaterEqual => value >= expected,
            Comparison::Equals => value == expected,
            Comparison::NotEquals => value != expected,
            Comparison::Exists => true,
        }
    }
}

/// The node's `comparison`, restricted to the options its definition allows. Anything else
/// falls back to the definition default.
fn comparison(params: Params<'_>) -> Comparison {
    let configured = params.text("comparison");
    let allowed = match params.definition().param("comparison").map(|p| p.kind) {
        Some(ParamKind::Select(options)) => options.contains(&configured.as_str()),
        _ => false,
    };
    if allowed {
        if let Some(cmp) = Comparison::parse(&configured) {
            return cmp;
        }
    }
    params
        .default_text("comparison")
        .as_deref()
        .and_then(Comparison::parse)
        .unwrap_or(Comparison::Less)
}

pub(crate) fn random(walker: &mut Walker<'_>, params: Params<'_>) -> Status {
    let roll = walker.rng.next_f32_unit() * 100.0;
    Status::from_bool(roll < params.number("threshold"))
}

/// `distance` / `in_range`: Euclidean distance from the agent to `targetEntity`.
pub(crate) fn distance<W>(params: Params<'_>, ctx: &mut BehaviorContext<'_, W>) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(me) = ctx.entity() else {
        return Status::Failure;
    };
    let Some(target) = ctx.get_entity(&params.text("targetEntity")) else {
        return Status::Failure;
    };
    let d = me.position.distance(target.position);
    Status::from_bool(comparison(params).numbers(d as f64, params.number("threshold") as f64))
}

pub(crate) fn health<W>(params: Params<'_>, ctx: &mut BehaviorContext<'_, W>) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(percent) = ctx.entity().and_then(|e| e.health_percent()) else {
        return Status::Failure;
    };
    Status::from_bool(comparison(params).numbers(percent as f64, params.number("threshold") as f64))
}

pub(crate) fn target_health<W>(params: Params<'_>, ctx: &mut BehaviorContext<'_, W>) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(percent) = ctx
        .get_entity(&params.text("targetEntity"))
        .and_then(|e| e.health_percent())
    else {
        return Status::Failure;
    };
    Status::from_bool(comparison(params).numbers(percent as f64, params.number("threshold") as f64))
}

pub(crate) fn has_target<W>(params: Params<'_>, ctx: &mut BehaviorContext<'_, W>) -> Status
where
    W: WorldMut + ?Sized,
{
    Status::from_bool(ctx.get_entity(&params.text("targetEntity")).is_some())
}

pub(crate) fn is_moving<W>(ctx: &mut BehaviorContext<'_, W>) -> Status
where
    W: WorldMut + ?Sized,
{
    let vx = ctx.blackboard.get_f64(VELOCITY_X).unwrap_or(0.0);
    let vy = ctx.blackboard.get_f64(VELOCITY_Y).unwrap_or(0.0);
    Status::from_bool(vx.abs() > MOVING_EPSILON || vy.abs() > MOVING_EPSILON)
}

/// Range check against the agent's sight range. There is no occlusion.
pub(crate) fn can_see<W>(params: Params<'_>, ctx: &mut BehaviorContext<'_, W>) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(me) = ctx.entity() else {
        return Status::Failure;
    };
    let Some(target) = ctx.get_entity(&params.text("targetEntity")) else {
        return Status::Failure;
    };
    Status::from_bool(me.position.distance(target.position) <= me.sight_range())
}

pub(crate) fn check_blackboard<W>(params: Params<'_>, ctx: &mut BehaviorContext<'_, W>) -> Status
where
    W: WorldMut + ?Sized,
{
    let cmp = comparison(params);
    let Some(value) = ctx.blackboard.get(&params.text("key")) else {
        return Status::from_bool(cmp == Comparison::NotEquals);
    };
    if cmp == Comparison::Exists {
        return Status::Success;
    }

    let expected = params.raw("expectedValue").unwrap_or_default();
    let matched = match (value_as_f64(value), value_as_f64(&expected)) {
        (Some(a), Some(b)) => cmp.numbers(a, b),
        _ => cmp.text(&value_as_text(value), &value_as_text(&expected)),
    };
    Status::from_bool(matched)
}
