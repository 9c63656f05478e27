//! Leaf actions. Movement writes the agent's velocity to the blackboard so conditions such as
//! `is_moving` can observe it.

use bt_core::{BehaviorContext, EntityPatch, Status, Vec2, WorldMut};
use serde_json::json;
use tracing::{debug, error, info, trace, warn};

use crate::executor::Walker;
use crate::model::NodeInstance;
use crate::params::Params;

pub const VELOCITY_X: &str = "velocityX";
pub const VELOCITY_Y: &str = "velocityY";

fn set_velocity<W>(ctx: &mut BehaviorContext<'_, W>, velocity: Vec2)
where
    W: WorldMut + ?Sized,
{
    ctx.blackboard.set(VELOCITY_X, velocity.x);
    ctx.blackboard.set(VELOCITY_Y, velocity.y);
}

/// Step from `from` toward `to` by at most `speed * dt`, updating position and velocity.
fn step_toward<W>(ctx: &mut BehaviorContext<'_, W>, from: Vec2, to: Vec2, speed: f32)
where
    W: WorldMut + ?Sized,
{
    let offset = to - from;
    let distance = offset.length();
    let Some(direction) = offset.normalized() else {
        return;
    };
    let step = (speed * ctx.delta_time()).min(distance);
    ctx.update_self(EntityPatch::position(from + direction * step));
    set_velocity(ctx, direction * speed);
}

/// Parse `"x,y;x,y;..."`. Empty segments are skipped; any malformed segment rejects the list.
pub fn parse_waypoints(waypoints: &str) -> Option<Vec<Vec2>> {
    let mut points = Vec::new();
    for segment in waypoints.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let mut parts = segment.split(',');
        let x = parts.next()?.trim().parse::<f32>().ok()?;
        let y = parts.next()?.trim().parse::<f32>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        points.push(Vec2::new(x, y));
    }
    if points.is_empty() {
        None
    } else {
        Some(points)
    }
}

pub(crate) fn move_to<W>(params: Params<'_>, ctx: &mut BehaviorContext<'_, W>) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(position) = ctx.entity().map(|e| e.position) else {
        return Status::Failure;
    };
    let target = Vec2::new(params.number("targetX"), params.number("targetY"));

    if position.distance(target) <= params.number("arrivalThreshold") {
        return Status::Success;
    }

    step_toward(ctx, position, target, params.number("speed"));
    Status::Running
}

pub(crate) fn attack<W>(
    walker: &mut Walker<'_>,
    node: usize,
    params: Params<'_>,
    ctx: &mut BehaviorContext<'_, W>,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(position) = ctx.entity().map(|e| e.position) else {
        return Status::Failure;
    };

    let state = walker.state(node);
    let now = state.running_time;
    if let Some(last) = state.data.last_attack_time {
        if now - last < params.number("attackCooldown") {
            return Status::Running;
        }
    }

    let target_name = params.text("targetEntity");
    let Some((target_position, target_health)) = ctx
        .get_entity(&target_name)
        .map(|t| (t.position, t.health))
    else {
        return Status::Failure;
    };

    if position.distance(target_position) > params.number("attackRange") {
        return Status::Failure;
    }

    let damage = params.number("damage");
    let health = target_health - damage;
    ctx.update_entity(&target_name, EntityPatch::health(health));
    let attacker = ctx.agent.to_string();
    ctx.emit(
        "attack",
        json!({
            "attacker": attacker,
            "target": target_name,
            "damage": damage,
            "targetHealth": health,
        }),
    );
    walker.state(node).data.last_attack_time = Some(now);
    Status::Success
}

pub(crate) fn flee<W>(params: Params<'_>, ctx: &mut BehaviorContext<'_, W>) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(position) = ctx.entity().map(|e| e.position) else {
        return Status::Failure;
    };
    let target_name = params.text("targetEntity");
    let Some(threat) = ctx.get_entity(&target_name).map(|t| t.position) else {
        return Status::Success;
    };

    let away = position - threat;
    if away.length() >= params.number("safeDistance") {
        set_velocity(ctx, Vec2::ZERO);
        return Status::Success;
    }

    // Standing on top of the threat: pick an arbitrary escape direction.
    let direction = away.normalized().unwrap_or(Vec2::new(1.0, 0.0));
    let speed = params.number("speed");
    let step = speed * ctx.delta_time();
    ctx.update_self(EntityPatch::position(position + direction * step));
    set_velocity(ctx, direction * speed);
    Status::Running
}

/// Loops over the waypoints forever, pausing `waitTime` seconds at each one.
pub(crate) fn patrol<W>(
    walker: &mut Walker<'_>,
    node: usize,
    params: Params<'_>,
    ctx: &mut BehaviorContext<'_, W>,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(waypoints) = parse_waypoints(&params.text("waypoints")) else {
        debug!(node_id = %walker.node(node).id, "patrol has no usable waypoints");
        return Status::Failure;
    };
    let Some(position) = ctx.entity().map(|e| e.position) else {
        return Status::Failure;
    };
    let dt = ctx.delta_time();

    let memory = &mut walker.state(node).data;
    let index = memory.waypoint_index % waypoints.len();
    memory.waypoint_index = index;

    if memory.waiting {
        memory.wait_elapsed += dt;
        if memory.wait_elapsed >= params.number("waitTime") {
            memory.waiting = false;
            memory.wait_elapsed = 0.0;
            memory.waypoint_index = (index + 1) % waypoints.len();
        }
        set_velocity(ctx, Vec2::ZERO);
        return Status::Running;
    }

    let target = waypoints[index];
    if position.distance(target) <= params.number("arrivalThreshold") {
        memory.waiting = true;
        memory.wait_elapsed = 0.0;
        set_velocity(ctx, Vec2::ZERO);
        return Status::Running;
    }

    step_toward(ctx, position, target, params.number("speed"));
    Status::Running
}

/// `idle` and `wait`: succeed after `duration` seconds. Idle also zeroes velocity.
pub(crate) fn wait<W>(
    walker: &mut Walker<'_>,
    node: usize,
    params: Params<'_>,
    ctx: &mut BehaviorContext<'_, W>,
    idle: bool,
) -> Status
where
    W: WorldMut + ?Sized,
{
    if idle {
        set_velocity(ctx, Vec2::ZERO);
    }

    let memory = &mut walker.state(node).data;
    memory.elapsed += ctx.delta_time();
    if memory.elapsed >= params.number("duration") {
        memory.elapsed = 0.0;
        Status::Success
    } else {
        Status::Running
    }
}

pub(crate) fn log<W>(
    node: &NodeInstance,
    params: Params<'_>,
    ctx: &mut BehaviorContext<'_, W>,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let message = params.text("message");
    let agent = ctx.agent;
    let node_id = node.id.as_str();
    match params.text("level").as_str() {
        "trace" => trace!(agent, node_id, "{message}"),
        "debug" => debug!(agent, node_id, "{message}"),
        "warn" => warn!(agent, node_id, "{message}"),
        "error" => error!(agent, node_id, "{message}"),
        _ => info!(agent, node_id, "{message}"),
    }
    Status::Success
}

/// Writes to the tick blackboard and to the tree's persisted blackboard.
pub(crate) fn set_blackboard<W>(
    walker: &mut Walker<'_>,
    params: Params<'_>,
    ctx: &mut BehaviorContext<'_, W>,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let key = params.text("key");
    if key.is_empty() {
        return Status::Success;
    }
    let value = params.raw("value").unwrap_or_default();
    ctx.blackboard.set(key.clone(), value.clone());
    walker.persisted.set(key, value);
    Status::Success
}
