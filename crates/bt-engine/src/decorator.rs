//! Single-child decorators. Only `children[0]` is ever ticked.

use bt_core::{BehaviorContext, Status, WorldMut};

use crate::executor::Walker;
use crate::params::Params;

pub(crate) fn inverter<W>(
    walker: &mut Walker<'_>,
    node: usize,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    match walker.first_child(node) {
        Some(child) => walker.tick(child, ctx, depth + 1).invert(),
        None => Status::Failure,
    }
}

pub(crate) fn succeeder<W>(
    walker: &mut Walker<'_>,
    node: usize,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    force(walker, node, ctx, depth, Status::Success)
}

pub(crate) fn failer<W>(
    walker: &mut Walker<'_>,
    node: usize,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    force(walker, node, ctx, depth, Status::Failure)
}

fn force<W>(
    walker: &mut Walker<'_>,
    node: usize,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
    outcome: Status,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(child) = walker.first_child(node) else {
        return outcome;
    };
    match walker.tick(child, ctx, depth + 1) {
        Status::Running => Status::Running,
        _ => outcome,
    }
}

/// Runs the child `count` times, one completed run per tick at most.
pub(crate) fn repeater<W>(
    walker: &mut Walker<'_>,
    node: usize,
    params: Params<'_>,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(child) = walker.first_child(node) else {
        return Status::Failure;
    };
    let count = params.count("count");

    if walker.tick(child, ctx, depth + 1) == Status::Running {
        return Status::Running;
    }

    let memory = &mut walker.state(node).data;
    memory.iteration += 1;
    if memory.iteration >= count {
        memory.iteration = 0;
        Status::Success
    } else {
        Status::Running
    }
}

/// Loops the child until it returns `until` or `maxIterations` runs complete.
///
/// Reaching `until` is always `Success`. Hitting the cap is `Success` when looping until failure
/// and `Failure` when looping until success.
pub(crate) fn repeat_until<W>(
    walker: &mut Walker<'_>,
    node: usize,
    params: Params<'_>,
    until: Status,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let Some(child) = walker.first_child(node) else {
        return Status::Failure;
    };
    let max_iterations = params.count("maxIterations");

    let status = walker.tick(child, ctx, depth + 1);
    if status == Status::Running {
        return Status::Running;
    }

    let memory = &mut walker.state(node).data;
    if status == until {
        memory.iteration = 0;
        return Status::Success;
    }

    memory.iteration += 1;
    if memory.iteration >= max_iterations {
        memory.iteration = 0;
        return if until == Status::Failure {
            Status::Success
        } else {
            Status::Failure
        };
    }
    Status::Running
}

/// Gates the child behind `duration` seconds since its last completed run.
///
/// The node's own `running_time` keeps accumulating while gated, so the gate opens on the first
/// tick at or past the deadline.
pub(crate) fn cooldown<W>(
    walker: &mut Walker<'_>,
    node: usize,
    params: Params<'_>,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let duration = params.number("duration");
    let state = walker.state(node);
    if state.running_time - state.data.last_execution_time < duration {
        return Status::Failure;
    }

    let Some(child) = walker.first_child(node) else {
        return Status::Failure;
    };
    let status = walker.tick(child, ctx, depth + 1);
    if status != Status::Running {
        let state = walker.state(node);
        state.data.last_execution_time = state.running_time;
    }
    status
}

/// Fails once the child has been running for `timeout` seconds.
///
/// The elapsed counter restarts whenever this node's previous tick did not return `Running`.
pub(crate) fn timeout<W>(
    walker: &mut Walker<'_>,
    node: usize,
    params: Params<'_>,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let limit = params.number("timeout");
    let dt = ctx.delta_time();

    let state = walker.state(node);
    if state.status != Status::Running {
        state.data.elapsed = 0.0;
    }
    state.data.elapsed += dt;
    if state.data.elapsed >= limit {
        state.data.elapsed = 0.0;
        return Status::Failure;
    }

    match walker.first_child(node) {
        Some(child) => walker.tick(child, ctx, depth + 1),
        None => Status::Failure,
    }
}
