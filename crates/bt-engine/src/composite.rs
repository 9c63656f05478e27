//! Composite nodes: sequence, selector, parallel and their shuffled variants.

use bt_core::{shuffle_indices, BehaviorContext, Status, WorldMut};

use crate::executor::Walker;
use crate::params::Params;

/// Ticks children from the saved index until one returns `stop_on` or `Running`.
///
/// `Running` saves the index; `stop_on` or running out of children resets it (and drops the
/// permutation of shuffled variants so the next run reshuffles).
fn ordered<W>(
    walker: &mut Walker<'_>,
    node: usize,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
    stop_on: Status,
    shuffled: bool,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let children = walker.children(node);
    let exhausted = stop_on.invert();

    let order = if shuffled {
        Some(permutation(walker, node, children.len()))
    } else {
        None
    };

    // An edit between ticks can leave the saved index past the end.
    let mut i = walker.state(node).data.current_index;
    if i >= children.len() {
        i = 0;
    }
    while i < children.len() {
        let child = match &order {
            Some(order) => children[order[i]],
            None => children[i],
        };
        let status = walker.tick(child, ctx, depth + 1);
        if status == Status::Running {
            walker.state(node).data.current_index = i;
            return Status::Running;
        }
        if status == stop_on {
            finish(walker, node);
            return stop_on;
        }
        i += 1;
    }

    finish(walker, node);
    exhausted
}

/// The stored permutation for this run, or a fresh one if there is none (or the child count
/// changed since it was drawn).
fn permutation(walker: &mut Walker<'_>, node: usize, len: usize) -> Vec<usize> {
    let stored = walker
        .state(node)
        .data
        .shuffled_indices
        .clone()
        .filter(|order| order.len() == len);
    if let Some(order) = stored {
        return order;
    }

    let order = shuffle_indices(len, &mut *walker.rng);
    let memory = &mut walker.state(node).data;
    memory.shuffled_indices = Some(order.clone());
    memory.current_index = 0;
    order
}

fn finish(walker: &mut Walker<'_>, node: usize) {
    let memory = &mut walker.state(node).data;
    memory.current_index = 0;
    memory.shuffled_indices = None;
}

pub(crate) fn sequence<W>(
    walker: &mut Walker<'_>,
    node: usize,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    ordered(walker, node, ctx, depth, Status::Failure, false)
}

pub(crate) fn selector<W>(
    walker: &mut Walker<'_>,
    node: usize,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    ordered(walker, node, ctx, depth, Status::Success, false)
}

pub(crate) fn random_sequence<W>(
    walker: &mut Walker<'_>,
    node: usize,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    ordered(walker, node, ctx, depth, Status::Failure, true)
}

pub(crate) fn random_selector<W>(
    walker: &mut Walker<'_>,
    node: usize,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    ordered(walker, node, ctx, depth, Status::Success, true)
}

/// Ticks every child each frame; the failure policy is checked before the success policy.
pub(crate) fn parallel<W>(
    walker: &mut Walker<'_>,
    node: usize,
    params: Params<'_>,
    ctx: &mut BehaviorContext<'_, W>,
    depth: usize,
) -> Status
where
    W: WorldMut + ?Sized,
{
    let children = walker.children(node);
    if children.is_empty() {
        return Status::Success;
    }

    let require_all_success = params.text("successPolicy") != "one";
    let require_all_failure = params.text("failurePolicy") == "all";

    let (mut successes, mut failures, mut running) = (0usize, 0usize, 0usize);
    for &child in children {
        match walker.tick(child, ctx, depth + 1) {
            Status::Success => successes += 1,
            Status::Failure => failures += 1,
            Status::Running => running += 1,
        }
    }

    let total = children.len();
    let failed = if require_all_failure {
        failures == total
    } else {
        failures > 0
    };
    if failed {
        return Status::Failure;
    }

    let succeeded = if require_all_success {
        successes == total
    } else {
        successes > 0
    };
    if succeeded {
        return Status::Success;
    }

    if running > 0 {
        Status::Running
    } else {
        Status::Success
    }
}
