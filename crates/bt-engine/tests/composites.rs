mod common;

use bt_core::Status::{self, Failure, Running, Success};
use common::{node, tree, Harness};

fn wait(id: &str, duration: f64) -> bt_engine::NodeInstance {
    node(id, "wait").with("duration", duration)
}

#[test]
fn sequence_resumes_at_running_child() {
    let t = tree(
        vec![
            node("root", "sequence"),
            node("first", "always"),
            wait("second", 1.0),
            node("third", "never"),
        ],
        &[("root", "first"), ("root", "second"), ("root", "third")],
    );
    let mut h = Harness::solo(t);

    assert_eq!(h.tick(0.5), Running);
    assert_eq!(h.tick(0.5), Failure);

    // `first` is not re-evaluated while `second` is running.
    assert_eq!(h.running_time("first"), Some(0.5));
    assert_eq!(h.running_time("second"), Some(1.0));
    assert_eq!(h.running_time("third"), Some(0.5));
}

#[test]
fn sequence_restarts_from_first_child_after_completion() {
    let t = tree(
        vec![node("root", "sequence"), node("a", "always"), node("b", "always")],
        &[("root", "a"), ("root", "b")],
    );
    let mut h = Harness::solo(t);

    assert_eq!(h.run(3, 0.1), vec![Success, Success, Success]);
    let state = h.executor.states().get("root").unwrap();
    assert_eq!(state.data.current_index, 0);
    let a = h.running_time("a").unwrap();
    assert!((a - 0.3).abs() < 1e-6, "{a}");
}

#[test]
fn selector_stops_at_first_success() {
    let t = tree(
        vec![
            node("root", "selector"),
            node("no", "never"),
            node("yes", "always"),
            node("unreached", "always"),
        ],
        &[("root", "no"), ("root", "yes"), ("root", "unreached")],
    );
    let mut h = Harness::solo(t);

    assert_eq!(h.tick(0.1), Success);
    assert!(h.executor.states().get("unreached").is_none());
}

#[test]
fn selector_fails_when_every_child_fails() {
    let t = tree(
        vec![node("root", "selector"), node("a", "never"), node("b", "never")],
        &[("root", "a"), ("root", "b")],
    );
    assert_eq!(Harness::solo(t).tick(0.1), Failure);
}

#[test]
fn empty_composites() {
    let cases: [(&str, Status); 4] = [
        ("sequence", Success),
        ("selector", Failure),
        ("random_selector", Failure),
        ("parallel", Success),
    ];
    for (node_type, expected) in cases {
        let mut h = Harness::solo(tree(vec![node("root", node_type)], &[]));
        assert_eq!(h.tick(0.1), expected, "{node_type}");
    }
}

#[test]
fn parallel_default_policy_waits_for_all_children() {
    let t = tree(
        vec![node("root", "parallel"), node("quick", "always"), wait("slow", 1.0)],
        &[("root", "quick"), ("root", "slow")],
    );
    let mut h = Harness::solo(t);

    assert_eq!(h.run(2, 0.5), vec![Running, Success]);
    // Every child is ticked every frame.
    assert_eq!(h.running_time("quick"), Some(1.0));
}

#[test]
fn parallel_success_policy_one() {
    let t = tree(
        vec![
            node("root", "parallel").with("successPolicy", "one"),
            node("quick", "always"),
            wait("slow", 1.0),
        ],
        &[("root", "quick"), ("root", "slow")],
    );
    assert_eq!(Harness::solo(t).tick(0.5), Success);
}

#[test]
fn parallel_checks_failure_before_success() {
    let t = tree(
        vec![
            node("root", "parallel").with("successPolicy", "one"),
            node("bad", "never"),
            node("good", "always"),
        ],
        &[("root", "bad"), ("root", "good")],
    );
    assert_eq!(Harness::solo(t).tick(0.1), Failure);
}

#[test]
fn parallel_failure_policy_all_tolerates_single_failure() {
    let t = tree(
        vec![
            node("root", "parallel").with("failurePolicy", "all"),
            node("bad", "never"),
            wait("slow", 1.0),
        ],
        &[("root", "bad"), ("root", "slow")],
    );
    let mut h = Harness::solo(t);
    assert_eq!(h.tick(0.5), Running);
}

#[test]
fn random_selector_picks_each_child_first_equally_often() {
    let ids = ["a", "b", "c"];
    let mut nodes = vec![node("root", "random_selector")];
    nodes.extend(ids.iter().map(|id| node(id, "always")));
    let edges: Vec<(&str, &str)> = ids.iter().map(|id| ("root", *id)).collect();
    let mut h = Harness::solo(tree(nodes, &edges));

    let runs = 3000;
    let mut counts = [0usize; 3];
    for _ in 0..runs {
        h.executor.reset();
        assert_eq!(h.tick(0.1), Success);
        let picked: Vec<usize> = ids
            .iter()
            .enumerate()
            .filter(|(_, id)| h.executor.states().get(id).is_some())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(picked.len(), 1);
        counts[picked[0]] += 1;
    }

    for count in counts {
        assert!((800..=1200).contains(&count), "{counts:?}");
    }
}

#[test]
fn random_sequence_keeps_its_order_while_running() {
    let ids = ["a", "b", "c"];
    let mut nodes = vec![node("root", "random_sequence")];
    nodes.extend(ids.iter().map(|id| wait(id, 1.0)));
    let edges: Vec<(&str, &str)> = ids.iter().map(|id| ("root", *id)).collect();
    let mut h = Harness::solo(tree(nodes, &edges));

    // A finished child hands over to the next one within the same tick.
    let mut order = None;
    for _ in 0..3 {
        assert_eq!(h.tick(0.5), Running);
        let root = h.executor.states().get("root").unwrap();
        let current = root.data.shuffled_indices.clone();
        assert!(current.is_some());
        if order.is_some() {
            assert_eq!(current, order, "reshuffled while running");
        }
        order = current;
    }
    assert_eq!(h.tick(0.5), Success);

    // Each wait ran exactly once to completion: no child was restarted by a reshuffle.
    for id in ids {
        assert_eq!(h.running_time(id), Some(1.0), "{id}");
    }
    let root = h.executor.states().get("root").unwrap();
    assert!(root.data.shuffled_indices.is_none());
}
