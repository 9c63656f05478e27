mod common;

use bt_core::Status::{Failure, Running, Success};
use bt_core::{Entity, SimWorld, Vec2, WorldView};
use bt_engine::{parse_waypoints, NodeInstance};
use common::{node, tree, Harness, AGENT};
use serde_json::json;

fn leaf(n: NodeInstance, world: SimWorld) -> Harness {
    Harness::new(tree(vec![n], &[]), world)
}

fn agent_and_player_at(player_x: f32) -> SimWorld {
    SimWorld::with_entities([agent_at(0.0, 0.0), Entity::new("Player", Vec2::new(player_x, 0.0))])
}

fn agent_at(x: f32, y: f32) -> Entity {
    Entity::new(AGENT, Vec2::new(x, y))
}

fn position(h: &Harness, name: &str) -> Vec2 {
    h.world.entity(name).unwrap().position
}

fn approx(a: Vec2, b: Vec2) -> bool {
    a.distance(b) < 1e-3
}

#[test]
fn move_steps_toward_target_then_arrives() {
    let mv = node("mv", "move").with("targetX", 100).with("targetY", 0);
    let mut h = leaf(mv, SimWorld::with_entities([agent_at(0.0, 0.0)]));

    assert_eq!(h.tick(0.5), Running);
    assert!(approx(position(&h, AGENT), Vec2::new(50.0, 0.0)));
    assert_eq!(h.blackboard.get_f64("velocityX"), Some(100.0));
    assert_eq!(h.blackboard.get_f64("velocityY"), Some(0.0));

    h.world.entity_mut(AGENT).unwrap().position = Vec2::new(97.0, 0.0);
    assert_eq!(h.tick(0.5), Success);
    assert_eq!(position(&h, AGENT), Vec2::new(97.0, 0.0));
}

#[test]
fn move_never_overshoots() {
    let mv = node("mv", "move").with("targetX", 30).with("speed", 100);
    let mut h = leaf(mv, SimWorld::with_entities([agent_at(0.0, 0.0)]));

    assert_eq!(h.tick(1.0), Running);
    assert!(approx(position(&h, AGENT), Vec2::new(30.0, 0.0)));
    assert_eq!(h.tick(1.0), Success);
}

#[test]
fn actions_fail_without_an_acting_entity() {
    for node_type in ["move", "attack", "flee", "patrol", "idle", "wait", "log", "set_blackboard"] {
        let mut h = leaf(node("n", node_type), SimWorld::new());
        assert_eq!(h.tick(0.1), Failure, "{node_type}");
    }
}

#[test]
fn attack_out_of_range_changes_nothing() {
    let world = agent_and_player_at(100.0);
    let mut h = leaf(node("atk", "attack"), world);

    assert_eq!(h.tick(0.1), Failure);
    assert_eq!(h.world.entity("Player").unwrap().health, 100.0);
    assert!(h.world.events().is_empty());
}

#[test]
fn attack_in_range_damages_and_emits_once() {
    let world = agent_and_player_at(30.0);
    let mut h = leaf(node("atk", "attack").with("damage", 15), world);

    assert_eq!(h.tick(0.1), Success);
    assert_eq!(h.world.entity("Player").unwrap().health, 85.0);

    let events = h.world.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "attack");
    assert_eq!(
        events[0].payload,
        json!({"attacker": AGENT, "target": "Player", "damage": 15.0, "targetHealth": 85.0})
    );
}

#[test]
fn attack_waits_out_its_cooldown() {
    let world = agent_and_player_at(10.0);
    let mut h = leaf(node("atk", "attack").with("attackCooldown", 1.0), world);

    assert_eq!(h.run(3, 0.5), vec![Success, Running, Success]);
    assert_eq!(h.world.entity("Player").unwrap().health, 80.0);
    assert_eq!(h.world.events().len(), 2);
}

#[test]
fn attack_fails_on_missing_target() {
    let mut h = leaf(
        node("atk", "attack").with("targetEntity", "Ghost"),
        SimWorld::with_entities([agent_at(0.0, 0.0)]),
    );
    assert_eq!(h.tick(0.1), Failure);
}

#[test]
fn flee_moves_away_until_safe() {
    let world = agent_and_player_at(10.0);
    let mut h = leaf(node("run", "flee").with("safeDistance", 100), world);

    assert_eq!(h.tick(0.5), Running);
    assert!(approx(position(&h, AGENT), Vec2::new(-60.0, 0.0)));
    assert_eq!(h.blackboard.get_f64("velocityX"), Some(-120.0));

    assert_eq!(h.tick(0.5), Running);
    assert_eq!(h.tick(0.5), Success);
    assert_eq!(h.blackboard.get_f64("velocityX"), Some(0.0));
    assert!(approx(position(&h, AGENT), Vec2::new(-120.0, 0.0)));
}

#[test]
fn flee_without_target_succeeds() {
    let mut h = leaf(node("run", "flee"), SimWorld::with_entities([agent_at(0.0, 0.0)]));
    assert_eq!(h.tick(0.1), Success);
    assert_eq!(position(&h, AGENT), Vec2::ZERO);
}

#[test]
fn patrol_waits_at_each_waypoint_then_advances() {
    let patrol = node("p", "patrol")
        .with("waypoints", "10,0;10,10")
        .with("speed", 100)
        .with("waitTime", 0.15)
        .with("arrivalThreshold", 1);
    let mut h = leaf(patrol, SimWorld::with_entities([agent_at(0.0, 0.0)]));

    // Reach the first waypoint.
    assert_eq!(h.tick(0.1), Running);
    assert!(approx(position(&h, AGENT), Vec2::new(10.0, 0.0)));

    // Arrive, then wait out 0.15s.
    assert_eq!(h.run(3, 0.1), vec![Running; 3]);
    let memory = &h.executor.states().get("p").unwrap().data;
    assert_eq!(memory.waypoint_index, 1);
    assert!(!memory.waiting);

    assert_eq!(h.tick(0.1), Running);
    assert!(approx(position(&h, AGENT), Vec2::new(10.0, 10.0)));
}

#[test]
fn patrol_fails_on_malformed_waypoints() {
    for waypoints in ["", "a,b", "1,2;3"] {
        let mut h = leaf(
            node("p", "patrol").with("waypoints", waypoints),
            SimWorld::with_entities([agent_at(0.0, 0.0)]),
        );
        assert_eq!(h.tick(0.1), Failure, "{waypoints:?}");
    }
}

#[test]
fn waypoint_parsing() {
    assert_eq!(
        parse_waypoints(" 1, 2 ; 3.5,-4;"),
        Some(vec![Vec2::new(1.0, 2.0), Vec2::new(3.5, -4.0)])
    );
    assert_eq!(parse_waypoints(";;"), None);
    assert_eq!(parse_waypoints("1,2,3"), None);
}

#[test]
fn idle_zeroes_velocity_and_completes_after_duration() {
    let mut h = leaf(
        node("idle", "idle").with("duration", 1.0),
        SimWorld::with_entities([agent_at(0.0, 0.0)]),
    );
    h.blackboard.set("velocityX", 42.0);

    assert_eq!(h.run(3, 0.5), vec![Running, Success, Running]);
    assert_eq!(h.blackboard.get_f64("velocityX"), Some(0.0));
}

#[test]
fn wait_leaves_velocity_alone() {
    let mut h = leaf(
        node("w", "wait").with("duration", 0.5),
        SimWorld::with_entities([agent_at(0.0, 0.0)]),
    );
    h.blackboard.set("velocityX", 42.0);

    assert_eq!(h.tick(0.5), Success);
    assert_eq!(h.blackboard.get_f64("velocityX"), Some(42.0));
}

#[test]
fn set_blackboard_persists_into_tree() {
    let set = node("s", "set_blackboard").with("key", "alert").with("value", "high");
    let mut h = leaf(set, SimWorld::with_entities([agent_at(0.0, 0.0)]));

    assert_eq!(h.tick(0.1), Success);
    assert_eq!(h.blackboard.get("alert"), Some(&json!("high")));
    assert_eq!(h.executor.tree().blackboard.get("alert"), Some(&json!("high")));
}

#[test]
fn log_always_succeeds() {
    let log = node("l", "log").with("message", "hello").with("level", "warn");
    let mut h = leaf(log, SimWorld::with_entities([agent_at(0.0, 0.0)]));
    assert_eq!(h.tick(0.1), Success);
}
