//! Fixed-step host loop: one `execute` per frame against a [`SimWorld`].

use std::path::Path;

use anyhow::{bail, Context, Result};
use bt_core::{BehaviorContext, Blackboard, Entity, SimWorld, Status, TickContext};
use bt_engine::{Executor, ExecutorConfig, Tree};
use serde::Serialize;
use serde_json::Value;

use crate::config::SimConfig;

pub fn load_tree(path: &Path) -> Result<Tree> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tree from {}", path.display()))?;
    Tree::from_json(&content)
        .with_context(|| format!("Failed to parse tree from {}", path.display()))
}

/// Worlds are YAML or JSON; anything without a `.json` extension goes through the YAML parser.
pub fn load_world(path: &Path) -> Result<SimWorld> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read world from {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let world = if is_json {
        serde_json::from_str(&content).map_err(anyhow::Error::from)
    } else {
        serde_yaml::from_str(&content).map_err(anyhow::Error::from)
    };
    world.with_context(|| format!("Failed to parse world from {}", path.display()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickEvent {
    pub tick: u64,
    pub name: String,
    pub payload: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub tree_id: String,
    pub agent: String,
    pub status: Status,
    pub ticks: u64,
    pub events: Vec<TickEvent>,
    pub entities: Vec<Entity>,
    pub blackboard: Blackboard,
}

pub struct Simulation {
    executor: Executor,
    world: SimWorld,
    blackboard: Blackboard,
    agent: String,
    tick: u64,
    events: Vec<TickEvent>,
}

impl Simulation {
    pub fn new(tree: Tree, world: SimWorld, config: &SimConfig) -> Result<Self> {
        let agent = match &config.agent {
            Some(agent) => agent.clone(),
            None => match world.entities().next() {
                Some(entity) => entity.name.clone(),
                None => bail!("world has no entities to act as the agent"),
            },
        };
        if !world.entities().any(|e| e.name == agent) {
            tracing::warn!(agent = %agent, "agent is not in the world; actions will fail");
        }

        let executor = Executor::with_config(tree, ExecutorConfig { seed: config.seed });
        Ok(Self {
            executor,
            world,
            blackboard: Blackboard::new(),
            agent,
            tick: 0,
            events: Vec::new(),
        })
    }

    /// Advance one frame.
    pub fn step(&mut self, dt: f32) -> Status {
        let mut ctx = BehaviorContext::new(
            TickContext::new(self.tick, dt),
            &self.agent,
            &mut self.world,
            &mut self.blackboard,
        );
        let status = self.executor.execute(&mut ctx);

        let tick = self.tick;
        self.events
            .extend(self.world.take_events().into_iter().map(|e| TickEvent {
                tick,
                name: e.name,
                payload: e.payload,
            }));
        self.tick += 1;
        status
    }

    pub fn run(mut self, config: &SimConfig) -> RunSummary {
        tracing::info!(
            tree_id = %self.executor.tree().id,
            agent = %self.agent,
            ticks = config.ticks,
            dt = config.delta_time,
            "simulation start"
        );

        let mut status = Status::Running;
        while self.tick < config.ticks {
            let tick = self.tick;
            status = self.step(config.delta_time);
            tracing::debug!(tick, status = ?status, "tick");
            if config.until_done && status.is_done() {
                break;
            }
        }

        tracing::info!(
            ticks = self.tick,
            status = ?status,
            events = self.events.len(),
            "simulation done"
        );
        RunSummary {
            tree_id: self.executor.tree().id.clone(),
            agent: self.agent,
            status,
            ticks: self.tick,
            events: self.events,
            entities: self.world.entities().cloned().collect(),
            blackboard: self.executor.tree().blackboard.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bt_core::{Vec2, WorldView};
    use bt_engine::NodeInstance;

    fn chase_tree() -> Tree {
        let mut tree = Tree::new("chase", "Chase");
        tree.add_node(NodeInstance::new("root", "sequence"));
        tree.add_node(NodeInstance::new("go", "move").with("targetX", 20).with("speed", 10));
        tree.add_node(NodeInstance::new("hit", "attack"));
        tree.connect("root", "go");
        tree.connect("root", "hit");
        tree
    }

    fn world() -> SimWorld {
        SimWorld::with_entities([
            Entity::new("Guard", Vec2::ZERO),
            Entity::new("Player", Vec2::new(60.0, 0.0)),
        ])
    }

    fn config(ticks: u64, until_done: bool) -> SimConfig {
        SimConfig {
            ticks,
            delta_time: 0.5,
            seed: Some(1),
            agent: Some("Guard".to_string()),
            until_done,
        }
    }

    #[test]
    fn run_stops_when_done() {
        let cfg = config(50, true);
        let summary = Simulation::new(chase_tree(), world(), &cfg).unwrap().run(&cfg);

        // Three half-second steps of 5 units bring the guard within the arrival threshold.
        assert_eq!(summary.status, Status::Success);
        assert_eq!(summary.ticks, 4);
        assert_eq!(summary.events.len(), 1);
        assert_eq!(summary.events[0].tick, 3);
        assert_eq!(summary.events[0].name, "attack");

        let player = summary.entities.iter().find(|e| e.name == "Player").unwrap();
        assert_eq!(player.health, 90.0);
    }

    #[test]
    fn run_honours_tick_limit() {
        let cfg = config(2, false);
        let summary = Simulation::new(chase_tree(), world(), &cfg).unwrap().run(&cfg);
        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.status, Status::Running);
        assert!(summary.events.is_empty());
    }

    #[test]
    fn agent_defaults_to_first_entity() {
        let cfg = SimConfig {
            agent: None,
            ..config(1, false)
        };
        let mut sim = Simulation::new(chase_tree(), world(), &cfg).unwrap();
        assert_eq!(sim.agent, "Guard");
        sim.step(0.5);
        assert_eq!(sim.world.entity("Guard").unwrap().position, Vec2::new(5.0, 0.0));

        let empty = Simulation::new(chase_tree(), SimWorld::new(), &cfg);
        assert!(empty.is_err());
    }

    #[test]
    fn loads_world_from_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("world.yaml");
        std::fs::write(
            &yaml,
            "entities:\n  - name: Guard\n    position: { x: 1, y: 2 }\n  - name: Player\n",
        )
        .unwrap();
        let json = dir.path().join("world.json");
        std::fs::write(&json, r#"{"entities": [{"name": "Guard", "health": 40}]}"#).unwrap();

        let from_yaml = load_world(&yaml).unwrap();
        assert_eq!(from_yaml.entity("Guard").unwrap().position, Vec2::new(1.0, 2.0));
        assert!(from_yaml.entity("Player").is_some());

        let from_json = load_world(&json).unwrap();
        assert_eq!(from_json.entity("Guard").unwrap().health, 40.0);
    }

    #[test]
    fn bundled_demo_runs() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let tree = load_tree(&demos.join("guard.json")).unwrap();
        tree.validate().unwrap();
        let world = load_world(&demos.join("arena.yaml")).unwrap();
        let cfg = SimConfig::load(&demos.join("bt-sim.yaml")).unwrap();

        let summary = Simulation::new(tree, world, &cfg).unwrap().run(&cfg);
        assert_eq!(summary.ticks, 300);
        assert!(summary.events.iter().all(|e| e.name == "attack"));
        assert!(!summary.events.is_empty());
        assert_eq!(summary.blackboard.get("alerted"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn tree_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(&path, "not json").unwrap();
        let err = load_tree(&path).unwrap_err();
        assert!(err.to_string().contains("tree.json"));
    }
}
