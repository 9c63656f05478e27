//! bt-sim - behavior tree host simulator.
//!
//! - `bt-sim run` - tick a tree against a world loaded from disk
//! - `bt-sim validate` - structural check of a tree file
//! - `bt-sim nodes` - list the node catalog

mod config;
mod sim;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use bt_engine::registry::{self, NodeDefinition};
use bt_engine::{NodeCategory, ParamKind};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use config::SimConfig;
use sim::Simulation;

#[derive(Parser)]
#[command(name = "bt-sim")]
#[command(about = "Run behavior trees against a simulated world", version)]
struct Cli {
    /// Config file (defaults to ./bt-sim.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tick a tree and print a JSON summary
    Run {
        /// Tree file (JSON)
        #[arg(long)]
        tree: PathBuf,

        /// World file (YAML or JSON)
        #[arg(long)]
        world: PathBuf,

        /// Acting entity name
        #[arg(long)]
        agent: Option<String>,

        /// Maximum number of ticks
        #[arg(long)]
        ticks: Option<u64>,

        /// Seconds per tick
        #[arg(long)]
        dt: Option<f32>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Stop once the root returns success or failure
        #[arg(long)]
        until_done: bool,
    },

    /// Check a tree for structural problems
    Validate {
        /// Tree file (JSON)
        #[arg(long)]
        tree: PathBuf,
    },

    /// List available node types
    Nodes {
        /// Only show one category (composite, decorator, action, condition)
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if cli.json_logs {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Run {
            tree,
            world,
            agent,
            ticks,
            dt,
            seed,
            until_done,
        } => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            let mut config = SimConfig::resolve(cli.config.as_deref(), &cwd)?;
            if agent.is_some() {
                config.agent = agent;
            }
            if let Some(ticks) = ticks {
                config.ticks = ticks;
            }
            if let Some(dt) = dt {
                config.delta_time = dt;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            config.until_done |= until_done;
            run(tree, world, &config)
        }
        Commands::Validate { tree } => validate(tree),
        Commands::Nodes { category } => list_nodes(category.as_deref()),
    }
}

fn run(tree: PathBuf, world: PathBuf, config: &SimConfig) -> Result<()> {
    let tree = sim::load_tree(&tree)?;
    if let Err(err) = tree.validate() {
        tracing::warn!(error = %err, "tree failed validation; affected nodes will fail");
    }
    let world = sim::load_world(&world)?;

    let summary = Simulation::new(tree, world, config)?.run(config);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn validate(path: PathBuf) -> Result<()> {
    let tree = sim::load_tree(&path)?;
    tree.validate()
        .with_context(|| format!("{} is not a valid tree", path.display()))?;

    println!(
        "{}: ok ({} nodes, {} connections)",
        path.display(),
        tree.nodes.len(),
        tree.connections.len()
    );
    Ok(())
}

fn list_nodes(category: Option<&str>) -> Result<()> {
    let definitions: Vec<&NodeDefinition> = match category {
        Some(name) => {
            let category = NodeCategory::parse(name)
                .ok_or_else(|| anyhow!("unknown category `{name}`"))?;
            registry::list_by_category(category)
        }
        None => registry::all().iter().collect(),
    };

    for def in definitions {
        let children = match def.max_children {
            Some(max) if max == def.min_children => max.to_string(),
            Some(max) => format!("{}..={}", def.min_children, max),
            None => format!("{}+", def.min_children),
        };
        println!(
            "{:<22} {:<10} children={}",
            def.node_type,
            def.category.as_str(),
            children
        );
        for param in def.params {
            let options = match param.kind {
                ParamKind::Select(options) => format!(" [{}]", options.join("|")),
                _ => String::new(),
            };
            println!("    {} = {}{}", param.name, param.default.to_value(), options);
        }
    }
    Ok(())
}
