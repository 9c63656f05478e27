//! Simulation settings, loaded from `bt-sim.yaml`.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "bt-sim.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Maximum number of ticks to run
    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Seconds per tick
    #[serde(default = "default_delta_time")]
    pub delta_time: f32,

    /// RNG seed for random composites and conditions; unset seeds from the clock
    pub seed: Option<u64>,

    /// Acting entity; unset picks the first entity in the world
    pub agent: Option<String>,

    /// Stop at the first tick that returns something other than `running`
    pub until_done: bool,
}

fn default_ticks() -> u64 {
    100
}
fn default_delta_time() -> f32 {
    1.0 / 60.0
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            delta_time: default_delta_time(),
            seed: None,
            agent: None,
            until_done: false,
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// `explicit` if given, else `bt-sim.yaml` in `dir` if present, else defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            tracing::debug!(path = %path.display(), "using config file");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
