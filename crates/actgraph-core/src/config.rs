use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GraphError;

/// Top-level `actgraph.toml` contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActgraphConfig {
    #[serde(default)]
    pub repair: RepairConfig,
    #[serde(default)]
    pub cost: CostConfig,
}

/// Tuning for [`crate::graph::ValueGraph::force_reachability`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Chance that a given orphan pair is linked during a pass.
    #[serde(default = "default_edge_probability")]
    pub edge_probability: f64,
    /// Give up after this many passes. `None` repairs until fully reachable.
    #[serde(default)]
    pub max_passes: Option<usize>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            edge_probability: default_edge_probability(),
            max_passes: None,
        }
    }
}

impl RepairConfig {
    #[must_use]
    pub const fn new(edge_probability: f64) -> Self {
        Self {
            edge_probability,
            max_passes: None,
        }
    }

    #[must_use]
    pub const fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    /// Check that `edge_probability` is a number in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidProbability`] otherwise.
    pub fn validate(&self) -> Result<(), GraphError> {
        if (0.0..=1.0).contains(&self.edge_probability) {
            Ok(())
        } else {
            Err(GraphError::InvalidProbability(self.edge_probability))
        }
    }
}

/// Cost range for edges minted during repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    #[serde(default = "default_min_cost")]
    pub min: f64,
    #[serde(default = "default_max_cost")]
    pub max: f64,
}

impl CostConfig {
    /// Check that both bounds are finite and `min <= max`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidCostRange`] otherwise.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(GraphError::InvalidCostRange {
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Half-open range costs are drawn from.
    #[must_use]
    pub const fn range(&self) -> std::ops::Range<f64> {
        self.min..self.max
    }
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            min: default_min_cost(),
            max: default_max_cost(),
        }
    }
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<ActgraphConfig> {
    if !path.exists() {
        return Ok(ActgraphConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ActgraphConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_edge_probability() -> f64 {
    0.1
}

const fn default_min_cost() -> f64 {
    1.0
}

const fn default_max_cost() -> f64 {
    10.0
}
