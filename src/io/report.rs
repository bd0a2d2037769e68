//! JSON response envelope written for each processed request

use crate::algorithm::comparator::AdjacencyEntry;
use crate::algorithm::engine::{AdjacencyOutcome, EngineConfig};
use crate::analysis::query::best_matches;
use crate::analysis::statistics::AdjacencyStatistics;
use crate::io::error::{AdjacencyError, Result};
use crate::scoring::fusion::MetricWeights;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Status reported for a completed run
pub const STATUS_SUCCESS: &str = "success";

/// Which entries a report carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    /// Emit every comparison instead of the pruned ranking
    pub full: bool,
    /// Add the best entry of every anchor
    pub best_matches: bool,
}

/// Response document for one adjacency run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjacencyReport {
    /// Always "success" for a written report
    pub status: String,
    /// Declared grid side length
    pub grid_size: usize,
    /// Number of tiles compared
    pub total_tiles: usize,
    /// Weights used for fusion
    pub weights: MetricWeights,
    /// CNN layer compared
    pub cnn_layer: String,
    /// Entries retained per anchor
    pub top_k: usize,
    /// Lowest combined score retained, when a threshold was set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    /// Pruned ranking, or every comparison when requested
    pub adjacency_matrix: Vec<AdjacencyEntry>,
    /// Summary over every comparison
    pub statistics: AdjacencyStatistics,
    /// Best entry of every anchor, in anchor order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_matches: Option<Vec<AdjacencyEntry>>,
}

impl AdjacencyReport {
    /// Assemble a report from a finished run
    pub fn from_outcome(
        grid_size: usize,
        total_tiles: usize,
        config: &EngineConfig,
        outcome: AdjacencyOutcome,
        options: ReportOptions,
    ) -> Self {
        let best = options
            .best_matches
            .then(|| best_matches(&outcome.full).into_values().collect());

        let adjacency_matrix = if options.full {
            outcome.full
        } else {
            outcome.pruned
        };

        Self {
            status: STATUS_SUCCESS.to_string(),
            grid_size,
            total_tiles,
            weights: config.weights,
            cnn_layer: config.cnn_layer.clone(),
            top_k: config.top_k,
            min_score: config.min_score,
            adjacency_matrix,
            statistics: outcome.statistics,
            best_matches: best,
        }
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as JSON to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|e| AdjacencyError::FileSystem {
            path: path.to_path_buf(),
            operation: "write report",
            source: e,
        })
    }
}
