//! One adjacency run: validate, compare, summarize, prune

use crate::algorithm::comparator::{AdjacencyBuilder, AdjacencyEntry, expected_entry_count};
use crate::analysis::ranking::TopKPruner;
use crate::analysis::statistics::AdjacencyStatistics;
use crate::io::configuration::{DEFAULT_CNN_LAYER, DEFAULT_TOP_K};
use crate::io::error::{Result, invalid_parameter};
use crate::model::features::TileFeatures;
use crate::scoring::fusion::{BorderScorer, MetricWeights};
use crate::scoring::metrics::Calibration;
use std::time::Instant;

/// Parameters of one adjacency run
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Metric weights for score fusion
    pub weights: MetricWeights,
    /// CNN layer whose embeddings are compared
    pub cnn_layer: String,
    /// Entries retained per anchor
    pub top_k: usize,
    /// Lowest `combined` score retained, if any
    pub min_score: Option<f64>,
    /// Distance calibration for colour and texture
    pub calibration: Calibration,
    /// Whether anchor groups are compared in parallel
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            cnn_layer: DEFAULT_CNN_LAYER.to_string(),
            top_k: DEFAULT_TOP_K,
            min_score: None,
            calibration: Calibration::default(),
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Check weights, calibration and layer name before any comparison work
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if a weight or calibration distance
    /// is negative or non-finite, the minimum score is not finite, or the
    /// layer name is blank
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.calibration.validate()?;
        if let Some(min_score) = self.min_score
            && !min_score.is_finite()
        {
            return Err(invalid_parameter("min_score", &min_score, &"must be finite"));
        }
        if self.cnn_layer.trim().is_empty() {
            return Err(invalid_parameter(
                "cnn_layer",
                &self.cnn_layer,
                &"must name a CNN layer",
            ));
        }
        Ok(())
    }
}

/// Result of one run: every comparison, the pruned ranking and its summary
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyOutcome {
    /// Every entry, in enumeration order
    pub full: Vec<AdjacencyEntry>,
    /// Top-K entries per anchor at or above the minimum score, sorted by descending `combined`
    pub pruned: Vec<AdjacencyEntry>,
    /// Statistics over `full`
    pub statistics: AdjacencyStatistics,
}

/// Stateless adjacency engine
///
/// Holds only configuration; each call works on caller-supplied features and
/// returns a self-contained outcome.
#[derive(Debug, Clone)]
pub struct AdjacencyEngine {
    config: EngineConfig,
}

impl AdjacencyEngine {
    /// Create an engine after validating its configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        if !config.weights.is_normalized() {
            tracing::warn!(
                sum = config.weights.sum(),
                "metric weights do not sum to 1; combined scores may leave [0, 1]"
            );
        }
        Ok(Self { config })
    }

    /// Configuration of this engine
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline over `tiles`
    pub fn run(&self, tiles: &[TileFeatures]) -> AdjacencyOutcome {
        self.run_with_progress(tiles, || {})
    }

    /// Run the full pipeline, calling `on_anchor` as each anchor group finishes
    pub fn run_with_progress<F>(&self, tiles: &[TileFeatures], on_anchor: F) -> AdjacencyOutcome
    where
        F: Fn() + Sync,
    {
        let start = Instant::now();
        tracing::debug!(
            tiles = tiles.len(),
            cnn_layer = %self.config.cnn_layer,
            top_k = self.config.top_k,
            min_score = ?self.config.min_score,
            parallel = self.config.parallel,
            "computing adjacency"
        );

        if tiles.len() > 1 && !tiles.iter().any(|tile| tile.has_layer(&self.config.cnn_layer)) {
            tracing::warn!(
                cnn_layer = %self.config.cnn_layer,
                "no tile carries the requested CNN layer; embedding similarity is 0 for every pair"
            );
        }

        let scorer = BorderScorer::new(
            self.config.weights,
            &self.config.cnn_layer,
            self.config.calibration,
        );
        let full = AdjacencyBuilder::new(scorer)
            .with_parallelism(self.config.parallel)
            .build_with_progress(tiles, on_anchor);
        debug_assert_eq!(full.len(), expected_entry_count(tiles.len()));

        let pruned = TopKPruner::new(self.config.top_k)
            .with_min_score(self.config.min_score)
            .prune_slice(&full);
        let statistics = AdjacencyStatistics::summarize(&full, pruned.len());

        tracing::info!(
            tiles = tiles.len(),
            comparisons = full.len(),
            retained = pruned.len(),
            elapsed = ?start.elapsed(),
            "adjacency computed"
        );

        AdjacencyOutcome {
            full,
            pruned,
            statistics,
        }
    }
}
