//! Weighted fusion of the per-metric similarities into one compatibility score

use crate::io::configuration::{
    DEFAULT_CNN_WEIGHT, DEFAULT_COLOR_WEIGHT, DEFAULT_GABOR_WEIGHT, WEIGHT_SUM_TOLERANCE,
};
use crate::io::error::{Result, invalid_parameter};
use crate::model::features::BorderFeatureSet;
use crate::scoring::metrics::{
    Calibration, color_similarity, embedding_similarity, texture_similarity,
};
use serde::{Deserialize, Serialize};

/// Caller-supplied weight of each metric in the combined score
///
/// Weights are not required to sum to 1, but `combined` only stays in
/// [0, 1] when they do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    /// Colour histogram weight
    pub color: f64,
    /// Gabor texture weight
    pub gabor: f64,
    /// CNN embedding weight
    pub cnn: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR_WEIGHT,
            gabor: DEFAULT_GABOR_WEIGHT,
            cnn: DEFAULT_CNN_WEIGHT,
        }
    }
}

impl MetricWeights {
    /// Create a weight set
    pub const fn new(color: f64, gabor: f64, cnn: f64) -> Self {
        Self { color, gabor, cnn }
    }

    /// Sum of the three weights
    pub fn sum(&self) -> f64 {
        self.color + self.gabor + self.cnn
    }

    /// Whether the weights sum to 1 within tolerance
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    /// Check that every weight is finite and non-negative
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error naming the first offending weight
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [
            ("weights.color", self.color),
            ("weights.gabor", self.gabor),
            ("weights.cnn", self.cnn),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &"must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }
}

/// Per-metric similarities of one border pair and their weighted combination
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompatibilityScore {
    /// Weighted combination of the three similarities
    pub combined: f64,
    /// Colour histogram similarity
    pub color: f64,
    /// Gabor texture similarity
    pub gabor: f64,
    /// CNN embedding similarity
    pub cnn: f64,
}

impl CompatibilityScore {
    /// Combine three similarities with `weights`
    pub fn fuse(color: f64, gabor: f64, cnn: f64, weights: &MetricWeights) -> Self {
        Self {
            combined: weights.color * color + weights.gabor * gabor + weights.cnn * cnn,
            color,
            gabor,
            cnn,
        }
    }
}

/// Scores border pairs under one fixed weighting, layer choice and calibration
#[derive(Debug, Clone, Copy)]
pub struct BorderScorer<'a> {
    weights: MetricWeights,
    layer_name: &'a str,
    calibration: Calibration,
}

impl<'a> BorderScorer<'a> {
    /// Create a scorer comparing embeddings at `layer_name`
    pub const fn new(weights: MetricWeights, layer_name: &'a str, calibration: Calibration) -> Self {
        Self {
            weights,
            layer_name,
            calibration,
        }
    }

    /// Weights applied by this scorer
    pub const fn weights(&self) -> &MetricWeights {
        &self.weights
    }

    /// CNN layer compared by this scorer
    pub const fn layer_name(&self) -> &'a str {
        self.layer_name
    }

    /// Compatibility of border `a` with border `b`
    pub fn score(&self, a: &BorderFeatureSet, b: &BorderFeatureSet) -> CompatibilityScore {
        CompatibilityScore::fuse(
            color_similarity(a, b, &self.calibration),
            texture_similarity(a, b, &self.calibration),
            embedding_similarity(a, b, self.layer_name),
            &self.weights,
        )
    }
}
