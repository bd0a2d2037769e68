//! Per-metric border similarities: colour, texture and embedding
//!
//! Every function here returns a similarity in [0, 1]. Missing or malformed
//! payloads score 0.0 for their metric only.

use crate::io::configuration::{COLOR_MAX_DISTANCE, GABOR_MAX_DISTANCE};
use crate::io::error::{Result, invalid_parameter};
use crate::math::distance::{chi_square, cosine_similarity, euclidean, normalize_to_similarity};
use crate::model::features::{BorderFeatureSet, ColorHistogram, GaborResponse};
use serde::{Deserialize, Serialize};

/// Distances at which each metric's similarity reaches zero
///
/// Empirical constants for the extractors in use; tune per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calibration {
    /// Chi-square distance mapped to zero colour similarity
    pub color_max_distance: f64,
    /// Gabor descriptor distance mapped to zero texture similarity
    pub gabor_max_distance: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            color_max_distance: COLOR_MAX_DISTANCE,
            gabor_max_distance: GABOR_MAX_DISTANCE,
        }
    }
}

impl Calibration {
    /// Check that both distances are finite and non-negative
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error naming the offending distance
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [
            ("color_max_distance", self.color_max_distance),
            ("gabor_max_distance", self.gabor_max_distance),
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

/// Chi-square distance averaged over the r, g, b channels
///
/// `None` when either histogram is empty or the bin counts disagree.
pub fn color_distance(a: &ColorHistogram, b: &ColorHistogram) -> Option<f64> {
    let bins = a.bins()?;
    if b.bins() != Some(bins) {
        return None;
    }

    let mut total = 0.0;
    for (h1, h2) in a.channels().into_iter().zip(b.channels()) {
        total += chi_square(h1, h2)?;
    }
    Some(total / 3.0)
}

/// Colour histogram similarity of two borders
pub fn color_similarity(a: &BorderFeatureSet, b: &BorderFeatureSet, calibration: &Calibration) -> f64 {
    match (&a.histogram, &b.histogram) {
        (Some(ha), Some(hb)) => color_distance(ha, hb).map_or(0.0, |distance| {
            normalize_to_similarity(distance, calibration.color_max_distance)
        }),
        _ => 0.0,
    }
}

/// Flatten Gabor records into `[mean, std, energy]` triples, keeping filter order
pub fn gabor_vector(responses: &[GaborResponse]) -> Vec<f64> {
    responses
        .iter()
        .flat_map(GaborResponse::descriptor)
        .collect()
}

/// L2 distance between two flattened Gabor descriptor vectors
///
/// `None` when either side is empty or the filter counts disagree.
pub fn texture_distance(a: &[GaborResponse], b: &[GaborResponse]) -> Option<f64> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }
    euclidean(&gabor_vector(a), &gabor_vector(b))
}

/// Gabor texture similarity of two borders
pub fn texture_similarity(
    a: &BorderFeatureSet,
    b: &BorderFeatureSet,
    calibration: &Calibration,
) -> f64 {
    texture_distance(&a.gabor, &b.gabor)
        .filter(|distance| distance.is_finite())
        .map_or(0.0, |distance| {
            normalize_to_similarity(distance, calibration.gabor_max_distance)
        })
}

/// CNN embedding similarity of two borders at the named layer
///
/// 0.0 when either side lacks the layer.
pub fn embedding_similarity(a: &BorderFeatureSet, b: &BorderFeatureSet, layer_name: &str) -> f64 {
    match (a.embedding(layer_name), b.embedding(layer_name)) {
        (Some(va), Some(vb)) => cosine_similarity(va, vb),
        _ => 0.0,
    }
}
