//! Distance and similarity primitives over plain float vectors
//!
//! Functions that need equal-length inputs return `None` (or a 0.0 similarity)
//! instead of panicking, so a malformed payload only affects its own metric.

use crate::io::configuration::CHI_SQUARE_EPSILON;
use ndarray::ArrayView1;

/// Chi-square distance `Σ (h1ᵢ − h2ᵢ)² / (h1ᵢ + h2ᵢ + ε)` between two histograms
///
/// Returns `None` when the lengths differ. Zero means identical.
pub fn chi_square(h1: &[f64], h2: &[f64]) -> Option<f64> {
    if h1.len() != h2.len() {
        return None;
    }

    let h1 = ArrayView1::from(h1);
    let h2 = ArrayView1::from(h2);
    let numerator = (&h1 - &h2).mapv(|d| d * d);
    let denominator = (&h1 + &h2).mapv(|s| s + CHI_SQUARE_EPSILON);

    Some((numerator / denominator).sum())
}

/// Euclidean (L2) norm of `v1 − v2`
///
/// Returns `None` when the lengths differ.
pub fn euclidean(v1: &[f64], v2: &[f64]) -> Option<f64> {
    if v1.len() != v2.len() {
        return None;
    }

    let diff = &ArrayView1::from(v1) - &ArrayView1::from(v2);
    Some(diff.dot(&diff).sqrt())
}

/// Cosine similarity clamped to [0, 1]
///
/// Opposed directions clamp to 0. Empty, zero-norm or length-mismatched
/// inputs have no direction and score 0.0.
pub fn cosine_similarity(v1: &[f64], v2: &[f64]) -> f64 {
    if v1.is_empty() || v1.len() != v2.len() {
        return 0.0;
    }

    let a = ArrayView1::from(v1);
    let b = ArrayView1::from(v2);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = a.dot(&b) / (norm_a * norm_b);
    if similarity.is_nan() {
        return 0.0;
    }
    similarity.clamp(0.0, 1.0)
}

/// Map a non-negative distance onto a [0, 1] similarity
///
/// `1 − min(distance / max_distance, 1)`, floored at 0. A zero `max_distance`
/// admits no distance at all, so every pair counts as identical (1.0).
pub fn normalize_to_similarity(distance: f64, max_distance: f64) -> f64 {
    if max_distance == 0.0 {
        return 1.0;
    }

    (1.0 - (distance / max_distance).min(1.0)).max(0.0)
}
