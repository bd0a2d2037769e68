//! Numeric primitives shared by the similarity metrics

/// Histogram, vector and cosine distances
pub mod distance;
