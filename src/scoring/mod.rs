/// Weighted combination of per-metric similarities
pub mod fusion;
/// Colour, texture and embedding similarity of two borders
pub mod metrics;
