//! Ranking and inspection of computed adjacency lists

/// Lookups answering per-anchor and per-orientation questions
pub mod query;
/// Per-anchor top-K pruning
pub mod ranking;
/// Distribution summary over all comparisons
pub mod statistics;
