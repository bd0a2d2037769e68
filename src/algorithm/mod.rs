/// Rotation-aware pairwise border comparison and anchor enumeration
pub mod comparator;
/// Run orchestration: configuration, comparison, pruning and statistics
pub mod engine;
