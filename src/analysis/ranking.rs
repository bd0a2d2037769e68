//! Per-anchor top-K pruning of adjacency entries

use crate::algorithm::comparator::{AdjacencyEntry, AnchorKey};
use std::collections::HashMap;

/// Sort entries by descending `combined`, keeping enumeration order on ties
pub fn sort_by_combined_desc(entries: &mut [AdjacencyEntry]) {
    entries.sort_by(|a, b| b.combined().total_cmp(&a.combined()));
}

/// Keeps the K best-scoring entries of every anchor
///
/// The whole list is sorted once, then a per-anchor counter caps emission.
/// Because the sort is global and stable, the retained entries are the true
/// top K of each anchor regardless of input order, and ties fall back to
/// enumeration order. An optional minimum score drops weaker candidates
/// before they count towards K.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopKPruner {
    k: usize,
    min_score: Option<f64>,
}

impl TopKPruner {
    /// Create a pruner keeping `k` entries per anchor
    pub const fn new(k: usize) -> Self {
        Self { k, min_score: None }
    }

    /// Also drop entries whose `combined` score is below `min_score`
    pub const fn with_min_score(mut self, min_score: Option<f64>) -> Self {
        self.min_score = min_score;
        self
    }

    /// Lowest `combined` score retained, if any
    pub const fn min_score(&self) -> Option<f64> {
        self.min_score
    }

    /// Create a pruner from a signed request value; non-positive values keep nothing
    pub fn from_signed(k: i64) -> Self {
        Self::new(usize::try_from(k).unwrap_or(0))
    }

    /// Entries kept per anchor
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Globally sorted entries, truncated to K per anchor
    pub fn prune(&self, mut entries: Vec<AdjacencyEntry>) -> Vec<AdjacencyEntry> {
        if self.k == 0 {
            return Vec::new();
        }

        sort_by_combined_desc(&mut entries);

        let mut emitted: HashMap<AnchorKey, usize> = HashMap::new();
        entries.retain(|entry| {
            if !meets_threshold(entry, self.min_score) {
                return false;
            }
            let count = emitted.entry(entry.anchor()).or_insert(0);
            if *count < self.k {
                *count += 1;
                true
            } else {
                false
            }
        });
        entries
    }

    /// Prune a borrowed list, leaving the original untouched
    pub fn prune_slice(&self, entries: &[AdjacencyEntry]) -> Vec<AdjacencyEntry> {
        if self.k == 0 {
            return Vec::new();
        }
        self.prune(entries.to_vec())
    }
}

/// Whether `entry` scores at least `min_score`; no threshold accepts everything
pub fn meets_threshold(entry: &AdjacencyEntry, min_score: Option<f64>) -> bool {
    min_score.is_none_or(|min| entry.combined() >= min)
}
