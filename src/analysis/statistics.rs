//! Summary statistics over the unpruned adjacency list

use crate::algorithm::comparator::AdjacencyEntry;
use serde::{Deserialize, Serialize};

/// Distribution of `combined` over every comparison, plus the pruned count
///
/// An empty comparison set reports zeros and no best match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjacencyStatistics {
    /// Number of entries before pruning
    pub total_comparisons: usize,
    /// Number of entries kept by pruning
    pub filtered_matches: usize,
    /// Mean `combined` score
    pub average_compatibility: f64,
    /// Lowest `combined` score
    pub min_compatibility: f64,
    /// Highest `combined` score
    pub max_compatibility: f64,
    /// Population standard deviation of `combined`
    pub std_compatibility: f64,
    /// Highest-scoring entry, first in input order on ties
    pub best_match: Option<AdjacencyEntry>,
}

impl AdjacencyStatistics {
    /// Summarize the full list and record how many entries survived pruning
    pub fn summarize(full: &[AdjacencyEntry], filtered_matches: usize) -> Self {
        let Some(first) = full.first() else {
            return Self {
                filtered_matches,
                ..Self::default()
            };
        };

        let count = full.len() as f64;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut best = first;

        for entry in full {
            let score = entry.combined();
            sum += score;
            min = min.min(score);
            max = max.max(score);
            if score > best.combined() {
                best = entry;
            }
        }

        let mean = sum / count;
        let variance = full
            .iter()
            .map(|entry| (entry.combined() - mean).powi(2))
            .sum::<f64>()
            / count;

        Self {
            total_comparisons: full.len(),
            filtered_matches,
            average_compatibility: mean,
            min_compatibility: min,
            max_compatibility: max,
            std_compatibility: variance.sqrt(),
            best_match: Some(*best),
        }
    }

    /// Whether no comparisons were made
    pub const fn is_empty(&self) -> bool {
        self.total_comparisons == 0
    }
}
