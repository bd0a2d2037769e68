//! Lookups over a computed adjacency list
//!
//! These answer the questions a placement solver asks of the ranking: the
//! single best partner of an anchor, the top few partners of one anchor, the
//! partners clearing a score threshold, and a dense tile-by-tile view of one
//! orientation pairing.

use crate::algorithm::comparator::{AdjacencyEntry, AnchorKey};
use crate::analysis::ranking::{meets_threshold, sort_by_combined_desc};
use crate::model::orientation::{Border, Rotation};
use ndarray::Array2;
use std::collections::BTreeMap;

/// Best entry of every anchor present in `entries`, first in input order on ties
pub fn best_matches(entries: &[AdjacencyEntry]) -> BTreeMap<AnchorKey, AdjacencyEntry> {
    let mut best: BTreeMap<AnchorKey, AdjacencyEntry> = BTreeMap::new();
    for entry in entries {
        best.entry(entry.anchor())
            .and_modify(|current| {
                if entry.combined() > current.combined() {
                    *current = *entry;
                }
            })
            .or_insert(*entry);
    }
    best
}

/// Up to `k` entries of one anchor, descending by `combined`, stable on ties
pub fn top_matches_for(
    entries: &[AdjacencyEntry],
    anchor: AnchorKey,
    k: usize,
) -> Vec<AdjacencyEntry> {
    let mut matches: Vec<AdjacencyEntry> = entries
        .iter()
        .filter(|entry| entry.anchor() == anchor)
        .copied()
        .collect();
    sort_by_combined_desc(&mut matches);
    matches.truncate(k);
    matches
}

/// Every entry of one anchor scoring at least `min_score`, descending, stable on ties
pub fn matches_above(
    entries: &[AdjacencyEntry],
    anchor: AnchorKey,
    min_score: f64,
) -> Vec<AdjacencyEntry> {
    let mut matches: Vec<AdjacencyEntry> = entries
        .iter()
        .filter(|entry| entry.anchor() == anchor && meets_threshold(entry, Some(min_score)))
        .copied()
        .collect();
    sort_by_combined_desc(&mut matches);
    matches
}

/// Dense score matrix for one orientation pairing
///
/// Cell `(a, b)` holds the `combined` score of anchor `(a, rotation_a,
/// border_a)` against tile `b` at `rotation_b`. The diagonal and pairs absent
/// from `entries` hold negative infinity, so they never win a maximum.
pub fn border_pair_matrix(
    entries: &[AdjacencyEntry],
    tile_count: usize,
    border_a: Border,
    rotation_a: Rotation,
    rotation_b: Rotation,
) -> Array2<f64> {
    let mut matrix = Array2::from_elem((tile_count, tile_count), f64::NEG_INFINITY);

    for entry in entries.iter().filter(|entry| {
        entry.border_a == border_a && entry.rotation_a == rotation_a && entry.rotation_b == rotation_b
    }) {
        if entry.tile_a == entry.tile_b {
            continue;
        }
        if let Some(cell) = matrix.get_mut([entry.tile_a, entry.tile_b]) {
            *cell = entry.combined();
        }
    }

    matrix
}
