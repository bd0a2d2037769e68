//! Tests for best-match, per-anchor and matrix lookups

#[cfg(test)]
mod tests {
    use crate::fixtures::random_tiles;
    use tileseam::algorithm::comparator::{AdjacencyBuilder, AdjacencyEntry, AnchorKey, anchors};
    use tileseam::analysis::query::{best_matches, border_pair_matrix, matches_above, top_matches_for};
    use tileseam::analysis::ranking::TopKPruner;
    use tileseam::io::configuration::DEFAULT_CNN_LAYER;
    use tileseam::model::orientation::{Border, Rotation};
    use tileseam::scoring::fusion::{BorderScorer, MetricWeights};
    use tileseam::scoring::metrics::Calibration;

    fn full_list(tiles: usize, seed: u64) -> Vec<AdjacencyEntry> {
        let scorer = BorderScorer::new(
            MetricWeights::default(),
            DEFAULT_CNN_LAYER,
            Calibration::default(),
        );
        AdjacencyBuilder::new(scorer).build(&random_tiles(tiles, seed))
    }

    // Tests best matches agree with top-1 pruning for every anchor
    // Verified by keeping the last maximum
    #[test]
    fn test_best_matches_match_top_one() {
        let entries = full_list(4, 17);
        let best = best_matches(&entries);
        let top_one = TopKPruner::new(1).prune_slice(&entries);

        assert_eq!(best.len(), anchors(4).len());
        for entry in &top_one {
            assert_eq!(best.get(&entry.anchor()), Some(entry));
        }
    }

    // Tests best matches of an empty list is empty
    // Verified by inserting a placeholder entry
    #[test]
    fn test_best_matches_empty() {
        assert!(best_matches(&[]).is_empty());
    }

    // Tests per-anchor top matches are sorted, capped and scoped
    // Verified by skipping the anchor filter
    #[test]
    fn test_top_matches_for() {
        let entries = full_list(3, 23);
        let anchor = AnchorKey::new(2, Rotation::Deg90, Border::Bottom);
        let top = top_matches_for(&entries, anchor, 5);

        assert_eq!(top.len(), 5);
        assert!(top.iter().all(|entry| entry.anchor() == anchor));
        assert!(
            top.windows(2)
                .all(|pair| pair.first().map(AdjacencyEntry::combined)
                    >= pair.get(1).map(AdjacencyEntry::combined))
        );

        let all = top_matches_for(&entries, anchor, 100);
        assert_eq!(all.len(), 8);
        assert_eq!(all.get(..5), Some(top.as_slice()));
        assert!(top_matches_for(&entries, anchor, 0).is_empty());
    }

    // Tests threshold matches keep scores equal to the threshold, best first
    // Verified by comparing with a strict inequality
    #[test]
    fn test_matches_above_boundary() {
        let entries = full_list(3, 23);
        let anchor = AnchorKey::new(1, Rotation::Deg180, Border::Left);
        let ranked = top_matches_for(&entries, anchor, usize::MAX);
        let threshold = ranked.get(2).map(AdjacencyEntry::combined).unwrap();

        let above = matches_above(&entries, anchor, threshold);
        assert!(above.len() >= 3);
        assert_eq!(ranked.get(..above.len()), Some(above.as_slice()));
        assert!(above.iter().all(|entry| entry.anchor() == anchor && entry.combined() >= threshold));
        assert!(above.iter().any(|entry| entry.combined() == threshold));
        assert!(
            ranked
                .iter()
                .skip(above.len())
                .all(|entry| entry.combined() < threshold)
        );
    }

    // Tests threshold matches can be empty
    // Verified by falling back to the best entry when nothing qualifies
    #[test]
    fn test_matches_above_empty() {
        let entries = full_list(2, 5);
        let anchor = AnchorKey::new(0, Rotation::Deg0, Border::Top);

        assert!(matches_above(&entries, anchor, 1.5).is_empty());
        assert!(matches_above(&entries, AnchorKey::new(7, Rotation::Deg0, Border::Top), 0.0).is_empty());
        assert!(matches_above(&[], anchor, 0.0).is_empty());
        assert_eq!(matches_above(&entries, anchor, 0.0).len(), 4);
    }

    // Tests the matrix holds combined scores off the diagonal only
    // Verified by filling the diagonal with zero
    #[test]
    fn test_border_pair_matrix() {
        let entries = full_list(3, 31);
        let matrix = border_pair_matrix(
            &entries,
            3,
            Border::Right,
            Rotation::Deg0,
            Rotation::Deg270,
        );

        assert_eq!(matrix.dim(), (3, 3));
        for a in 0..3 {
            assert_eq!(matrix.get([a, a]), Some(&f64::NEG_INFINITY));
        }

        for entry in entries.iter().filter(|entry| {
            entry.border_a == Border::Right
                && entry.rotation_a == Rotation::Deg0
                && entry.rotation_b == Rotation::Deg270
        }) {
            assert_eq!(entry.border_b, Border::Top);
            assert_eq!(matrix.get([entry.tile_a, entry.tile_b]), Some(&entry.combined()));
        }
    }

    // Tests pairs missing from the list stay at negative infinity
    // Verified by defaulting cells to zero
    #[test]
    fn test_border_pair_matrix_missing_pairs() {
        let matrix = border_pair_matrix(&[], 2, Border::Top, Rotation::Deg0, Rotation::Deg0);
        assert!(matrix.iter().all(|cell| *cell == f64::NEG_INFINITY));
    }
}
