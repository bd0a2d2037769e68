//! Rotation-aware pairwise border comparison
//!
//! Every anchor `(tileA, rotationA, borderA)` is compared against every other
//! tile under each of its four rotations. The facing border of B follows from
//! `borderA` and `rotationB` alone, so an anchor yields `4 · (n − 1)` entries
//! and a full run yields `n · (n − 1) · 64`.

use crate::model::features::TileFeatures;
use crate::model::orientation::{Border, Rotation, opposite_border};
use crate::scoring::fusion::{BorderScorer, CompatibilityScore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// The `(tile, rotation, border)` whose candidate matches are ranked together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorKey {
    /// Tile position in the input set
    pub tile: usize,
    /// Hypothetical rotation of the tile
    pub rotation: Rotation,
    /// Border of the rotated tile
    pub border: Border,
}

impl AnchorKey {
    /// Create an anchor key
    pub const fn new(tile: usize, rotation: Rotation, border: Border) -> Self {
        Self {
            tile,
            rotation,
            border,
        }
    }
}

/// One scored candidate pairing of a border of A with the facing border of B
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjacencyEntry {
    /// Anchor tile
    pub tile_a: usize,
    /// Rotation of the anchor tile
    pub rotation_a: Rotation,
    /// Border of the anchor tile
    pub border_a: Border,
    /// Candidate tile
    pub tile_b: usize,
    /// Rotation of the candidate tile
    pub rotation_b: Rotation,
    /// Border of the candidate tile facing `border_a`
    pub border_b: Border,
    /// Fused and per-metric similarities
    pub compatibility_score: CompatibilityScore,
}

impl AdjacencyEntry {
    /// Anchor this entry ranks under
    pub const fn anchor(&self) -> AnchorKey {
        AnchorKey::new(self.tile_a, self.rotation_a, self.border_a)
    }

    /// Fused score used for ranking
    pub const fn combined(&self) -> f64 {
        self.compatibility_score.combined
    }
}

/// Number of entries a full comparison of `tile_count` tiles produces
pub const fn expected_entry_count(tile_count: usize) -> usize {
    tile_count * tile_count.saturating_sub(1) * 64
}

/// Number of anchor groups `tile_count` tiles produce
pub const fn anchor_count(tile_count: usize) -> usize {
    tile_count * Rotation::ALL.len() * Border::ALL.len()
}

/// Anchors of `tile_count` tiles in enumeration order (tile, rotation, border)
pub fn anchors(tile_count: usize) -> Vec<AnchorKey> {
    let mut keys = Vec::with_capacity(anchor_count(tile_count));
    for tile in 0..tile_count {
        for rotation in Rotation::ALL {
            for border in Border::ALL {
                keys.push(AnchorKey::new(tile, rotation, border));
            }
        }
    }
    keys
}

/// Builds the full adjacency list for a tile set
pub struct AdjacencyBuilder<'a> {
    scorer: BorderScorer<'a>,
    parallel: bool,
}

impl<'a> AdjacencyBuilder<'a> {
    /// Create a builder; anchor groups are compared in parallel by default
    pub const fn new(scorer: BorderScorer<'a>) -> Self {
        Self {
            scorer,
            parallel: true,
        }
    }

    /// Enable or disable parallel comparison of anchor groups
    #[must_use]
    pub const fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Scorer used for every border pair
    pub const fn scorer(&self) -> &BorderScorer<'a> {
        &self.scorer
    }

    /// Compare one anchor against every other tile under every rotation
    ///
    /// Entries come out ordered by candidate tile, then candidate rotation.
    /// An anchor whose tile is outside `tiles` yields nothing.
    pub fn compare_anchor(&self, tiles: &[TileFeatures], anchor: AnchorKey) -> Vec<AdjacencyEntry> {
        let Some(tile_a) = tiles.get(anchor.tile) else {
            return Vec::new();
        };
        let border_features_a = tile_a.border(anchor.rotation, anchor.border);

        let mut entries = Vec::with_capacity(tiles.len().saturating_sub(1) * 4);
        for (index_b, tile_b) in tiles.iter().enumerate() {
            if index_b == anchor.tile {
                continue;
            }

            for rotation_b in Rotation::ALL {
                let border_b = opposite_border(anchor.border, rotation_b);
                let score = self
                    .scorer
                    .score(border_features_a, tile_b.border(rotation_b, border_b));

                entries.push(AdjacencyEntry {
                    tile_a: anchor.tile,
                    rotation_a: anchor.rotation,
                    border_a: anchor.border,
                    tile_b: index_b,
                    rotation_b,
                    border_b,
                    compatibility_score: score,
                });
            }
        }
        entries
    }

    /// Compare every anchor, returning entries in enumeration order
    pub fn build(&self, tiles: &[TileFeatures]) -> Vec<AdjacencyEntry> {
        self.build_with_progress(tiles, || {})
    }

    /// Compare every anchor, calling `on_anchor` once per finished anchor group
    ///
    /// Anchor groups share no state, so they are scored independently and
    /// concatenated in enumeration order. Parallel and serial runs produce
    /// identical output.
    pub fn build_with_progress<F>(&self, tiles: &[TileFeatures], on_anchor: F) -> Vec<AdjacencyEntry>
    where
        F: Fn() + Sync,
    {
        if tiles.len() < 2 {
            return Vec::new();
        }

        let keys = anchors(tiles.len());
        let compare = |anchor: &AnchorKey| {
            let entries = self.compare_anchor(tiles, *anchor);
            on_anchor();
            entries
        };

        let groups: Vec<Vec<AdjacencyEntry>> = if self.parallel {
            keys.par_iter().map(compare).collect()
        } else {
            keys.iter().map(compare).collect()
        };

        let mut entries = Vec::with_capacity(expected_entry_count(tiles.len()));
        for group in groups {
            entries.extend(group);
        }
        entries
    }
}
