//! JSON request envelope and its conversion into validated tile features
//!
//! The request mirrors what the feature-extraction service emits: a list of
//! tile records, each with string-keyed rotation maps holding per-border
//! histograms, Gabor responses and CNN layers. Structural problems are
//! rejected here, before any comparison runs. Missing or malformed per-border
//! payloads are passed through as absent and degrade their metric later.

use crate::algorithm::engine::EngineConfig;
use crate::analysis::ranking::TopKPruner;
use crate::io::configuration::{DEFAULT_CNN_LAYER, DEFAULT_TOP_K};
use crate::io::error::{AdjacencyError, Result, WithContext, invalid_shape};
use crate::model::features::{
    BorderFeatureSet, CnnLayer, ColorHistogram, GaborResponse, RotationBorders, TileFeatures,
};
use crate::model::orientation::{Border, Rotation};
use crate::scoring::fusion::MetricWeights;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// One value per border, any of which may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerBorder<T> {
    /// Upper edge value
    pub top: Option<T>,
    /// Right-hand edge value
    pub right: Option<T>,
    /// Lower edge value
    pub bottom: Option<T>,
    /// Left-hand edge value
    pub left: Option<T>,
}

impl<T> Default for PerBorder<T> {
    fn default() -> Self {
        Self {
            top: None,
            right: None,
            bottom: None,
            left: None,
        }
    }
}

impl<T> PerBorder<T> {
    /// Value for one border, if present
    pub const fn get(&self, border: Border) -> Option<&T> {
        match border {
            Border::Top => self.top.as_ref(),
            Border::Right => self.right.as_ref(),
            Border::Bottom => self.bottom.as_ref(),
            Border::Left => self.left.as_ref(),
        }
    }
}

/// Decode a per-border metric map, keeping only the payloads that decode
///
/// A map that is not an object, or a border payload of the wrong shape, reads
/// as absent so that only its own metric degrades.
fn lenient_per_border<'de, D, T>(deserializer: D) -> std::result::Result<PerBorder<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(PerBorder::default());
    };

    let decode = |border: Border| -> Option<T> {
        let payload = map.get(border.name())?;
        match T::deserialize(payload) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(border = border.name(), error = %e, "discarding malformed payload");
                None
            }
        }
    };

    Ok(PerBorder {
        top: decode(Border::Top),
        right: decode(Border::Right),
        bottom: decode(Border::Bottom),
        left: decode(Border::Left),
    })
}

/// Border features of one tile at one rotation, as sent on the wire
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationRecord {
    /// Colour histogram per border
    #[serde(default, deserialize_with = "lenient_per_border")]
    pub border_histograms: PerBorder<ColorHistogram>,
    /// Gabor responses per border
    #[serde(default, deserialize_with = "lenient_per_border")]
    pub border_gabor_features: PerBorder<Vec<GaborResponse>>,
    /// CNN layers per border
    #[serde(default, deserialize_with = "lenient_per_border")]
    pub border_cnn_features: PerBorder<Vec<CnnLayer>>,
}

impl RotationRecord {
    /// Gather the three payloads of one border
    pub fn border_features(&self, border: Border) -> BorderFeatureSet {
        BorderFeatureSet::new(
            self.border_histograms.get(border).cloned(),
            self.border_gabor_features
                .get(border)
                .cloned()
                .unwrap_or_default(),
            self.border_cnn_features
                .get(border)
                .cloned()
                .unwrap_or_default(),
        )
    }

    fn into_borders(self) -> RotationBorders {
        RotationBorders::from_fn(|border| self.border_features(border))
    }
}

/// One tile as sent on the wire
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRecord {
    /// Index of the tile in the unshuffled image
    #[serde(default)]
    pub source_index: usize,
    /// Position the tile was shuffled to
    #[serde(default)]
    pub dest_position: Option<usize>,
    /// Rotation applied while shuffling, for reference only
    #[serde(default)]
    pub shuffle_rotation: Option<u16>,
    /// Border features keyed by rotation angle ("0", "90", "180", "270")
    #[serde(default)]
    pub rotation_features: Option<BTreeMap<String, RotationRecord>>,
}

impl TileRecord {
    /// Validate the record and convert it into tile features
    ///
    /// # Errors
    ///
    /// Returns an error if the rotation map is absent, holds a key that is not
    /// a rotation, lacks one of the four rotations, or the shuffle rotation is
    /// not a quarter turn
    pub fn into_features(self, tile: usize) -> Result<TileFeatures> {
        if let Some(degrees) = self.shuffle_rotation {
            Rotation::try_from(degrees)
                .map_err(|_e| invalid_shape(&format!("shuffleRotation {degrees} is not a quarter turn")))
                .with_tile(tile)?;
        }

        let rotation_map = self
            .rotation_features
            .ok_or_else(|| invalid_shape(&"missing rotationFeatures"))
            .with_tile(tile)?;

        let mut by_rotation: [Option<RotationRecord>; 4] = [None, None, None, None];
        for (key, record) in rotation_map {
            let rotation = key
                .parse::<Rotation>()
                .map_err(|_e| invalid_shape(&format!("unexpected rotation key '{key}'")))
                .with_tile(tile)?;
            if let Some(slot) = by_rotation.get_mut(rotation.index()) {
                *slot = Some(record);
            }
        }

        let mut rotations = Vec::with_capacity(4);
        for (rotation, record) in Rotation::ALL.into_iter().zip(by_rotation) {
            let record = record.ok_or_else(|| AdjacencyError::MissingRotation {
                tile,
                rotation: rotation.to_string(),
            })?;
            rotations.push(record.into_borders());
        }

        let rotations: [RotationBorders; 4] = rotations
            .try_into()
            .map_err(|_e| invalid_shape(&"expected exactly four rotations"))
            .with_tile(tile)?;

        Ok(TileFeatures::new(self.source_index, rotations))
    }
}

/// Output of the feature-extraction step for a whole grid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramData {
    /// Side length of the square tile grid
    #[serde(default)]
    pub grid_size: Option<usize>,
    /// One record per tile
    #[serde(default)]
    pub results: Option<Vec<TileRecord>>,
}

/// A full adjacency request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjacencyRequest {
    /// Precomputed tile features
    #[serde(default)]
    pub histogram_data: Option<HistogramData>,
    /// Metric weights
    #[serde(default)]
    pub weights: MetricWeights,
    /// CNN layer to compare
    #[serde(default = "default_cnn_layer")]
    pub cnn_layer: String,
    /// Entries retained per anchor; non-positive values keep nothing
    #[serde(default = "default_top_k")]
    pub top_k: i64,
    /// Lowest combined score retained; absent keeps every ranked entry
    #[serde(default)]
    pub min_score: Option<f64>,
}

fn default_cnn_layer() -> String {
    DEFAULT_CNN_LAYER.to_string()
}

fn default_top_k() -> i64 {
    i64::try_from(DEFAULT_TOP_K).unwrap_or(i64::MAX)
}

impl Default for AdjacencyRequest {
    fn default() -> Self {
        Self {
            histogram_data: None,
            weights: MetricWeights::default(),
            cnn_layer: default_cnn_layer(),
            top_k: default_top_k(),
            min_score: None,
        }
    }
}

/// A validated request, ready for the engine
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyJob {
    /// Declared grid side length
    pub grid_size: usize,
    /// Validated tile features, in request order
    pub tiles: Vec<TileFeatures>,
    /// Engine configuration taken from the request
    pub config: EngineConfig,
}

impl AdjacencyRequest {
    /// Parse a request from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a well-formed request
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a request file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AdjacencyError::FileSystem {
            path: path.to_path_buf(),
            operation: "read request",
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| AdjacencyError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Validate the whole request and convert it into an engine job
    ///
    /// Fails fast: no tile is compared unless every tile converts.
    ///
    /// # Errors
    ///
    /// Returns an error if histogram data, results or grid size are missing,
    /// the tile count does not fill the grid, or any tile record is malformed
    pub fn into_job(self) -> Result<AdjacencyJob> {
        let histogram_data = self
            .histogram_data
            .ok_or_else(|| invalid_shape(&"missing histogramData"))?;
        let records = histogram_data
            .results
            .ok_or_else(|| invalid_shape(&"missing results"))?;
        let grid_size = histogram_data
            .grid_size
            .ok_or_else(|| invalid_shape(&"missing gridSize"))?;

        let expected = grid_size
            .checked_mul(grid_size)
            .ok_or_else(|| invalid_shape(&format!("gridSize {grid_size} is too large")))?;
        if records.len() != expected {
            return Err(AdjacencyError::GridSizeMismatch {
                grid_size,
                expected,
                found: records.len(),
            });
        }

        let tiles = records
            .into_iter()
            .enumerate()
            .map(|(tile, record)| record.into_features(tile))
            .collect::<Result<Vec<_>>>()?;

        let config = EngineConfig {
            weights: self.weights,
            cnn_layer: self.cnn_layer,
            top_k: TopKPruner::from_signed(self.top_k).k(),
            min_score: self.min_score,
            ..EngineConfig::default()
        };
        config.validate()?;

        Ok(AdjacencyJob {
            grid_size,
            tiles,
            config,
        })
    }
}
