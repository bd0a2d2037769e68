//! Precomputed per-border feature payloads
//!
//! Features are produced by external extractors (histogram binning, Gabor
//! filtering, a CNN forward pass) for every tile, rotation and border. The
//! engine only reads them.

use crate::model::orientation::{Border, Rotation};
use serde::{Deserialize, Serialize};

/// Normalized colour histogram of a border strip, one unit-sum series per channel
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorHistogram {
    /// Red channel bins
    #[serde(default)]
    pub r: Vec<f64>,
    /// Green channel bins
    #[serde(default)]
    pub g: Vec<f64>,
    /// Blue channel bins
    #[serde(default)]
    pub b: Vec<f64>,
}

impl ColorHistogram {
    /// Create a histogram from its three channels
    pub const fn new(r: Vec<f64>, g: Vec<f64>, b: Vec<f64>) -> Self {
        Self { r, g, b }
    }

    /// Channels in r, g, b order
    pub fn channels(&self) -> [&[f64]; 3] {
        [&self.r, &self.g, &self.b]
    }

    /// Shared bin count, or `None` when the histogram is empty or ragged
    pub fn bins(&self) -> Option<usize> {
        let bins = self.r.len();
        (bins > 0 && self.g.len() == bins && self.b.len() == bins).then_some(bins)
    }
}

/// Response statistics of one Gabor filter over a border strip
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GaborResponse {
    /// Filter orientation in degrees
    #[serde(rename = "orientation", alias = "orientation_degrees", default)]
    pub orientation_degrees: f64,
    /// Filter wavelength in pixels
    #[serde(default)]
    pub wavelength: f64,
    /// Mean filtered intensity
    pub mean: f64,
    /// Standard deviation of filtered intensity
    pub std: f64,
    /// Sum of squared filtered intensity
    pub energy: f64,
}

impl GaborResponse {
    /// Create a response record
    pub const fn new(
        orientation_degrees: f64,
        wavelength: f64,
        mean: f64,
        std: f64,
        energy: f64,
    ) -> Self {
        Self {
            orientation_degrees,
            wavelength,
            mean,
            std,
            energy,
        }
    }

    /// The compared part of the record: (mean, std, energy)
    pub const fn descriptor(&self) -> [f64; 3] {
        [self.mean, self.std, self.energy]
    }
}

/// Pooled activation vector of one named CNN layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CnnLayer {
    /// Network layer the vector was taken from
    pub layer_name: String,
    /// Global-average-pooled activations
    #[serde(default)]
    pub feature_vector: Vec<f64>,
}

impl CnnLayer {
    /// Create a layer record
    pub fn new(layer_name: impl Into<String>, feature_vector: Vec<f64>) -> Self {
        Self {
            layer_name: layer_name.into(),
            feature_vector,
        }
    }
}

/// All features attached to one (tile, rotation, border)
///
/// Each payload may be absent; the affected metric then scores 0.0.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BorderFeatureSet {
    /// Colour distribution of the strip
    #[serde(default)]
    pub histogram: Option<ColorHistogram>,
    /// Gabor responses in the extractor's fixed filter order
    #[serde(default)]
    pub gabor: Vec<GaborResponse>,
    /// Per-layer CNN embeddings
    #[serde(default)]
    pub cnn: Vec<CnnLayer>,
}

impl BorderFeatureSet {
    /// Create a feature set from its three payloads
    pub const fn new(
        histogram: Option<ColorHistogram>,
        gabor: Vec<GaborResponse>,
        cnn: Vec<CnnLayer>,
    ) -> Self {
        Self {
            histogram,
            gabor,
            cnn,
        }
    }

    /// Feature vector of the first layer called `layer_name`
    pub fn embedding(&self, layer_name: &str) -> Option<&[f64]> {
        self.cnn
            .iter()
            .find(|layer| layer.layer_name == layer_name)
            .map(|layer| layer.feature_vector.as_slice())
    }
}

/// The four border feature sets of a tile at one rotation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RotationBorders {
    /// Upper edge features
    pub top: BorderFeatureSet,
    /// Right-hand edge features
    pub right: BorderFeatureSet,
    /// Lower edge features
    pub bottom: BorderFeatureSet,
    /// Left-hand edge features
    pub left: BorderFeatureSet,
}

impl RotationBorders {
    /// Features of one border
    pub const fn get(&self, border: Border) -> &BorderFeatureSet {
        match border {
            Border::Top => &self.top,
            Border::Right => &self.right,
            Border::Bottom => &self.bottom,
            Border::Left => &self.left,
        }
    }

    /// Build by asking for each border in turn
    pub fn from_fn(mut features: impl FnMut(Border) -> BorderFeatureSet) -> Self {
        Self {
            top: features(Border::Top),
            right: features(Border::Right),
            bottom: features(Border::Bottom),
            left: features(Border::Left),
        }
    }

    /// Whether any border carries an embedding for `layer_name`
    pub fn has_layer(&self, layer_name: &str) -> bool {
        Border::ALL
            .iter()
            .any(|&border| self.get(border).embedding(layer_name).is_some())
    }
}

/// Precomputed features of one tile under every rotation
///
/// Holding exactly four rotations is enforced by construction, so the
/// comparator never meets a missing rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TileFeatures {
    source_index: usize,
    rotations: [RotationBorders; 4],
}

impl TileFeatures {
    /// Create tile features; `rotations` is indexed by [`Rotation::index`]
    pub const fn new(source_index: usize, rotations: [RotationBorders; 4]) -> Self {
        Self {
            source_index,
            rotations,
        }
    }

    /// Build by asking for each (rotation, border) in turn
    pub fn from_fn(
        source_index: usize,
        mut features: impl FnMut(Rotation, Border) -> BorderFeatureSet,
    ) -> Self {
        let rotations =
            Rotation::ALL.map(|rotation| RotationBorders::from_fn(|border| features(rotation, border)));
        Self::new(source_index, rotations)
    }

    /// Index of the tile in the unshuffled source image
    pub const fn source_index(&self) -> usize {
        self.source_index
    }

    /// All borders at one rotation
    pub const fn rotation(&self, rotation: Rotation) -> &RotationBorders {
        match rotation {
            Rotation::Deg0 => &self.rotations[0],
            Rotation::Deg90 => &self.rotations[1],
            Rotation::Deg180 => &self.rotations[2],
            Rotation::Deg270 => &self.rotations[3],
        }
    }

    /// Features of one border at one rotation
    pub const fn border(&self, rotation: Rotation, border: Border) -> &BorderFeatureSet {
        self.rotation(rotation).get(border)
    }

    /// Whether any rotation and border carries an embedding for `layer_name`
    pub fn has_layer(&self, layer_name: &str) -> bool {
        self.rotations
            .iter()
            .any(|borders| borders.has_layer(layer_name))
    }
}
