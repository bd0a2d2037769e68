//! Engine constants and runtime configuration defaults

// Request defaults
/// Number of candidates retained per anchor when the request does not say
pub const DEFAULT_TOP_K: usize = 10;

/// CNN layer compared when the request does not name one
pub const DEFAULT_CNN_LAYER: &str = "block_6_expand_relu";

/// Default weight of the colour histogram similarity
pub const DEFAULT_COLOR_WEIGHT: f64 = 0.4;
/// Default weight of the Gabor texture similarity
pub const DEFAULT_GABOR_WEIGHT: f64 = 0.3;
/// Default weight of the CNN embedding similarity
pub const DEFAULT_CNN_WEIGHT: f64 = 0.3;

// Calibration constants. These are tuned to the feature extractors in use,
// not universal bounds, and can be overridden through `Calibration`.
/// Chi-square distance mapped to zero colour similarity
pub const COLOR_MAX_DISTANCE: f64 = 2.0;
/// Gabor descriptor L2 distance mapped to zero texture similarity
pub const GABOR_MAX_DISTANCE: f64 = 200.0;
/// Denominator guard for empty histogram bins
pub const CHI_SQUARE_EPSILON: f64 = 1e-10;

/// Number of Gabor filters (4 orientations x 3 wavelengths) per border
pub const GABOR_FILTER_COUNT: usize = 12;

/// Allowed drift of the weight sum from 1 before a warning is logged
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// Progress bar display settings
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_adjacency";
/// Extension of request and report files
pub const REQUEST_EXTENSION: &str = "json";
/// Log filter used when neither the CLI nor `RUST_LOG` sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";
