//! Error types and context management for adjacency computations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for all engine operations
///
/// Only structural problems surface here. A missing or malformed per-metric
/// payload is never an error: it degrades that metric to a 0.0 similarity.
#[derive(Debug, Error)]
pub enum AdjacencyError {
    /// Request data is missing a required structure
    #[error("Invalid input shape{}: {reason}", tile_suffix(.tile))]
    InvalidInputShape {
        /// Tile record being converted when the problem was found
        tile: Option<usize>,
        /// Description of what is missing or malformed
        reason: String,
    },

    /// A tile does not carry features for one of the four rotations
    #[error("Tile {tile} has no features for rotation {rotation}")]
    MissingRotation {
        /// Position of the tile in the request
        tile: usize,
        /// Rotation key that was expected
        rotation: String,
    },

    /// Tile count does not match the declared grid
    #[error("Grid size {grid_size} expects {expected} tiles, found {found}")]
    GridSizeMismatch {
        /// Declared grid side length
        grid_size: usize,
        /// Tile count implied by the grid size
        expected: usize,
        /// Tile count actually supplied
        found: usize,
    },

    /// Engine parameter validation failed
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to parse a request file
    #[error("Failed to parse '{}': {source}", .path.display())]
    Parse {
        /// Path of the request file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// JSON encoding or decoding failed outside of a file context
    #[error("JSON error: {source}")]
    Json {
        /// Underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// General file system operation failure
    #[error("File system error during {operation} on '{}': {source}", .path.display())]
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

fn tile_suffix(tile: &Option<usize>) -> String {
    tile.map(|index| format!(" in tile {index}"))
        .unwrap_or_default()
}

/// Convenience type alias for engine results
pub type Result<T> = std::result::Result<T, AdjacencyError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext {
    /// Tile record being processed
    pub tile: Option<usize>,
}

/// Enriches error messages with request position information
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the tile context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the tile index applied
    fn with_tile(self, tile: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<AdjacencyError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only shape errors are positional; keep an index that is already set
            if let AdjacencyError::InvalidInputShape { tile, .. } = &mut error {
                if tile.is_none() {
                    *tile = context.tile;
                }
            }
            error
        })
    }

    fn with_tile(self, tile: usize) -> Result<T> {
        self.with_context(ErrorContext { tile: Some(tile) })
    }
}

impl From<std::io::Error> for AdjacencyError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AdjacencyError {
    AdjacencyError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an input shape error without tile context
pub fn invalid_shape(reason: &impl ToString) -> AdjacencyError {
    AdjacencyError::InvalidInputShape {
        tile: None,
        reason: reason.to_string(),
    }
}
