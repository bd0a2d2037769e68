//! Tile geometry and the precomputed features attached to it

/// Per-border feature payloads for every tile and rotation
pub mod features;
/// Rotations, borders and the opposite-border table
pub mod orientation;
