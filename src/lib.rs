//! Rotation-aware border compatibility scoring for shuffled tile puzzles
//!
//! Given precomputed colour, texture and CNN features for every border of
//! every tile under all four rotations, the engine scores each candidate
//! pairing of borders, fuses the scores with caller weights, and keeps the
//! best few candidates per anchor for a downstream placement solver.

#![forbid(unsafe_code)]

/// Anchor enumeration, pairwise comparison and run orchestration
pub mod algorithm;
/// Top-K pruning, statistics and lookups over adjacency lists
pub mod analysis;
/// Request and report files, command line, logging and errors
pub mod io;
/// Distance primitives
pub mod math;
/// Rotations, borders and per-border features
pub mod model;
/// Per-metric similarities and their weighted fusion
pub mod scoring;

pub use io::error::{AdjacencyError, Result};
