//! Rotation and border naming, and the rotation-aware opposite-border table
//!
//! A tile is a square, so rotating tile B by a quarter turn changes which of
//! its named borders faces a given border of tile A. The mapping below is the
//! fixed geometry every comparison depends on; a directional slip here would
//! silently corrupt every downstream score.

use crate::io::error::{AdjacencyError, invalid_parameter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hypothetical quarter-turn orientation of a tile
///
/// Independent of any rotation applied while shuffling: every tile carries
/// features for all four orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    /// Original orientation
    Deg0,
    /// Quarter turn clockwise
    Deg90,
    /// Half turn
    Deg180,
    /// Quarter turn counter-clockwise
    Deg270,
}

impl Rotation {
    /// All rotations in enumeration order
    pub const ALL: [Self; 4] = [Self::Deg0, Self::Deg90, Self::Deg180, Self::Deg270];

    /// Rotation angle in degrees
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Position of this rotation in [`Rotation::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        }
    }

    /// Key of this rotation in string-keyed feature maps
    pub const fn key(self) -> &'static str {
        match self {
            Self::Deg0 => "0",
            Self::Deg90 => "90",
            Self::Deg180 => "180",
            Self::Deg270 => "270",
        }
    }

    /// Look up a rotation from its angle, if it is a quarter turn multiple below 360
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = AdjacencyError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
            .ok_or_else(|| invalid_parameter("rotation", &degrees, &"must be 0, 90, 180 or 270"))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl FromStr for Rotation {
    type Err = AdjacencyError;

    /// Parse a wire key; only the exact strings "0", "90", "180" and "270" match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rotation| rotation.key() == s)
            .ok_or_else(|| invalid_parameter("rotation", &s, &"must be 0, 90, 180 or 270"))
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// One of the four edge strips of a tile, relative to its current rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Border {
    /// Upper edge
    Top,
    /// Right-hand edge
    Right,
    /// Lower edge
    Bottom,
    /// Left-hand edge
    Left,
}

impl Border {
    /// All borders in enumeration order
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Position of this border in [`Border::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }

    /// Lowercase name used on the wire
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// Geometrically opposite border of the same tile
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }
}

impl FromStr for Border {
    type Err = AdjacencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "right" => Ok(Self::Right),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            _ => Err(invalid_parameter(
                "border",
                &s,
                &"must be top, right, bottom or left",
            )),
        }
    }
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Border of tile B that must face `border` of tile A when B is rotated by `rotation_of_b`
///
/// - 0°: each border meets its geometric opposite
/// - 90°: clockwise shift (top→right, right→bottom, bottom→left, left→top)
/// - 180°: each border meets the same named border
/// - 270°: counter-clockwise shift (top→left, right→top, bottom→right, left→bottom)
pub const fn opposite_border(border: Border, rotation_of_b: Rotation) -> Border {
    use Border::{Bottom, Left, Right, Top};

    match (rotation_of_b, border) {
        (Rotation::Deg0, Top) => Bottom,
        (Rotation::Deg0, Right) => Left,
        (Rotation::Deg0, Bottom) => Top,
        (Rotation::Deg0, Left) => Right,

        (Rotation::Deg90, Top) => Right,
        (Rotation::Deg90, Right) => Bottom,
        (Rotation::Deg90, Bottom) => Left,
        (Rotation::Deg90, Left) => Top,

        (Rotation::Deg180, Top) => Top,
        (Rotation::Deg180, Right) => Right,
        (Rotation::Deg180, Bottom) => Bottom,
        (Rotation::Deg180, Left) => Left,

        (Rotation::Deg270, Top) => Left,
        (Rotation::Deg270, Right) => Top,
        (Rotation::Deg270, Bottom) => Right,
        (Rotation::Deg270, Left) => Bottom,
    }
}
