//! Tile indices and the label conventions built on them.
//!
//! Two label flavours exist:
//! - enumeration labels (`"{x}x-{y}y"`), zero-based, produced by [`TileIndex::label`];
//! - record labels, one-based, as written into measurement tables and consumed by
//!   [`crate::reconstruct`]: tiles use [`tile_record_label`] (`"{x}x-{y}y"`), ROIs use
//!   [`roi_record_label`] (`"ROI{x}x{y}y"`).
//!
//! Both are decoded by extracting the decimal digit groups embedded in the label.
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static DIGIT_GROUPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit group pattern is valid"));

/// Position of a tile in the grid, one coordinate per image axis.
///
/// The first coordinate is the `x` of the label convention and the second is `y`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileIndex(pub Vec<usize>);

impl TileIndex {
    pub fn new(coords: impl Into<Vec<usize>>) -> Self {
        Self(coords.into())
    }

    pub fn coords(&self) -> &[usize] {
        &self.0
    }

    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Coordinate along the first axis.
    pub fn x(&self) -> usize {
        self.0.first().copied().unwrap_or(0)
    }

    /// Coordinate along the second axis.
    pub fn y(&self) -> usize {
        self.0.get(1).copied().unwrap_or(0)
    }

    /// Zero-based enumeration label, e.g. `"3x-1y"`.
    pub fn label(&self) -> String {
        match self.0.as_slice() {
            [] => String::new(),
            [x] => format!("{x}x"),
            [x, y, ..] => format!("{x}x-{y}y"),
        }
    }

    /// One-based record label for this tile, e.g. `"4x-2y"` for index `(3, 1)`.
    pub fn record_label(&self) -> String {
        tile_record_label(self.x(), self.y())
    }

    /// One-based record label when this index addresses an ROI inside a tile.
    pub fn roi_record_label(&self) -> String {
        roi_record_label(self.x(), self.y())
    }

    /// Parses a zero-based enumeration label back into a 2D index.
    pub fn from_label(label: &str) -> Result<Self> {
        let groups = digit_groups(label)?;
        match groups.as_slice() {
            [x, y, ..] => Ok(Self(vec![*x, *y])),
            _ => Err(Error::parse(label)),
        }
    }
}

impl From<Vec<usize>> for TileIndex {
    fn from(coords: Vec<usize>) -> Self {
        Self(coords)
    }
}

impl From<(usize, usize)> for TileIndex {
    fn from((x, y): (usize, usize)) -> Self {
        Self(vec![x, y])
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One-based tile record label for zero-based grid coordinates.
pub fn tile_record_label(x: usize, y: usize) -> String {
    format!("{}x-{}y", x + 1, y + 1)
}

/// One-based ROI record label for zero-based ROI coordinates within a tile.
pub fn roi_record_label(x: usize, y: usize) -> String {
    format!("ROI{}x{}y", x + 1, y + 1)
}

/// Extracts every run of decimal digits in `label`, in order of appearance.
pub fn digit_groups(label: &str) -> Result<Vec<usize>> {
    DIGIT_GROUPS
        .find_iter(label)
        .map(|m| m.as_str().parse::<usize>().map_err(|_| Error::parse(label)))
        .collect()
}

/// Parses a one-based record label into zero-based `(x, y)` coordinates.
///
/// The first digit group is `x`, the second is `y`; any further groups are ignored.
pub fn parse_record_label(label: &str) -> Result<(usize, usize)> {
    let groups = digit_groups(label)?;
    let (x, y) = match groups.as_slice() {
        [x, y, ..] => (*x, *y),
        _ => return Err(Error::parse(label)),
    };
    if x == 0 || y == 0 {
        return Err(Error::invalid_argument(format!(
            "label '{label}' has a zero coordinate; record labels are one-based"
        )));
    }
    Ok((x - 1, y - 1))
}
