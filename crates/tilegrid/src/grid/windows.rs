//! Tile windows and their lazy enumeration.
//!
//! [`TileWindows`] walks the Cartesian product of the per-axis tile ranges with the first
//! axis varying slowest, so a 2D grid is visited `0x-0y, 0x-1y, ..., 1x-0y, ...`.
//! Enumerators own copies of the grid parameters; cloning one restarts nothing and shares
//! nothing, and a fresh one can always be obtained from [`super::TileGrid::windows`].
use std::iter::FusedIterator;

use ndarray::{ArrayView, Dimension, Slice};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::index::TileIndex;
use super::layout::check_axes;
use crate::error::{Error, Result};

/// Half-open pixel window `[start[d], end[d])` of one tile.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileWindow {
    /// First pixel on each axis.
    pub start: Vec<usize>,
    /// One past the last pixel on each axis.
    pub end: Vec<usize>,
    /// Grid position of the tile.
    pub index: TileIndex,
}

impl TileWindow {
    pub(crate) fn at(
        index: TileIndex,
        tile_shape: &[usize],
        offset: &[usize],
        separation: &[usize],
    ) -> Self {
        let start: Vec<usize> = index
            .coords()
            .iter()
            .zip(separation)
            .zip(offset)
            .map(|((&i, &s), &o)| i * s + o)
            .collect();
        let end = start.iter().zip(tile_shape).map(|(&s, &t)| s + t).collect();
        Self { start, end, index }
    }

    /// Size of the window along each axis.
    pub fn shape(&self) -> Vec<usize> {
        self.start
            .iter()
            .zip(&self.end)
            .map(|(&s, &e)| e - s)
            .collect()
    }

    /// Zero-based enumeration label of the window's tile.
    pub fn label(&self) -> String {
        self.index.label()
    }

    /// Returns `true` when `point` lies inside the window.
    pub fn contains(&self, point: &[usize]) -> bool {
        point.len() == self.start.len()
            && point
                .iter()
                .zip(self.start.iter().zip(&self.end))
                .all(|(&p, (&s, &e))| s <= p && p < e)
    }

    /// Returns `true` when both windows share at least one pixel.
    pub fn overlaps(&self, other: &TileWindow) -> bool {
        self.start.len() == other.start.len()
            && (0..self.start.len())
                .all(|d| self.start[d] < other.end[d] && other.start[d] < self.end[d])
    }

    /// The same window shifted by `origin`, keeping its index.
    pub fn translated(&self, origin: &[usize]) -> TileWindow {
        TileWindow {
            start: self.start.iter().zip(origin).map(|(&s, &o)| s + o).collect(),
            end: self.end.iter().zip(origin).map(|(&e, &o)| e + o).collect(),
            index: self.index.clone(),
        }
    }

    /// Views the part of `array` covered by this window.
    ///
    /// Fails when the window has a different number of axes than the array, reaches past
    /// it, or starts after it ends on some axis.
    pub fn slice<'a, A, D>(&self, array: &ArrayView<'a, A, D>) -> Result<ArrayView<'a, A, D>>
    where
        D: Dimension,
    {
        let shape = array.shape();
        if self.start.iter().zip(&self.end).any(|(&s, &e)| s > e) {
            return Err(Error::invalid_argument(format!(
                "window {:?}..{:?} starts after it ends",
                self.start, self.end
            )));
        }
        if shape.len() != self.end.len()
            || shape.len() != self.start.len()
            || self.end.iter().zip(shape).any(|(&e, &n)| e > n)
        {
            return Err(Error::invalid_argument(format!(
                "window {:?}..{:?} does not fit array of shape {:?}",
                self.start, self.end, shape
            )));
        }
        Ok(self.slice_in_bounds(array))
    }

    pub(crate) fn slice_in_bounds<'a, A, D>(&self, array: &ArrayView<'a, A, D>) -> ArrayView<'a, A, D>
    where
        D: Dimension,
    {
        let mut view = array.clone();
        view.slice_each_axis_inplace(|ax| {
            let d = ax.axis.index();
            Slice::from(self.start[d]..self.end[d])
        });
        view
    }
}

/// Builds a window enumerator from raw layout parameters.
///
/// Usually obtained through [`super::TileGrid::windows`]; this form accepts the output of
/// [`super::calculate_number_of_tiles`] directly.
pub fn generate_tile_start_end_index(
    num_tiles: &[usize],
    tile_shape: &[usize],
    offset: &[usize],
    separation: &[usize],
) -> Result<TileWindows> {
    check_axes(num_tiles.len(), tile_shape, separation)?;
    if offset.len() != num_tiles.len() {
        return Err(Error::invalid_argument(format!(
            "offset has {} axes, expected {}",
            offset.len(),
            num_tiles.len()
        )));
    }
    let axes = num_tiles.iter().zip(tile_shape).zip(offset).zip(separation);
    for (d, (((&n, &t), &o), &s)) in axes.enumerate() {
        let last_end = match n {
            0 => Some(0),
            n => (n - 1)
                .checked_mul(s)
                .and_then(|v| v.checked_add(o))
                .and_then(|v| v.checked_add(t)),
        };
        if last_end.is_none() {
            return Err(Error::invalid_argument(format!(
                "tile windows on axis {d} reach past usize::MAX"
            )));
        }
    }
    Ok(TileWindows::new(
        num_tiles.to_vec(),
        tile_shape.to_vec(),
        offset.to_vec(),
        separation.to_vec(),
    ))
}

/// Lazy, finite enumeration of tile windows in lexicographic index order.
#[derive(Clone, Debug)]
pub struct TileWindows {
    num_tiles: Vec<usize>,
    tile_shape: Vec<usize>,
    offset: Vec<usize>,
    separation: Vec<usize>,
    next: Option<Vec<usize>>,
    remaining: usize,
}

impl TileWindows {
    pub(crate) fn new(
        num_tiles: Vec<usize>,
        tile_shape: Vec<usize>,
        offset: Vec<usize>,
        separation: Vec<usize>,
    ) -> Self {
        let remaining = if num_tiles.is_empty() {
            0
        } else {
            num_tiles.iter().product()
        };
        let next = (remaining > 0).then(|| vec![0; num_tiles.len()]);
        Self {
            num_tiles,
            tile_shape,
            offset,
            separation,
            next,
            remaining,
        }
    }

    fn advance(&self, mut current: Vec<usize>) -> Option<Vec<usize>> {
        for d in (0..current.len()).rev() {
            current[d] += 1;
            if current[d] < self.num_tiles[d] {
                return Some(current);
            }
            current[d] = 0;
        }
        None
    }
}

impl Iterator for TileWindows {
    type Item = TileWindow;

    fn next(&mut self) -> Option<TileWindow> {
        let current = self.next.take()?;
        let window = TileWindow::at(
            TileIndex(current.clone()),
            &self.tile_shape,
            &self.offset,
            &self.separation,
        );
        self.next = self.advance(current);
        self.remaining -= 1;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for TileWindows {}

impl FusedIterator for TileWindows {}

/// One ROI inside one tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NestedWindow {
    /// The enclosing tile.
    pub tile: TileWindow,
    /// The ROI in tile-relative pixel coordinates.
    pub roi: TileWindow,
    /// The ROI in image pixel coordinates.
    pub absolute: TileWindow,
}

/// Enumerates every ROI of every tile, tile-major.
#[derive(Clone, Debug)]
pub struct NestedWindows {
    tiles: TileWindows,
    roi_template: TileWindows,
    rois: TileWindows,
    current: Option<TileWindow>,
}

impl NestedWindows {
    pub(crate) fn new(tiles: TileWindows, rois: TileWindows) -> Self {
        Self {
            tiles,
            rois: rois.clone(),
            roi_template: rois,
            current: None,
        }
    }
}

impl Iterator for NestedWindows {
    type Item = NestedWindow;

    fn next(&mut self) -> Option<NestedWindow> {
        loop {
            if let Some(tile) = &self.current {
                if let Some(roi) = self.rois.next() {
                    let absolute = roi.translated(&tile.start);
                    return Some(NestedWindow {
                        tile: tile.clone(),
                        roi,
                        absolute,
                    });
                }
            }
            self.current = Some(self.tiles.next()?);
            self.rois = self.roi_template.clone();
        }
    }
}

impl FusedIterator for NestedWindows {}
