//! Grid sizing: how many tiles fit in an extent and where the first one starts.
//!
//! For every axis `d` the layout is
//!
//! ```text
//! border    = max(0, tile_shape[d] - separation[d])
//! usable    = extent[d] - 2 * border
//! num_tiles = usable / separation[d]
//! offset    = (usable % separation[d]) / 2 + border
//! ```
//!
//! Tiles that do not fully fit are dropped, never padded. The leftover pixels are split
//! between both ends so the grid sits centered in the extent.
use std::ops::Range;

use tracing::debug;

use super::index::TileIndex;
use super::windows::{NestedWindows, TileWindow, TileWindows};
use crate::error::{Error, Result};

/// Computes `(num_tiles, offset)` for an extent, a tile shape and an optional separation.
///
/// `separation` defaults to `tile_shape` (contiguous, non-overlapping tiles).
pub fn calculate_number_of_tiles(
    extent: &[usize],
    tile_shape: &[usize],
    separation: Option<&[usize]>,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let separation = separation.unwrap_or(tile_shape);
    check_axes(extent.len(), tile_shape, separation)?;

    let mut num_tiles = Vec::with_capacity(extent.len());
    let mut offset = Vec::with_capacity(extent.len());
    for ((&e, &t), &s) in extent.iter().zip(tile_shape).zip(separation) {
        let border = t.saturating_sub(s);
        let usable = e.saturating_sub(border.saturating_mul(2));
        num_tiles.push(usable / s);
        offset.push((usable % s) / 2 + border);
    }
    Ok((num_tiles, offset))
}

/// Checks that tile shape and separation are positive and match the number of axes.
pub(crate) fn check_axes(ndim: usize, tile_shape: &[usize], separation: &[usize]) -> Result<()> {
    if ndim == 0 {
        return Err(Error::invalid_argument("extent must have at least one axis"));
    }
    if tile_shape.len() != ndim {
        return Err(Error::invalid_argument(format!(
            "tile_shape has {} axes, expected {ndim}",
            tile_shape.len()
        )));
    }
    if separation.len() != ndim {
        return Err(Error::invalid_argument(format!(
            "separation has {} axes, expected {ndim}",
            separation.len()
        )));
    }
    if tile_shape.contains(&0) {
        return Err(Error::invalid_argument("tile_shape must be > 0 on every axis"));
    }
    if separation.contains(&0) {
        return Err(Error::invalid_argument("separation must be > 0 on every axis"));
    }
    Ok(())
}

/// A fully resolved tile layout over an extent.
///
/// Construct with [`TileGrid::new`]; every derived quantity is fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileGrid {
    extent: Vec<usize>,
    tile_shape: Vec<usize>,
    separation: Vec<usize>,
    num_tiles: Vec<usize>,
    offset: Vec<usize>,
}

impl TileGrid {
    /// Lays out tiles of `tile_shape` over `extent`, `separation` apart (defaults to `tile_shape`).
    pub fn new(extent: &[usize], tile_shape: &[usize], separation: Option<&[usize]>) -> Result<Self> {
        let (num_tiles, offset) = calculate_number_of_tiles(extent, tile_shape, separation)?;
        let separation = separation.unwrap_or(tile_shape).to_vec();
        if num_tiles.contains(&0) {
            debug!(
                "Tile grid over {:?} with tile shape {:?} and separation {:?} holds no tiles.",
                extent, tile_shape, separation
            );
        }
        Ok(Self {
            extent: extent.to_vec(),
            tile_shape: tile_shape.to_vec(),
            separation,
            num_tiles,
            offset,
        })
    }

    pub fn extent(&self) -> &[usize] {
        &self.extent
    }

    pub fn tile_shape(&self) -> &[usize] {
        &self.tile_shape
    }

    pub fn separation(&self) -> &[usize] {
        &self.separation
    }

    /// Number of tiles along each axis.
    pub fn num_tiles(&self) -> &[usize] {
        &self.num_tiles
    }

    /// Pixel position of the first tile's start along each axis.
    pub fn offset(&self) -> &[usize] {
        &self.offset
    }

    pub fn ndim(&self) -> usize {
        self.extent.len()
    }

    /// Overlap margin kept clear at both ends of each axis.
    pub fn border(&self) -> Vec<usize> {
        self.tile_shape
            .iter()
            .zip(&self.separation)
            .map(|(&t, &s)| t.saturating_sub(s))
            .collect()
    }

    /// Total number of tiles in the grid.
    pub fn tile_count(&self) -> usize {
        self.num_tiles.iter().product()
    }

    /// Returns `true` when some axis holds no tile.
    pub fn is_empty(&self) -> bool {
        self.tile_count() == 0
    }

    /// Pixel range spanned by the union of all windows along `axis`.
    ///
    /// `None` when the axis is out of range or holds no tile.
    pub fn covered_span(&self, axis: usize) -> Option<Range<usize>> {
        let n = *self.num_tiles.get(axis)?;
        if n == 0 {
            return None;
        }
        let start = self.offset[axis];
        let end = (n - 1)
            .checked_mul(self.separation[axis])?
            .checked_add(start)?
            .checked_add(self.tile_shape[axis])?;
        Some(start..end)
    }

    /// Window of the tile at `index`, or `None` when the index lies outside the grid.
    pub fn window(&self, index: &TileIndex) -> Option<TileWindow> {
        if index.ndim() != self.ndim() {
            return None;
        }
        if index.coords().iter().zip(&self.num_tiles).any(|(&i, &n)| i >= n) {
            return None;
        }
        Some(TileWindow::at(
            index.clone(),
            &self.tile_shape,
            &self.offset,
            &self.separation,
        ))
    }

    /// Lazily enumerates every tile window in lexicographic index order.
    pub fn windows(&self) -> TileWindows {
        TileWindows::new(
            self.num_tiles.clone(),
            self.tile_shape.clone(),
            self.offset.clone(),
            self.separation.clone(),
        )
    }

    /// Lays out ROIs inside a single tile, using the tile shape as the extent.
    pub fn roi_grid(&self, roi_shape: &[usize], roi_separation: Option<&[usize]>) -> Result<TileGrid> {
        TileGrid::new(&self.tile_shape, roi_shape, roi_separation)
    }

    /// Enumerates every `(tile, roi)` pair, tile-major.
    ///
    /// `rois` must have been laid out over this grid's tile shape, see [`TileGrid::roi_grid`].
    pub fn nested_windows(&self, rois: &TileGrid) -> Result<NestedWindows> {
        if rois.extent() != self.tile_shape() {
            return Err(Error::invalid_argument(format!(
                "ROI grid extent {:?} does not match tile shape {:?}",
                rois.extent(),
                self.tile_shape()
            )));
        }
        Ok(NestedWindows::new(self.windows(), rois.windows()))
    }
}
