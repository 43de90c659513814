//! Slicing an array into tile views.
use std::iter::FusedIterator;

use ndarray::{ArrayView, Dimension};

use super::index::TileIndex;
use super::layout::TileGrid;
use super::windows::TileWindows;
use crate::error::Result;

/// Lays a grid over `array`'s own shape and yields one `(view, index)` per tile.
///
/// Views borrow from `array`; nothing is copied.
pub fn generate_tile<'a, A, D>(
    array: ArrayView<'a, A, D>,
    tile_shape: &[usize],
    separation: Option<&[usize]>,
) -> Result<Tiles<'a, A, D>>
where
    D: Dimension,
{
    let grid = TileGrid::new(array.shape(), tile_shape, separation)?;
    Ok(Tiles {
        windows: grid.windows(),
        array,
    })
}

/// Iterator over tile views of an array, see [`generate_tile`].
pub struct Tiles<'a, A, D: Dimension> {
    array: ArrayView<'a, A, D>,
    windows: TileWindows,
}

impl<'a, A, D: Dimension> Clone for Tiles<'a, A, D> {
    fn clone(&self) -> Self {
        Self {
            array: self.array.clone(),
            windows: self.windows.clone(),
        }
    }
}

impl<'a, A, D: Dimension> Iterator for Tiles<'a, A, D> {
    type Item = (ArrayView<'a, A, D>, TileIndex);

    fn next(&mut self) -> Option<Self::Item> {
        let window = self.windows.next()?;
        let view = window.slice_in_bounds(&self.array);
        Some((view, window.index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.windows.size_hint()
    }
}

impl<'a, A, D: Dimension> ExactSizeIterator for Tiles<'a, A, D> {}

impl<'a, A, D: Dimension> FusedIterator for Tiles<'a, A, D> {}
