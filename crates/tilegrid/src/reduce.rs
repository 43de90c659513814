//! Per-tile reductions: one scalar per tile, shaped like the tile grid.
//!
//! These produce exactly what [`crate::reconstruct`] consumes: a dense per-tile array, or a
//! map from one-based tile record labels to values.
use std::collections::BTreeMap;

use ndarray::{Array2, ArrayBase, ArrayView2, Data, Ix2};
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::grid::TileGrid;

fn check_grid_matches<S: Data>(array: &ArrayBase<S, Ix2>, grid: &TileGrid) -> Result<()> {
    if grid.extent() != array.shape() {
        return Err(Error::invalid_argument(format!(
            "grid extent {:?} does not match array shape {:?}",
            grid.extent(),
            array.shape()
        )));
    }
    Ok(())
}

/// Applies `f` to every tile of `array` and stores the results at the tiles' grid positions.
pub fn reduce_tiles<S, A, B, F>(array: &ArrayBase<S, Ix2>, grid: &TileGrid, mut f: F) -> Result<Array2<B>>
where
    S: Data<Elem = A>,
    B: Clone + Zero,
    F: FnMut(ArrayView2<'_, A>) -> B,
{
    check_grid_matches(array, grid)?;
    let mut out = Array2::zeros((grid.num_tiles()[0], grid.num_tiles()[1]));
    let view = array.view();
    for window in grid.windows() {
        let value = f(window.slice_in_bounds(&view));
        out[[window.index.x(), window.index.y()]] = value;
    }
    Ok(out)
}

/// Like [`reduce_tiles`], keyed by one-based tile record labels.
pub fn reduce_tiles_labeled<S, A, B, F>(
    array: &ArrayBase<S, Ix2>,
    grid: &TileGrid,
    mut f: F,
) -> Result<BTreeMap<String, B>>
where
    S: Data<Elem = A>,
    F: FnMut(ArrayView2<'_, A>) -> B,
{
    check_grid_matches(array, grid)?;
    let view = array.view();
    Ok(grid
        .windows()
        .map(|window| {
            let value = f(window.slice_in_bounds(&view));
            (window.index.record_label(), value)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use ndarray::{arr2, Array2};

    use super::*;
    use crate::reconstruct::tile_values_to_image;

    fn quadrants() -> Array2<f64> {
        Array2::from_shape_fn((10, 10), |(r, c)| match (r < 5, c < 5) {
            (true, true) => 1.0,
            (true, false) => 2.0,
            (false, true) => 3.0,
            (false, false) => 4.0,
        })
    }

    #[test]
    fn mean_per_tile() {
        let image = quadrants();
        let grid = TileGrid::new(&[10, 10], &[5, 5], None).unwrap();
        let means = reduce_tiles(&image, &grid, |t| t.mean().unwrap_or(0.0)).unwrap();
        assert_eq!(means, arr2(&[[1.0, 2.0], [3.0, 4.0]]));
    }

    #[test]
    fn labeled_reduction_reconstructs_dense_reduction() {
        let image = quadrants();
        let grid = TileGrid::new(&[10, 10], &[5, 5], None).unwrap();
        let dense = reduce_tiles(&image, &grid, |t| t.sum()).unwrap();
        let labeled = reduce_tiles_labeled(&image, &grid, |t| t.sum()).unwrap();
        assert_eq!(labeled["2x-1y"], 75.0);
        let rebuilt = tile_values_to_image(labeled, (2, 2)).unwrap();
        assert_eq!(rebuilt, dense);
    }

    #[test]
    fn grid_must_match_array() {
        let image = quadrants();
        let grid = TileGrid::new(&[12, 10], &[5, 5], None).unwrap();
        assert!(reduce_tiles(&image, &grid, |t| t.sum()).is_err());
        assert!(reduce_tiles_labeled(&image, &grid, |t| t.sum()).is_err());
    }

    #[test]
    fn empty_grid_gives_empty_output() {
        let image = Array2::<f64>::zeros((3, 8));
        let grid = TileGrid::new(&[3, 8], &[4, 4], None).unwrap();
        let out = reduce_tiles(&image, &grid, |t| t.sum()).unwrap();
        assert_eq!(out.dim(), (0, 2));
    }
}
