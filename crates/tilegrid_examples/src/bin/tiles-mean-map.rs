//! Measures mean intensity per tile and per ROI, then rebuilds coarse maps from the
//! labeled measurements and writes them as PNGs.
//!
//! Usage: `tiles-mean-map [IMAGE.png]`.
use std::collections::BTreeMap;
use std::env;

use ndarray::ArrayView2;
use tilegrid::prelude::*;
use tilegrid_examples::{init_tracing, load_gray_png, normalize_to_u8, save_gray_png, synthetic_image};
use tracing::info;

const TILE: usize = 64;
const ROI: usize = 16;

fn mean(view: ArrayView2<'_, u8>) -> f64 {
    if view.is_empty() {
        return 0.0;
    }
    view.iter().map(|&v| f64::from(v)).sum::<f64>() / view.len() as f64
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let image = match env::args().nth(1) {
        Some(path) => load_gray_png(&path)?,
        None => synthetic_image(1024, 1024),
    };

    let grid = TileGrid::new(image.shape(), &[TILE, TILE], None)?;
    let rois = grid.roi_grid(&[ROI, ROI], None)?;
    let tile_dims = (grid.num_tiles()[0], grid.num_tiles()[1]);
    let rois_per_tile = (rois.num_tiles()[0], rois.num_tiles()[1]);

    // Per-tile means, the way a measurement table would store them.
    let tile_means: BTreeMap<String, f64> = reduce_tiles_labeled(&image, &grid, mean)?;
    let tile_map = tile_values_to_image(tile_means, tile_dims)?;
    save_gray_png(&normalize_to_u8(&tile_map), "tile-means.png")?;

    let view = image.view();
    let mut roi_records = Vec::new();
    for nested in grid.nested_windows(&rois)? {
        let value = mean(nested.absolute.slice(&view)?);
        roi_records.push((
            nested.tile.index.record_label(),
            nested.roi.index.roi_record_label(),
            value,
        ));
    }
    let floor = 40.0;
    let roi_map = roi_values_to_image(roi_records, tile_dims, rois_per_tile, Some(floor))?;
    save_gray_png(&normalize_to_u8(&roi_map), "roi-means.png")?;

    info!(
        "Tile map {:?}, ROI map {:?}; ROI means at or below {} left blank.",
        tile_map.dim(),
        roi_map.dim(),
        floor
    );
    Ok(())
}
