//! Tiles an image with a RON configuration and writes every accepted tile as a PNG.
//!
//! Usage: `tile-image [IMAGE.png] [CONFIG.ron] [OUT_DIR]`. Without an image a synthetic
//! frame is used; without a config the bundled `configs/default.ron` is used.
use std::env;
use std::fs;
use std::path::PathBuf;

use tilegrid::prelude::*;
use tilegrid_examples::{init_tracing, load_config, load_gray_png, save_gray_png, synthetic_image};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = env::args().skip(1);

    let image = match args.next() {
        Some(path) => load_gray_png(&path)?,
        None => synthetic_image(1024, 1024),
    };
    let config = match args.next() {
        Some(path) => load_config(&path)?,
        None => load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/configs/default.ron"))?,
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "tiles".into()));
    fs::create_dir_all(&out_dir)?;

    let runner = TilingRunner::try_new(config)?;
    let mut rejected = 0usize;
    let mut sink = FnSink::new(|event| {
        if let TilingEvent::TileEvaluated {
            accepted: false, ..
        } = event
        {
            rejected += 1;
        }
    });
    let result = runner.run_with_events(&image, &mut sink)?;

    let view = image.view();
    for tile in &result.accepted {
        let pixels = tile.window.slice(&view)?;
        let path = out_dir.join(format!("tile_{}.png", tile.record_label()));
        save_gray_png(&pixels, &path)?;
        info!(
            "Tile {} at {:?}..{:?} with {} ROIs -> {}.",
            tile.record_label(),
            tile.window.start,
            tile.window.end,
            tile.rois.len(),
            path.display()
        );
    }

    info!(
        "Wrote {} tiles to {} ({} rejected, {:.1}% accepted).",
        result.accepted.len(),
        out_dir.display(),
        rejected,
        100.0 * result.acceptance_ratio()
    );
    Ok(())
}
