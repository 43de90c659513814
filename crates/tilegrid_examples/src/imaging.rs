//! Image and configuration I/O shared by the example binaries.
//!
//! Arrays are `(rows, cols)`: axis 0 is the image row, so a tile label's `x` counts rows.
use std::fs;
use std::path::Path;

use anyhow::Context;
use image::GrayImage;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use tilegrid::pipeline::TilingConfig;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber; `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Reads a tiling configuration from a RON file and validates it.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<TilingConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: TilingConfig =
        ron::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Loads any PNG as 8-bit grayscale.
pub fn load_gray_png(path: impl AsRef<Path>) -> anyhow::Result<Array2<u8>> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .to_luma8();
    let (width, height) = img.dimensions();
    let array = Array2::from_shape_vec((height as usize, width as usize), img.into_raw())?;
    Ok(array)
}

/// Writes a 2D array (or view) as an 8-bit grayscale PNG.
pub fn save_gray_png<S>(array: &ArrayBase<S, Ix2>, path: impl AsRef<Path>) -> anyhow::Result<()>
where
    S: Data<Elem = u8>,
{
    let path = path.as_ref();
    let (rows, cols) = array.dim();
    let pixels: Vec<u8> = array.iter().copied().collect();
    let img = GrayImage::from_raw(cols as u32, rows as u32, pixels)
        .context("pixel buffer does not match image dimensions")?;
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Linearly maps values onto `0..=255`; a constant array maps to zero.
pub fn normalize_to_u8(values: &Array2<f64>) -> Array2<u8> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;
    values.mapv(|v| {
        if !v.is_finite() || span <= 0.0 {
            0
        } else {
            (((v - lo) / span) * 255.0).round() as u8
        }
    })
}

/// Sparse bright blobs on a dim textured background, standing in for an SHG frame.
pub fn synthetic_image(rows: usize, cols: usize) -> Array2<u8> {
    let centers = [(0.2, 0.3), (0.55, 0.7), (0.8, 0.25), (0.35, 0.85)];
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let (y, x) = (r as f64 / rows as f64, c as f64 / cols as f64);
        let glow: f64 = centers
            .iter()
            .map(|(cy, cx)| {
                let d2 = (y - cy).powi(2) + (x - cx).powi(2);
                230.0 * (-d2 / 0.004).exp()
            })
            .sum();
        let texture = ((r * 31 + c * 17) % 23) as f64;
        (glow + texture).min(255.0) as u8
    })
}

#[cfg(test)]
mod tests {
    use ndarray::arr2;

    use super::*;

    #[test]
    fn normalize_spans_full_range() {
        let values = arr2(&[[1.0, 2.0], [3.0, 5.0]]);
        assert_eq!(normalize_to_u8(&values), arr2(&[[0, 64], [128, 255]]));
        assert_eq!(normalize_to_u8(&arr2(&[[4.0, 4.0]])), arr2(&[[0, 0]]));
    }

    #[test]
    fn synthetic_image_has_bright_blobs() {
        let image = synthetic_image(64, 64);
        assert_eq!(image.dim(), (64, 64));
        assert!(image.iter().any(|&v| v > 200));
        assert!(image.iter().any(|&v| v < 30));
    }

    #[test]
    fn default_config_parses() {
        let text = include_str!("../configs/default.ron");
        let config: TilingConfig = ron::from_str(text).unwrap();
        assert_eq!(config.tile_shape, vec![128, 128]);
        assert_eq!(config.roi_shape, Some(vec![32, 32]));
        assert_eq!(config.threshold.count_percent, 10.0);
        config.validate().unwrap();
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: TilingConfig = ron::from_str("(tile_shape: [16, 16])").unwrap();
        assert_eq!(config.separation, None);
        assert_eq!(config.threshold.input_max, 255.0);
    }
}
