//! Configuration for a tiling run.
//!
//! Replaces ad-hoc parameter dictionaries with a typed structure. With the `serde` feature
//! it can be read from any serde format; missing fields take the documented defaults.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::grid::TileGrid;
use crate::threshold::ThresholdConfig;

/// Default tile edge in pixels.
pub const DEFAULT_TILE_EDGE: usize = 64;

/// Configuration for [`crate::pipeline::TilingRunner`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TilingConfig {
    /// Tile size along each image axis.
    pub tile_shape: Vec<usize>,
    /// Tile spacing along each axis; `None` places tiles edge to edge.
    pub separation: Option<Vec<usize>>,
    /// ROI size inside each tile; `None` disables ROIs.
    pub roi_shape: Option<Vec<usize>>,
    /// ROI spacing inside each tile; `None` places ROIs edge to edge.
    pub roi_separation: Option<Vec<usize>>,
    /// Tile acceptance parameters.
    pub threshold: ThresholdConfig,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            tile_shape: vec![DEFAULT_TILE_EDGE, DEFAULT_TILE_EDGE],
            separation: None,
            roi_shape: None,
            roi_separation: None,
            threshold: ThresholdConfig::default(),
        }
    }
}

impl TilingConfig {
    /// Creates a new [`TilingConfig`] with the specified tile shape.
    pub fn new(tile_shape: impl Into<Vec<usize>>) -> Self {
        Self {
            tile_shape: tile_shape.into(),
            ..Default::default()
        }
    }

    /// Sets the tile separation.
    pub fn with_separation(mut self, separation: impl Into<Vec<usize>>) -> Self {
        self.separation = Some(separation.into());
        self
    }

    /// Enables ROIs of the given shape, placed edge to edge.
    pub fn with_roi_shape(mut self, roi_shape: impl Into<Vec<usize>>) -> Self {
        self.roi_shape = Some(roi_shape.into());
        self
    }

    /// Sets the ROI separation.
    pub fn with_roi_separation(mut self, roi_separation: impl Into<Vec<usize>>) -> Self {
        self.roi_separation = Some(roi_separation.into());
        self
    }

    /// Sets the acceptance threshold.
    pub fn with_threshold(mut self, threshold: ThresholdConfig) -> Self {
        self.threshold = threshold;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        let ndim = self.tile_shape.len();
        if ndim == 0 {
            return Err(Error::InvalidConfig("tile_shape must not be empty".into()));
        }
        if self.tile_shape.contains(&0) {
            return Err(Error::InvalidConfig("tile_shape must be > 0 on every axis".into()));
        }
        check_axes("separation", self.separation.as_deref(), ndim)?;
        check_axes("roi_shape", self.roi_shape.as_deref(), ndim)?;
        check_axes("roi_separation", self.roi_separation.as_deref(), ndim)?;
        if self.roi_separation.is_some() && self.roi_shape.is_none() {
            return Err(Error::InvalidConfig(
                "roi_separation requires roi_shape".into(),
            ));
        }
        if let Some(roi) = &self.roi_shape {
            if roi.iter().zip(&self.tile_shape).any(|(r, t)| r > t) {
                warn!(
                    "ROI shape {:?} exceeds tile shape {:?}; tiles will hold no ROIs.",
                    roi, self.tile_shape
                );
            }
        }
        self.threshold.validate()
    }

    /// Lays out the tile grid for an image of the given shape.
    pub fn grid_for(&self, extent: &[usize]) -> Result<TileGrid> {
        TileGrid::new(extent, &self.tile_shape, self.separation.as_deref())
    }

    /// Lays out the ROI grid inside the tiles of `grid`, if ROIs are enabled.
    pub fn roi_grid_for(&self, grid: &TileGrid) -> Result<Option<TileGrid>> {
        self.roi_shape
            .as_deref()
            .map(|roi| grid.roi_grid(roi, self.roi_separation.as_deref()))
            .transpose()
    }
}

fn check_axes(name: &str, values: Option<&[usize]>, ndim: usize) -> Result<()> {
    let Some(values) = values else {
        return Ok(());
    };
    if values.len() != ndim {
        return Err(Error::InvalidConfig(format!(
            "{name} has {} axes, tile_shape has {ndim}",
            values.len()
        )));
    }
    if values.contains(&0) {
        return Err(Error::InvalidConfig(format!(
            "{name} must be > 0 on every axis"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_square_tiles() {
        let config = TilingConfig::default();
        assert_eq!(config.tile_shape, vec![64, 64]);
        config.validate().unwrap();
    }

    #[test]
    fn builder_sets_optional_fields() {
        let config = TilingConfig::new([32, 32])
            .with_separation([16, 16])
            .with_roi_shape([8, 8])
            .with_roi_separation([8, 8])
            .with_threshold(ThresholdConfig::new(20.0, 5.0));
        assert_eq!(config.separation, Some(vec![16, 16]));
        assert_eq!(config.roi_shape, Some(vec![8, 8]));
        assert_eq!(config.threshold.count_percent, 5.0);
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        assert!(TilingConfig::new(Vec::<usize>::new()).validate().is_err());
        assert!(TilingConfig::new([0, 4]).validate().is_err());
        assert!(TilingConfig::new([4, 4])
            .with_separation([4])
            .validate()
            .is_err());
        assert!(TilingConfig::new([4, 4])
            .with_roi_shape([2, 0])
            .validate()
            .is_err());
        assert!(TilingConfig::new([4, 4])
            .with_roi_separation([2, 2])
            .validate()
            .is_err());
        assert!(TilingConfig::new([4, 4])
            .with_threshold(ThresholdConfig::new(101.0, 0.0))
            .validate()
            .is_err());
    }

    #[test]
    fn grids_follow_config() {
        let config = TilingConfig::new([5, 5]).with_roi_shape([2, 2]);
        let grid = config.grid_for(&[10, 12]).unwrap();
        assert_eq!(grid.num_tiles(), &[2, 2]);
        assert_eq!(grid.offset(), &[0, 1]);
        let rois = config.roi_grid_for(&grid).unwrap().expect("rois enabled");
        assert_eq!(rois.num_tiles(), &[2, 2]);
        assert!(TilingConfig::new([5, 5])
            .roi_grid_for(&grid)
            .unwrap()
            .is_none());
    }
}
