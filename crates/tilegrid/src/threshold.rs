//! Tile acceptance by bright-pixel count.
//!
//! A tile passes when at least `count_percent` of its pixels are strictly brighter than
//! `intensity_percent` of the image's maximum value. Raising either percentage can only
//! turn a passing tile into a failing one.
use ndarray::{ArrayBase, Data, Dimension};
use num_traits::ToPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum value of 8-bit images, used when no other maximum is supplied.
pub const DEFAULT_INPUT_MAX: f64 = 255.0;

/// Parameters of [`tile_passes_threshold`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ThresholdConfig {
    /// Intensity cutoff as a percentage of `input_max`, in \[0, 100\].
    pub intensity_percent: f64,
    /// Required share of bright pixels as a percentage of the tile size, in \[0, 100\].
    pub count_percent: f64,
    /// Maximum value the image can hold.
    pub input_max: f64,
}

impl Default for ThresholdConfig {
    /// Accepts every tile.
    fn default() -> Self {
        Self {
            intensity_percent: 0.0,
            count_percent: 0.0,
            input_max: DEFAULT_INPUT_MAX,
        }
    }
}

impl ThresholdConfig {
    pub fn new(intensity_percent: f64, count_percent: f64) -> Self {
        Self {
            intensity_percent,
            count_percent,
            ..Default::default()
        }
    }

    /// Sets the image maximum the intensity percentage refers to.
    pub fn with_input_max(mut self, input_max: f64) -> Self {
        self.input_max = input_max;
        self
    }

    /// Intensity a pixel must exceed to count as bright.
    pub fn intensity_cutoff(&self) -> f64 {
        self.input_max * self.intensity_percent / 100.0
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        let percent = 0.0..=100.0;
        if !percent.contains(&self.intensity_percent) {
            return Err(Error::InvalidConfig(format!(
                "intensity_percent must be in [0, 100], got {}",
                self.intensity_percent
            )));
        }
        if !percent.contains(&self.count_percent) {
            return Err(Error::InvalidConfig(format!(
                "count_percent must be in [0, 100], got {}",
                self.count_percent
            )));
        }
        if !self.input_max.is_finite() {
            return Err(Error::InvalidConfig("input_max must be finite".into()));
        }
        Ok(())
    }

    /// Applies [`tile_passes_threshold`] with these parameters.
    pub fn passes<S, D>(&self, tile: &ArrayBase<S, D>) -> bool
    where
        S: Data,
        S::Elem: ToPrimitive,
        D: Dimension,
    {
        tile_passes_threshold(
            tile,
            self.intensity_percent,
            self.count_percent,
            self.input_max,
        )
    }
}

/// Counts pixels strictly greater than `cutoff`.
///
/// Pixels that cannot be represented as `f64` never count.
pub fn count_above<S, D>(tile: &ArrayBase<S, D>, cutoff: f64) -> usize
where
    S: Data,
    S::Elem: ToPrimitive,
    D: Dimension,
{
    tile.iter()
        .filter(|v| v.to_f64().is_some_and(|v| v > cutoff))
        .count()
}

/// Decides whether a tile holds enough bright signal to be worth processing.
///
/// An empty tile needs zero bright pixels, so it passes at every `count_percent`.
pub fn tile_passes_threshold<S, D>(
    tile: &ArrayBase<S, D>,
    intensity_percent: f64,
    count_percent: f64,
    input_max: f64,
) -> bool
where
    S: Data,
    S::Elem: ToPrimitive,
    D: Dimension,
{
    let intensity_cutoff = input_max * intensity_percent / 100.0;
    let count_cutoff = tile.len() as f64 * count_percent / 100.0;
    count_above(tile, intensity_cutoff) as f64 >= count_cutoff
}
