//! High-level runner applying a tile grid and acceptance threshold to images and stacks.
use ndarray::{ArrayBase, ArrayView2, Data, Ix2, Ix3};
use num_traits::ToPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::grid::TileWindow;
use crate::pipeline::config::TilingConfig;
use crate::pipeline::events::{EventSink, TilingEvent, TilingEventKind};

/// A tile that passed the threshold, with its ROIs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcceptedTile {
    /// Pixel window of the tile.
    pub window: TileWindow,
    /// ROIs in image pixel coordinates. Each index is the ROI's position inside the tile.
    pub rois: Vec<TileWindow>,
    /// Plane of a stack the tile was taken from; `None` for single images.
    pub plane: Option<usize>,
}

impl AcceptedTile {
    /// Zero-based enumeration label of the tile.
    pub fn label(&self) -> String {
        self.window.label()
    }

    /// One-based record label of the tile.
    pub fn record_label(&self) -> String {
        self.window.index.record_label()
    }
}

/// Result of a tiling run.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct TilingResult {
    /// Tiles that passed the threshold, in enumeration order (plane-major for stacks).
    pub accepted: Vec<AcceptedTile>,
    /// Total tiles tested.
    pub tiles_evaluated: usize,
    /// Total tiles rejected.
    pub tiles_rejected: usize,
}

impl TilingResult {
    /// Creates a new empty [`TilingResult`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of evaluated tiles that were accepted; `0.0` when nothing was evaluated.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.tiles_evaluated == 0 {
            return 0.0;
        }
        self.accepted.len() as f64 / self.tiles_evaluated as f64
    }
}

pub struct TilingRunner {
    /// Run configuration applied to this runner.
    pub config: TilingConfig,
}

impl TilingRunner {
    pub fn try_new(config: TilingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Tiles a single image.
    pub fn run<S>(&self, image: &ArrayBase<S, Ix2>) -> Result<TilingResult>
    where
        S: Data,
        S::Elem: ToPrimitive,
    {
        run_image_internal(&self.config, image, &mut ())
    }

    pub fn run_with_events<S>(
        &self,
        image: &ArrayBase<S, Ix2>,
        sink: &mut dyn EventSink,
    ) -> Result<TilingResult>
    where
        S: Data,
        S::Elem: ToPrimitive,
    {
        run_image_internal(&self.config, image, sink)
    }

    /// Tiles every plane of a stack along axis 0.
    pub fn run_stack<S>(&self, stack: &ArrayBase<S, Ix3>) -> Result<TilingResult>
    where
        S: Data,
        S::Elem: ToPrimitive,
    {
        run_stack_internal(&self.config, stack, &mut ())
    }

    pub fn run_stack_with_events<S>(
        &self,
        stack: &ArrayBase<S, Ix3>,
        sink: &mut dyn EventSink,
    ) -> Result<TilingResult>
    where
        S: Data,
        S::Elem: ToPrimitive,
    {
        run_stack_internal(&self.config, stack, sink)
    }
}

/// Tiles a single image with `config`, validating it first.
pub fn run_tiling<S>(
    image: &ArrayBase<S, Ix2>,
    config: &TilingConfig,
    sink: Option<&mut dyn EventSink>,
) -> Result<TilingResult>
where
    S: Data,
    S::Elem: ToPrimitive,
{
    config.validate()?;
    if let Some(s) = sink {
        run_image_internal(config, image, s)
    } else {
        run_image_internal(config, image, &mut ())
    }
}

/// Tiles every plane of a stack along axis 0 with `config`, validating it first.
pub fn run_tiling_stack<S>(
    stack: &ArrayBase<S, Ix3>,
    config: &TilingConfig,
    sink: Option<&mut dyn EventSink>,
) -> Result<TilingResult>
where
    S: Data,
    S::Elem: ToPrimitive,
{
    config.validate()?;
    if let Some(s) = sink {
        run_stack_internal(config, stack, s)
    } else {
        run_stack_internal(config, stack, &mut ())
    }
}

fn run_image_internal<S>(
    config: &TilingConfig,
    image: &ArrayBase<S, Ix2>,
    sink: &mut dyn EventSink,
) -> Result<TilingResult>
where
    S: Data,
    S::Elem: ToPrimitive,
{
    let planes = std::iter::once((None, image.view()));
    run_planes(config, image.shape(), 1, planes, sink)
}

fn run_stack_internal<S>(
    config: &TilingConfig,
    stack: &ArrayBase<S, Ix3>,
    sink: &mut dyn EventSink,
) -> Result<TilingResult>
where
    S: Data,
    S::Elem: ToPrimitive,
{
    let plane_count = stack.shape()[0];
    if plane_count == 0 {
        warn!("Stack has no planes.");
        if sink.wants(TilingEventKind::Warning) {
            sink.send(TilingEvent::Warning {
                context: "stack".into(),
                message: "Stack has no planes".into(),
            });
        }
    }
    let planes = stack
        .outer_iter()
        .enumerate()
        .map(|(i, plane)| (Some(i), plane));
    run_planes(config, &stack.shape()[1..], plane_count, planes, sink)
}

fn run_planes<'a, A, I>(
    config: &TilingConfig,
    plane_shape: &[usize],
    plane_count: usize,
    planes: I,
    sink: &mut dyn EventSink,
) -> Result<TilingResult>
where
    A: ToPrimitive + 'a,
    I: IntoIterator<Item = (Option<usize>, ArrayView2<'a, A>)>,
{
    let grid = config.grid_for(plane_shape)?;
    let roi_grid = config.roi_grid_for(&grid)?;

    if sink.wants(TilingEventKind::RunStarted) {
        sink.send(TilingEvent::RunStarted {
            config: config.clone(),
            plane_count,
            tiles_per_plane: grid.tile_count(),
        });
    }

    if grid.is_empty() {
        warn!(
            "Plane of shape {:?} holds no {:?} tiles.",
            plane_shape, config.tile_shape
        );
        if sink.wants(TilingEventKind::Warning) {
            sink.send(TilingEvent::Warning {
                context: "grid".into(),
                message: format!("Plane of shape {plane_shape:?} holds no tiles"),
            });
        }
    }

    let mut result = TilingResult::new();
    for (plane, view) in planes {
        if let Some(index) = plane {
            debug!("Plane {}.", index);
            if sink.wants(TilingEventKind::PlaneStarted) {
                sink.send(TilingEvent::PlaneStarted { plane: index });
            }
        }

        for window in grid.windows() {
            let tile = window.slice_in_bounds(&view);
            let accepted = config.threshold.passes(&tile);
            result.tiles_evaluated += 1;

            if sink.wants(TilingEventKind::TileEvaluated) {
                sink.send(TilingEvent::TileEvaluated {
                    plane,
                    window: window.clone(),
                    accepted,
                });
            }
            if !accepted {
                result.tiles_rejected += 1;
                continue;
            }

            let rois = roi_grid
                .as_ref()
                .map(|rois| {
                    rois.windows()
                        .map(|roi| roi.translated(&window.start))
                        .collect()
                })
                .unwrap_or_default();
            let tile = AcceptedTile {
                window,
                rois,
                plane,
            };
            if sink.wants(TilingEventKind::TileAccepted) {
                sink.send(TilingEvent::TileAccepted { tile: tile.clone() });
            }
            result.accepted.push(tile);
        }
    }

    info!(
        "Tiling finished | accepted: {} | rejected: {} | evaluated: {}.",
        result.accepted.len(),
        result.tiles_rejected,
        result.tiles_evaluated,
    );

    if sink.wants(TilingEventKind::RunFinished) {
        sink.send(TilingEvent::RunFinished {
            result: result.clone(),
        });
    }

    Ok(result)
}
