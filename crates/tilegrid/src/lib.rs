#![forbid(unsafe_code)]
//! tilegrid: tile grids, nested ROIs, threshold acceptance and per-tile reconstruction
//! for scientific images.
//!
//! Modules:
//! - grid: grid sizing and centering, lazy tile/ROI window enumeration, array slicing, labels
//! - threshold: bright-pixel acceptance predicate
//! - reconstruct: rebuild per-tile / per-ROI images from labeled measurements
//! - reduce: forward per-tile reductions producing those measurements
//! - pipeline: typed configuration, runner over images and stacks, events
//!
//! Everything here is pure and synchronous; image I/O belongs to the caller.
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod reconstruct;
pub mod reduce;
pub mod threshold;

/// Convenient re-exports for common types. Import with `use tilegrid::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grid::{
        calculate_number_of_tiles, generate_tile, generate_tile_start_end_index,
        parse_record_label, roi_record_label, tile_record_label, NestedWindow, NestedWindows,
        TileGrid, TileIndex, TileWindow, TileWindows, Tiles,
    };
    pub use crate::pipeline::{
        run_tiling, run_tiling_stack, AcceptedTile, EventSink, FnSink, MultiSink, TilingConfig,
        TilingEvent, TilingEventKind, TilingResult, TilingRunner, VecSink,
    };
    pub use crate::reconstruct::{
        build_labels, build_roi_labels, roi_values_to_image, tile_values_to_image,
    };
    pub use crate::reduce::{reduce_tiles, reduce_tiles_labeled};
    pub use crate::threshold::{
        count_above, tile_passes_threshold, ThresholdConfig, DEFAULT_INPUT_MAX,
    };
}
