//! Tiling pipeline: typed configuration, a runner that applies grid and threshold to
//! images or plane stacks, and events for observing runs.
pub mod config;
pub mod events;
pub mod runner;

pub use config::{TilingConfig, DEFAULT_TILE_EDGE};
pub use events::{EventSink, FnSink, MultiSink, TilingEvent, TilingEventKind, VecSink};
pub use runner::{run_tiling, run_tiling_stack, AcceptedTile, TilingResult, TilingRunner};
