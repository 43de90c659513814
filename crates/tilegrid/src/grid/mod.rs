//! Tile grid subsystem: sizing, window enumeration, nested ROIs and array slicing.
//!
//! A [`TileGrid`] is a pure function of an extent, a tile shape and a separation. ROIs use
//! the same layout recursively with the tile shape as their extent.
pub mod index;
pub mod layout;
pub mod tiles;
pub mod windows;

pub use index::{
    digit_groups, parse_record_label, roi_record_label, tile_record_label, TileIndex,
};
pub use layout::{calculate_number_of_tiles, TileGrid};
pub use tiles::{generate_tile, Tiles};
pub use windows::{generate_tile_start_end_index, NestedWindow, NestedWindows, TileWindow, TileWindows};
