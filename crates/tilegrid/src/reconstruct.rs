//! Rebuilding coarse images from per-tile and per-ROI measurements.
//!
//! Measurements are keyed by one-based record labels (see [`crate::grid::index`]). The
//! output holds one cell per tile, or per ROI, never per pixel.
//!
//! Axis convention: the label's `x` addresses axis 0 and its `y` addresses axis 1, the same
//! order as [`TileIndex`] coordinates. Both functions follow it; nothing is transposed.
use std::collections::BTreeMap;

use ndarray::{Array2, ArrayBase, Data, Ix2};
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::grid::{parse_record_label, roi_record_label, tile_record_label, TileIndex};

/// Output shapes must be allocatable: the non-zero axes multiply to at most `isize::MAX`.
fn checked_shape(rows: usize, cols: usize) -> Result<(usize, usize)> {
    match rows.max(1).checked_mul(cols.max(1)) {
        Some(n) if n <= isize::MAX as usize => Ok((rows, cols)),
        _ => Err(Error::invalid_argument(format!(
            "output shape {rows}x{cols} is too large"
        ))),
    }
}

/// Writes each `(tile label, value)` into a zero-filled array of shape `dims`.
///
/// Fails on the first unparsable label or on a label outside `dims`. A label appearing
/// twice keeps its last value.
pub fn tile_values_to_image<I, K, A>(values: I, dims: (usize, usize)) -> Result<Array2<A>>
where
    I: IntoIterator<Item = (K, A)>,
    K: AsRef<str>,
    A: Clone + Zero,
{
    let mut image = Array2::zeros(checked_shape(dims.0, dims.1)?);
    for (label, value) in values {
        let label = label.as_ref();
        let (x, y) = parse_record_label(label)?;
        let cell = image.get_mut((x, y)).ok_or_else(|| {
            Error::invalid_argument(format!(
                "tile label '{label}' lies outside a {}x{} grid",
                dims.0, dims.1
            ))
        })?;
        *cell = value;
    }
    Ok(image)
}

/// Writes each `(tile label, ROI label, value)` into an array with one cell per ROI.
///
/// The output shape is `tile_dims * rois_per_tile` per axis and the ROI at `(rx, ry)` of tile
/// `(tx, ty)` lands at `[tx * rois_per_tile.0 + rx, ty * rois_per_tile.1 + ry]`. Values at or
/// below `threshold` are skipped and leave the zero fill in place; their labels are still
/// checked.
pub fn roi_values_to_image<I, T, R, A>(
    values: I,
    tile_dims: (usize, usize),
    rois_per_tile: (usize, usize),
    threshold: Option<A>,
) -> Result<Array2<A>>
where
    I: IntoIterator<Item = (T, R, A)>,
    T: AsRef<str>,
    R: AsRef<str>,
    A: Clone + Zero + PartialOrd,
{
    let dims = match (
        tile_dims.0.checked_mul(rois_per_tile.0),
        tile_dims.1.checked_mul(rois_per_tile.1),
    ) {
        (Some(rows), Some(cols)) => checked_shape(rows, cols)?,
        _ => {
            return Err(Error::invalid_argument(format!(
                "{tile_dims:?} tiles of {rois_per_tile:?} ROIs overflow the output shape"
            )))
        }
    };
    let mut image = Array2::zeros(dims);
    for (tile_label, roi_label, value) in values {
        let (tile_label, roi_label) = (tile_label.as_ref(), roi_label.as_ref());
        let (tx, ty) = parse_record_label(tile_label)?;
        let (rx, ry) = parse_record_label(roi_label)?;
        if tx >= tile_dims.0 || ty >= tile_dims.1 {
            return Err(Error::invalid_argument(format!(
                "tile label '{tile_label}' lies outside a {}x{} grid",
                tile_dims.0, tile_dims.1
            )));
        }
        if rx >= rois_per_tile.0 || ry >= rois_per_tile.1 {
            return Err(Error::invalid_argument(format!(
                "ROI label '{roi_label}' lies outside a {}x{} tile",
                rois_per_tile.0, rois_per_tile.1
            )));
        }
        if threshold.as_ref().is_some_and(|t| value <= *t) {
            continue;
        }
        image[[tx * rois_per_tile.0 + rx, ty * rois_per_tile.1 + ry]] = value;
    }
    Ok(image)
}

/// Labels every cell of a per-tile array with its one-based tile record label.
///
/// `tile_values_to_image(build_labels(&a), a.dim())` rebuilds `a`.
pub fn build_labels<S, A>(array: &ArrayBase<S, Ix2>) -> BTreeMap<String, A>
where
    S: Data<Elem = A>,
    A: Clone,
{
    array
        .indexed_iter()
        .map(|((x, y), v)| (tile_record_label(x, y), v.clone()))
        .collect()
}

/// Splits a per-ROI array into `(tile label, ROI label, value)` records.
///
/// The inverse of [`roi_values_to_image`] without threshold. Fails when the array shape is
/// not a multiple of `rois_per_tile`.
pub fn build_roi_labels<S, A>(
    array: &ArrayBase<S, Ix2>,
    rois_per_tile: (usize, usize),
) -> Result<Vec<(String, String, A)>>
where
    S: Data<Elem = A>,
    A: Clone,
{
    let (rows, cols) = array.dim();
    let (rx, ry) = rois_per_tile;
    if rx == 0 || ry == 0 || rows % rx != 0 || cols % ry != 0 {
        return Err(Error::invalid_argument(format!(
            "array of shape {rows}x{cols} is not divisible into {rx}x{ry} ROIs per tile"
        )));
    }
    Ok(array
        .indexed_iter()
        .map(|((x, y), v)| {
            let tile = TileIndex::from((x / rx, y / ry));
            (
                tile.record_label(),
                roi_record_label(x % rx, y % ry),
                v.clone(),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ndarray::{arr2, Array2};

    use super::*;

    #[test]
    fn writes_values_at_label_coordinates() {
        let values = vec![("1x-1y", 1.0), ("2x-3y", 5.0), ("12x-7y", 9.0)];
        let image = tile_values_to_image(values, (12, 7)).unwrap();
        assert_eq!(image.dim(), (12, 7));
        assert_eq!(image[[0, 0]], 1.0);
        assert_eq!(image[[1, 2]], 5.0);
        assert_eq!(image[[11, 6]], 9.0);
        assert_eq!(image.iter().filter(|v| **v != 0.0).count(), 3);
    }

    #[test]
    fn round_trip_through_labels() {
        let original = Array2::from_shape_fn((4, 6), |(r, c)| (r * 10 + c) as i64 - 7);
        let labels = build_labels(&original);
        assert_eq!(labels.len(), 24);
        assert_eq!(labels["1x-1y"], -7);
        let rebuilt = tile_values_to_image(labels, original.dim()).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn accepts_borrowed_map_entries() {
        let mut values: HashMap<String, f32> = HashMap::new();
        values.insert("2x-1y".into(), 0.5);
        let image =
            tile_values_to_image(values.iter().map(|(k, v)| (k, *v)), (2, 2)).unwrap();
        assert_eq!(image, arr2(&[[0.0, 0.0], [0.5, 0.0]]));
    }

    #[test]
    fn label_without_two_groups_is_parse_error() {
        let err = tile_values_to_image(vec![("1x-1y", 1), ("tile7", 2)], (2, 2)).unwrap_err();
        assert!(matches!(err, Error::Parse { ref label } if label == "tile7"));
    }

    #[test]
    fn label_outside_dims_is_rejected() {
        let err = tile_values_to_image(vec![("3x-1y", 1)], (2, 2)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn roi_values_land_in_global_cells() {
        let values = vec![
            ("1x-1y", "ROI1x1y", 1.0),
            ("1x-1y", "ROI2x1y", 2.0),
            ("2x-1y", "ROI1x2y", 3.0),
            ("2x-2y", "ROI2x2y", 4.0),
        ];
        let image = roi_values_to_image(values, (2, 2), (2, 2), None).unwrap();
        assert_eq!(image.dim(), (4, 4));
        assert_eq!(image[[0, 0]], 1.0);
        assert_eq!(image[[1, 0]], 2.0);
        assert_eq!(image[[2, 1]], 3.0);
        assert_eq!(image[[3, 3]], 4.0);
    }

    #[test]
    fn roi_threshold_suppresses_small_values() {
        let values = vec![
            ("1x-1y", "ROI1x1y", 0.2),
            ("1x-1y", "ROI1x2y", 0.5),
            ("1x-1y", "ROI2x1y", 0.9),
        ];
        let image = roi_values_to_image(values, (1, 1), (2, 2), Some(0.5)).unwrap();
        assert_eq!(image, arr2(&[[0.0, 0.0], [0.9, 0.0]]));
    }

    #[test]
    fn roi_threshold_still_checks_labels() {
        let values = vec![("1x-1y", "ROI", 0.0)];
        assert!(matches!(
            roi_values_to_image(values, (1, 1), (2, 2), Some(1.0)),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn roi_outside_tile_is_rejected() {
        let values = vec![("1x-1y", "ROI3x1y", 1.0)];
        assert!(matches!(
            roi_values_to_image(values, (1, 1), (2, 2), None),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversized_tile_dims_are_rejected() {
        let err = tile_values_to_image(Vec::<(&str, f64)>::new(), (usize::MAX, 2)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn roi_output_shape_overflow_is_rejected() {
        let none = Vec::<(&str, &str, f64)>::new();
        assert!(matches!(
            roi_values_to_image(none.clone(), (usize::MAX, 1), (2, 1), None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            roi_values_to_image(none.clone(), (1 << 40, 1), (1, 1 << 40), None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(roi_values_to_image(none.clone(), (0, usize::MAX), (3, 1), None).is_err());
        assert_eq!(
            roi_values_to_image(none, (0, 5), (3, 1), None).unwrap().dim(),
            (0, 5)
        );
    }

    #[test]
    fn roi_round_trip_through_labels() {
        let original = Array2::from_shape_fn((6, 4), |(r, c)| (r * 4 + c) as f64 + 1.0);
        let records = build_roi_labels(&original, (3, 2)).unwrap();
        assert_eq!(records[0], ("1x-1y".to_string(), "ROI1x1y".to_string(), 1.0));
        let rebuilt = roi_values_to_image(records, (2, 2), (3, 2), None).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn build_roi_labels_requires_divisible_shape() {
        let array = Array2::<f64>::zeros((5, 4));
        assert!(build_roi_labels(&array, (2, 2)).is_err());
        assert!(build_roi_labels(&array, (0, 2)).is_err());
    }
}
