use std::time::Duration;

use criterion::{Criterion, Throughput};
use ndarray::Array2;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Deterministic 8-bit test image with bright diagonal bands.
#[allow(dead_code)]
pub fn banded_image(size: usize) -> Array2<u8> {
    Array2::from_shape_fn((size, size), |(r, c)| {
        if ((r + c) / 32) % 3 == 0 {
            220
        } else {
            ((r * 7 + c * 13) % 96) as u8
        }
    })
}
