#![forbid(unsafe_code)]

mod imaging;

pub use imaging::{
    init_tracing, load_config, load_gray_png, normalize_to_u8, save_gray_png, synthetic_image,
};
