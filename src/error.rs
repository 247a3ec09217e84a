extern crate image as image_rs;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiftError>;

#[derive(Debug, Error)]
pub enum SiftError {
    #[error("image is empty")]
    EmptyImage,
    #[error("image has incorrect depth: {0:?}, expected 8 bits per channel")]
    UnsupportedDepth(image_rs::ColorType),
    #[error("mask is {mask_width}x{mask_height}, image is {image_width}x{image_height}")]
    MaskSizeMismatch {
        mask_width: u32,
        mask_height: u32,
        image_width: u32,
        image_height: u32,
    },
    #[error("provided keypoint has octave {octave}, layer {layer}: outside of the pyramid built with {octave_layers} layers per octave")]
    KeyPointOutOfPyramid {
        octave: i32,
        layer: usize,
        octave_layers: usize,
    },
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("failed to parse runtime parameters")]
    Config(#[from] serde_yaml::Error),
    #[error("failed to read runtime parameters")]
    Io(#[from] std::io::Error),
}
