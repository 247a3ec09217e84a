//! Scale invariant feature transform: scale space extrema detection and
//! 128 element gradient descriptors for 8-bit grayscale images.

pub mod error;
pub mod image;
pub mod pyramid;
pub mod features;
pub mod descriptor;
pub mod keypoint;
pub mod detector;
pub mod visualize;

pub use self::error::{Result, SiftError};
pub use self::descriptor::keypoint::{KeyPoint, OctaveCode};
pub use self::detector::{descriptors_to_u8, SiftDetector};
pub use self::pyramid::sift::sift_runtime_params::SiftRuntimeParams;

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

define_float!(f32);

#[repr(u8)]
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum GradientDirection {
    HORIZONTAL,
    VERTICAL
}
