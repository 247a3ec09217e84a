use crate::Float;
use crate::image::Image;

pub mod keypoint;
pub mod orientation_histogram;
pub mod local_image_descriptor;
pub mod feature_vector;

/// Spatial cells per side of the descriptor grid
pub const DESCRIPTOR_WIDTH: usize = 4;
pub const ORIENTATION_BINS: usize = 8;
pub const DESCRIPTOR_SIZE: usize = DESCRIPTOR_WIDTH*DESCRIPTOR_WIDTH*ORIENTATION_BINS;

/// Central difference gradient `(dx, dy)` with the y axis pointing up.
pub fn gradient(image: &Image, row: usize, col: usize) -> (Float,Float) {
    let buffer = &image.buffer;
    let dx = buffer[(row,col+1)] - buffer[(row,col-1)];
    let dy = buffer[(row-1,col)] - buffer[(row+1,col)];
    (dx,dy)
}

/// Magnitude and orientation in degrees `[0,360)`.
pub fn gradient_and_orientation(dx: Float, dy: Float) -> (Float,Float) {
    let magnitude = (dx.powi(2) + dy.powi(2)).sqrt();
    let orientation = match dy.atan2(dx).to_degrees() {
        angle if angle < 0.0 => angle + 360.0,
        angle if angle >= 360.0 => angle - 360.0,
        angle => angle
    };

    (magnitude,orientation)
}

/// Vertex offset of the parabola through `(-1,left)`, `(0,center)`, `(1,right)`.
pub fn parabolic_peak_offset(left: Float, center: Float, right: Float) -> Float {
    0.5*(left-right)/(left - 2.0*center + right)
}

/// Wraps into `[0,360)`, mapping `360` (and float noise just below it) back to `0`.
pub fn normalize_angle(angle: Float) -> Float {
    let wrapped = match angle {
        a if a < 0.0 => a + 360.0,
        a if a >= 360.0 => a - 360.0,
        a => a
    };
    match wrapped {
        a if a >= 360.0 || (a - 360.0).abs() < Float::EPSILON => 0.0,
        a => a
    }
}
