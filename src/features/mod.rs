use crate::Float;

pub mod sift_feature;
pub mod hessian_response;

pub trait Feature {
    fn get_x_image_float(&self) -> Float;
    fn get_y_image_float(&self) -> Float;
    /// Nearest pixel column
    fn get_x_image(&self) -> usize {
        (self.get_x_image_float() + 0.5).max(0.0) as usize
    }
    /// Nearest pixel row
    fn get_y_image(&self) -> usize {
        (self.get_y_image_float() + 0.5).max(0.0) as usize
    }
}

pub trait Oriented {
    /// Degrees in `[0,360)`
    fn get_orientation(&self) -> Float;
}
