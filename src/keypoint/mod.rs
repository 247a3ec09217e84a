extern crate image as image_rs;

use std::cmp::Ordering;
use image_rs::GrayImage;

use crate::Float;
use crate::descriptor::keypoint::{KeyPoint, OctaveCode};

fn position_order(a: &KeyPoint, b: &KeyPoint) -> Ordering {
    a.x.total_cmp(&b.x)
        .then(a.y.total_cmp(&b.y))
        .then(a.size.total_cmp(&b.size))
        .then(a.angle.total_cmp(&b.angle))
}

/// Keeps one keypoint per distinct `(x, y, size, angle)`. The result is sorted by those fields.
pub fn remove_duplicated(keypoints: &mut Vec<KeyPoint>) -> () {
    keypoints.sort_by(position_order);
    keypoints.dedup_by(|a, b| position_order(a, b) == Ordering::Equal);
}

/// Drops keypoints whose nearest mask pixel is zero or outside the mask.
/// `coordinate_scale` maps keypoint coordinates into the mask frame.
pub fn run_by_pixels_mask(keypoints: &mut Vec<KeyPoint>, mask: &GrayImage, coordinate_scale: Float) -> () {
    let (width, height) = mask.dimensions();
    keypoints.retain(|keypoint| {
        let x = (keypoint.x*coordinate_scale).round();
        let y = (keypoint.y*coordinate_scale).round();
        match x >= 0.0 && y >= 0.0 && (x as u32) < width && (y as u32) < height {
            true => mask.get_pixel(x as u32, y as u32).0[0] != 0,
            false => false
        }
    });
}

/// Keeps the `n_points` strongest responses, 0 keeps everything.
pub fn retain_best(keypoints: &mut Vec<KeyPoint>, n_points: usize) -> () {
    if n_points == 0 || keypoints.len() <= n_points {
        return;
    }
    keypoints.select_nth_unstable_by(n_points - 1, |a, b| b.response.total_cmp(&a.response));
    keypoints.truncate(n_points);
}

/// Maps keypoints found on the doubled base image back into the input frame.
pub fn rescale_for_first_octave(keypoints: &mut Vec<KeyPoint>, first_octave: i32) -> () {
    if first_octave >= 0 {
        return;
    }
    let scale = (first_octave as Float).exp2();
    for keypoint in keypoints.iter_mut() {
        let code = keypoint.octave_code;
        keypoint.octave_code = OctaveCode::new(code.octave.wrapping_add(first_octave as i8), code.layer, code.offset);
        keypoint.x *= scale;
        keypoint.y *= scale;
        keypoint.size *= scale;
    }
}
