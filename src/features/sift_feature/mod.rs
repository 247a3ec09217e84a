extern crate nalgebra as na;

use std::fmt;
use na::DMatrix;

use crate::Float;
use crate::pyramid::sift::sift_octave::SiftOctave;

pub mod processing;

/// Width of the border in which extrema are ignored
pub const IMAGE_BORDER: usize = 5;

/// Integer scale space location of a difference of gaussian extremum.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct SiftFeature {
    pub octave_level: usize,
    pub layer: usize,
    pub row: usize,
    pub col: usize
}

impl fmt::Display for SiftFeature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "o: {}, l: {}, r: {}, c: {}", self.octave_level, self.layer, self.row, self.col)
    }
}

/// Pixel threshold applied before the neighbourhood test, in 0..255 intensity units.
pub fn prefilter_threshold(contrast_threshold: Float, octave_layers: usize) -> Float {
    (0.5*contrast_threshold/(octave_layers as Float)*255.0).floor()
}

/// Scans one row of a difference of gaussian layer for scale space extrema. `layer` must be in `[1, s]`.
pub fn detect_sift_feature_in_row(source_octave: &SiftOctave, octave_level: usize, layer: usize, row: usize, threshold: Float) -> Vec<SiftFeature> {

    assert!(layer > 0 && layer+1 < source_octave.difference_of_gaussians.len());

    let image_buffer = &source_octave.difference_of_gaussians[layer].buffer;
    let prev_buffer = &source_octave.difference_of_gaussians[layer-1].buffer;
    let next_buffer = &source_octave.difference_of_gaussians[layer+1].buffer;
    let cols = image_buffer.ncols();

    if row < IMAGE_BORDER || row + IMAGE_BORDER >= image_buffer.nrows() || cols <= 2*IMAGE_BORDER {
        return Vec::new();
    }

    (IMAGE_BORDER..cols-IMAGE_BORDER).filter(|&col| {
        let sample_value = image_buffer[(row,col)];
        sample_value.abs() > threshold && is_scale_space_extremum(sample_value, row, col, [prev_buffer, image_buffer, next_buffer])
    }).map(|col| SiftFeature{octave_level, layer, row, col}).collect()
}

/// Ties count: a maximum is `>=` all 26 neighbours and positive, a minimum `<=` all of them and negative.
fn is_scale_space_extremum(sample: Float, row: usize, col: usize, buffers: [&DMatrix<Float>;3]) -> bool {
    match sample {
        v if v > 0.0 => buffers.iter().all(|buffer| neighbourhood(buffer, row, col).all(|n| v >= n)),
        v if v < 0.0 => buffers.iter().all(|buffer| neighbourhood(buffer, row, col).all(|n| v <= n)),
        _ => false
    }
}

fn neighbourhood<'a>(buffer: &'a DMatrix<Float>, row: usize, col: usize) -> impl Iterator<Item=Float> + 'a {
    (row-1..row+2).flat_map(move |r| (col-1..col+2).map(move |c| buffer[(r,c)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Image, image_encoding::ImageEncoding};

    fn octave_with_peak(value: Float) -> SiftOctave {
        let size = 15;
        let flat = || Image::from_matrix(DMatrix::<Float>::zeros(size, size), ImageEncoding::F32);
        let mut center = DMatrix::<Float>::zeros(size, size);
        center[(7,7)] = value;
        center[(7,8)] = value*0.5;
        let difference_of_gaussians = vec![flat(), Image::from_matrix(center, ImageEncoding::F32), flat()];
        let images = (0..4).map(|_| flat()).collect();
        SiftOctave{images, difference_of_gaussians}
    }

    #[test]
    fn threshold_matches_default_configuration() {
        assert_eq!(prefilter_threshold(0.04, 3), 1.0);
    }

    #[test]
    fn isolated_maximum_and_minimum_are_found() {
        let octave = octave_with_peak(10.0);
        let features = detect_sift_feature_in_row(&octave, 0, 1, 7, 1.0);
        assert_eq!(features, vec![SiftFeature{octave_level: 0, layer: 1, row: 7, col: 7}]);

        let octave = octave_with_peak(-10.0);
        let features = detect_sift_feature_in_row(&octave, 0, 1, 7, 1.0);
        assert_eq!(features.len(), 1);
    }

    #[test]
    fn weak_peak_and_border_rows_are_ignored() {
        let octave = octave_with_peak(1.0);
        assert!(detect_sift_feature_in_row(&octave, 0, 1, 7, 1.0).is_empty());
        let octave = octave_with_peak(10.0);
        assert!(detect_sift_feature_in_row(&octave, 0, 1, 2, 1.0).is_empty());
    }
}
