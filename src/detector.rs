extern crate image as image_rs;
extern crate nalgebra as na;

use image_rs::{DynamicImage, GrayImage};
use log::{debug, warn};
use na::DMatrix;

use crate::Float;
use crate::error::{Result, SiftError};
use crate::image::Image;
use crate::keypoint;
use crate::descriptor::{DESCRIPTOR_SIZE, keypoint::KeyPoint};
use crate::pyramid::sift::{self as sift_pyramid, sift_runtime_params::SiftRuntimeParams};

#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum NormType {
    L2
}

/// Scale invariant keypoint detector and descriptor extractor.
#[derive(Debug,Clone,Default)]
pub struct SiftDetector {
    pub runtime_params: SiftRuntimeParams
}

impl SiftDetector {

    pub const DESCRIPTOR_SIZE: usize = DESCRIPTOR_SIZE;
    pub const DEFAULT_NORM: NormType = NormType::L2;

    pub fn new(runtime_params: SiftRuntimeParams) -> Result<SiftDetector> {
        runtime_params.validate()?;
        Ok(SiftDetector{runtime_params})
    }

    pub fn descriptor_size(&self) -> usize {
        SiftDetector::DESCRIPTOR_SIZE
    }

    pub fn default_norm(&self) -> NormType {
        SiftDetector::DEFAULT_NORM
    }

    /// Keypoints in the coordinate frame of `image`, restricted to non zero `mask` pixels if a mask is given.
    pub fn detect(&self, image: &DynamicImage, mask: Option<&GrayImage>) -> Result<Vec<KeyPoint>> {
        let (keypoints, _) = self.run(image, mask, None, false)?;
        Ok(keypoints)
    }

    /// Descriptors for keypoints carrying their octave code, e.g. from a previous call to `detect`.
    /// Row `i` of the result belongs to `keypoints[i]`.
    pub fn compute(&self, image: &DynamicImage, keypoints: &[KeyPoint]) -> Result<DMatrix<f32>> {
        let (_, descriptors) = self.run(image, None, Some(keypoints.to_vec()), true)?;
        Ok(descriptors.unwrap_or_else(|| DMatrix::<f32>::zeros(0, DESCRIPTOR_SIZE)))
    }

    /// Detects (unless `provided_keypoints` is given) and describes in one pass over a single pyramid.
    /// The mask only applies to detection.
    pub fn detect_and_compute(&self, image: &DynamicImage, mask: Option<&GrayImage>, provided_keypoints: Option<Vec<KeyPoint>>) -> Result<(Vec<KeyPoint>, DMatrix<f32>)> {
        let (keypoints, descriptors) = self.run(image, mask, provided_keypoints, true)?;
        let descriptors = descriptors.unwrap_or_else(|| DMatrix::<f32>::zeros(keypoints.len(), DESCRIPTOR_SIZE));
        Ok((keypoints, descriptors))
    }

    fn run(&self, image: &DynamicImage, mask: Option<&GrayImage>, provided_keypoints: Option<Vec<KeyPoint>>, compute_descriptors: bool) -> Result<(Vec<KeyPoint>, Option<DMatrix<f32>>)> {
        let runtime_params = &self.runtime_params;
        runtime_params.validate()?;
        let gray = Image::from_dynamic_image(image)?;

        if let Some(mask) = mask {
            let (image_width, image_height) = (gray.width() as u32, gray.height() as u32);
            let (mask_width, mask_height) = mask.dimensions();
            if (mask_width, mask_height) != (image_width, image_height) {
                return Err(SiftError::MaskSizeMismatch{mask_width, mask_height, image_width, image_height});
            }
        }

        let (first_octave, provided_octave_count) = match &provided_keypoints {
            Some(keypoints) if keypoints.is_empty() => return Ok((Vec::new(), compute_descriptors.then(|| DMatrix::<f32>::zeros(0, DESCRIPTOR_SIZE)))),
            Some(keypoints) => {
                let (first_octave, octave_count) = provided_octave_range(keypoints, runtime_params.octave_layers)?;
                (first_octave, Some(octave_count))
            },
            None => (runtime_params.first_octave(), None)
        };

        let base = sift_pyramid::create_initial_image(&gray, first_octave < 0, runtime_params.sigma);
        let octave_count = provided_octave_count.unwrap_or_else(|| sift_pyramid::octave_count(base.width(), base.height(), first_octave));
        debug!("{}: first octave {}, {} octaves", runtime_params, first_octave, octave_count);
        let pyramid = sift_pyramid::build_sift_pyramid(base, octave_count, runtime_params);

        let keypoints = match provided_keypoints {
            Some(keypoints) => keypoints,
            None => {
                let mut keypoints = sift_pyramid::keypoints_from_pyramid(&pyramid, runtime_params);
                keypoint::remove_duplicated(&mut keypoints);
                if let Some(mask) = mask {
                    keypoint::run_by_pixels_mask(&mut keypoints, mask, (first_octave as Float).exp2());
                }
                keypoint::retain_best(&mut keypoints, runtime_params.max_features);
                keypoint::rescale_for_first_octave(&mut keypoints, first_octave);
                if keypoints.is_empty() {
                    warn!("no keypoints found in {}x{} image", gray.width(), gray.height());
                }
                debug!("{} keypoints after filtering", keypoints.len());
                keypoints
            }
        };

        let descriptors = match compute_descriptors {
            true => {
                let feature_vectors = sift_pyramid::feature_vectors_from_pyramid(&pyramid, &keypoints, first_octave);
                Some(DMatrix::<f32>::from_fn(feature_vectors.len(), DESCRIPTOR_SIZE, |r, c| feature_vectors[r].data[c] as f32))
            },
            false => None
        };

        Ok((keypoints, descriptors))
    }
}

/// First octave and number of octaves needed to describe the given keypoints.
pub fn provided_octave_range(keypoints: &[KeyPoint], octave_layers: usize) -> Result<(i32, usize)> {
    let mut first_octave = 0;
    let mut max_octave = i32::MIN;
    for keypoint in keypoints {
        let (octave, layer, _) = keypoint.unpack_octave();
        if octave < -1 || layer > octave_layers + 2 {
            return Err(SiftError::KeyPointOutOfPyramid{octave, layer, octave_layers});
        }
        first_octave = first_octave.min(octave);
        max_octave = max_octave.max(octave);
    }
    Ok((first_octave, (max_octave - first_octave + 1).max(1) as usize))
}

/// Byte descriptors. Values are already integral in `[0,255]`.
pub fn descriptors_to_u8(descriptors: &DMatrix<f32>) -> DMatrix<u8> {
    descriptors.map(|v| v.round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::keypoint::OctaveCode;

    fn keypoint_at_octave(octave: i8, layer: u8) -> KeyPoint {
        KeyPoint::new(10.0, 10.0, 3.0).with_octave_code(OctaveCode::new(octave, layer, 0))
    }

    #[test]
    fn octave_range_includes_negative_octave() {
        let keypoints = vec![keypoint_at_octave(-1, 1), keypoint_at_octave(2, 3)];
        assert_eq!(provided_octave_range(&keypoints, 3).unwrap(), (-1, 4));
        let keypoints = vec![keypoint_at_octave(1, 1), keypoint_at_octave(2, 5)];
        assert_eq!(provided_octave_range(&keypoints, 3).unwrap(), (0, 3));
    }

    #[test]
    fn octave_range_rejects_keypoints_outside_pyramid() {
        assert!(provided_octave_range(&[keypoint_at_octave(-2, 1)], 3).is_err());
        assert!(provided_octave_range(&[keypoint_at_octave(0, 6)], 3).is_err());
    }

    #[test]
    fn byte_descriptors_saturate() {
        let descriptors = DMatrix::<f32>::from_row_slice(1, 3, &[0.0, 254.6, 300.0]);
        assert_eq!(descriptors_to_u8(&descriptors), DMatrix::<u8>::from_row_slice(1, 3, &[0, 255, 255]));
    }
}
