use std::sync::Mutex;
use log::debug;
use rayon::prelude::*;

use crate::Float;
use crate::image::{Image, filter::gaussian_blur};
use crate::pyramid::{Pyramid, sift::{sift_octave::SiftOctave, sift_runtime_params::SiftRuntimeParams}};
use crate::features::sift_feature::{self, IMAGE_BORDER, processing::subpixel_refinement};
use crate::descriptor::{
    keypoint::KeyPoint,
    feature_vector::FeatureVector,
    orientation_histogram::generate_keypoints_from_extrema,
    local_image_descriptor::generate_local_image_descriptor
};

pub mod sift_runtime_params;
pub mod sift_octave;

pub type SiftPyramid = Pyramid<SiftOctave>;

/// Blur assumed to be present in the input image
pub const INITIAL_SIGMA: Float = 0.5;
const MIN_SIGMA_DIFFERENCE: Float = 0.01;

/// Octaves until the smallest side of the base image drops to roughly 4 pixels. At least one octave is built.
pub fn octave_count(width: usize, height: usize, first_octave: i32) -> usize {
    let min_side = width.min(height).max(1) as Float;
    ((min_side.log2() - 2.0).round() as i32 - first_octave).max(1) as usize
}

/// Blurs (and optionally doubles) the input so that it carries a total blur of `sigma`.
pub fn create_initial_image(image: &Image, double_size: bool, sigma: Float) -> Image {
    match double_size {
        true => {
            let sigma_difference = (sigma.powi(2) - (2.0*INITIAL_SIGMA).powi(2)).max(MIN_SIGMA_DIFFERENCE).sqrt();
            gaussian_blur(&Image::upsample_double(image), sigma_difference)
        },
        false => {
            let sigma_difference = (sigma.powi(2) - INITIAL_SIGMA.powi(2)).max(MIN_SIGMA_DIFFERENCE).sqrt();
            gaussian_blur(image, sigma_difference)
        }
    }
}

/// Gaussian pyramid built sequentially, difference of gaussians computed in parallel over all `(octave, layer)` pairs.
pub fn build_sift_pyramid(base_image: Image, octave_count: usize, runtime_params: &SiftRuntimeParams) -> SiftPyramid {
    let octave_layers = runtime_params.octave_layers;
    let sigmas = SiftOctave::generate_sigmas(runtime_params.sigma, octave_layers);

    let mut gaussian_octaves: Vec<Vec<Image>> = Vec::with_capacity(octave_count);
    for o in 0..octave_count {
        let octave_base = match o {
            0 => base_image.clone(),
            o => Image::downsample_half(&gaussian_octaves[o-1][octave_layers])
        };
        let mut images = Vec::<Image>::with_capacity(runtime_params.gaussian_images_per_octave());
        images.push(octave_base);
        for i in 1..runtime_params.gaussian_images_per_octave() {
            let blurred = gaussian_blur(&images[i-1], sigmas[i]);
            images.push(blurred);
        }
        gaussian_octaves.push(images);
    }

    let dog_per_octave = runtime_params.dog_images_per_octave();
    let mut differences = (0..octave_count*dog_per_octave).into_par_iter().map(|idx| {
        let (o, i) = (idx / dog_per_octave, idx % dog_per_octave);
        Image::difference(&gaussian_octaves[o][i+1], &gaussian_octaves[o][i])
    }).collect::<Vec<Image>>().into_iter();

    let mut pyramid = SiftPyramid::empty(octave_count);
    for images in gaussian_octaves {
        let difference_of_gaussians = differences.by_ref().take(dog_per_octave).collect();
        pyramid.octaves.push(SiftOctave{images, difference_of_gaussians});
    }

    debug!("built sift pyramid with {} octaves, base {}x{}", pyramid.octave_count(), base_image.width(), base_image.height());
    pyramid
}

pub fn keypoints_from_pyramid(pyramid: &SiftPyramid, runtime_params: &SiftRuntimeParams) -> Vec<KeyPoint> {
    let mut keypoints = Vec::<KeyPoint>::new();
    for octave_level in 0..pyramid.octave_count() {
        for layer in 1..runtime_params.octave_layers+1 {
            keypoints.extend(keypoints_from_sigma(pyramid, octave_level, layer, runtime_params));
        }
    }
    debug!("found {} keypoints in {} octaves", keypoints.len(), pyramid.octave_count());
    keypoints
}

/// Extrema of one difference of gaussian layer, refined and oriented. Rows are processed in parallel.
pub fn keypoints_from_sigma(pyramid: &SiftPyramid, octave_level: usize, layer: usize, runtime_params: &SiftRuntimeParams) -> Vec<KeyPoint> {
    let octave = &pyramid.octaves[octave_level];
    let octave_layers = runtime_params.octave_layers;
    let threshold = sift_feature::prefilter_threshold(runtime_params.contrast_threshold, octave_layers);
    let rows = octave.height();
    let keypoints = Mutex::new(Vec::<KeyPoint>::new());

    (IMAGE_BORDER..rows.saturating_sub(IMAGE_BORDER)).into_par_iter().for_each(|row| {
        let found = sift_feature::detect_sift_feature_in_row(octave, octave_level, layer, row, threshold).iter()
            .filter_map(|feature| subpixel_refinement(octave, feature, octave_layers, runtime_params.contrast_threshold, runtime_params.edge_threshold, runtime_params.sigma))
            .flat_map(|(keypoint, refined)| generate_keypoints_from_extrema(&octave.images[refined.layer], &refined, &keypoint))
            .collect::<Vec<KeyPoint>>();

        if !found.is_empty() {
            match keypoints.lock() {
                Ok(mut guard) => guard.extend(found),
                Err(poisoned) => poisoned.into_inner().extend(found)
            }
        }
    });

    let keypoints = keypoints.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
    debug!("octave {} layer {}: {} keypoints", octave_level, layer, keypoints.len());
    keypoints
}

/// Descriptors in keypoint order. Keypoint octaves are relative to `first_octave`, which is octave 0 of the pyramid.
pub fn feature_vectors_from_pyramid(pyramid: &SiftPyramid, keypoints: &[KeyPoint], first_octave: i32) -> Vec<FeatureVector> {
    keypoints.par_iter().map(|keypoint| {
        let (octave, layer, scale) = keypoint.unpack_octave();
        let image = &pyramid.octaves[(octave - first_octave) as usize].images[layer];
        let raw = generate_local_image_descriptor(image, keypoint.x*scale, keypoint.y*scale, keypoint.angle, keypoint.size*scale*0.5);
        FeatureVector::new(&raw)
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_count_follows_smallest_side() {
        assert_eq!(octave_count(1280, 960, -1), 9);
        assert_eq!(octave_count(640, 480, 0), 7);
        assert_eq!(octave_count(64, 64, 0), 4);
        assert_eq!(octave_count(2, 2, 0), 1);
    }
}
