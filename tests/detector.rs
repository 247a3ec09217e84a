extern crate image as image_rs;

mod common;

use image_rs::{DynamicImage, GrayImage, Luma};
use sift::{KeyPoint, SiftDetector, SiftError, SiftRuntimeParams};

const BLOB_CENTER: (f32, f32) = (64.0, 64.0);

fn closest_to(keypoints: &[KeyPoint], center: (f32, f32)) -> Option<(KeyPoint, f32)> {
    keypoints.iter()
        .map(|k| (*k, ((k.x - center.0).powi(2) + (k.y - center.1).powi(2)).sqrt()))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

fn assert_no_duplicates(keypoints: &[KeyPoint]) {
    for (i, a) in keypoints.iter().enumerate() {
        for b in &keypoints[i+1..] {
            assert!(!(a.x == b.x && a.y == b.y && a.size == b.size && a.angle == b.angle), "duplicate keypoint {}", a);
        }
    }
}

#[test]
fn constant_image_has_no_keypoints() {
    common::init_logging();
    let detector = SiftDetector::default();
    let keypoints = detector.detect(&common::constant_image(64, 48, 128), None).unwrap();
    assert!(keypoints.is_empty());

    let (keypoints, descriptors) = detector.detect_and_compute(&common::constant_image(64, 48, 0), None, None).unwrap();
    assert!(keypoints.is_empty());
    assert_eq!(descriptors.shape(), (0, 128));
}

#[test]
fn single_blob_is_found_at_its_center() {
    common::init_logging();
    let radius = 10.0;
    let detector = SiftDetector::default();
    let keypoints = detector.detect(&common::blob_image(128, BLOB_CENTER, radius), None).unwrap();

    let (keypoint, distance) = closest_to(&keypoints, BLOB_CENTER).expect("blob produced no keypoint");
    assert!(distance <= 1.0, "closest keypoint {} is {} px from the blob", keypoint, distance);
    assert!(keypoint.size >= radius && keypoint.size <= 3.0*radius, "size {} for radius {}", keypoint.size, radius);
    assert_no_duplicates(&keypoints);
}

#[test]
fn keypoint_size_grows_with_blob_radius() {
    let detector = SiftDetector::new(SiftRuntimeParams{use_negative_octave: false, ..SiftRuntimeParams::default()}).unwrap();
    let size_for = |radius: f32| {
        let keypoints = detector.detect(&common::blob_image(128, BLOB_CENTER, radius), None).unwrap();
        let (keypoint, distance) = closest_to(&keypoints, BLOB_CENTER).expect("blob produced no keypoint");
        assert!(distance <= 1.5);
        keypoint.size
    };
    let ratio = size_for(16.0)/size_for(8.0);
    assert!(ratio > 1.5 && ratio < 2.7, "size ratio {}", ratio);
}

#[test]
fn mask_excluding_blob_removes_all_keypoints() {
    common::init_logging();
    let image = common::blob_image(128, BLOB_CENTER, 10.0);
    let detector = SiftDetector::default();
    assert!(!detector.detect(&image, None).unwrap().is_empty());

    let mask = GrayImage::from_fn(128, 128, |x, y| {
        let d2 = (x as f32 - BLOB_CENTER.0).powi(2) + (y as f32 - BLOB_CENTER.1).powi(2);
        Luma([if d2 < 45.0*45.0 {0} else {255}])
    });
    assert!(detector.detect(&image, Some(&mask)).unwrap().is_empty());

    let full_mask = GrayImage::from_pixel(128, 128, Luma([1]));
    assert_eq!(detector.detect(&image, Some(&full_mask)).unwrap(), detector.detect(&image, None).unwrap());
}

#[test]
fn max_features_keeps_strongest_responses() {
    common::init_logging();
    let image = common::noise_image(256, 256, 2);
    let all = SiftDetector::default().detect(&image, None).unwrap();
    let n = 100;
    assert!(all.len() > n);

    let detector = SiftDetector::new(SiftRuntimeParams{max_features: n, ..SiftRuntimeParams::default()}).unwrap();
    let best = detector.detect(&image, None).unwrap();
    assert_eq!(best.len(), n);

    let weakest_kept = best.iter().map(|k| k.response).fold(f32::MAX, f32::min);
    let discarded = all.iter().filter(|k| !best.contains(k));
    assert!(discarded.into_iter().all(|k| k.response <= weakest_kept));
}

#[test]
fn provided_keypoints_are_described_in_order() {
    common::init_logging();
    let image = common::noise_image(72, 64, 9);
    let detector = SiftDetector::default();
    let (keypoints, descriptors) = detector.detect_and_compute(&image, None, None).unwrap();
    assert!(!keypoints.is_empty());
    assert!(keypoints.iter().any(|k| k.octave_code.octave == -1));

    let recomputed = detector.compute(&image, &keypoints).unwrap();
    assert_eq!(recomputed, descriptors);

    let (same_keypoints, provided_descriptors) = detector.detect_and_compute(&image, None, Some(keypoints.clone())).unwrap();
    assert_eq!(same_keypoints, keypoints);
    assert_eq!(provided_descriptors, descriptors);

    let reversed = keypoints.iter().rev().cloned().collect::<Vec<KeyPoint>>();
    let reversed_descriptors = detector.compute(&image, &reversed).unwrap();
    assert_eq!(reversed_descriptors.row(0), descriptors.row(keypoints.len()-1));

    assert_eq!(detector.compute(&image, &[]).unwrap().shape(), (0, 128));
}

#[test]
fn invalid_inputs_are_rejected() {
    let detector = SiftDetector::default();

    let empty = DynamicImage::new_luma8(0, 0);
    assert!(matches!(detector.detect(&empty, None), Err(SiftError::EmptyImage)));

    let deep = DynamicImage::new_luma16(32, 32);
    assert!(matches!(detector.detect(&deep, None), Err(SiftError::UnsupportedDepth(_))));

    let mask = GrayImage::new(16, 16);
    let result = detector.detect(&common::constant_image(32, 32, 10), Some(&mask));
    assert!(matches!(result, Err(SiftError::MaskSizeMismatch{mask_width: 16, image_width: 32, ..})));

    let bad_params = SiftRuntimeParams{octave_layers: 0, ..SiftRuntimeParams::default()};
    assert!(matches!(SiftDetector::new(bad_params), Err(SiftError::InvalidParameter{name: "octave_layers", ..})));

    let out_of_pyramid = KeyPoint::new(4.0, 4.0, 2.0).with_octave_code(sift::OctaveCode::new(-2, 1, 0));
    assert!(matches!(detector.compute(&common::constant_image(32, 32, 10), &[out_of_pyramid]), Err(SiftError::KeyPointOutOfPyramid{octave: -2, ..})));
}

#[test]
fn color_images_are_converted_to_gray() {
    let gray = common::blob_image(128, BLOB_CENTER, 10.0);
    let rgba = DynamicImage::ImageRgba8(gray.to_rgba8());
    let keypoints = SiftDetector::default().detect(&rgba, None).unwrap();
    let (_, distance) = closest_to(&keypoints, BLOB_CENTER).expect("blob produced no keypoint");
    assert!(distance <= 1.0);
}
