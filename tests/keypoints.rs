mod common;

use sift::{KeyPoint, OctaveCode, SiftDetector, SiftRuntimeParams};
use sift::keypoint::{remove_duplicated, retain_best};

#[test]
fn octave_code_pack_round_trip() {
    for octave in i8::MIN..=i8::MAX {
        for layer in 0..=u8::MAX {
            for offset in [0u8, 1, 127, 128, 255] {
                let code = OctaveCode::new(octave, layer, offset);
                assert_eq!(OctaveCode::unpack(code.pack()), code);
            }
        }
    }
}

#[test]
fn unpack_octave_scale() {
    let keypoint = KeyPoint::new(1.0, 2.0, 3.0).with_octave_code(OctaveCode::new(-1, 2, 0));
    assert_eq!(keypoint.unpack_octave(), (-1, 2, 2.0));
    let keypoint = keypoint.with_octave_code(OctaveCode::new(3, 1, 0));
    assert_eq!(keypoint.unpack_octave(), (3, 1, 0.125));
    assert_eq!(OctaveCode::new(-1, 2, 0).pack() & 0xff, 0xff);
}

#[test]
fn identical_keypoints_collapse() {
    let keypoint = KeyPoint{angle: 45.0, response: 0.5, ..KeyPoint::new(10.5, 3.25, 6.0)};
    let mut keypoints = vec![keypoint, KeyPoint::new(1.0, 1.0, 2.0), keypoint, keypoint];
    remove_duplicated(&mut keypoints);
    assert_eq!(keypoints.len(), 2);
}

#[test]
fn retain_best_keeps_exactly_n_strongest() {
    let mut keypoints = (0..50).map(|i| KeyPoint{response: ((i*37) % 50) as f32, ..KeyPoint::new(i as f32, 0.0, 2.0)}).collect::<Vec<KeyPoint>>();
    retain_best(&mut keypoints, 7);
    assert_eq!(keypoints.len(), 7);
    assert!(keypoints.iter().all(|k| k.response >= 43.0));

    let mut few = vec![KeyPoint::new(0.0, 0.0, 1.0)];
    retain_best(&mut few, 7);
    assert_eq!(few.len(), 1);
}

#[test]
fn detected_angles_are_normalized() {
    common::init_logging();
    let detector = SiftDetector::new(SiftRuntimeParams::default()).unwrap();
    let keypoints = detector.detect(&common::noise_image(64, 64, 11), None).unwrap();
    assert!(!keypoints.is_empty());
    assert!(keypoints.iter().all(|k| k.angle >= 0.0 && k.angle < 360.0));
    assert!(keypoints.iter().all(|k| k.response > 0.0 && k.size > 0.0));
}
