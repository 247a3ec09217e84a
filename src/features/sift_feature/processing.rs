extern crate nalgebra as na;

use log::trace;
use na::{DMatrix, Matrix2, Matrix3, Vector3};

use crate::Float;
use crate::descriptor::keypoint::{KeyPoint, OctaveCode};
use crate::features::hessian_response::accept_edge_response_filter;
use crate::features::sift_feature::{SiftFeature, IMAGE_BORDER};
use crate::pyramid::sift::sift_octave::SiftOctave;

pub const MAX_INTERPOLATION_STEPS: usize = 5;

const IMAGE_SCALE: Float = 1.0/255.0;
const DERIVATIVE_SCALE: Float = IMAGE_SCALE*0.5;
const SECOND_DERIVATIVE_SCALE: Float = IMAGE_SCALE;
const CROSS_DERIVATIVE_SCALE: Float = IMAGE_SCALE*0.25;
const OFFSET_OVERFLOW: Float = (i32::MAX/3) as Float;

/// Centered finite differences around `(row, col)` of layer `layer`.
struct ScaleSpaceDerivatives {
    value: Float,
    gradient: Vector3<Float>,
    hessian: Matrix3<Float>
}

impl ScaleSpaceDerivatives {
    fn new(source_octave: &SiftOctave, layer: usize, row: usize, col: usize) -> ScaleSpaceDerivatives {
        let img = &source_octave.difference_of_gaussians[layer].buffer;
        let prev = &source_octave.difference_of_gaussians[layer-1].buffer;
        let next = &source_octave.difference_of_gaussians[layer+1].buffer;
        let (r, c) = (row, col);

        let gradient = Vector3::new(
            (img[(r,c+1)] - img[(r,c-1)])*DERIVATIVE_SCALE,
            (img[(r+1,c)] - img[(r-1,c)])*DERIVATIVE_SCALE,
            (next[(r,c)] - prev[(r,c)])*DERIVATIVE_SCALE);

        let value = img[(r,c)];
        let v2 = value*2.0;
        let dxx = (img[(r,c+1)] + img[(r,c-1)] - v2)*SECOND_DERIVATIVE_SCALE;
        let dyy = (img[(r+1,c)] + img[(r-1,c)] - v2)*SECOND_DERIVATIVE_SCALE;
        let dss = (next[(r,c)] + prev[(r,c)] - v2)*SECOND_DERIVATIVE_SCALE;
        let dxy = cross_derivative(img, img, r, c, (1,0), (0,1));
        let dxs = cross_derivative(next, prev, r, c, (0,0), (0,1));
        let dys = cross_derivative(next, prev, r, c, (0,0), (1,0));

        let hessian = Matrix3::new(dxx, dxy, dxs,
                                   dxy, dyy, dys,
                                   dxs, dys, dss);

        ScaleSpaceDerivatives{value, gradient, hessian}
    }

    fn spatial_hessian(&self) -> Matrix2<Float> {
        self.hessian.fixed_view::<2,2>(0,0).into_owned()
    }
}

/// Mixed derivative: `upper` is sampled at `+dir_a`, `lower` at `-dir_a`, each differenced along `dir_b`.
fn cross_derivative(upper: &DMatrix<Float>, lower: &DMatrix<Float>, r: usize, c: usize, dir_a: (usize,usize), dir_b: (usize,usize)) -> Float {
    let (ar, ac) = dir_a;
    let (br, bc) = dir_b;
    let diff = |buffer: &DMatrix<Float>, r: usize, c: usize| buffer[(r+br,c+bc)] - buffer[(r-br,c-bc)];
    (diff(upper, r+ar, c+ac) - diff(lower, r-ar, c-ac))*CROSS_DERIVATIVE_SCALE
}

/// Fits a 3D quadratic to the difference of gaussian around the extremum and moves to its vertex.
/// Returns the keypoint in the coordinates of pyramid octave 0 together with the final integer location,
/// or `None` when the fit diverges, leaves the octave, has low contrast or looks like an edge.
/// A singular hessian keeps the integer location.
pub fn subpixel_refinement(source_octave: &SiftOctave, feature: &SiftFeature, octave_layers: usize, contrast_threshold: Float, edge_threshold: Float, sigma: Float) -> Option<(KeyPoint, SiftFeature)> {

    let mut layer = feature.layer as isize;
    let mut row = feature.row as isize;
    let mut col = feature.col as isize;
    let mut offset = Vector3::<Float>::zeros();
    let mut converged = false;

    for _ in 0..MAX_INTERPOLATION_STEPS {
        let derivatives = ScaleSpaceDerivatives::new(source_octave, layer as usize, row as usize, col as usize);
        offset = match derivatives.hessian.lu().solve(&derivatives.gradient) {
            Some(x) => -x,
            None => {
                trace!("{}: singular hessian, keeping the integer location", feature);
                Vector3::zeros()
            }
        };

        if offset.iter().all(|v| v.abs() < 0.5) {
            converged = true;
            break;
        }

        if offset.iter().any(|v| !(v.abs() <= OFFSET_OVERFLOW)) {
            trace!("{}: offset overflow", feature);
            return None;
        }

        col += offset[0].round() as isize;
        row += offset[1].round() as isize;
        layer += offset[2].round() as isize;

        if !source_octave.within_range(row, col, layer, IMAGE_BORDER) {
            trace!("{}: left the octave at l: {}, r: {}, c: {}", feature, layer, row, col);
            return None;
        }
    }

    if !converged {
        trace!("{}: did not converge", feature);
        return None;
    }

    let (layer, row, col) = (layer as usize, row as usize, col as usize);
    let derivatives = ScaleSpaceDerivatives::new(source_octave, layer, row, col);
    let contrast = derivatives.value*IMAGE_SCALE + 0.5*derivatives.gradient.dot(&offset);
    if contrast.abs()*(octave_layers as Float) < contrast_threshold {
        trace!("{}: low contrast {}", feature, contrast);
        return None;
    }

    if !accept_edge_response_filter(&derivatives.spatial_hessian(), edge_threshold) {
        trace!("{}: edge response", feature);
        return None;
    }

    let octave_scale = (feature.octave_level as Float).exp2();
    let (xc, xr, xs) = (offset[0], offset[1], offset[2]);
    let octave_code = OctaveCode::new(
        feature.octave_level as i8,
        layer as u8,
        ((xs + 0.5)*255.0).round().clamp(0.0, 255.0) as u8);

    let keypoint = KeyPoint {
        x: (col as Float + xc)*octave_scale,
        y: (row as Float + xr)*octave_scale,
        size: sigma*((layer as Float + xs)/(octave_layers as Float)).exp2()*octave_scale*2.0,
        angle: 0.0,
        response: contrast.abs(),
        octave_code
    };

    Some((keypoint, SiftFeature{octave_level: feature.octave_level, layer, row, col}))
}
