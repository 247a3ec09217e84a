extern crate nalgebra as na;

use na::Matrix2;
use crate::Float;

/// Spatial 2x2 hessian `[dxx dxy; dxy dyy]` of a difference of gaussian image.
pub fn trace_and_determinant(hessian: &Matrix2<Float>) -> (Float,Float) {
    let trace = hessian.trace();
    let determinant = hessian[(0,0)]*hessian[(1,1)] - hessian[(0,1)]*hessian[(1,0)];
    (trace, determinant)
}

/// Keeps blob like responses: rejects saddles (`det <= 0`) and
/// responses whose principal curvature ratio exceeds `r`.
pub fn accept_edge_response_filter(hessian: &Matrix2<Float>, r: Float) -> bool {
    let (trace, determinant) = trace_and_determinant(hessian);
    determinant > 0.0 && trace.powi(2)*r < (r+1.0).powi(2)*determinant
}
