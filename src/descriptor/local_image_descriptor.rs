use crate::Float;
use crate::image::Image;
use crate::descriptor::{gradient, gradient_and_orientation, DESCRIPTOR_WIDTH, ORIENTATION_BINS, DESCRIPTOR_SIZE};

/// Sample window width per spatial cell, in units of the keypoint scale
pub const DESCRIPTOR_SCALE_FACTOR: Float = 3.0;

/// Trilinear gradient histogram over a `d x d` grid of `n` orientation bins, padded by one guard
/// cell on each spatial side and two guard bins on the orientation axis.
#[derive(Debug,Clone)]
pub struct LocalImageDescriptor {
    width: usize,
    orientation_bins: usize,
    bins: Vec<Float>
}

impl LocalImageDescriptor {

    pub fn new(width: usize, orientation_bins: usize) -> LocalImageDescriptor {
        LocalImageDescriptor {
            width,
            orientation_bins,
            bins: vec![0.0;(width+2)*(width+2)*(orientation_bins+2)]
        }
    }

    fn index(&self, row_bin: isize, col_bin: isize, orientation_bin: usize) -> usize {
        let padded_width = self.width as isize + 2;
        let padded_bins = self.orientation_bins + 2;
        (((row_bin+1)*padded_width + col_bin + 1) as usize)*padded_bins + orientation_bin
    }

    /// Distributes `magnitude` over the 8 bins surrounding the fractional position.
    pub fn add_trilinear(&mut self, row_bin: Float, col_bin: Float, orientation_bin: Float, magnitude: Float) -> () {
        let r0 = row_bin.floor();
        let c0 = col_bin.floor();
        let o0 = orientation_bin.floor();
        let (dr, dc, d_o) = (row_bin - r0, col_bin - c0, orientation_bin - o0);

        let n = self.orientation_bins as isize;
        let o0 = match o0 as isize {
            o if o < 0 => o + n,
            o if o >= n => o - n,
            o => o
        } as usize;
        let (r0, c0) = (r0 as isize, c0 as isize);

        for (row_offset, row_weight) in [(0, 1.0 - dr), (1, dr)] {
            for (col_offset, col_weight) in [(0, 1.0 - dc), (1, dc)] {
                let idx = self.index(r0 + row_offset, c0 + col_offset, o0);
                let v = magnitude*row_weight*col_weight;
                let v_1 = v*d_o;
                self.bins[idx] += v - v_1;
                self.bins[idx+1] += v_1;
            }
        }
    }

    /// Folds the guard orientation bins back into bins `0` and `1` and drops the spatial guard cells.
    pub fn flatten(&self) -> Vec<Float> {
        let (d, n) = (self.width, self.orientation_bins);
        let mut flat = Vec::<Float>::with_capacity(d*d*n);
        for i in 0..d as isize {
            for j in 0..d as isize {
                let idx = self.index(i, j, 0);
                let cell = &self.bins[idx..idx+n+2];
                flat.push(cell[0] + cell[n]);
                flat.push(cell[1] + cell[n+1]);
                flat.extend_from_slice(&cell[2..n]);
            }
        }
        flat
    }
}

/// Raw descriptor of the point `(x, y)` given in the pixel grid of `image`.
/// `angle` is the keypoint orientation in degrees and `scale` its half size in that grid.
pub fn generate_local_image_descriptor(image: &Image, x: Float, y: Float, angle: Float, scale: Float) -> Vec<Float> {
    let d = DESCRIPTOR_WIDTH;
    let n = ORIENTATION_BINS;
    let row = y.round() as isize;
    let col = x.round() as isize;
    let rows = image.height() as isize;
    let cols = image.width() as isize;

    let orientation = match 360.0 - angle {
        a if (a - 360.0).abs() < Float::EPSILON => 0.0,
        a => a
    };
    let bins_per_degree = n as Float / 360.0;
    let exp_scale = -1.0/((d*d) as Float*0.5);
    let hist_width = DESCRIPTOR_SCALE_FACTOR*scale;
    let diagonal = ((cols*cols + rows*rows) as f64).sqrt() as isize;
    let radius = ((hist_width*std::f64::consts::SQRT_2 as Float*(d as Float + 1.0)*0.5).round() as isize).min(diagonal);
    let (sin_t, cos_t) = orientation.to_radians().sin_cos();
    let (sin_t, cos_t) = (sin_t/hist_width, cos_t/hist_width);
    let half_width = d as Float/2.0 - 0.5;

    let mut descriptor = LocalImageDescriptor::new(d, n);
    for i in -radius..radius+1 {
        for j in -radius..radius+1 {
            let c_rot = j as Float*cos_t - i as Float*sin_t;
            let r_rot = j as Float*sin_t + i as Float*cos_t;
            let row_bin = r_rot + half_width;
            let col_bin = c_rot + half_width;
            let r = row + i;
            let c = col + j;

            let in_grid = row_bin > -1.0 && row_bin < d as Float && col_bin > -1.0 && col_bin < d as Float;
            let in_image = r > 0 && r < rows - 1 && c > 0 && c < cols - 1;
            if !(in_grid && in_image) {
                continue;
            }

            let (dx, dy) = gradient(image, r as usize, c as usize);
            let (magnitude, sample_orientation) = gradient_and_orientation(dx, dy);
            let weight = ((c_rot*c_rot + r_rot*r_rot)*exp_scale).exp();
            let orientation_bin = (sample_orientation - orientation)*bins_per_degree;
            descriptor.add_trilinear(row_bin, col_bin, orientation_bin, magnitude*weight);
        }
    }

    let flat = descriptor.flatten();
    debug_assert_eq!(flat.len(), DESCRIPTOR_SIZE);
    flat
}
