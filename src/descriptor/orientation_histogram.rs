use crate::Float;
use crate::image::Image;
use crate::descriptor::{gradient, gradient_and_orientation, parabolic_peak_offset, normalize_angle, keypoint::KeyPoint};
use crate::features::sift_feature::SiftFeature;

pub const ORIENTATION_HISTOGRAM_BINS: usize = 36;
/// Gaussian window sigma relative to the keypoint scale
pub const ORIENTATION_SIGMA_FACTOR: Float = 1.5;
pub const ORIENTATION_RADIUS_FACTOR: Float = 3.0*ORIENTATION_SIGMA_FACTOR;
/// Peaks at least this fraction of the maximum spawn a keypoint
pub const ORIENTATION_PEAK_RATIO: Float = 0.8;

#[derive(Debug,Clone)]
pub struct OrientationHistogram {
    pub bin_range: Float,
    pub bins: Vec<Float>
}

impl OrientationHistogram {

    pub fn new(bin_len: usize) -> OrientationHistogram {
        OrientationHistogram{
            bin_range: 360.0/(bin_len as Float),
            bins: vec![0.0;bin_len]
        }
    }

    /// Nearest bin, orientation in degrees.
    pub fn add_measurement(&mut self, orientation: Float, weighted_magnitude: Float) -> () {
        let index = degree_to_index(self, orientation);
        self.bins[index] += weighted_magnitude;
    }

    pub fn get_value_circular(&self, i: isize) -> Float {
        let len = self.bins.len() as isize;
        self.bins[i.rem_euclid(len) as usize]
    }

    /// Circular `[1,4,6,4,1]/16` smoothing.
    pub fn smooth(&self) -> OrientationHistogram {
        let bins = (0..self.bins.len() as isize).map(|idx|
            (self.get_value_circular(idx-2) + self.get_value_circular(idx+2))*(1.0/16.0) +
            (self.get_value_circular(idx-1) + self.get_value_circular(idx+1))*(4.0/16.0) +
            self.get_value_circular(idx)*(6.0/16.0)
        ).collect();
        OrientationHistogram{bin_range: self.bin_range, bins}
    }

    pub fn max(&self) -> Float {
        self.bins.iter().cloned().fold(Float::MIN, Float::max)
    }

    /// Fractional bin positions of local maxima reaching `peak_ratio` of the global maximum.
    pub fn peaks(&self, peak_ratio: Float) -> Vec<Float> {
        let n = self.bins.len();
        let threshold = self.max()*peak_ratio;
        (0..n).filter_map(|j| {
            let (l, c, r) = get_adjacent_circular_by_index(self, j);
            let (left, center, right) = (self.bins[l], self.bins[c], self.bins[r]);
            match center > left && center > right && center >= threshold {
                true => {
                    let bin = j as Float + parabolic_peak_offset(left, center, right);
                    Some(match bin {
                        b if b < 0.0 => b + n as Float,
                        b if b >= n as Float => b - n as Float,
                        b => b
                    })
                },
                false => None
            }
        }).collect()
    }
}

pub fn degree_to_index(histogram: &OrientationHistogram, orientation: Float) -> usize {
    let n = histogram.bins.len() as isize;
    ((orientation/histogram.bin_range).round() as isize).rem_euclid(n) as usize
}

fn get_adjacent_circular_by_index(histogram: &OrientationHistogram, bin_idx: usize) -> (usize,usize,usize) {
    let bin_len = histogram.bins.len();
    assert!(bin_len >=3);
    let l = if bin_idx > 0 {bin_idx - 1} else {bin_len - 1};
    let r = if bin_idx + 1 < bin_len {bin_idx + 1} else {0};
    (l, bin_idx, r)
}

/// Gaussian weighted gradient orientation histogram in a square window of the given radius.
/// Samples on the outermost image rows and columns are skipped.
pub fn calc_orientation_histogram(image: &Image, row: usize, col: usize, radius: usize, sigma: Float, bin_len: usize) -> OrientationHistogram {
    let mut histogram = OrientationHistogram::new(bin_len);
    let exp_scale = -1.0/(2.0*sigma*sigma);
    let radius = radius as isize;
    let rows = image.height() as isize;
    let cols = image.width() as isize;

    for i in -radius..radius+1 {
        let y = row as isize + i;
        if y <= 0 || y >= rows - 1 {
            continue;
        }
        for j in -radius..radius+1 {
            let x = col as isize + j;
            if x <= 0 || x >= cols - 1 {
                continue;
            }
            let (dx, dy) = gradient(image, y as usize, x as usize);
            let (magnitude, orientation) = gradient_and_orientation(dx, dy);
            let weight = (((i*i + j*j) as Float)*exp_scale).exp();
            histogram.add_measurement(orientation, weight*magnitude);
        }
    }

    histogram.smooth()
}

/// One keypoint per dominant orientation around the refined extremum. `keypoint` carries the refined
/// position and size in pyramid coordinates, `extremum` the integer location it was refined at.
pub fn generate_keypoints_from_extrema(image: &Image, extremum: &SiftFeature, keypoint: &KeyPoint) -> Vec<KeyPoint> {
    let octave_scale = (extremum.octave_level as Float).exp2();
    let scale_octave = keypoint.size*0.5/octave_scale;
    let radius = (ORIENTATION_RADIUS_FACTOR*scale_octave).round() as usize;
    let histogram = calc_orientation_histogram(image, extremum.row, extremum.col, radius, ORIENTATION_SIGMA_FACTOR*scale_octave, ORIENTATION_HISTOGRAM_BINS);

    histogram.peaks(ORIENTATION_PEAK_RATIO).into_iter().map(|bin| {
        KeyPoint{angle: normalize_angle(360.0 - histogram.bin_range*bin), ..*keypoint}
    }).collect()
}
