use crate::image::Image;
use crate::Float;

/// One doubling of scale: `s+3` progressively blurred images and the `s+2` differences between neighbours.
#[derive(Debug,Clone)]
pub struct SiftOctave {
    pub images: Vec<Image>,
    pub difference_of_gaussians: Vec<Image>
}

impl SiftOctave {

    /// Incremental blur that takes layer `i-1` to layer `i`. Entry 0 is the absolute blur of the base.
    pub fn generate_sigmas(sigma: Float, s: usize) -> Vec<Float> {
        let k = (1.0/(s as f64)).exp2();
        let sigma = sigma as f64;
        (0..s+3).map(|i| match i {
            0 => sigma,
            i => {
                let sigma_prev = k.powi(i as i32 - 1)*sigma;
                let sigma_total = sigma_prev*k;
                (sigma_total.powi(2) - sigma_prev.powi(2)).sqrt()
            }
        }).map(|x| x as Float).collect()
    }

    pub fn s(&self) -> usize {
        self.images.len() - 3
    }

    pub fn width(&self) -> usize {
        self.images[0].width()
    }

    pub fn height(&self) -> usize {
        self.images[0].height()
    }

    pub fn within_range(&self, row: isize, col: isize, layer: isize, border: usize) -> bool {
        let border = border as isize;
        layer >= 1 && layer <= self.s() as isize &&
        col >= border && col < self.width() as isize - border &&
        row >= border && row < self.height() as isize - border
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incremental_sigmas_compose_to_geometric_series() {
        let sigma = 1.6;
        let s = 3;
        let sigmas = SiftOctave::generate_sigmas(sigma, s);
        assert_eq!(sigmas.len(), s+3);
        let mut total = sigmas[0].powi(2);
        for i in 1..sigmas.len() {
            total += sigmas[i].powi(2);
            let expected = sigma*((i as Float)/(s as Float)).exp2();
            assert!((total.sqrt() - expected).abs() < 1e-4);
        }
    }
}
