use crate::{Float,float};
use float::consts::PI;
use super::kernel::Kernel;


pub struct GaussKernel1D {
    kernel: Vec<Float>,
    step: usize,
}

impl GaussKernel1D {
    fn sample(mean: Float, std: Float, x:Float) -> Float {
        let exponent = (-0.5*((x-mean)/std).powi(2)).exp();
        let factor = 1.0/(std*(2.0*PI).sqrt());
        factor*exponent
    }

    /// Kernel radius for floating point images: the aperture is `round(8*sigma+1)` rounded up to an odd size.
    pub fn radius_for_sigma(std: Float) -> usize {
        let aperture = ((std*8.0 + 1.0).round() as usize) | 1;
        (aperture-1)/2
    }

    pub fn new(mean: Float, std: Float, step: usize , radius: usize) -> GaussKernel1D {
        assert!(std > 0.0);
        assert_eq!(radius%step,0);

        let start = -(radius as isize);
        let end_exclusive = (radius as isize) + 1;
        let range = (start..end_exclusive).step_by(step);
        let mut kernel = range.map(|x| GaussKernel1D::sample(mean,std,x as Float)).collect::<Vec<Float>>();
        let sum: Float = kernel.iter().sum();
        for tap in kernel.iter_mut() {
            *tap /= sum;
        }

        GaussKernel1D {
            kernel,
            step
        }
    }

    pub fn from_sigma(std: Float) -> GaussKernel1D {
        GaussKernel1D::new(0.0, std, 1, GaussKernel1D::radius_for_sigma(std))
    }
}

impl Kernel for GaussKernel1D {
    fn kernel(&self) -> &Vec<Float> {
        &self.kernel
    }

    fn step(&self) -> usize {
        self.step
    }

    fn normalizing_constant(&self) -> Float{
        1.0
    }
}
