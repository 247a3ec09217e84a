extern crate nalgebra as na;

use na::DMatrix;
use rayon::prelude::*;

use crate::image::Image;
use crate::{Float, GradientDirection};
use self::{kernel::Kernel,gauss_kernel::GaussKernel1D};

pub mod gauss_kernel;
pub mod kernel;

/// Mirrors out of range indices without repeating the border sample: `gfedcb|abcdefgh|gfedcba`.
pub fn reflect_101(idx: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    let mut i = idx;
    while i < 0 || i >= len {
        i = match i {
            i if i < 0 => -i,
            i => 2*len - 2 - i
        };
    }
    i as usize
}

/// Separable one dimensional convolution. Columns are computed in parallel since they are contiguous in the buffer.
pub fn filter_1d_convolution(source: &Image, filter_direction: GradientDirection, filter_kernel: &dyn Kernel) -> Image {
    let kernel = filter_kernel.kernel();
    let step = filter_kernel.step();
    let kernel_radius_signed = filter_kernel.radius() as isize;
    let normalizing_constant = filter_kernel.normalizing_constant();

    let buffer = &source.buffer;
    let width = buffer.ncols();
    let height = buffer.nrows();
    let mut data = vec![0.0 as Float; width*height];

    if data.is_empty() {
        return Image::from_matrix(DMatrix::<Float>::zeros(height,width), source.original_encoding);
    }

    data.par_chunks_mut(height).enumerate().for_each(|(x, column)| {
        for y in 0..height {
            let mut acc = 0.0;
            for kernel_idx in (-kernel_radius_signed..kernel_radius_signed+1).step_by(step) {
                let sample_value = match filter_direction {
                    GradientDirection::HORIZONTAL => buffer[(y, reflect_101(x as isize + kernel_idx, width))],
                    GradientDirection::VERTICAL => buffer[(reflect_101(y as isize + kernel_idx, height), x)]
                };
                acc += sample_value*kernel[(kernel_idx + kernel_radius_signed) as usize];
            }
            column[y] = acc/normalizing_constant;
        }
    });

    Image::from_matrix(DMatrix::<Float>::from_vec(height, width, data), source.original_encoding)
}

pub fn gaussian_2_d_convolution(image: &Image, filter_kernel: &GaussKernel1D) -> Image {
    let blur_hor = filter_1d_convolution(image, GradientDirection::HORIZONTAL, filter_kernel);
    filter_1d_convolution(&blur_hor, GradientDirection::VERTICAL, filter_kernel)
}

pub fn gaussian_blur(image: &Image, sigma: Float) -> Image {
    gaussian_2_d_convolution(image, &GaussKernel1D::from_sigma(sigma))
}
