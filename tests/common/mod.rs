extern crate image as image_rs;

use image_rs::{DynamicImage, GrayImage, Luma};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const BACKGROUND: f32 = 50.0;
pub const BLOB_AMPLITUDE: f32 = 150.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Bright gaussian blob of the given radius (`sigma = radius/sqrt(2)`) on a flat background.
pub fn blob_image(size: u32, center: (f32, f32), radius: f32) -> DynamicImage {
    let sigma = radius/std::f32::consts::SQRT_2;
    let gray = GrayImage::from_fn(size, size, |x, y| {
        let d2 = (x as f32 - center.0).powi(2) + (y as f32 - center.1).powi(2);
        let value = BACKGROUND + BLOB_AMPLITUDE*(-d2/(2.0*sigma*sigma)).exp();
        Luma([value.round().clamp(0.0, 255.0) as u8])
    });
    DynamicImage::ImageLuma8(gray)
}

pub fn constant_image(width: u32, height: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
}

pub fn noise_image(width: u32, height: u32, seed: u64) -> DynamicImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let gray = GrayImage::from_fn(width, height, |_, _| Luma([rng.gen_range(0..=255u8)]));
    DynamicImage::ImageLuma8(gray)
}
