extern crate image as image_rs;
extern crate sift;

use std::env;
use color_eyre::eyre::{eyre, Result};
use log::info;

use sift::{SiftDetector, SiftRuntimeParams, descriptors_to_u8};
use sift::image::Image;
use sift::visualize::draw_keypoints;

const USAGE: &str = "usage: sift_features <image> [--config <params.yaml>] [--output <keypoints.png>]";

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let mut args = env::args().skip(1);
    let mut image_path = None;
    let mut config_path = None;
    let mut output_path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = Some(args.next().ok_or_else(|| eyre!(USAGE))?),
            "--output" => output_path = Some(args.next().ok_or_else(|| eyre!(USAGE))?),
            _ => image_path = Some(arg)
        }
    }
    let image_path = image_path.ok_or_else(|| eyre!(USAGE))?;

    let runtime_params = match &config_path {
        Some(path) => SiftRuntimeParams::from_yaml_file(path)?,
        None => SiftRuntimeParams::default()
    };
    info!("runtime params: {:?}", runtime_params);

    let image = image_rs::open(&image_path)?;
    let detector = SiftDetector::new(runtime_params)?;
    let (keypoints, descriptors) = detector.detect_and_compute(&image, None, None)?;
    let descriptor_bytes = descriptors_to_u8(&descriptors);

    let size = (image.width()*image.height()) as f32;
    println!("Keypoints from {}: {} ({:.4} per pixel), descriptors {}x{}",
        image_path, keypoints.len(), keypoints.len() as f32/size, descriptor_bytes.nrows(), descriptor_bytes.ncols());

    if let Some(output_path) = output_path {
        let gray = Image::from_dynamic_image(&image)?;
        let display = draw_keypoints(&gray.to_image(), &keypoints, 255);
        display.save(&output_path)?;
        info!("wrote {}", output_path);
    }

    Ok(())
}
