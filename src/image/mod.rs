extern crate image as image_rs;
extern crate nalgebra as na;

use image_rs::{GrayImage, DynamicImage, Luma};
use na::DMatrix;

use crate::Float;
use crate::error::{Result, SiftError};
use self::image_encoding::ImageEncoding;

pub mod image_encoding;
pub mod filter;

/// Single channel floating point image. The buffer is indexed by `(row, column)`.
#[derive(Debug,Clone)]
pub struct Image {
    pub buffer: DMatrix<Float>,
    pub original_encoding: ImageEncoding
}

impl Image {

    pub fn width(&self) -> usize {
        self.buffer.ncols()
    }

    pub fn height(&self) -> usize {
        self.buffer.nrows()
    }

    pub fn from_matrix(matrix: DMatrix<Float>, original_encoding: ImageEncoding) -> Image {
        Image{ buffer: matrix, original_encoding}
    }

    /// Intensities keep their 0..255 range.
    pub fn from_gray_image(image: &GrayImage) -> Image {
        let (width, height) = image.dimensions();
        let buffer = DMatrix::<Float>::from_fn(height as usize, width as usize, |r,c| image.get_pixel(c as u32, r as u32).0[0] as Float);
        Image{ buffer, original_encoding: ImageEncoding::U8}
    }

    /// Accepts 8-bit gray, gray-alpha, rgb and rgba images. Color images are reduced to BT.601 luma, alpha is dropped.
    pub fn from_dynamic_image(image: &DynamicImage) -> Result<Image> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SiftError::EmptyImage);
        }

        let gray = match image {
            DynamicImage::ImageLuma8(gray) => gray.clone(),
            DynamicImage::ImageLumaA8(_) => image.to_luma8(),
            DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => {
                let rgb = image.to_rgb8();
                GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| Luma([bt601_luma(rgb.get_pixel(x, y).0)]))
            },
            other => return Err(SiftError::UnsupportedDepth(other.color()))
        };

        Ok(Image::from_gray_image(&gray))
    }

    pub fn to_image(&self) -> GrayImage {
        let (rows, cols) = self.buffer.shape();
        let max = self.buffer.max();
        let min = self.buffer.min();
        let mut gray_image = GrayImage::new(cols as u32, rows as u32);
        for c in 0..cols {
            for r in 0..rows {
                let val = self.buffer[(r,c)];
                let pixel_value = self.original_encoding.normalize_to_gray(max,min,val);
                gray_image.put_pixel(c as u32, r as u32, Luma([pixel_value]));
            }
        }
        gray_image
    }

    pub fn difference(minuend: &Image, subtrahend: &Image) -> Image {
        Image::from_matrix(&minuend.buffer - &subtrahend.buffer, ImageEncoding::F32)
    }

    /// Nearest neighbour resize to `(width/2, height/2)`, i.e. every second sample.
    pub fn downsample_half(image: &Image) -> Image {
        let new_width = image.width()/2;
        let new_height = image.height()/2;
        let buffer = DMatrix::<Float>::from_fn(new_height, new_width, |r,c| image.buffer[(2*r,2*c)]);

        Image{
            buffer,
            original_encoding: image.original_encoding
        }
    }

    /// Bilinear resize to `(2*width, 2*height)` with pixel centers aligned.
    pub fn upsample_double(image: &Image) -> Image {
        let width = image.width();
        let height = image.height();

        let cols = (0..2*width).map(|x| linear_source(x, width)).collect::<Vec<(usize,Float)>>();
        let rows = (0..2*height).map(|y| linear_source(y, height)).collect::<Vec<(usize,Float)>>();

        let old_buffer = &image.buffer;
        let buffer = DMatrix::<Float>::from_fn(2*height, 2*width, |r,c| {
            let (y0, fy) = rows[r];
            let (x0, fx) = cols[c];
            let y1 = (y0+1).min(height-1);
            let x1 = (x0+1).min(width-1);

            (1.0-fy)*((1.0-fx)*old_buffer[(y0,x0)] + fx*old_buffer[(y0,x1)]) +
            fy*((1.0-fx)*old_buffer[(y1,x0)] + fx*old_buffer[(y1,x1)])
        });

        Image{
            buffer,
            original_encoding: image.original_encoding
        }
    }
}

/// `0.299 r + 0.587 g + 0.114 b` in 14 bit fixed point, rounded.
fn bt601_luma([r, g, b]: [u8;3]) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    const SHIFT: u32 = 14;
    ((R*r as u32 + G*g as u32 + B*b as u32 + (1 << (SHIFT-1))) >> SHIFT) as u8
}

fn linear_source(dst: usize, src_len: usize) -> (usize, Float) {
    let f = (dst as Float + 0.5)*0.5 - 0.5;
    let s = f.floor();
    match s {
        s if s < 0.0 => (0, 0.0),
        s if s as usize >= src_len-1 => (src_len-1, 0.0),
        s => (s as usize, f - s)
    }
}
