extern crate image as image_rs;

use image_rs::{GrayImage, Luma};

use crate::descriptor::keypoint::KeyPoint;
use crate::features::{Feature, Oriented};

// https://www.geeksforgeeks.org/bresenhams-circle-drawing-algorithm/?ref=rp
pub fn circle_bresenham(x_center: isize, y_center: isize, radius: usize) -> Vec<(isize,isize)> {
    let mut x: isize = 0;
    let mut y: isize = radius as isize;
    let mut d = 3 - 2*radius as isize;

    let mut points = bresenham_octant(x, y);
    while y >= x {
        x += 1;
        if d > 0 {
            y -= 1;
            d = d + 4*(x - y) + 10;
        } else {
            d = d + 4*x + 6;
        }
        points.extend(bresenham_octant(x, y));
    }

    points.into_iter().map(|(x, y)| (x_center + x, y_center + y)).collect()
}

fn bresenham_octant(x: isize, y: isize) -> Vec<(isize,isize)> {
    let mut points = Vec::<(isize,isize)>::with_capacity(8);
    for (x_sign, y_sign) in [(1,1), (1,-1), (-1,1), (-1,-1)] {
        points.push((x_sign*x, y_sign*y));
        points.push((x_sign*y, y_sign*x));
    }
    points
}

// https://en.wikipedia.org/wiki/Bresenham%27s_line_algorithm
pub fn line_bresenham(start: (isize,isize), end: (isize,isize)) -> Vec<(isize,isize)> {
    let (mut x0, mut y0) = start;
    let (x1, y1) = end;
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 {1} else {-1};
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 {1} else {-1};
    let mut err = dx + dy;
    let mut points = Vec::<(isize,isize)>::new();

    loop {
        points.push((x0, y0));
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2*err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }

    points
}

fn draw_points(image: &mut GrayImage, points: &[(isize,isize)], intensity: u8) -> () {
    let (width, height) = image.dimensions();
    for &(x, y) in points {
        if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
            image.put_pixel(x as u32, y as u32, Luma([intensity]));
        }
    }
}

/// Circle of the keypoint size and a radius pointing along its orientation.
pub fn draw_keypoints(image: &GrayImage, keypoints: &[KeyPoint], intensity: u8) -> GrayImage {
    let mut target = image.clone();
    for keypoint in keypoints {
        let x = keypoint.get_x_image() as isize;
        let y = keypoint.get_y_image() as isize;
        let radius = (keypoint.size*0.5).round().max(1.0);
        draw_points(&mut target, &circle_bresenham(x, y, radius as usize), intensity);

        let (sin, cos) = keypoint.get_orientation().to_radians().sin_cos();
        let tip = ((keypoint.x + radius*cos).round() as isize, (keypoint.y + radius*sin).round() as isize);
        draw_points(&mut target, &line_bresenham((x, y), tip), intensity);
    }
    target
}
