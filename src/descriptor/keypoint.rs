use std::fmt;

use crate::Float;
use crate::features::{Feature, Oriented};

/// Pyramid location of a keypoint: signed octave, layer within the octave and
/// the quantized sub-layer offset `round((xs+0.5)*255)`.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Default)]
pub struct OctaveCode {
    pub octave: i8,
    pub layer: u8,
    pub offset: u8
}

impl OctaveCode {
    pub fn new(octave: i8, layer: u8, offset: u8) -> OctaveCode {
        OctaveCode{octave, layer, offset}
    }

    /// Packs as `octave & 0xff | layer << 8 | offset << 16`.
    pub fn pack(&self) -> i32 {
        (self.octave as u8 as i32) | ((self.layer as i32) << 8) | ((self.offset as i32) << 16)
    }

    pub fn unpack(packed: i32) -> OctaveCode {
        OctaveCode {
            octave: (packed & 0xff) as u8 as i8,
            layer: ((packed >> 8) & 0xff) as u8,
            offset: ((packed >> 16) & 0xff) as u8
        }
    }

    /// `2^-octave`: maps base image coordinates into the octave's pixel grid.
    pub fn scale(&self) -> Float {
        (-(self.octave as i32) as Float).exp2()
    }
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct KeyPoint {
    pub x: Float,
    pub y: Float,
    /// Diameter of the meaningful neighbourhood
    pub size: Float,
    /// Degrees in `[0,360)`, 0 when no orientation was computed
    pub angle: Float,
    pub response: Float,
    pub octave_code: OctaveCode
}

impl KeyPoint {
    pub fn new(x: Float, y: Float, size: Float) -> KeyPoint {
        KeyPoint{x, y, size, angle: 0.0, response: 0.0, octave_code: OctaveCode::default()}
    }

    pub fn with_octave_code(self, octave_code: OctaveCode) -> KeyPoint {
        KeyPoint{octave_code, ..self}
    }

    /// `(octave, layer, scale)`
    pub fn unpack_octave(&self) -> (i32, usize, Float) {
        let code = &self.octave_code;
        (code.octave as i32, code.layer as usize, code.scale())
    }
}

impl Feature for KeyPoint {
    fn get_x_image_float(&self) -> Float {
        self.x
    }

    fn get_y_image_float(&self) -> Float {
        self.y
    }
}

impl Oriented for KeyPoint {
    fn get_orientation(&self) -> Float {
        self.angle
    }
}

impl fmt::Display for KeyPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x: {}, y: {}, size: {}, angle: {}, response: {}, octave: {}, layer: {}", self.x, self.y, self.size, self.angle, self.response, self.octave_code.octave, self.octave_code.layer)
    }
}
