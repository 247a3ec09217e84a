use crate::Float;

/// Elements are clipped to this fraction of the descriptor norm
pub const DESCRIPTOR_MAGNITUDE_THRESHOLD: Float = 0.2;
/// Target norm after clipping, chosen so elements fit into a byte
pub const INT_DESCRIPTOR_FACTOR: Float = 512.0;

/// Clipped and renormalized descriptor, elements in `[0,255]`.
#[derive(Debug,Clone)]
pub struct FeatureVector {
    pub data: Vec<Float>
}

impl FeatureVector {
    pub fn new(raw_descriptor: &[Float]) -> FeatureVector {
        let threshold = l2_norm(raw_descriptor)*DESCRIPTOR_MAGNITUDE_THRESHOLD;
        let clipped = raw_descriptor.iter().map(|&v| v.min(threshold)).collect::<Vec<Float>>();
        let scale = INT_DESCRIPTOR_FACTOR/l2_norm(&clipped).max(Float::EPSILON);
        let data = clipped.iter().map(|&v| (v*scale).floor().clamp(0.0, 255.0)).collect();
        FeatureVector{data}
    }
}

pub fn l2_norm(values: &[Float]) -> Float {
    values.iter().map(|v| v*v).sum::<Float>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_element_is_clipped() {
        let mut raw = vec![1.0 as Float;128];
        raw[0] = 100.0;
        let threshold = l2_norm(&raw)*DESCRIPTOR_MAGNITUDE_THRESHOLD;
        let clipped = raw.iter().map(|&v| v.min(threshold)).collect::<Vec<Float>>();
        assert!(l2_norm(&clipped) <= l2_norm(&raw));

        let vector = FeatureVector::new(&raw);
        assert_eq!(vector.data.len(), 128);
        assert!(vector.data.iter().all(|&v| v >= 0.0 && v <= 255.0));
        assert!(vector.data[0] > vector.data[1]);
    }

    #[test]
    fn zero_descriptor_stays_zero() {
        let vector = FeatureVector::new(&vec![0.0;128]);
        assert!(vector.data.iter().all(|&v| v == 0.0));
    }
}
