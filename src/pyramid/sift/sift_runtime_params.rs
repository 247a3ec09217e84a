use std::{fmt, fs, path::Path};
use serde::{Serialize, Deserialize};

use crate::Float;
use crate::error::{Result, SiftError};

/// Detector settings. Missing YAML fields fall back to the defaults below.
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct SiftRuntimeParams {
    /// Number of best keypoints to keep, 0 keeps all of them
    pub max_features: usize,
    /// Layers per octave, not counting the 3 extra images needed for extrema search
    pub octave_layers: usize,
    pub contrast_threshold: Float,
    pub edge_threshold: Float,
    /// Blur of the octave base images
    pub sigma: Float,
    /// Upsample the input to create octave -1
    pub use_negative_octave: bool
}

impl Default for SiftRuntimeParams {
    fn default() -> SiftRuntimeParams {
        SiftRuntimeParams {
            max_features: 0,
            octave_layers: 3,
            contrast_threshold: 0.04,
            edge_threshold: 10.0,
            sigma: 1.6,
            use_negative_octave: true
        }
    }
}

impl fmt::Display for SiftRuntimeParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "n_{}_l_{}_c_{}_e_{}_s_{}_neg_{}", self.max_features, self.octave_layers, self.contrast_threshold, self.edge_threshold, self.sigma, self.use_negative_octave)
    }
}

impl SiftRuntimeParams {

    pub fn from_yaml_str(yaml: &str) -> Result<SiftRuntimeParams> {
        let params: SiftRuntimeParams = serde_yaml::from_str(yaml)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<SiftRuntimeParams> {
        let yaml = fs::read_to_string(path)?;
        SiftRuntimeParams::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        if self.octave_layers == 0 || self.octave_layers > 252 {
            return Err(SiftError::InvalidParameter{name: "octave_layers", reason: format!("{} is not in [1,252]", self.octave_layers)});
        }
        if !(self.sigma > 0.0) {
            return Err(SiftError::InvalidParameter{name: "sigma", reason: format!("{} is not positive", self.sigma)});
        }
        if !(self.contrast_threshold >= 0.0) {
            return Err(SiftError::InvalidParameter{name: "contrast_threshold", reason: format!("{} is negative", self.contrast_threshold)});
        }
        if !(self.edge_threshold > 0.0) {
            return Err(SiftError::InvalidParameter{name: "edge_threshold", reason: format!("{} is not positive", self.edge_threshold)});
        }
        Ok(())
    }

    pub fn first_octave(&self) -> i32 {
        match self.use_negative_octave {
            true => -1,
            false => 0
        }
    }

    /// Images per octave in the gaussian pyramid
    pub fn gaussian_images_per_octave(&self) -> usize {
        self.octave_layers + 3
    }

    /// Images per octave in the difference of gaussian pyramid
    pub fn dog_images_per_octave(&self) -> usize {
        self.octave_layers + 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let params = SiftRuntimeParams::from_yaml_str("max_features: 500\nuse_negative_octave: false\n").unwrap();
        assert_eq!(params.max_features, 500);
        assert!(!params.use_negative_octave);
        assert_eq!(params.octave_layers, 3);
        assert_eq!(params.sigma, 1.6);
        assert_eq!(params.first_octave(), 0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(SiftRuntimeParams::from_yaml_str("octave_layers: 0"), Err(SiftError::InvalidParameter{name: "octave_layers", ..})));
        assert!(matches!(SiftRuntimeParams::from_yaml_str("sigma: -1.0"), Err(SiftError::InvalidParameter{name: "sigma", ..})));
        assert!(matches!(SiftRuntimeParams::from_yaml_str("octave_layers: [1"), Err(SiftError::Config(_))));
    }
}
