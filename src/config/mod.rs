//! Configuration and serialization module.
//!
//! All values are fixed for the lifetime of a run. Defaults reproduce the
//! reference rig: a 600x600 camera and projector sharing a 50° vertical field
//! of view, with the camera rotated -10° about the vertical axis and offset
//! -0.2 units along x.

use crate::error::{Result, ScanError};
use crate::pattern::PatternEncoding;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest supported number of bit-planes.
pub const MAX_BIT_COUNT: u32 = 16;

/// Fixed camera/projector geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Vertical field of view shared by camera and projector, in degrees.
    pub fov_y_degrees: f64,
    /// Width / height of both image planes.
    pub aspect: f64,
    /// Near clipping distance.
    pub near: f64,
    /// Far clipping distance.
    pub far: f64,
    /// Projector-to-camera rotation about the vertical axis, in degrees.
    pub rotation_degrees: f64,
    /// Projector-to-camera translation along x.
    pub translation_offset: f64,
    /// Normalized depth of the first camera ray sample.
    pub camera_near_depth: f64,
    /// Normalized depth of the second camera ray sample.
    pub camera_far_depth: f64,
    /// Normalized depth used to sample the projector ray.
    pub projector_depth: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 50.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
            rotation_degrees: -10.0,
            translation_offset: -0.2,
            camera_near_depth: 0.1,
            camera_far_depth: 0.7,
            projector_depth: 0.7,
        }
    }
}

impl GeometryConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(ScanError::config(format!(
                "fov_y_degrees must be in (0, 180), got {}",
                self.fov_y_degrees
            )));
        }
        if !(self.aspect > 0.0) {
            return Err(ScanError::config(format!("aspect must be positive, got {}", self.aspect)));
        }
        if !(self.near > 0.0) || !(self.far > self.near) {
            return Err(ScanError::config(format!(
                "depth range must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        if self.camera_near_depth == self.camera_far_depth {
            return Err(ScanError::config(
                "camera ray sample depths must differ",
            ));
        }
        Ok(())
    }
}

/// How a pixel whose luminance sits exactly on its threshold is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TieBreak {
    /// Exactly at the midpoint decodes to 0.
    #[default]
    Low,
    /// Exactly at the midpoint decodes to 1.
    High,
}

/// Bit-plane decoding parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Number of bit-planes (captured frames), most significant first.
    pub bit_count: u32,
    /// Code carried by the projected stripes.
    pub encoding: PatternEncoding,
    /// Threshold tie policy.
    pub tie_break: TieBreak,
    /// RGB weights of the luminance conversion.
    pub luminance_weights: [f32; 3],
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            bit_count: 7,
            encoding: PatternEncoding::Binary,
            tie_break: TieBreak::Low,
            luminance_weights: [1.0 / 3.0; 3],
        }
    }
}

impl DecodeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bit_count == 0 || self.bit_count > MAX_BIT_COUNT {
            return Err(ScanError::config(format!(
                "bit_count must be in 1..={}, got {}",
                MAX_BIT_COUNT, self.bit_count
            )));
        }
        if self.luminance_weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ScanError::config("luminance weights must be finite and non-negative"));
        }
        Ok(())
    }
}

/// Complete reconstruction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub geometry: GeometryConfig,
    pub decode: DecodeConfig,
    /// Symmetric bound on every coordinate of an accepted point (inclusive).
    pub volume_bound: f64,
    /// Depth visualization divisor: pixel value = -z / depth_scale.
    pub depth_scale: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            decode: DecodeConfig::default(),
            volume_bound: 10.0,
            depth_scale: 3.0,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        self.decode.validate()?;
        if !(self.volume_bound > 0.0) {
            return Err(ScanError::config(format!(
                "volume_bound must be positive, got {}",
                self.volume_bound
            )));
        }
        if !(self.depth_scale > 0.0) {
            return Err(ScanError::config(format!(
                "depth_scale must be positive, got {}",
                self.depth_scale
            )));
        }
        Ok(())
    }
}

/// A scan to run: which captures to read and where results go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanJob {
    /// Captured frames, one per bit-plane, most significant bit first.
    pub frames: Vec<PathBuf>,
    /// Directory receiving the point cloud and visualizations.
    pub output_dir: PathBuf,
    /// Free-form second line of the point cloud file.
    pub comment: String,
    pub config: ScanConfig,
}

impl Default for ScanJob {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            output_dir: PathBuf::from("."),
            comment: "structured light scan".to_string(),
            config: ScanConfig::default(),
        }
    }
}

impl ScanJob {
    /// Load a job description from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let job: ScanJob = serde_json::from_str(json)?;
        job.config.validate()?;
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let job = ScanJob::from_json(
            r#"{
                "frames": ["scenes/scene_1.png", "scenes/scene_2.png"],
                "config": { "decode": { "bit_count": 2, "tie_break": "High" } }
            }"#,
        )
        .unwrap();

        assert_eq!(job.frames.len(), 2);
        assert_eq!(job.config.decode.bit_count, 2);
        assert_eq!(job.config.decode.tie_break, TieBreak::High);
        assert_eq!(job.config.decode.encoding, PatternEncoding::Binary);
        assert_eq!(job.config.geometry, GeometryConfig::default());
        assert_eq!(job.config.volume_bound, 10.0);
    }

    #[test]
    fn test_rejects_bad_bit_count() {
        let mut config = ScanConfig::default();
        config.decode.bit_count = 0;
        assert!(matches!(config.validate(), Err(ScanError::Configuration(_))));
        config.decode.bit_count = MAX_BIT_COUNT + 1;
        assert!(matches!(config.validate(), Err(ScanError::Configuration(_))));
    }

    #[test]
    fn test_rejects_degenerate_geometry() {
        let mut config = ScanConfig::default();
        config.geometry.far = config.geometry.near;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.geometry.camera_far_depth = config.geometry.camera_near_depth;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(ScanJob::from_json("{ not json"), Err(ScanError::Json(_))));
    }
}
