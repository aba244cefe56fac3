//! Lighting Configuration
//!
//! Global lighting settings with serde support so scenes can ship them as data.

use std::path::PathBuf;

use glam::Vec4;
use lumen_render::BlendMode;
use serde::{Deserialize, Serialize};

use crate::compositor::BaselinePass;
use crate::error::{LightingError, LightingResult};

/// Global lighting configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Side length of every per-light surface (gradient, shadow, light map)
    pub surface_size: u32,

    /// Height of the view, fed to the radial shader as a square resolution
    pub view_height: f32,

    /// Lower clamp for a light's hue intensity when compositing
    pub min_intensity: f32,

    /// Upper clamp for a light's hue intensity when compositing
    pub max_intensity: f32,

    /// Ambient color, multiplied into the scene once before the light passes
    pub ambient_color: Vec4,

    /// Ambient strength; pixels no light reaches fall to `scene * ambient_color * ambient_intensity`
    pub ambient_intensity: f32,

    /// What the compositor does before the per-light passes
    pub baseline_pass: BaselinePass,

    /// Blend mode for the aggregate shadow mesh in the combined map
    pub combined_shadow_blend: BlendMode,

    /// Light-to-vertex distances at or below this use the fallback direction
    pub degenerate_epsilon: f32,

    /// Minimum `(major, minor)` context version
    pub min_context_version: (u32, u32),

    /// Where debug PNG dumps go (None = no dumps)
    pub debug_dump_dir: Option<PathBuf>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            surface_size: 800,
            view_height: 800.0,
            min_intensity: 1.0,
            max_intensity: 5.0,
            ambient_color: Vec4::new(1.0, 1.0, 1.0, 0.0),
            ambient_intensity: 0.1,
            baseline_pass: BaselinePass::Identity,
            combined_shadow_blend: BlendMode::Alpha,
            degenerate_epsilon: lumen_math::EPSILON,
            min_context_version: (4, 3),
            debug_dump_dir: None,
        }
    }
}

impl LightingConfig {
    /// Configuration with a smaller surface, for tests and thumbnails
    pub fn with_surface_size(size: u32) -> Self {
        Self {
            surface_size: size,
            view_height: size as f32,
            ..Default::default()
        }
    }

    /// Reject non-finite values, then clamp the rest to valid ranges
    pub fn validate(&mut self) -> LightingResult<()> {
        let floats = [
            ("view_height", self.view_height),
            ("min_intensity", self.min_intensity),
            ("max_intensity", self.max_intensity),
            ("ambient_intensity", self.ambient_intensity),
            ("degenerate_epsilon", self.degenerate_epsilon),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LightingError::Config(format!("{} must be finite, got {}", name, value)));
        }
        if !self.ambient_color.is_finite() {
            return Err(LightingError::Config("ambient_color must be finite".into()));
        }

        self.surface_size = self.surface_size.clamp(16, 8192);
        self.view_height = self.view_height.max(1.0);
        self.min_intensity = self.min_intensity.max(0.0);
        self.max_intensity = self.max_intensity.max(self.min_intensity);
        self.ambient_color = self.ambient_color.clamp(Vec4::ZERO, Vec4::ONE);
        self.ambient_intensity = self.ambient_intensity.max(0.0);
        self.degenerate_epsilon = self.degenerate_epsilon.max(f32::EPSILON);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LightingConfig::default();
        assert_eq!(config.surface_size, 800);
        assert_eq!(config.min_intensity, 1.0);
        assert_eq!(config.max_intensity, 5.0);
        assert_eq!(config.ambient_intensity, 0.1);
        assert_eq!(config.baseline_pass, BaselinePass::Identity);
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = LightingConfig {
            surface_size: 1,
            min_intensity: 3.0,
            max_intensity: 2.0,
            ambient_intensity: -1.0,
            ambient_color: Vec4::splat(2.0),
            ..Default::default()
        };
        config.validate().unwrap();
        assert_eq!(config.surface_size, 16);
        assert_eq!(config.max_intensity, 3.0);
        assert_eq!(config.ambient_intensity, 0.0);
        assert_eq!(config.ambient_color, Vec4::ONE);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut config = LightingConfig {
            max_intensity: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(LightingError::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LightingConfig =
            serde_json::from_str(r#"{ "surface_size": 256, "baseline_pass": "Additive" }"#).unwrap();
        assert_eq!(config.surface_size, 256);
        assert_eq!(config.baseline_pass, BaselinePass::Additive);
        assert_eq!(config.ambient_intensity, 0.1);
        assert!(config.debug_dump_dir.is_none());
    }
}
