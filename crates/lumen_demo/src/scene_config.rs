//! Scene Configuration
//!
//! Describes what the demo lights and how long it runs.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. First positional argument: path to a JSON scene file
//! 2. Environment variable: `LUMEN_SCENE=/path/to/scene.json`
//! 3. Built-in two-light scene, only when no file is named
//!
//! A named file that cannot be read or parsed is an error.
//!
//! `LUMEN_FRAMES`, `LUMEN_OUTPUT` and `LUMEN_DUMP_DIR` override single fields.
//!
//! # Example Scene File
//!
//! ```json
//! {
//!   "frames": 60,
//!   "lights": [
//!     { "position": [400, 400], "intensity": 0.05, "color": [0, 1, 0.067, 1], "attenuation": 200 }
//!   ],
//!   "occluders": [
//!     { "kind": "rect", "position": [180, 200], "size": [50, 190] },
//!     { "kind": "polygon", "points": [[500, 100], [560, 120], [520, 180]] }
//!   ],
//!   "output": "lit_scene.png"
//! }
//! ```

use std::path::{Path, PathBuf};

use glam::Vec2;
use lumen_lighting::{LightDesc, LightingConfig};
use lumen_math::{polygon_edges, rect_edges, Edge};
use lumen_render::color;
use serde::{Deserialize, Serialize};

/// Occluder outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OccluderShape {
    /// Axis-aligned rectangle
    Rect { position: Vec2, size: Vec2 },
    /// Closed polygon through the points in order
    Polygon { points: Vec<Vec2> },
}

impl OccluderShape {
    pub fn edges(&self) -> Vec<Edge> {
        match self {
            Self::Rect { position, size } => rect_edges(*position, *size),
            Self::Polygon { points } => polygon_edges(points),
        }
    }
}

/// Complete demo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Lighting system settings
    pub lighting: LightingConfig,
    /// Lights in registration order
    pub lights: Vec<LightDesc>,
    /// Shadow casters
    pub occluders: Vec<OccluderShape>,
    /// Frames to simulate
    pub frames: u32,
    /// Radius of the path the first light follows
    pub orbit_radius: f32,
    /// Background image; a procedural pattern is used when absent
    pub background: Option<PathBuf>,
    /// Where the final lit frame is written
    pub output: PathBuf,
    /// Draw occluder outlines over the lit frame
    pub outline_occluders: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let light = |x: f32, y: f32, rgb: [u8; 3]| LightDesc {
            position: Vec2::new(x, y),
            intensity: 0.05,
            color: color::from_rgba8(rgb[0], rgb[1], rgb[2], 255),
            attenuation: 200.0,
            expand: 30.0,
            radius: 200.0,
        };
        Self {
            lighting: LightingConfig::default(),
            lights: vec![light(400.0, 400.0, [0, 255, 17]), light(450.0, 520.0, [246, 255, 0])],
            occluders: vec![
                OccluderShape::Rect {
                    position: Vec2::new(180.0, 200.0),
                    size: Vec2::new(50.0, 190.0),
                },
                OccluderShape::Rect {
                    position: Vec2::new(600.0, 450.0),
                    size: Vec2::new(75.0, 250.0),
                },
            ],
            frames: 120,
            orbit_radius: 120.0,
            background: None,
            output: PathBuf::from("lit_scene.png"),
            outline_occluders: true,
        }
    }
}

impl SceneConfig {
    /// Load the configuration from all sources
    ///
    /// A scene file named on the command line or in `LUMEN_SCENE` must load;
    /// the built-in scene is only used when no file is named.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = std::env::args()
            .skip(1)
            .find(|arg| !arg.starts_with("--"))
            .or_else(|| std::env::var("LUMEN_SCENE").ok().filter(|p| !p.is_empty()));

        let mut config = Self::from_named_file(path.as_deref())?;

        if let Ok(frames) = std::env::var("LUMEN_FRAMES") {
            config.frames = frames
                .parse()
                .map_err(|e| format!("LUMEN_FRAMES={}: {}", frames, e))?;
        }
        if let Ok(output) = std::env::var("LUMEN_OUTPUT") {
            if !output.is_empty() {
                config.output = PathBuf::from(output);
            }
        }
        if let Ok(dir) = std::env::var("LUMEN_DUMP_DIR") {
            if !dir.is_empty() {
                config.lighting.debug_dump_dir = Some(PathBuf::from(dir));
            }
        }
        Ok(config)
    }

    /// The named scene file, or the built-in scene when there is none
    pub fn from_named_file(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config = Self::load_from_file(path).map_err(|e| format!("scene {}: {}", path, e))?;
        log::info!("Loaded scene from {}", path);
        Ok(config)
    }

    /// Load a JSON scene file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Print a short summary to the log
    pub fn log_summary(&self) {
        log::info!(
            "Scene: {} lights, {} occluders, {} frames, {}x{} surfaces",
            self.lights.len(),
            self.occluders.len(),
            self.frames,
            self.lighting.surface_size,
            self.lighting.surface_size
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.lights.len(), 2);
        assert_eq!(config.lights[0].color, color::from_rgba8(0, 255, 17, 255));
        let edges: usize = config.occluders.iter().map(|o| o.edges().len()).sum();
        assert_eq!(edges, 8);
    }

    #[test]
    fn test_parse_scene_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(
            &path,
            r#"{
                "frames": 3,
                "lights": [{ "position": [10, 20], "attenuation": 50 }],
                "occluders": [
                    { "kind": "rect", "position": [0, 0], "size": [4, 4] },
                    { "kind": "polygon", "points": [[0, 0], [5, 0], [0, 5]] }
                ],
                "lighting": { "surface_size": 128 }
            }"#,
        )
        .unwrap();

        let config = SceneConfig::load_from_file(&path).unwrap();
        assert_eq!(config.frames, 3);
        assert_eq!(config.lights[0].position, Vec2::new(10.0, 20.0));
        assert_eq!(config.lights[0].intensity, 1.0);
        assert_eq!(config.occluders[1].edges().len(), 3);
        assert_eq!(config.lighting.surface_size, 128);
        assert_eq!(config.output, PathBuf::from("lit_scene.png"));
    }

    #[test]
    fn test_bad_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(SceneConfig::load_from_file(&path).is_err());
        assert!(SceneConfig::load_from_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_named_file_must_load() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let missing = missing.to_str().unwrap();
        let err = SceneConfig::from_named_file(Some(missing)).unwrap_err();
        assert!(err.to_string().contains("missing.json"));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ \"frames\": \"many\" }").unwrap();
        assert!(SceneConfig::from_named_file(bad.to_str()).is_err());

        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{ "frames": 7 }"#).unwrap();
        assert_eq!(SceneConfig::from_named_file(good.to_str()).unwrap().frames, 7);
    }

    #[test]
    fn test_no_named_file_uses_builtin() {
        let config = SceneConfig::from_named_file(None).unwrap();
        assert_eq!(config.lights, SceneConfig::default().lights);
    }
}
