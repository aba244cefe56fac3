//! # lumen_lighting - 2D Shadow Casting
//!
//! Point lights with hard shadows from polygonal occluders:
//! - Light and occluder registries with monotonic, never-reused ids
//! - Per-frame umbra geometry: two triangles per light per occluder edge
//! - Per-light illumination masks (radial gradient with umbra multiplied out)
//! - Sequential, order-dependent compositing onto a scene surface
//! - A combined debug map of every light and shadow
//!
//! ## Example
//!
//! ```ignore
//! use lumen_lighting::prelude::*;
//!
//! let mut lights = LightSystem::with_builtin_shaders(LightingConfig::default())?;
//! let id = lights.add_light(LightDesc { position: Vec2::new(400.0, 400.0), ..Default::default() })?;
//! lights.add_occluder(rect_edges(Vec2::new(180.0, 200.0), Vec2::new(50.0, 190.0)));
//!
//! // Per frame
//! lights.move_light(id, cursor);
//! lights.update_lights();
//! lights.render_onto_scene(&mut scene, &mut output)?;
//! ```

pub mod combined;
pub mod compositor;
pub mod config;
pub mod error;
pub mod light;
pub mod light_map;
pub mod occluder;
pub mod shaders;
pub mod shadow;
pub mod surfaces;
pub mod system;

pub use combined::CombinedMap;
pub use compositor::{BaselinePass, LightPass, SceneCompositor};
pub use config::LightingConfig;
pub use error::{LightingError, LightingResult};
pub use light::{Light, LightDesc, LightId, LightRegistry};
pub use light_map::LightMapRenderer;
pub use occluder::{Occluder, OccluderId, OccluderRegistry};
pub use shaders::{builtin_library, LightingShaders, MaskBlendShader, RadialLightShader, ShadowingShader};
pub use shadow::{coverage_fan, ShadowGeometryBuilder, ShadowStats, UmbraQuad};
pub use surfaces::LightSurfaces;
pub use system::LightSystem;

pub mod prelude {
    pub use crate::config::LightingConfig;
    pub use crate::error::{LightingError, LightingResult};
    pub use crate::light::{LightDesc, LightId};
    pub use crate::occluder::OccluderId;
    pub use crate::system::LightSystem;
    pub use lumen_math::{polygon_edges, rect_edges, Edge};
    pub use lumen_render::{color, ContextSettings, RenderTarget, Texture};
    pub use glam::{Vec2, Vec4};
}
