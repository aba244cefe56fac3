//! Scene Compositor
//!
//! Lights a scene surface in three steps:
//! 1. The optional baseline pass
//! 2. One ambient pass multiplying the scene by the ambient floor
//! 3. One fullscreen pass per light, adding that light where its mask covers
//!
//! Every light pass reads a snapshot of the scene and writes the scene back,
//! and channels saturate at 1.0, so the result depends on pass order. A
//! pixel no mask covers keeps the ambient floor however many lights there are.
//!
//! ## Contract
//!
//! Passes run in ascending [`LightId`] order regardless of the order they
//! are handed in.

use std::sync::Arc;

use glam::{Vec2, Vec4};
use lumen_render::{
    BlendMode, FragmentShader, RenderError, RenderResult, RenderStates, RenderTarget, Texture, Uniforms, Vertex,
    VertexArray,
};
use serde::{Deserialize, Serialize};

use crate::config::LightingConfig;
use crate::light::{Light, LightId};
use crate::shaders::uniform;

/// Work done before the per-light passes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaselinePass {
    /// Leave the scene untouched
    #[default]
    Identity,
    /// Additively blend the scene onto itself
    Additive,
}

/// One light's contribution
#[derive(Clone, Copy, Debug)]
pub struct LightPass<'a> {
    pub id: LightId,
    pub hue: Vec4,
    pub intensity: f32,
    pub mask: &'a Texture,
}

impl<'a> LightPass<'a> {
    pub fn new(light: &Light, mask: &'a Texture) -> Self {
        Self {
            id: light.id(),
            hue: light.color(),
            intensity: light.intensity(),
            mask,
        }
    }
}

/// Applies light masks to a scene surface
#[derive(Clone)]
pub struct SceneCompositor {
    blend_shader: Arc<dyn FragmentShader>,
    baseline: BaselinePass,
    min_intensity: f32,
    max_intensity: f32,
    ambient_color: Vec4,
    ambient_intensity: f32,
}

impl SceneCompositor {
    pub fn new(blend_shader: Arc<dyn FragmentShader>, config: &LightingConfig) -> Self {
        Self {
            blend_shader,
            baseline: config.baseline_pass,
            min_intensity: config.min_intensity,
            max_intensity: config.max_intensity,
            ambient_color: config.ambient_color,
            ambient_intensity: config.ambient_intensity,
        }
    }

    /// Light `scene` with every pass, then display it
    ///
    /// Returns the number of light passes.
    pub fn composite<'a>(
        &self,
        scene: &mut RenderTarget,
        passes: impl IntoIterator<Item = LightPass<'a>>,
    ) -> RenderResult<usize> {
        let mut passes: Vec<LightPass<'a>> = passes.into_iter().collect();
        passes.sort_by_key(|p| p.id);

        if let Some(pass) = passes.iter().find(|p| p.mask.size() != scene.size()) {
            return Err(RenderError::SizeMismatch {
                expected: scene.size(),
                actual: pass.mask.size(),
            });
        }

        let quad = VertexArray::quad(Vec2::ZERO, scene.size_vec(), Vec2::ZERO);

        if self.baseline == BaselinePass::Additive {
            let snapshot = scene.snapshot();
            scene.draw(&quad, &RenderStates::new(BlendMode::Additive).with_texture(&snapshot))?;
        }

        let unlit = scene.snapshot();
        scene.draw(&self.ambient_quad(scene.size_vec()), &RenderStates::new(BlendMode::Multiply))?;

        for pass in &passes {
            let lit = scene.snapshot();
            let uniforms = Uniforms::new()
                .with(uniform::MASK_TEXTURE, pass.mask)
                .with(uniform::SCENE_TEXTURE, &unlit)
                .with(uniform::MINIMUM_INTENSITY, self.min_intensity)
                .with(uniform::MAXIMUM_INTENSITY, self.max_intensity)
                .with(uniform::LIGHT_HUE, pass.hue)
                .with(uniform::HUE_INTENSITY, pass.intensity);
            let states = RenderStates::new(BlendMode::Alpha)
                .with_texture(&lit)
                .with_shader(self.blend_shader.as_ref(), &uniforms);
            scene.draw(&quad, &states)?;
            log::trace!("Composited {}", pass.id);
        }

        scene.display();
        Ok(passes.len())
    }

    /// Fullscreen quad tinted with the ambient floor; alpha stays 1 so a
    /// multiply keeps the scene's alpha
    fn ambient_quad(&self, size: Vec2) -> VertexArray {
        let floor = (self.ambient_color.truncate() * self.ambient_intensity).extend(1.0);
        let v = [Vec2::ZERO, Vec2::new(size.x, 0.0), size, Vec2::new(0.0, size.y)].map(|p| Vertex::colored(p, floor));
        let mut quad = VertexArray::with_triangle_capacity(2);
        quad.push_triangle(v[0], v[1], v[2]);
        quad.push_triangle(v[0], v[2], v[3]);
        quad
    }
}

impl std::fmt::Debug for SceneCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneCompositor")
            .field("blend_shader", &self.blend_shader.name())
            .field("baseline", &self.baseline)
            .field("min_intensity", &self.min_intensity)
            .field("max_intensity", &self.max_intensity)
            .field("ambient_color", &self.ambient_color)
            .field("ambient_intensity", &self.ambient_intensity)
            .finish()
    }
}
