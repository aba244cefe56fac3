//! Light Map Renderer
//!
//! Per light and frame:
//! 1. Draw the coverage fan textured from the gradient surface
//! 2. Multiply the light's umbra mesh into it, zeroing occluded pixels
//! 3. Display the result as the light's illumination mask
//!
//! The same umbra mesh is multiplied over opaque white on the shadow surface.

use std::sync::Arc;

use glam::Vec2;
use lumen_render::{color, BlendMode, FragmentShader, RenderResult, RenderStates, Uniforms, VertexArray};

use crate::error::{LightingError, LightingResult};
use crate::light::Light;
use crate::shaders::uniform;
use crate::surfaces::LightSurfaces;

/// Renders gradient surfaces and per-light illumination masks
#[derive(Clone)]
pub struct LightMapRenderer {
    light_shader: Arc<dyn FragmentShader>,
    view_height: f32,
}

impl LightMapRenderer {
    pub fn new(light_shader: Arc<dyn FragmentShader>, view_height: f32) -> Self {
        Self {
            light_shader,
            view_height,
        }
    }

    pub fn set_view_height(&mut self, view_height: f32) {
        self.view_height = view_height;
    }

    pub fn view_height(&self) -> f32 {
        self.view_height
    }

    /// Render a white radial gradient of the given attenuation centred on
    /// the gradient surface
    pub fn render_gradient(&self, surfaces: &mut LightSurfaces, attenuation: f32) -> RenderResult<()> {
        let gradient = &mut surfaces.gradient;
        let center = gradient.size_vec() * 0.5;
        let quad = VertexArray::quad(
            center - Vec2::splat(attenuation),
            Vec2::splat(2.0 * attenuation),
            Vec2::ZERO,
        );
        let uniforms = Uniforms::new()
            .with(uniform::LIGHT_COLOR, color::WHITE)
            .with(uniform::LIGHT_ORIGIN, center)
            .with(uniform::ATTENUATION, attenuation)
            .with(uniform::SCREEN_RESOLUTION, Vec2::splat(self.view_height));

        gradient.clear(color::TRANSPARENT);
        let states = RenderStates::new(BlendMode::Replace).with_shader(self.light_shader.as_ref(), &uniforms);
        let stats = gradient.draw(&quad, &states)?;
        gradient.display();
        log::debug!(
            "Rendered gradient (attenuation {}, {} fragments)",
            attenuation,
            stats.fragments
        );
        Ok(())
    }

    /// Compose the light's illumination mask for this frame
    pub fn render(&self, light: &Light, surfaces: &mut LightSurfaces) -> LightingResult<()> {
        if light.is_geometry_dirty() {
            return Err(LightingError::StaleGeometry(light.id()));
        }
        let LightSurfaces {
            gradient,
            shadow,
            light_map,
        } = surfaces;

        light_map.clear(color::TRANSPARENT);
        light_map.draw(
            light.light_verts(),
            &RenderStates::new(BlendMode::Replace).with_texture(gradient.texture()),
        )?;
        light_map.draw(light.shadow_verts(), &RenderStates::new(BlendMode::Multiply))?;
        light_map.display();

        shadow.clear(color::WHITE);
        shadow.draw(light.shadow_verts(), &RenderStates::new(BlendMode::Multiply))?;
        shadow.display();

        log::trace!("Rendered light map for {}", light.id());
        Ok(())
    }
}

impl std::fmt::Debug for LightMapRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightMapRenderer")
            .field("light_shader", &self.light_shader.name())
            .field("view_height", &self.view_height)
            .finish()
    }
}
