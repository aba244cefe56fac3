//! Combined light map, a debug view of every light and shadow on one surface

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use lumen_render::{color, BlendMode, FragmentShader, RenderResult, RenderStates, RenderTarget, Uniforms, VertexArray};

use crate::light::LightRegistry;
use crate::shaders::uniform;

/// File name of the one-time combined map dump
pub const COMBINED_DUMP_NAME: &str = "combined_light_map.png";

/// All lights' falloff plus the aggregate shadow mesh
pub struct CombinedMap {
    target: RenderTarget,
    light_shader: Arc<dyn FragmentShader>,
    shadow_blend: BlendMode,
    dumped: bool,
}

impl CombinedMap {
    pub fn new(size: u32, light_shader: Arc<dyn FragmentShader>, shadow_blend: BlendMode) -> RenderResult<Self> {
        Ok(Self {
            target: RenderTarget::new(size, size)?,
            light_shader,
            shadow_blend,
            dumped: false,
        })
    }

    /// Redraw the map
    ///
    /// Each light contributes a `2R` square through the radial shader with
    /// additive blending; `shadows` is drawn over the result. On the first
    /// render with a `dump_dir`, the map is written to disk once.
    pub fn render(
        &mut self,
        lights: &LightRegistry,
        shadows: &VertexArray,
        view_height: f32,
        dump_dir: Option<&Path>,
    ) -> RenderResult<()> {
        self.target.clear(color::TRANSPARENT);

        for light in lights.iter() {
            let radius = light.attenuation();
            let quad = VertexArray::quad(
                light.position() - Vec2::splat(radius),
                Vec2::splat(2.0 * radius),
                Vec2::ZERO,
            );
            let uniforms = Uniforms::new()
                .with(uniform::LIGHT_COLOR, light.color())
                .with(uniform::LIGHT_ORIGIN, light.position())
                .with(uniform::ATTENUATION, radius)
                .with(uniform::SCREEN_RESOLUTION, Vec2::splat(view_height));
            let states = RenderStates::new(BlendMode::Additive).with_shader(self.light_shader.as_ref(), &uniforms);
            self.target.draw(&quad, &states)?;
        }

        self.target.draw(shadows, &RenderStates::new(self.shadow_blend))?;
        self.target.display();

        if let (Some(dir), false) = (dump_dir, self.dumped) {
            let path: PathBuf = dir.join(COMBINED_DUMP_NAME);
            match self.target.texture().save_png(&path) {
                Ok(()) => log::info!("Wrote combined light map to {}", path.display()),
                Err(e) => log::warn!("Could not write {}: {}", path.display(), e),
            }
            self.dumped = true;
        }
        Ok(())
    }

    /// The last displayed map
    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    /// True once the one-time dump was attempted
    pub fn is_dumped(&self) -> bool {
        self.dumped
    }
}

impl std::fmt::Debug for CombinedMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombinedMap")
            .field("size", &self.target.size())
            .field("shadow_blend", &self.shadow_blend)
            .field("dumped", &self.dumped)
            .finish()
    }
}
