//! The light system facade
//!
//! Frame order:
//!
//! ```text
//! move_light ──► update_lights ──► render_light_maps ──► composite
//!                (geometry)        (one mask per light)   (ascending ids)
//! ```
//!
//! [`LightSystem::render_onto_scene`] runs the last two steps. Rendering a
//! light whose geometry changed since the last [`LightSystem::update_lights`]
//! is an error.

use std::collections::HashMap;

use glam::Vec2;
use lumen_math::Edge;
use lumen_render::{ContextSettings, RenderTarget, ShaderLibrary, Texture, VertexArray};

use crate::combined::CombinedMap;
use crate::compositor::{LightPass, SceneCompositor};
use crate::config::LightingConfig;
use crate::error::{LightingError, LightingResult};
use crate::light::{check_attenuation, Light, LightDesc, LightId, LightRegistry};
use crate::light_map::LightMapRenderer;
use crate::occluder::{OccluderId, OccluderRegistry};
use crate::shaders::{builtin_library, LightingShaders};
use crate::shadow::{ShadowGeometryBuilder, ShadowStats};
use crate::surfaces::LightSurfaces;

/// 2D point lights with hard shadows, composited onto a scene surface
#[derive(Debug)]
pub struct LightSystem {
    config: LightingConfig,
    lights: LightRegistry,
    occluders: OccluderRegistry,
    surfaces: HashMap<LightId, LightSurfaces>,
    geometry: ShadowGeometryBuilder,
    light_maps: LightMapRenderer,
    compositor: SceneCompositor,
    combined: CombinedMap,
    last_stats: ShadowStats,
}

impl LightSystem {
    /// Validate the configuration and context, then resolve the shaders
    ///
    /// Fails before anything is rendered if the context is too old or a
    /// required shader is missing.
    pub fn new(mut config: LightingConfig, context: &ContextSettings, library: &ShaderLibrary) -> LightingResult<Self> {
        config.validate()?;
        let (major, minor) = config.min_context_version;
        context.require(major, minor)?;
        let shaders = LightingShaders::load(library)?;

        let light_maps = LightMapRenderer::new(shaders.light.clone(), config.view_height);
        let compositor = SceneCompositor::new(shaders.blend.clone(), &config);
        let combined = CombinedMap::new(config.surface_size, shaders.light.clone(), config.combined_shadow_blend)?;
        let geometry = ShadowGeometryBuilder::new(config.surface_size, config.degenerate_epsilon);

        log::info!(
            "Light system ready: {}x{} surfaces, context {}.{}",
            config.surface_size,
            config.surface_size,
            context.major_version,
            context.minor_version
        );

        Ok(Self {
            config,
            lights: LightRegistry::new(),
            occluders: OccluderRegistry::new(),
            surfaces: HashMap::new(),
            geometry,
            light_maps,
            compositor,
            combined,
            last_stats: ShadowStats::default(),
        })
    }

    /// Build with the default context and the built-in shaders
    pub fn with_builtin_shaders(config: LightingConfig) -> LightingResult<Self> {
        Self::new(config, &ContextSettings::default(), &builtin_library())
    }

    /// Register a light
    ///
    /// Allocates the light's three surfaces and renders its gradient, so it
    /// does not belong in a per-frame path. Non-finite values and a
    /// non-positive attenuation are rejected before any id is allocated.
    pub fn add_light(&mut self, desc: LightDesc) -> LightingResult<LightId> {
        desc.validate()?;
        let mut surfaces = LightSurfaces::new(self.config.surface_size)?;
        self.light_maps.render_gradient(&mut surfaces, desc.attenuation)?;

        let id = self.lights.add(desc);
        self.dump_gradient(id, &surfaces);
        self.surfaces.insert(id, surfaces);
        Ok(id)
    }

    fn dump_gradient(&self, id: LightId, surfaces: &LightSurfaces) {
        let Some(dir) = &self.config.debug_dump_dir else {
            return;
        };
        let path = dir.join(format!("light_gradient_{}.png", id.raw()));
        match surfaces.gradient.texture().save_png(&path) {
            Ok(()) => log::info!("Wrote gradient for {} to {}", id, path.display()),
            Err(e) => log::warn!("Could not write {}: {}", path.display(), e),
        }
    }

    /// Move a light; unknown ids and non-finite positions are ignored and
    /// reported as `false`
    pub fn move_light(&mut self, id: LightId, position: Vec2) -> bool {
        self.lights.move_light(id, position)
    }

    /// Light removal is not supported; nothing is released
    pub fn remove_light(&mut self, id: LightId) -> LightingResult<()> {
        log::warn!("Refusing to remove {}", id);
        Err(LightingError::Unsupported("light removal"))
    }

    /// Change a light's attenuation and re-render its gradient
    pub fn set_attenuation(&mut self, id: LightId, attenuation: f32) -> LightingResult<()> {
        check_attenuation(attenuation)?;
        let surfaces = self.surfaces.get_mut(&id).ok_or(LightingError::UnknownLight(id))?;
        if !self.lights.set_attenuation(id, attenuation) {
            return Err(LightingError::UnknownLight(id));
        }
        self.light_maps.render_gradient(surfaces, attenuation)?;
        Ok(())
    }

    /// Register an occluder from its ordered edges
    pub fn add_occluder(&mut self, edges: impl IntoIterator<Item = Edge>) -> OccluderId {
        let id = self.occluders.add(edges);
        self.lights.mark_all_dirty();
        id
    }

    /// Rebuild every light's coverage and shadow geometry
    pub fn update_lights(&mut self) -> ShadowStats {
        self.last_stats = self.geometry.rebuild(&mut self.lights, &self.occluders);
        self.last_stats
    }

    /// Render every light's illumination mask
    pub fn render_light_maps(&mut self) -> LightingResult<()> {
        for light in self.lights.iter() {
            let surfaces = self
                .surfaces
                .get_mut(&light.id())
                .ok_or(LightingError::UnknownLight(light.id()))?;
            self.light_maps.render(light, surfaces)?;
        }
        Ok(())
    }

    /// Render the light maps and blend them into `scene`
    ///
    /// `scene` is modified in place; `output` receives a copy of the lit
    /// scene. Returns the number of light passes.
    pub fn render_onto_scene(&mut self, scene: &mut RenderTarget, output: &mut RenderTarget) -> LightingResult<usize> {
        self.render_light_maps()?;

        let mut passes = Vec::with_capacity(self.lights.len());
        for light in self.lights.iter() {
            let surfaces = self
                .surfaces
                .get(&light.id())
                .ok_or(LightingError::UnknownLight(light.id()))?;
            passes.push(LightPass::new(light, surfaces.light_map.texture()));
        }
        let count = self.compositor.composite(scene, passes)?;

        output.blit(scene.texture());
        output.display();
        log::trace!("Lit scene with {} lights", count);
        Ok(count)
    }

    /// Redraw the combined debug map
    pub fn render_combined(&mut self) -> LightingResult<&RenderTarget> {
        self.combined.render(
            &self.lights,
            self.geometry.combined(),
            self.light_maps.view_height(),
            self.config.debug_dump_dir.as_deref(),
        )?;
        Ok(self.combined.target())
    }

    /// Height fed to the radial shader's screen resolution
    ///
    /// Applies to gradients rendered afterwards and to the combined map.
    pub fn set_view_height(&mut self, view_height: f32) {
        self.config.view_height = view_height.max(1.0);
        self.light_maps.set_view_height(self.config.view_height);
    }

    pub fn config(&self) -> &LightingConfig {
        &self.config
    }

    pub fn lights(&self) -> &LightRegistry {
        &self.lights
    }

    pub fn occluders(&self) -> &OccluderRegistry {
        &self.occluders
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id)
    }

    /// A light's illumination mask from the last render
    pub fn light_map(&self, id: LightId) -> Option<&Texture> {
        self.surfaces.get(&id).map(|s| s.light_map.texture())
    }

    /// A light's gradient surface
    pub fn gradient(&self, id: LightId) -> Option<&Texture> {
        self.surfaces.get(&id).map(|s| s.gradient.texture())
    }

    /// A light's umbra mask from the last render
    pub fn shadow_surface(&self, id: LightId) -> Option<&Texture> {
        self.surfaces.get(&id).map(|s| s.shadow.texture())
    }

    /// Aggregate shadow mesh from the last geometry rebuild
    pub fn combined_shadows(&self) -> &VertexArray {
        self.geometry.combined()
    }

    pub fn last_stats(&self) -> ShadowStats {
        self.last_stats
    }
}
