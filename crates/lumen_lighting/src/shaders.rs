//! Built-in lighting shaders
//!
//! Three fragment programs, resolved from a [`ShaderLibrary`] by name:
//! - `radial_light`: quadratic falloff around a light origin
//! - `mask_blend`: adds one light to the scene, weighted by its mask
//! - `shadowing`: reserved for a soft-shadow technique, passes color through

use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};
use lumen_render::{color, Fragment, FragmentShader, RenderResult, ShaderLibrary, UniformKind, Uniforms};

/// Registered shader names
pub const RADIAL_LIGHT: &str = "radial_light";
pub const MASK_BLEND: &str = "mask_blend";
pub const SHADOWING: &str = "shadowing";

/// Uniform names read by the built-in shaders
pub mod uniform {
    pub const LIGHT_COLOR: &str = "LightColor";
    pub const LIGHT_ORIGIN: &str = "LightOrigin";
    pub const ATTENUATION: &str = "Attenuation";
    pub const SCREEN_RESOLUTION: &str = "ScreenResolution";

    pub const MASK_TEXTURE: &str = "MaskTexture";
    pub const SCENE_TEXTURE: &str = "SceneTexture";
    pub const MINIMUM_INTENSITY: &str = "MinimumIntensity";
    pub const MAXIMUM_INTENSITY: &str = "MaximumIntensity";
    pub const LIGHT_HUE: &str = "LightHue";
    pub const HUE_INTENSITY: &str = "HueIntensity";
}

/// Radial falloff: alpha is `(1 - d / attenuation)^2`, clamped to `[0, 1]`
///
/// Fragments outside `[0, ScreenResolution)` are transparent.
#[derive(Clone, Copy, Debug, Default)]
pub struct RadialLightShader;

impl RadialLightShader {
    /// Falloff at distance `d`
    #[inline]
    pub fn falloff(distance: f32, attenuation: f32) -> f32 {
        if attenuation <= 0.0 {
            return 0.0;
        }
        let t = (1.0 - distance / attenuation).clamp(0.0, 1.0);
        t * t
    }
}

impl FragmentShader for RadialLightShader {
    fn name(&self) -> &str {
        RADIAL_LIGHT
    }

    fn inputs(&self) -> &[(&'static str, UniformKind)] {
        &[
            (uniform::LIGHT_COLOR, UniformKind::Vec4),
            (uniform::LIGHT_ORIGIN, UniformKind::Vec2),
            (uniform::ATTENUATION, UniformKind::Float),
            (uniform::SCREEN_RESOLUTION, UniformKind::Vec2),
        ]
    }

    fn shade(&self, fragment: &Fragment<'_>, uniforms: &Uniforms<'_>) -> Vec4 {
        let resolution = uniforms.vec2(uniform::SCREEN_RESOLUTION).unwrap_or(Vec2::ZERO);
        let p = fragment.position;
        if p.x < 0.0 || p.y < 0.0 || p.x >= resolution.x || p.y >= resolution.y {
            return color::TRANSPARENT;
        }

        let origin = uniforms.vec2(uniform::LIGHT_ORIGIN).unwrap_or(Vec2::ZERO);
        let attenuation = uniforms.float(uniform::ATTENUATION).unwrap_or(0.0);
        let f = Self::falloff(p.distance(origin), attenuation);
        if f <= 0.0 {
            return color::TRANSPARENT;
        }
        let light = uniforms.vec4(uniform::LIGHT_COLOR).unwrap_or(color::WHITE);
        light.truncate().extend(f)
    }
}

/// One light's compositing pass
///
/// The fragment color is the scene as lit so far and `SceneTexture` is the
/// unlit scene. The output is `min(lit + unlit * hue * gain, 1)` with the
/// mask coverage as alpha, so an alpha blend moves each pixel toward the
/// saturated value by the light's coverage and leaves uncovered pixels alone.
/// `gain` is `HueIntensity` clamped to `[MinimumIntensity, MaximumIntensity]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaskBlendShader;

impl FragmentShader for MaskBlendShader {
    fn name(&self) -> &str {
        MASK_BLEND
    }

    fn inputs(&self) -> &[(&'static str, UniformKind)] {
        &[
            (uniform::MASK_TEXTURE, UniformKind::Texture),
            (uniform::SCENE_TEXTURE, UniformKind::Texture),
            (uniform::MINIMUM_INTENSITY, UniformKind::Float),
            (uniform::MAXIMUM_INTENSITY, UniformKind::Float),
            (uniform::LIGHT_HUE, UniformKind::Vec4),
            (uniform::HUE_INTENSITY, UniformKind::Float),
        ]
    }

    fn shade(&self, fragment: &Fragment<'_>, uniforms: &Uniforms<'_>) -> Vec4 {
        let (Some(mask), Some(unlit)) = (
            uniforms.texture(uniform::MASK_TEXTURE),
            uniforms.texture(uniform::SCENE_TEXTURE),
        ) else {
            return fragment.color;
        };

        let unlit = unlit.sample(fragment.tex_coords).truncate();
        let coverage = mask.sample(fragment.tex_coords).w;

        let min = uniforms.float(uniform::MINIMUM_INTENSITY).unwrap_or(1.0);
        let max = uniforms.float(uniform::MAXIMUM_INTENSITY).unwrap_or(min).max(min);
        let gain = uniforms.float(uniform::HUE_INTENSITY).unwrap_or(min).clamp(min, max);
        let hue = uniforms.vec4(uniform::LIGHT_HUE).unwrap_or(color::WHITE).truncate();

        let lit = (fragment.color.truncate() + unlit * hue * gain).min(Vec3::ONE);
        lit.extend(coverage)
    }
}

/// Reserved soft-shadow program; returns the incoming color
#[derive(Clone, Copy, Debug, Default)]
pub struct ShadowingShader;

impl FragmentShader for ShadowingShader {
    fn name(&self) -> &str {
        SHADOWING
    }

    fn inputs(&self) -> &[(&'static str, UniformKind)] {
        &[]
    }

    fn shade(&self, fragment: &Fragment<'_>, _uniforms: &Uniforms<'_>) -> Vec4 {
        fragment.color
    }
}

/// A library holding the three built-in shaders
pub fn builtin_library() -> ShaderLibrary {
    let mut library = ShaderLibrary::new();
    library
        .register(RadialLightShader)
        .register(MaskBlendShader)
        .register(ShadowingShader);
    library
}

/// Shader handles used by the lighting passes
#[derive(Clone)]
pub struct LightingShaders {
    pub light: Arc<dyn FragmentShader>,
    pub blend: Arc<dyn FragmentShader>,
    /// Not used by any pass yet
    pub shadowing: Option<Arc<dyn FragmentShader>>,
}

impl LightingShaders {
    /// Resolve the shaders by name. The light and blend shaders are required.
    pub fn load(library: &ShaderLibrary) -> RenderResult<Self> {
        let light = library.load(RADIAL_LIGHT)?;
        let blend = library.load(MASK_BLEND)?;
        let shadowing = library.load(SHADOWING).ok();
        if shadowing.is_none() {
            log::warn!("Shader '{}' not registered; continuing without it", SHADOWING);
        }
        log::debug!("Loaded lighting shaders from a library of {}", library.len());
        Ok(Self { light, blend, shadowing })
    }
}

impl std::fmt::Debug for LightingShaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightingShaders")
            .field("light", &self.light.name())
            .field("blend", &self.blend.name())
            .field("shadowing", &self.shadowing.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_render::{RenderError, Texture};

    fn fragment_at(position: Vec2) -> Fragment<'static> {
        Fragment {
            position,
            color: color::WHITE,
            tex_coords: position,
            texture: None,
        }
    }

    fn radial_uniforms() -> Uniforms<'static> {
        Uniforms::new()
            .with(uniform::LIGHT_COLOR, color::WHITE)
            .with(uniform::LIGHT_ORIGIN, Vec2::splat(50.0))
            .with(uniform::ATTENUATION, 20.0f32)
            .with(uniform::SCREEN_RESOLUTION, Vec2::splat(100.0))
    }

    #[test]
    fn test_falloff() {
        assert_eq!(RadialLightShader::falloff(0.0, 200.0), 1.0);
        assert!((RadialLightShader::falloff(100.0, 200.0) - 0.25).abs() < 1e-6);
        assert_eq!(RadialLightShader::falloff(200.0, 200.0), 0.0);
        assert_eq!(RadialLightShader::falloff(250.0, 200.0), 0.0);
        assert_eq!(RadialLightShader::falloff(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_radial_shade() {
        let shader = RadialLightShader;
        let uniforms = radial_uniforms();
        assert!(shader.validate(&uniforms).is_ok());

        let center = shader.shade(&fragment_at(Vec2::splat(50.0)), &uniforms);
        assert_eq!(center, Vec4::ONE);

        let near = shader.shade(&fragment_at(Vec2::new(60.0, 50.0)), &uniforms);
        assert!((near.w - 0.25).abs() < 1e-6);

        let far = shader.shade(&fragment_at(Vec2::new(80.0, 50.0)), &uniforms);
        assert_eq!(far, color::TRANSPARENT);

        let outside = shader.shade(&fragment_at(Vec2::new(150.0, 50.0)), &uniforms);
        assert_eq!(outside, color::TRANSPARENT);
    }

    #[test]
    fn test_mask_blend_adds_covered_light() {
        let scene = Texture::filled(2, 1, Vec4::new(0.5, 0.5, 0.5, 1.0)).unwrap();
        let mut mask = Texture::new(2, 1).unwrap();
        mask.set_texel(1, 0, Vec4::new(1.0, 1.0, 1.0, 0.75));

        let uniforms = Uniforms::new()
            .with(uniform::MASK_TEXTURE, &mask)
            .with(uniform::SCENE_TEXTURE, &scene)
            .with(uniform::MINIMUM_INTENSITY, 1.0f32)
            .with(uniform::MAXIMUM_INTENSITY, 5.0f32)
            .with(uniform::LIGHT_HUE, Vec4::new(0.5, 0.0, 0.0, 1.0))
            .with(uniform::HUE_INTENSITY, 0.05f32);
        let shader = MaskBlendShader;
        assert!(shader.validate(&uniforms).is_ok());

        let floor = Vec4::new(0.05, 0.05, 0.05, 1.0);
        let at = |x: f32| Fragment {
            color: floor,
            ..fragment_at(Vec2::new(x, 0.5))
        };

        // Hue intensity clamped up to 1.0; alpha carries the coverage
        let dark = shader.shade(&at(0.5), &uniforms);
        assert!((dark - Vec4::new(0.3, 0.05, 0.05, 0.0)).abs().max_element() < 1e-6);
        let lit = shader.shade(&at(1.5), &uniforms);
        assert!((lit - Vec4::new(0.3, 0.05, 0.05, 0.75)).abs().max_element() < 1e-6);
    }

    #[test]
    fn test_mask_blend_saturates() {
        let scene = Texture::filled(1, 1, Vec4::new(0.5, 0.5, 0.5, 1.0)).unwrap();
        let mask = Texture::filled(1, 1, color::WHITE).unwrap();
        let uniforms = Uniforms::new()
            .with(uniform::MASK_TEXTURE, &mask)
            .with(uniform::SCENE_TEXTURE, &scene)
            .with(uniform::MINIMUM_INTENSITY, 1.0f32)
            .with(uniform::MAXIMUM_INTENSITY, 5.0f32)
            .with(uniform::LIGHT_HUE, color::WHITE)
            .with(uniform::HUE_INTENSITY, 9.0f32);
        let fragment = Fragment {
            color: Vec4::new(0.2, 0.2, 0.2, 1.0),
            ..fragment_at(Vec2::splat(0.5))
        };
        assert_eq!(MaskBlendShader.shade(&fragment, &uniforms), Vec4::ONE);
    }

    #[test]
    fn test_builtin_library_and_load() {
        let library = builtin_library();
        assert_eq!(library.len(), 3);
        let shaders = LightingShaders::load(&library).unwrap();
        assert_eq!(shaders.light.name(), RADIAL_LIGHT);
        assert_eq!(shaders.blend.name(), MASK_BLEND);
        assert!(shaders.shadowing.is_some());
    }

    #[test]
    fn test_missing_blend_shader_fails() {
        let mut library = ShaderLibrary::new();
        library.register(RadialLightShader);
        assert!(matches!(
            LightingShaders::load(&library),
            Err(RenderError::ShaderNotFound(name)) if name == MASK_BLEND
        ));
    }

    #[test]
    fn test_shadowing_optional() {
        let mut library = ShaderLibrary::new();
        library.register(RadialLightShader).register(MaskBlendShader);
        let shaders = LightingShaders::load(&library).unwrap();
        assert!(shaders.shadowing.is_none());
    }
}
