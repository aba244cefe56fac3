//! Fragment shaders and the named shader library
//!
//! A fragment shader is a Rust program evaluated once per covered pixel.
//! Uniform values travel with each draw call in a [`Uniforms`] set rather
//! than living on the shader object, so two draws with the same shader
//! never observe each other's parameters.

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::{Vec2, Vec4};

use crate::error::{RenderError, RenderResult};
use crate::texture::Texture;

/// A uniform value bound for one draw call
#[derive(Clone, Copy, Debug)]
pub enum Uniform<'a> {
    Float(f32),
    Vec2(Vec2),
    Vec4(Vec4),
    Texture(&'a Texture),
}

/// Kind of a declared uniform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec4,
    Texture,
}

impl UniformKind {
    fn name(self) -> &'static str {
        match self {
            UniformKind::Float => "float",
            UniformKind::Vec2 => "vec2",
            UniformKind::Vec4 => "vec4",
            UniformKind::Texture => "texture",
        }
    }
}

impl Uniform<'_> {
    /// Kind of this value
    pub fn kind(&self) -> UniformKind {
        match self {
            Uniform::Float(_) => UniformKind::Float,
            Uniform::Vec2(_) => UniformKind::Vec2,
            Uniform::Vec4(_) => UniformKind::Vec4,
            Uniform::Texture(_) => UniformKind::Texture,
        }
    }
}

impl From<f32> for Uniform<'_> {
    fn from(v: f32) -> Self {
        Uniform::Float(v)
    }
}

impl From<Vec2> for Uniform<'_> {
    fn from(v: Vec2) -> Self {
        Uniform::Vec2(v)
    }
}

impl From<Vec4> for Uniform<'_> {
    fn from(v: Vec4) -> Self {
        Uniform::Vec4(v)
    }
}

impl<'a> From<&'a Texture> for Uniform<'a> {
    fn from(t: &'a Texture) -> Self {
        Uniform::Texture(t)
    }
}

/// Named uniform values for one draw call
#[derive(Clone, Debug, Default)]
pub struct Uniforms<'a> {
    values: Vec<(&'static str, Uniform<'a>)>,
}

impl<'a> Uniforms<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a uniform, replacing any previous value with the same name
    pub fn set(&mut self, name: &'static str, value: impl Into<Uniform<'a>>) -> &mut Self {
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    /// Builder form of [`Uniforms::set`]
    pub fn with(mut self, name: &'static str, value: impl Into<Uniform<'a>>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<Uniform<'a>> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            Uniform::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec2(&self, name: &str) -> Option<Vec2> {
        match self.get(name)? {
            Uniform::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec4(&self, name: &str) -> Option<Vec4> {
        match self.get(name)? {
            Uniform::Vec4(v) => Some(v),
            _ => None,
        }
    }

    pub fn texture(&self, name: &str) -> Option<&'a Texture> {
        match self.get(name)? {
            Uniform::Texture(t) => Some(t),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-pixel shader input
#[derive(Clone, Copy, Debug)]
pub struct Fragment<'a> {
    /// Pixel centre in target space
    pub position: Vec2,
    /// Interpolated vertex color, already modulated by the bound texture
    pub color: Vec4,
    /// Interpolated pixel-space texture coordinates
    pub tex_coords: Vec2,
    /// Texture bound in the render states
    pub texture: Option<&'a Texture>,
}

/// A fragment-stage program
pub trait FragmentShader: Send + Sync {
    /// Name the shader is registered under
    fn name(&self) -> &str;

    /// Uniforms the shader reads
    fn inputs(&self) -> &[(&'static str, UniformKind)];

    /// Shade one fragment. Only called after [`FragmentShader::validate`] succeeded.
    fn shade(&self, fragment: &Fragment<'_>, uniforms: &Uniforms<'_>) -> Vec4;

    /// Check that every declared input is bound with the right kind
    fn validate(&self, uniforms: &Uniforms<'_>) -> RenderResult<()> {
        for &(uniform, kind) in self.inputs() {
            let value = uniforms.get(uniform).ok_or_else(|| RenderError::MissingUniform {
                shader: self.name().to_string(),
                uniform,
            })?;
            if value.kind() != kind {
                return Err(RenderError::UniformType {
                    shader: self.name().to_string(),
                    uniform,
                    expected: kind.name(),
                });
            }
        }
        Ok(())
    }
}

/// Shaders resolved by name
#[derive(Clone, Default)]
pub struct ShaderLibrary {
    shaders: BTreeMap<String, Arc<dyn FragmentShader>>,
}

impl ShaderLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shader under its own name, replacing any previous entry
    pub fn register(&mut self, shader: impl FragmentShader + 'static) -> &mut Self {
        let name = shader.name().to_string();
        if self.shaders.insert(name.clone(), Arc::new(shader)).is_some() {
            log::debug!("Replaced shader '{}'", name);
        } else {
            log::debug!("Registered shader '{}'", name);
        }
        self
    }

    /// Resolve a shader by name
    pub fn load(&self, name: &str) -> RenderResult<Arc<dyn FragmentShader>> {
        self.shaders
            .get(name)
            .cloned()
            .ok_or_else(|| RenderError::ShaderNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shaders.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shaders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}

impl core::fmt::Debug for ShaderLibrary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShaderLibrary")
            .field("shaders", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
