//! Lights and the light registry
//!
//! Identifiers come from a counter owned by the registry: they start at 1,
//! strictly increase, and are never handed out twice. Records are kept in
//! insertion order, which is therefore ascending id order; compositing
//! depends on that order.

use std::collections::HashMap;
use std::fmt;

use glam::{Vec2, Vec4};
use lumen_render::{color, VertexArray};
use serde::{Deserialize, Serialize};

use crate::error::{LightingError, LightingResult};

/// Unique light identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LightId(u64);

impl LightId {
    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "light {}", self.0)
    }
}

/// Parameters for a new light
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightDesc {
    /// Scene-space position
    pub position: Vec2,
    /// Hue intensity used when compositing
    pub intensity: f32,
    /// Light hue (linear RGBA)
    pub color: Vec4,
    /// Distance beyond which the light contributes nothing; also the umbra length
    pub attenuation: f32,
    /// Reserved margin, carried but not used by the renderer
    pub expand: f32,
    /// Nominal radius, carried but not used by the renderer
    pub radius: f32,
}

impl Default for LightDesc {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            intensity: 1.0,
            color: color::WHITE,
            attenuation: 200.0,
            expand: 0.0,
            radius: 200.0,
        }
    }
}

impl LightDesc {
    /// Create a light description
    pub fn new(position: Vec2, intensity: f32, color: Vec4, attenuation: f32, expand: f32, radius: f32) -> Self {
        Self {
            position,
            intensity,
            color,
            attenuation,
            expand,
            radius,
        }
    }

    /// Reject values that would put non-finite or inverted geometry on screen
    pub fn validate(&self) -> LightingResult<()> {
        if !self.position.is_finite() {
            return Err(LightingError::Config(format!("light position must be finite, got {}", self.position)));
        }
        if !self.intensity.is_finite() || !self.color.is_finite() {
            return Err(LightingError::Config("light intensity and color must be finite".into()));
        }
        check_attenuation(self.attenuation)
    }
}

/// Attenuation must be finite and positive
pub(crate) fn check_attenuation(attenuation: f32) -> LightingResult<()> {
    if attenuation.is_finite() && attenuation > 0.0 {
        Ok(())
    } else {
        Err(LightingError::Config(format!(
            "attenuation must be finite and positive, got {}",
            attenuation
        )))
    }
}

/// A registered point light and its per-frame geometry
#[derive(Clone, Debug)]
pub struct Light {
    id: LightId,
    position: Vec2,
    intensity: f32,
    color: Vec4,
    attenuation: f32,
    expand: f32,
    radius: f32,
    /// Coverage fan over the attenuation square, textured from the gradient surface
    light_verts: VertexArray,
    /// Umbra quads behind every occluder edge
    shadow_verts: VertexArray,
    geometry_dirty: bool,
}

impl Light {
    fn new(id: LightId, desc: LightDesc) -> Self {
        Self {
            id,
            position: desc.position,
            intensity: desc.intensity,
            color: desc.color,
            attenuation: desc.attenuation,
            expand: desc.expand,
            radius: desc.radius,
            light_verts: VertexArray::with_triangle_capacity(4),
            shadow_verts: VertexArray::new(),
            geometry_dirty: true,
        }
    }

    pub fn id(&self) -> LightId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn attenuation(&self) -> f32 {
        self.attenuation
    }

    pub fn expand(&self) -> f32 {
        self.expand
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Coverage triangles from the last geometry rebuild
    pub fn light_verts(&self) -> &VertexArray {
        &self.light_verts
    }

    /// Shadow triangles from the last geometry rebuild
    pub fn shadow_verts(&self) -> &VertexArray {
        &self.shadow_verts
    }

    /// True when the light changed after its geometry was last rebuilt
    pub fn is_geometry_dirty(&self) -> bool {
        self.geometry_dirty
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.geometry_dirty = true;
    }

    /// Mutable geometry buffers for a rebuild; marks the geometry current
    pub(crate) fn geometry_mut(&mut self) -> (&mut VertexArray, &mut VertexArray) {
        self.geometry_dirty = false;
        (&mut self.light_verts, &mut self.shadow_verts)
    }
}

/// Owns every light
#[derive(Debug, Default)]
pub struct LightRegistry {
    lights: Vec<Light>,
    index: HashMap<LightId, usize>,
    last_id: u64,
}

impl LightRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a light and return its new identifier
    pub fn add(&mut self, desc: LightDesc) -> LightId {
        self.last_id += 1;
        let id = LightId(self.last_id);
        self.index.insert(id, self.lights.len());
        self.lights.push(Light::new(id, desc));
        log::debug!("Registered {}", id);
        id
    }

    /// Move a light. Unknown ids and non-finite positions are ignored and
    /// reported as `false`.
    pub fn move_light(&mut self, id: LightId, position: Vec2) -> bool {
        if !position.is_finite() {
            log::warn!("Ignoring move of {} to non-finite {}", id, position);
            return false;
        }
        match self.get_mut(id) {
            Some(light) => {
                light.position = position;
                light.mark_dirty();
                true
            }
            None => {
                log::warn!("Ignoring move of unknown {}", id);
                false
            }
        }
    }

    /// Change a light's attenuation. Unknown ids are reported as `false`.
    pub(crate) fn set_attenuation(&mut self, id: LightId, attenuation: f32) -> bool {
        match self.get_mut(id) {
            Some(light) => {
                light.attenuation = attenuation;
                light.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Get a light
    pub fn get(&self, id: LightId) -> Option<&Light> {
        self.index.get(&id).map(|&i| &self.lights[i])
    }

    pub(crate) fn get_mut(&mut self, id: LightId) -> Option<&mut Light> {
        let i = *self.index.get(&id)?;
        self.lights.get_mut(i)
    }

    pub fn contains(&self, id: LightId) -> bool {
        self.index.contains_key(&id)
    }

    /// Lights in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Light> {
        self.lights.iter_mut()
    }

    /// Identifiers in ascending order
    pub fn ids(&self) -> impl Iterator<Item = LightId> + '_ {
        self.lights.iter().map(|l| l.id)
    }

    pub(crate) fn mark_all_dirty(&mut self) {
        for light in &mut self.lights {
            light.mark_dirty();
        }
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}
