//! Vertices and triangle-list vertex arrays

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

use crate::color::WHITE;

/// A 2D vertex: scene-space position, color, pixel-space texture coordinates
///
/// Matches a tightly packed GPU vertex layout (32 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Size in bytes
    pub const SIZE: usize = core::mem::size_of::<Self>();

    /// Create a new vertex
    #[inline]
    pub fn new(position: Vec2, color: Vec4, tex_coords: Vec2) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            tex_coords: tex_coords.to_array(),
        }
    }

    /// Untextured vertex
    #[inline]
    pub fn colored(position: Vec2, color: Vec4) -> Self {
        Self::new(position, color, Vec2::ZERO)
    }

    /// White vertex sampling the given texture coordinates
    #[inline]
    pub fn textured(position: Vec2, tex_coords: Vec2) -> Self {
        Self::new(position, WHITE, tex_coords)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }

    #[inline]
    pub fn rgba(&self) -> Vec4 {
        Vec4::from_array(self.color)
    }

    #[inline]
    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(self.tex_coords)
    }
}

/// A triangle list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexArray {
    vertices: Vec<Vertex>,
}

impl VertexArray {
    /// Create an empty triangle list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with room for `triangles` triangles
    pub fn with_triangle_capacity(triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Axis-aligned rectangle whose texture coordinates map 1:1 onto `tex_origin`
    pub fn quad(position: Vec2, size: Vec2, tex_origin: Vec2) -> Self {
        let corners = [
            Vec2::ZERO,
            Vec2::new(size.x, 0.0),
            size,
            Vec2::new(0.0, size.y),
        ];
        let v = corners.map(|c| Vertex::textured(position + c, tex_origin + c));
        let mut quad = Self::with_triangle_capacity(2);
        quad.push_triangle(v[0], v[1], v[2]);
        quad.push_triangle(v[0], v[2], v[3]);
        quad
    }

    /// Append one vertex
    #[inline]
    pub fn append(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    /// Append one triangle
    #[inline]
    pub fn push_triangle(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        self.vertices.extend_from_slice(&[a, b, c]);
    }

    /// Append every vertex of another array
    pub fn extend_from(&mut self, other: &VertexArray) {
        self.vertices.extend_from_slice(&other.vertices);
    }

    /// Remove all vertices, keeping the allocation
    #[inline]
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of complete triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Complete triangles; a trailing partial triangle is ignored
    pub fn triangles(&self) -> impl Iterator<Item = &[Vertex]> + '_ {
        self.vertices.chunks_exact(3)
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw bytes for a vertex buffer upload
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
