//! Occluder edges
//!
//! An edge is a directed segment in scene space. Occluders are ordered edge
//! lists that nominally close into a simple polygon; nothing here checks that.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::vector::{normalize_or, EPSILON};

/// A directed segment from `start` to `end`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: Vec2,
    pub end: Vec2,
}

/// Polar form of an edge relative to its start point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolarEdge {
    /// Angle of `end - start` in radians, measured from +X
    pub angle: f32,
    /// Length of the edge
    pub magnitude: f32,
}

impl Edge {
    /// Create a new edge
    #[inline]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Vector from start to end
    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    /// Edge length
    #[inline]
    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// True when start and end coincide
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.delta().length_squared() <= EPSILON * EPSILON
    }

    /// Unit tangent pointing from start to end (+X for a zero-length edge)
    #[inline]
    pub fn tangent(&self) -> Vec2 {
        normalize_or(self.delta(), Vec2::X, EPSILON)
    }

    /// Derive the polar form
    pub fn polar(&self) -> PolarEdge {
        let d = self.delta();
        PolarEdge {
            angle: d.y.atan2(d.x),
            magnitude: self.length(),
        }
    }
}

/// Close a point loop into edges: `p0->p1, p1->p2, ..., pn->p0`.
///
/// Fewer than two points yield no edges.
pub fn polygon_edges(points: &[Vec2]) -> Vec<Edge> {
    if points.len() < 2 {
        return Vec::new();
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&a, &b)| Edge::new(a, b))
        .collect()
}

/// The four edges of an axis-aligned rectangle, clockwise from the top-left corner
pub fn rect_edges(position: Vec2, size: Vec2) -> Vec<Edge> {
    polygon_edges(&[
        position,
        Vec2::new(position.x + size.x, position.y),
        position + size,
        Vec2::new(position.x, position.y + size.y),
    ])
}
