//! # lumen_math - 2D Geometry Utilities
//!
//! Small geometry layer shared by the renderer and the lighting system:
//! - Guarded vector normalization (no NaN directions on degenerate input)
//! - Occluder edges and their derived polar form
//! - Polygon and rectangle edge builders

pub mod edge;
pub mod vector;

pub use edge::{polygon_edges, rect_edges, Edge, PolarEdge};
pub use glam::{Vec2, Vec4};
pub use vector::{direction_or, normalize_or, DIAGONALS, EPSILON};

pub mod prelude {
    pub use crate::edge::{polygon_edges, rect_edges, Edge};
    pub use crate::vector::{direction_or, normalize_or};
    pub use glam::{Vec2, Vec4};
}
