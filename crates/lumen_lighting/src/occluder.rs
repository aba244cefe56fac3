//! Occluders and the occluder registry
//!
//! Edge lists are copied verbatim. They are not checked for closure or
//! self-intersection; malformed input still produces deterministic shadow
//! geometry (zero-length edges give zero-area umbra triangles, which the
//! rasterizer skips).

use std::collections::HashMap;
use std::fmt;

use lumen_math::Edge;
use serde::{Deserialize, Serialize};

/// Unique occluder identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OccluderId(u64);

impl OccluderId {
    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OccluderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "occluder {}", self.0)
    }
}

/// A shadow-casting polygon
#[derive(Clone, Debug, PartialEq)]
pub struct Occluder {
    id: OccluderId,
    edges: Vec<Edge>,
}

impl Occluder {
    pub fn id(&self) -> OccluderId {
        self.id
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// Owns every occluder
#[derive(Debug, Default)]
pub struct OccluderRegistry {
    occluders: Vec<Occluder>,
    index: HashMap<OccluderId, usize>,
    last_id: u64,
    total_edges: usize,
}

impl OccluderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an occluder from its ordered edges
    pub fn add(&mut self, edges: impl IntoIterator<Item = Edge>) -> OccluderId {
        self.last_id += 1;
        let id = OccluderId(self.last_id);
        let edges: Vec<Edge> = edges.into_iter().collect();
        self.total_edges += edges.len();
        log::debug!("Registered {} with {} edges", id, edges.len());
        self.index.insert(id, self.occluders.len());
        self.occluders.push(Occluder { id, edges });
        id
    }

    pub fn get(&self, id: OccluderId) -> Option<&Occluder> {
        self.index.get(&id).map(|&i| &self.occluders[i])
    }

    /// Occluders in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Occluder> {
        self.occluders.iter()
    }

    /// Every edge of every occluder
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.occluders.iter().flat_map(|o| o.edges.iter())
    }

    /// Edge count across all occluders
    pub fn total_edges(&self) -> usize {
        self.total_edges
    }

    pub fn len(&self) -> usize {
        self.occluders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occluders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use lumen_math::rect_edges;

    #[test]
    fn test_add_copies_edges() {
        let mut registry = OccluderRegistry::new();
        let edges = rect_edges(Vec2::new(600.0, 450.0), Vec2::new(75.0, 250.0));
        let id = registry.add(edges.clone());
        assert_eq!(id.raw(), 1);
        assert_eq!(registry.get(id).unwrap().edges(), edges.as_slice());
        assert_eq!(registry.total_edges(), 4);
    }

    #[test]
    fn test_malformed_edges_kept_verbatim() {
        let mut registry = OccluderRegistry::new();
        let open = vec![
            Edge::new(Vec2::ZERO, Vec2::X),
            Edge::new(Vec2::splat(5.0), Vec2::splat(5.0)),
        ];
        registry.add(rect_edges(Vec2::ZERO, Vec2::ONE));
        let id = registry.add(open.clone());
        assert_eq!(id.raw(), 2);
        assert_eq!(registry.get(id).unwrap().edges(), open.as_slice());
        assert_eq!(registry.total_edges(), 6);
        assert_eq!(registry.edges().count(), 6);
    }

    #[test]
    fn test_empty_occluder() {
        let mut registry = OccluderRegistry::new();
        let id = registry.add(Vec::new());
        assert!(registry.get(id).unwrap().edges().is_empty());
        assert_eq!(registry.total_edges(), 0);
        assert_eq!(registry.len(), 1);
    }
}
