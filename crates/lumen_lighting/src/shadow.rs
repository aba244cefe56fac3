//! Shadow Geometry Builder
//!
//! Rebuilds, for every light against every occluder edge:
//! - the light's coverage fan, a square bounding its attenuation disk whose
//!   texture coordinates address the light's gradient surface
//! - one umbra quad (two transparent triangles) per edge, appended to the
//!   light's private shadow mesh and to the aggregate combined mesh
//!
//! Cost is O(lights x edges) per rebuild with no spatial pruning.

use glam::Vec2;
use lumen_math::{direction_or, Edge, DIAGONALS};
use lumen_render::{color, Vertex, VertexArray};
use serde::{Deserialize, Serialize};

use crate::light::LightRegistry;
use crate::occluder::OccluderRegistry;

/// The region an edge hides from a light, out to the attenuation distance
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UmbraQuad {
    pub start: Vec2,
    pub end: Vec2,
    pub outer_start: Vec2,
    pub outer_end: Vec2,
}

impl UmbraQuad {
    /// Project `edge` away from `light` by `distance`
    ///
    /// An endpoint within `epsilon` of the light has no direction; the start
    /// endpoint then projects along the reversed edge tangent and the end
    /// endpoint along the tangent.
    pub fn project(light: Vec2, distance: f32, edge: &Edge, epsilon: f32) -> Self {
        let tangent = edge.tangent();
        let dir_start = direction_or(light, edge.start, -tangent, epsilon);
        let dir_end = direction_or(light, edge.end, tangent, epsilon);
        Self {
            start: edge.start,
            end: edge.end,
            outer_start: edge.start + dir_start * distance,
            outer_end: edge.end + dir_end * distance,
        }
    }

    /// Triangles (start, outer_start, end) and (outer_start, end, outer_end)
    pub fn triangles(&self) -> [[Vec2; 3]; 2] {
        [
            [self.start, self.outer_start, self.end],
            [self.outer_start, self.end, self.outer_end],
        ]
    }

    /// Append both triangles as fully transparent vertices
    pub fn append_to(&self, mesh: &mut VertexArray) {
        for [a, b, c] in self.triangles() {
            mesh.push_triangle(
                Vertex::colored(a, color::TRANSPARENT),
                Vertex::colored(b, color::TRANSPARENT),
                Vertex::colored(c, color::TRANSPARENT),
            );
        }
    }
}

/// Fill `mesh` with the four-triangle fan covering a light's attenuation square
///
/// Corners sit at `light + diagonal * sqrt(2) * radius`. Texture coordinates
/// are the positions shifted so the light lands on the centre of a gradient
/// surface of side `surface_size`.
pub fn coverage_fan(mesh: &mut VertexArray, light: Vec2, radius: f32, surface_size: f32) {
    let offset = light - Vec2::splat(surface_size * 0.5);
    let vertex = |p: Vec2| Vertex::textured(p, p - offset);

    let reach = core::f32::consts::SQRT_2 * radius;
    let corners = DIAGONALS.map(|d| light + d * reach);

    mesh.clear();
    for i in 0..corners.len() {
        let next = corners[(i + 1) % corners.len()];
        mesh.push_triangle(vertex(light), vertex(corners[i]), vertex(next));
    }
}

/// Counters from the last geometry rebuild
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowStats {
    /// Lights processed
    pub lights: usize,
    /// Occluder edges processed per light
    pub edges: usize,
    /// Triangles across all per-light shadow meshes
    pub shadow_triangles: usize,
}

/// Builds per-light and combined shadow geometry
#[derive(Debug)]
pub struct ShadowGeometryBuilder {
    epsilon: f32,
    surface_size: f32,
    combined: VertexArray,
    stats: ShadowStats,
}

impl ShadowGeometryBuilder {
    /// Create a builder for gradient surfaces of side `surface_size`
    pub fn new(surface_size: u32, epsilon: f32) -> Self {
        Self {
            epsilon,
            surface_size: surface_size as f32,
            combined: VertexArray::new(),
            stats: ShadowStats::default(),
        }
    }

    /// Rebuild every light's geometry against every occluder
    pub fn rebuild(&mut self, lights: &mut LightRegistry, occluders: &OccluderRegistry) -> ShadowStats {
        self.combined.clear();
        let edges = occluders.total_edges();
        let mut stats = ShadowStats {
            lights: lights.len(),
            edges,
            shadow_triangles: 0,
        };

        for light in lights.iter_mut() {
            let (position, radius) = (light.position(), light.attenuation());
            let (light_verts, shadow_verts) = light.geometry_mut();

            coverage_fan(light_verts, position, radius, self.surface_size);

            shadow_verts.clear();
            for edge in occluders.edges() {
                let umbra = UmbraQuad::project(position, radius, edge, self.epsilon);
                umbra.append_to(shadow_verts);
            }
            self.combined.extend_from(shadow_verts);
            stats.shadow_triangles += shadow_verts.triangle_count();
        }

        log::trace!(
            "Rebuilt shadow geometry: {} lights x {} edges = {} triangles",
            stats.lights,
            stats.edges,
            stats.shadow_triangles
        );
        self.stats = stats;
        stats
    }

    /// Aggregate shadow mesh of every light
    pub fn combined(&self) -> &VertexArray {
        &self.combined
    }

    /// Counters from the last rebuild
    pub fn stats(&self) -> ShadowStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightDesc;
    use lumen_math::{rect_edges, EPSILON};

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_outer_point_on_ray_at_radius() {
        let light = Vec2::new(400.0, 400.0);
        let edge = Edge::new(Vec2::new(450.0, 380.0), Vec2::new(470.0, 440.0));
        let umbra = UmbraQuad::project(light, 200.0, &edge, EPSILON);

        for (endpoint, outer) in [(umbra.start, umbra.outer_start), (umbra.end, umbra.outer_end)] {
            assert!(((outer - endpoint).length() - 200.0).abs() < 1e-3);
            let ray = (endpoint - light).normalize();
            let along = (outer - light).normalize();
            assert!(approx(ray, along));
            assert!((outer - light).length() > (endpoint - light).length());
        }
    }

    #[test]
    fn test_triangle_order() {
        let umbra = UmbraQuad {
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(1.0, 0.0),
            outer_start: Vec2::new(0.0, 5.0),
            outer_end: Vec2::new(1.0, 5.0),
        };
        let [t0, t1] = umbra.triangles();
        assert_eq!(t0, [umbra.start, umbra.outer_start, umbra.end]);
        assert_eq!(t1, [umbra.outer_start, umbra.end, umbra.outer_end]);

        let mut mesh = VertexArray::new();
        umbra.append_to(&mut mesh);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.vertices().iter().all(|v| v.rgba() == color::TRANSPARENT));
    }

    #[test]
    fn test_degenerate_endpoint_uses_tangent() {
        let light = Vec2::new(10.0, 10.0);
        let edge = Edge::new(light, Vec2::new(20.0, 10.0));
        let umbra = UmbraQuad::project(light, 5.0, &edge, EPSILON);
        assert!(umbra.outer_start.is_finite() && umbra.outer_end.is_finite());
        assert!(approx(umbra.outer_start, Vec2::new(5.0, 10.0)));
        assert!(approx(umbra.outer_end, Vec2::new(25.0, 10.0)));

        let edge = Edge::new(Vec2::new(0.0, 10.0), light);
        let umbra = UmbraQuad::project(light, 5.0, &edge, EPSILON);
        assert!(approx(umbra.outer_end, Vec2::new(15.0, 10.0)));
    }

    #[test]
    fn test_zero_length_edge_on_light_is_finite() {
        let light = Vec2::splat(3.0);
        let edge = Edge::new(light, light);
        let umbra = UmbraQuad::project(light, 2.0, &edge, EPSILON);
        assert!(approx(umbra.outer_start, Vec2::new(1.0, 3.0)));
        assert!(approx(umbra.outer_end, Vec2::new(5.0, 3.0)));
    }

    #[test]
    fn test_coverage_fan_bounds_disk() {
        let mut mesh = VertexArray::new();
        let light = Vec2::new(100.0, 150.0);
        coverage_fan(&mut mesh, light, 50.0, 800.0);
        assert_eq!(mesh.triangle_count(), 4);

        let (min, max) = mesh.vertices().iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), v| (lo.min(v.pos()), hi.max(v.pos())),
        );
        assert!(approx(min, light - Vec2::splat(50.0)));
        assert!(approx(max, light + Vec2::splat(50.0)));

        for v in mesh.vertices() {
            assert!(approx(v.uv(), v.pos() - light + Vec2::splat(400.0)));
        }
        assert_eq!(mesh.vertices()[0].uv(), Vec2::splat(400.0));
    }

    #[test]
    fn test_rebuild_counts_and_clears_dirty() {
        let mut lights = LightRegistry::new();
        let mut occluders = OccluderRegistry::new();
        lights.add(LightDesc::default());
        lights.add(LightDesc {
            position: Vec2::splat(300.0),
            ..Default::default()
        });
        occluders.add(rect_edges(Vec2::new(180.0, 200.0), Vec2::new(50.0, 190.0)));
        occluders.add(rect_edges(Vec2::new(600.0, 450.0), Vec2::new(75.0, 250.0)));

        let mut builder = ShadowGeometryBuilder::new(800, EPSILON);
        let stats = builder.rebuild(&mut lights, &occluders);
        assert_eq!(stats.lights, 2);
        assert_eq!(stats.edges, 8);
        assert_eq!(stats.shadow_triangles, 2 * 8 * 2);
        assert_eq!(builder.combined().triangle_count(), 32);
        assert!(lights.iter().all(|l| !l.is_geometry_dirty()));
        assert!(lights.iter().all(|l| l.shadow_verts().triangle_count() == 16));

        // A second rebuild replaces the geometry instead of accumulating it
        builder.rebuild(&mut lights, &occluders);
        assert_eq!(builder.combined().triangle_count(), 32);
        assert_eq!(builder.stats(), stats);
    }
}
