//! Triangle scan conversion
//!
//! Pixels are sampled at their centres. Edges follow the top-left fill
//! convention so triangles sharing an edge never cover the same pixel twice.

use glam::{Vec2, Vec3};

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Owns pixels lying exactly on the edge `from -> to`.
///
/// Antisymmetric: exactly one of `from -> to` and `to -> from` owns a shared edge.
#[inline]
fn owns_edge(from: Vec2, to: Vec2) -> bool {
    let d = to - from;
    d.y > 0.0 || (d.y == 0.0 && d.x < 0.0)
}

#[inline]
fn covers(w: f32, from: Vec2, to: Vec2) -> bool {
    w > 0.0 || (w == 0.0 && owns_edge(from, to))
}

#[inline]
fn pixel_range(lo: f32, hi: f32, extent: u32) -> core::ops::Range<u32> {
    let extent = extent as f32;
    let start = lo.floor().clamp(0.0, extent) as u32;
    let end = hi.ceil().clamp(0.0, extent) as u32;
    start..end
}

/// Visit every pixel of a `width x height` grid covered by triangle `abc`.
///
/// `emit` receives the pixel coordinates and the barycentric weights of
/// `a`, `b`, `c` at the pixel centre. Zero-area and non-finite triangles
/// emit nothing.
pub fn rasterize_triangle(
    width: u32,
    height: u32,
    a: Vec2,
    b: Vec2,
    c: Vec2,
    mut emit: impl FnMut(u32, u32, Vec3),
) {
    let area = edge(a, b, c);
    if !area.is_finite() || area == 0.0 {
        return;
    }
    // Orient counter-clockwise in the edge-function sense
    let (b, c, swapped) = if area < 0.0 { (c, b, true) } else { (b, c, false) };
    let inv_area = 1.0 / area.abs();

    let xs = pixel_range(a.x.min(b.x).min(c.x), a.x.max(b.x).max(c.x), width);
    let ys = pixel_range(a.y.min(b.y).min(c.y), a.y.max(b.y).max(c.y), height);

    for y in ys {
        for x in xs.clone() {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(b, c, p);
            let w1 = edge(c, a, p);
            let w2 = edge(a, b, p);
            if covers(w0, b, c) && covers(w1, c, a) && covers(w2, a, b) {
                let weights = if swapped {
                    Vec3::new(w0, w2, w1)
                } else {
                    Vec3::new(w0, w1, w2)
                };
                emit(x, y, weights * inv_area);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(width: u32, height: u32, tris: &[[Vec2; 3]]) -> Vec<u32> {
        let mut hits = vec![0u32; (width * height) as usize];
        for t in tris {
            rasterize_triangle(width, height, t[0], t[1], t[2], |x, y, _| {
                hits[(y * width + x) as usize] += 1;
            });
        }
        hits
    }

    #[test]
    fn test_shared_diagonal_covered_once() {
        let s = 8.0;
        let tris = [
            [Vec2::ZERO, Vec2::new(s, 0.0), Vec2::new(s, s)],
            [Vec2::ZERO, Vec2::new(s, s), Vec2::new(0.0, s)],
        ];
        let hits = coverage(8, 8, &tris);
        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn test_fan_covered_once() {
        // Four triangles fanned from a centre that sits on pixel centres
        let c = Vec2::new(8.5, 8.5);
        let corners = [
            Vec2::new(0.5, 0.5),
            Vec2::new(16.5, 0.5),
            Vec2::new(16.5, 16.5),
            Vec2::new(0.5, 16.5),
        ];
        let tris: Vec<[Vec2; 3]> = (0..4).map(|i| [c, corners[i], corners[(i + 1) % 4]]).collect();
        let hits = coverage(20, 20, &tris);
        assert!(hits.iter().all(|&h| h <= 1));
        assert_eq!(hits.iter().filter(|&&h| h == 1).count(), 16 * 16);
    }

    #[test]
    fn test_winding_independent_weights() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let c = Vec2::new(0.0, 10.0);
        let mut cw = Vec::new();
        let mut ccw = Vec::new();
        rasterize_triangle(10, 10, a, b, c, |x, y, w| cw.push((x, y, w)));
        rasterize_triangle(10, 10, a, c, b, |x, y, w| ccw.push((x, y, Vec3::new(w.x, w.z, w.y))));
        assert_eq!(cw.len(), ccw.len());
        for (l, r) in cw.iter().zip(&ccw) {
            assert_eq!((l.0, l.1), (r.0, r.1));
            assert!((l.2 - r.2).abs().max_element() < 1e-5);
            assert!((l.2.x + l.2.y + l.2.z - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_degenerate_and_nan_skipped() {
        let mut count = 0;
        rasterize_triangle(10, 10, Vec2::ZERO, Vec2::ONE, Vec2::splat(2.0), |_, _, _| count += 1);
        rasterize_triangle(10, 10, Vec2::NAN, Vec2::ONE, Vec2::new(5.0, 0.0), |_, _, _| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_clipped_to_bounds() {
        let mut count = 0;
        rasterize_triangle(
            4,
            4,
            Vec2::new(-100.0, -100.0),
            Vec2::new(100.0, -100.0),
            Vec2::new(0.0, 100.0),
            |x, y, _| {
                assert!(x < 4 && y < 4);
                count += 1;
            },
        );
        assert!(count > 0);
    }
}
