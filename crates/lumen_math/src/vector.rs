//! Vector helpers with explicit degenerate-input handling

use glam::Vec2;

/// Lengths at or below this are treated as zero
pub const EPSILON: f32 = 1e-6;

/// Unit diagonals in top-left, top-right, bottom-right, bottom-left order
pub const DIAGONALS: [Vec2; 4] = [
    Vec2::new(-core::f32::consts::FRAC_1_SQRT_2, core::f32::consts::FRAC_1_SQRT_2),
    Vec2::new(core::f32::consts::FRAC_1_SQRT_2, core::f32::consts::FRAC_1_SQRT_2),
    Vec2::new(core::f32::consts::FRAC_1_SQRT_2, -core::f32::consts::FRAC_1_SQRT_2),
    Vec2::new(-core::f32::consts::FRAC_1_SQRT_2, -core::f32::consts::FRAC_1_SQRT_2),
];

/// Normalize `v`, returning `fallback` when its length is within `epsilon` of zero.
///
/// The fallback is returned as given; callers pass a unit vector.
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2, epsilon: f32) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > epsilon * epsilon {
        v / len_sq.sqrt()
    } else {
        fallback
    }
}

/// Unit direction from `origin` towards `target`, or `fallback` when they coincide
#[inline]
pub fn direction_or(origin: Vec2, target: Vec2, fallback: Vec2, epsilon: f32) -> Vec2 {
    normalize_or(target - origin, fallback, epsilon)
}
