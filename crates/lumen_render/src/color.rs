//! RGBA colors
//!
//! Colors are linear `Vec4` values in `[0, 1]` per channel. Render targets
//! store them clamped, the same as an 8-bit unorm attachment would.

use glam::Vec4;

pub const TRANSPARENT: Vec4 = Vec4::ZERO;
pub const BLACK: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);
pub const WHITE: Vec4 = Vec4::ONE;

/// Build a color from 8-bit channels
#[inline]
pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Vec4 {
    Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
}

/// Quantize a color to 8-bit channels
#[inline]
pub fn to_rgba8(color: Vec4) -> [u8; 4] {
    let c = saturate(color) * 255.0 + Vec4::splat(0.5);
    [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
}

/// Clamp every channel to `[0, 1]`
#[inline]
pub fn saturate(color: Vec4) -> Vec4 {
    color.clamp(Vec4::ZERO, Vec4::ONE)
}
