//! Blend modes and the fixed-function blend equation
//!
//! Every draw combines the shaded fragment (`src`) with the pixel already in
//! the target (`dst`) through a [`BlendConfig`]. The lighting passes only
//! need four modes:
//! - Alpha: standard over-compositing
//! - Additive: sum, weighted by source alpha
//! - Multiply: product, used to zero out occluded regions
//! - Replace: no blending

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Blend mode for a draw call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    /// Alpha blending: result = src * src.a + dst * (1 - src.a)
    #[default]
    Alpha,
    /// Additive blending: result = src * src.a + dst
    Additive,
    /// Multiply: result = src * dst
    Multiply,
    /// Replace (no blending)
    Replace,
}

/// Blend factors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Blend operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendOperation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Separate color and alpha blend equations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendConfig {
    /// Source color blend factor
    pub src_color_factor: BlendFactor,
    /// Destination color blend factor
    pub dst_color_factor: BlendFactor,
    /// Color blend operation
    pub color_operation: BlendOperation,
    /// Source alpha blend factor
    pub src_alpha_factor: BlendFactor,
    /// Destination alpha blend factor
    pub dst_alpha_factor: BlendFactor,
    /// Alpha blend operation
    pub alpha_operation: BlendOperation,
}

impl BlendMode {
    /// Blend equation for this mode
    pub fn config(&self) -> BlendConfig {
        match self {
            BlendMode::Alpha => BlendConfig {
                src_color_factor: BlendFactor::SrcAlpha,
                dst_color_factor: BlendFactor::OneMinusSrcAlpha,
                color_operation: BlendOperation::Add,
                src_alpha_factor: BlendFactor::One,
                dst_alpha_factor: BlendFactor::OneMinusSrcAlpha,
                alpha_operation: BlendOperation::Add,
            },
            BlendMode::Additive => BlendConfig {
                src_color_factor: BlendFactor::SrcAlpha,
                dst_color_factor: BlendFactor::One,
                color_operation: BlendOperation::Add,
                src_alpha_factor: BlendFactor::One,
                dst_alpha_factor: BlendFactor::One,
                alpha_operation: BlendOperation::Add,
            },
            BlendMode::Multiply => BlendConfig {
                src_color_factor: BlendFactor::DstColor,
                dst_color_factor: BlendFactor::Zero,
                color_operation: BlendOperation::Add,
                src_alpha_factor: BlendFactor::DstAlpha,
                dst_alpha_factor: BlendFactor::Zero,
                alpha_operation: BlendOperation::Add,
            },
            BlendMode::Replace => BlendConfig {
                src_color_factor: BlendFactor::One,
                dst_color_factor: BlendFactor::Zero,
                color_operation: BlendOperation::Add,
                src_alpha_factor: BlendFactor::One,
                dst_alpha_factor: BlendFactor::Zero,
                alpha_operation: BlendOperation::Add,
            },
        }
    }

    /// Blend `src` over `dst`, clamped to `[0, 1]`
    #[inline]
    pub fn blend(&self, src: Vec4, dst: Vec4) -> Vec4 {
        self.config().apply(src, dst)
    }
}

impl BlendFactor {
    /// Factor applied to the color channels
    #[inline]
    fn color(self, src: Vec4, dst: Vec4) -> Vec3 {
        match self {
            BlendFactor::Zero => Vec3::ZERO,
            BlendFactor::One => Vec3::ONE,
            BlendFactor::SrcColor => src.truncate(),
            BlendFactor::OneMinusSrcColor => Vec3::ONE - src.truncate(),
            BlendFactor::DstColor => dst.truncate(),
            BlendFactor::OneMinusDstColor => Vec3::ONE - dst.truncate(),
            BlendFactor::SrcAlpha => Vec3::splat(src.w),
            BlendFactor::OneMinusSrcAlpha => Vec3::splat(1.0 - src.w),
            BlendFactor::DstAlpha => Vec3::splat(dst.w),
            BlendFactor::OneMinusDstAlpha => Vec3::splat(1.0 - dst.w),
        }
    }

    /// Factor applied to the alpha channel
    #[inline]
    fn alpha(self, src: Vec4, dst: Vec4) -> f32 {
        match self {
            BlendFactor::Zero => 0.0,
            BlendFactor::One => 1.0,
            BlendFactor::SrcColor | BlendFactor::SrcAlpha => src.w,
            BlendFactor::OneMinusSrcColor | BlendFactor::OneMinusSrcAlpha => 1.0 - src.w,
            BlendFactor::DstColor | BlendFactor::DstAlpha => dst.w,
            BlendFactor::OneMinusDstColor | BlendFactor::OneMinusDstAlpha => 1.0 - dst.w,
        }
    }
}

impl BlendOperation {
    #[inline]
    fn apply3(self, a: Vec3, b: Vec3) -> Vec3 {
        match self {
            BlendOperation::Add => a + b,
            BlendOperation::Subtract => a - b,
            BlendOperation::ReverseSubtract => b - a,
            BlendOperation::Min => a.min(b),
            BlendOperation::Max => a.max(b),
        }
    }

    #[inline]
    fn apply1(self, a: f32, b: f32) -> f32 {
        match self {
            BlendOperation::Add => a + b,
            BlendOperation::Subtract => a - b,
            BlendOperation::ReverseSubtract => b - a,
            BlendOperation::Min => a.min(b),
            BlendOperation::Max => a.max(b),
        }
    }
}

impl BlendConfig {
    /// Evaluate the blend equation for one pixel
    pub fn apply(&self, src: Vec4, dst: Vec4) -> Vec4 {
        let color = self.color_operation.apply3(
            src.truncate() * self.src_color_factor.color(src, dst),
            dst.truncate() * self.dst_color_factor.color(src, dst),
        );
        let alpha = self.alpha_operation.apply1(
            src.w * self.src_alpha_factor.alpha(src, dst),
            dst.w * self.dst_alpha_factor.alpha(src, dst),
        );
        color.extend(alpha).clamp(Vec4::ZERO, Vec4::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-6
    }

    #[test]
    fn test_alpha_over() {
        let src = Vec4::new(1.0, 0.0, 0.0, 0.5);
        let dst = Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert!(approx(BlendMode::Alpha.blend(src, dst), Vec4::new(0.5, 0.0, 0.5, 1.0)));
    }

    #[test]
    fn test_transparent_alpha_is_noop() {
        let dst = Vec4::new(0.3, 0.4, 0.5, 1.0);
        assert!(approx(BlendMode::Alpha.blend(Vec4::ZERO, dst), dst));
    }

    #[test]
    fn test_additive_saturates() {
        let c = Vec4::new(0.75, 0.25, 0.0, 1.0);
        assert!(approx(BlendMode::Additive.blend(c, c), Vec4::new(1.0, 0.5, 0.0, 1.0)));
    }

    #[test]
    fn test_multiply_by_transparent_black_zeroes() {
        let dst = Vec4::new(0.8, 0.6, 0.4, 0.9);
        assert_eq!(BlendMode::Multiply.blend(Vec4::ZERO, dst), Vec4::ZERO);
        let half = Vec4::splat(0.5);
        assert!(approx(BlendMode::Multiply.blend(half, dst), dst * 0.5));
    }

    #[test]
    fn test_replace() {
        let src = Vec4::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(BlendMode::Replace.blend(src, Vec4::ONE), src);
    }

    #[test]
    fn test_min_max_operations() {
        let config = BlendConfig {
            src_color_factor: BlendFactor::One,
            dst_color_factor: BlendFactor::One,
            color_operation: BlendOperation::Max,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::One,
            alpha_operation: BlendOperation::Min,
        };
        let out = config.apply(Vec4::new(0.2, 0.9, 0.5, 0.3), Vec4::new(0.6, 0.1, 0.5, 0.8));
        assert!(approx(out, Vec4::new(0.6, 0.9, 0.5, 0.3)));
    }
}
