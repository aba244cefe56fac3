//! # lumen_render - Software Render Backend
//!
//! Immediate-mode 2D rendering on the CPU:
//! - Offscreen render targets with back/front buffers
//! - Triangle-list vertex arrays with pixel-space texture coordinates
//! - Fixed-function blend modes (alpha, additive, multiply, replace)
//! - Fragment shaders resolved by name from a [`ShaderLibrary`]
//! - PNG import/export for debugging and backgrounds
//!
//! ## Example
//!
//! ```ignore
//! use lumen_render::prelude::*;
//!
//! let mut target = RenderTarget::new(800, 800)?;
//! target.clear(color::BLACK);
//!
//! let quad = VertexArray::quad(Vec2::ZERO, Vec2::splat(800.0), Vec2::ZERO);
//! target.draw(&quad, &RenderStates::new(BlendMode::Alpha).with_texture(&background))?;
//! target.display();
//! ```

pub mod blend;
pub mod color;
pub mod context;
pub mod error;
pub mod raster;
pub mod shader;
pub mod target;
pub mod texture;
pub mod vertex;

pub use blend::{BlendConfig, BlendFactor, BlendMode, BlendOperation};
pub use context::ContextSettings;
pub use error::{RenderError, RenderResult};
pub use shader::{Fragment, FragmentShader, ShaderLibrary, Uniform, UniformKind, Uniforms};
pub use target::{DrawStats, RenderStates, RenderTarget, ShaderBinding};
pub use texture::Texture;
pub use vertex::{Vertex, VertexArray};

pub mod prelude {
    pub use crate::blend::BlendMode;
    pub use crate::color;
    pub use crate::shader::{FragmentShader, ShaderLibrary, Uniforms};
    pub use crate::target::{RenderStates, RenderTarget};
    pub use crate::texture::Texture;
    pub use crate::vertex::{Vertex, VertexArray};
    pub use glam::{Vec2, Vec4};
}
