//! Render error types

use thiserror::Error;

/// Render errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Shader not found: {0}")]
    ShaderNotFound(String),

    #[error("Shader '{shader}' is missing uniform '{uniform}'")]
    MissingUniform { shader: String, uniform: &'static str },

    #[error("Shader '{shader}' expected uniform '{uniform}' to be a {expected}")]
    UniformType {
        shader: String,
        uniform: &'static str,
        expected: &'static str,
    },

    #[error("Unsupported context version {major}.{minor}, {required_major}.{required_minor}+ is required")]
    UnsupportedContext {
        major: u32,
        minor: u32,
        required_major: u32,
        required_minor: u32,
    },

    #[error("Surface size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch { expected: (u32, u32), actual: (u32, u32) },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;
