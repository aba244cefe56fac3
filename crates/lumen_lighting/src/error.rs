//! Lighting error types

use lumen_render::RenderError;
use thiserror::Error;

use crate::light::LightId;

/// Lighting errors
#[derive(Debug, Error)]
pub enum LightingError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown {0}")]
    UnknownLight(LightId),

    #[error("Shadow geometry for {0} is stale; rebuild it before rendering")]
    StaleGeometry(LightId),

    #[error("Not supported: {0}")]
    Unsupported(&'static str),
}

/// Result type for lighting operations
pub type LightingResult<T> = Result<T, LightingError>;
