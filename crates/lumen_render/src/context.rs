//! Rendering context settings
//!
//! The window/event-loop layer owns the actual context; this is the part of
//! it the lighting system needs to check before rendering anything.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Settings of the context the renderer runs in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSettings {
    /// Major context version
    pub major_version: u32,
    /// Minor context version
    pub minor_version: u32,
    /// Multisample level requested by the window layer
    pub antialiasing_level: u32,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            major_version: 4,
            minor_version: 3,
            antialiasing_level: 8,
        }
    }
}

impl ContextSettings {
    /// Create settings for a given version
    pub fn new(major_version: u32, minor_version: u32) -> Self {
        Self {
            major_version,
            minor_version,
            ..Default::default()
        }
    }

    /// Version as `(major, minor)`
    pub fn version(&self) -> (u32, u32) {
        (self.major_version, self.minor_version)
    }

    /// Fail unless the context is at least `major.minor`
    pub fn require(&self, major: u32, minor: u32) -> RenderResult<()> {
        if self.version() >= (major, minor) {
            Ok(())
        } else {
            Err(RenderError::UnsupportedContext {
                major: self.major_version,
                minor: self.minor_version,
                required_major: major,
                required_minor: minor,
            })
        }
    }
}
