//! Per-light offscreen surfaces

use lumen_render::{RenderResult, RenderTarget};

/// The three square surfaces every light owns
#[derive(Clone, Debug)]
pub struct LightSurfaces {
    /// Radial gradient centred on the surface, rendered when the light is
    /// created and again when its attenuation changes
    pub gradient: RenderTarget,
    /// Umbra mask over opaque white
    pub shadow: RenderTarget,
    /// Gradient with the umbra multiplied out; the light's illumination mask
    pub light_map: RenderTarget,
}

impl LightSurfaces {
    /// Allocate three transparent `size` x `size` surfaces
    pub fn new(size: u32) -> RenderResult<Self> {
        log::debug!("Allocating light surfaces ({}x{} x3)", size, size);
        Ok(Self {
            gradient: RenderTarget::new(size, size)?,
            shadow: RenderTarget::new(size, size)?,
            light_map: RenderTarget::new(size, size)?,
        })
    }

    /// Side length shared by all three surfaces
    pub fn size(&self) -> u32 {
        self.gradient.width()
    }
}
