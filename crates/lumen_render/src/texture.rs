//! CPU textures
//!
//! Texels are addressed in pixel space: texel `(i, j)` covers
//! `[i, i + 1) x [j, j + 1)`. Sampling is nearest-neighbour with
//! clamp-to-edge addressing.

use std::path::Path;

use glam::{Vec2, Vec4};
use image::RgbaImage;

use crate::color::{self, TRANSPARENT};
use crate::error::{RenderError, RenderResult};

/// A 2D grid of RGBA texels
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<Vec4>,
}

impl Texture {
    /// Create a transparent texture
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        Self::filled(width, height, TRANSPARENT)
    }

    /// Create a texture filled with one color
    pub fn filled(width: u32, height: u32, color: Vec4) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            texels: vec![color::saturate(color); width as usize * height as usize],
        })
    }

    /// Convert an 8-bit image
    pub fn from_image(image: &RgbaImage) -> RenderResult<Self> {
        let (width, height) = image.dimensions();
        let mut texture = Self::new(width, height)?;
        for (dst, px) in texture.texels.iter_mut().zip(image.pixels()) {
            *dst = color::from_rgba8(px[0], px[1], px[2], px[3]);
        }
        Ok(texture)
    }

    /// Load an image file (any format the `image` crate was built with)
    pub fn load_png(path: impl AsRef<Path>) -> RenderResult<Self> {
        let image = image::open(path.as_ref())?.to_rgba8();
        log::debug!(
            "Loaded texture {} ({}x{})",
            path.as_ref().display(),
            image.width(),
            image.height()
        );
        Self::from_image(&image)
    }

    /// Texture width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size as `(width, height)`
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size as a vector
    #[inline]
    pub fn size_vec(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// All texels in row-major order
    #[inline]
    pub fn texels(&self) -> &[Vec4] {
        &self.texels
    }

    #[inline]
    pub(crate) fn texels_mut(&mut self) -> &mut [Vec4] {
        &mut self.texels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Texel at integer coordinates
    pub fn texel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x < self.width && y < self.height {
            Some(self.texels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Overwrite one texel (value is clamped)
    pub fn set_texel(&mut self, x: u32, y: u32, color: Vec4) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.texels[index] = color::saturate(color);
        }
    }

    /// Fill every texel
    pub fn fill(&mut self, color: Vec4) {
        self.texels.fill(color::saturate(color));
    }

    /// Nearest-neighbour sample at pixel-space coordinates
    pub fn sample(&self, coords: Vec2) -> Vec4 {
        let x = clamp_coord(coords.x, self.width);
        let y = clamp_coord(coords.y, self.height);
        self.texels[self.index(x, y)]
    }

    /// Convert to an 8-bit image
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width, self.height);
        for (px, texel) in image.pixels_mut().zip(&self.texels) {
            px.0 = color::to_rgba8(*texel);
        }
        image
    }

    /// Write the texture to disk; the format follows the file extension
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.to_image().save(path.as_ref())?;
        log::debug!("Saved texture to {}", path.as_ref().display());
        Ok(())
    }
}

#[inline]
fn clamp_coord(v: f32, extent: u32) -> u32 {
    let max = (extent - 1) as f32;
    // NaN clamps to zero through the `as` cast
    v.floor().clamp(0.0, max) as u32
}
