//! Offscreen render targets
//!
//! A render target has a back buffer that draws write into and a front
//! texture that readers sample. [`RenderTarget::display`] publishes the back
//! buffer, so a target can be redrawn while its last finished frame is
//! still being sampled.

use glam::{Vec2, Vec4};

use crate::blend::BlendMode;
use crate::error::RenderResult;
use crate::raster::rasterize_triangle;
use crate::shader::{Fragment, FragmentShader, Uniforms};
use crate::texture::Texture;
use crate::vertex::VertexArray;

/// A shader together with the uniforms for one draw
#[derive(Clone, Copy)]
pub struct ShaderBinding<'a> {
    pub program: &'a dyn FragmentShader,
    pub uniforms: &'a Uniforms<'a>,
}

/// Pipeline state for one draw call
#[derive(Clone, Copy, Default)]
pub struct RenderStates<'a> {
    /// How shaded fragments combine with the target
    pub blend_mode: BlendMode,
    /// Texture sampled at the vertex texture coordinates
    pub texture: Option<&'a Texture>,
    /// Fragment shader replacing the fixed-function color
    pub shader: Option<ShaderBinding<'a>>,
}

impl<'a> RenderStates<'a> {
    /// Untextured, unshaded states with the given blend mode
    pub fn new(blend_mode: BlendMode) -> Self {
        Self {
            blend_mode,
            texture: None,
            shader: None,
        }
    }

    /// Bind a texture
    pub fn with_texture(mut self, texture: &'a Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Bind a shader and its uniforms
    pub fn with_shader(mut self, program: &'a dyn FragmentShader, uniforms: &'a Uniforms<'a>) -> Self {
        self.shader = Some(ShaderBinding { program, uniforms });
        self
    }
}

/// Per-draw counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub triangles: usize,
    pub fragments: usize,
}

/// An offscreen surface
#[derive(Clone, Debug)]
pub struct RenderTarget {
    back: Texture,
    front: Texture,
}

impl RenderTarget {
    /// Create a transparent target
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let back = Texture::new(width, height)?;
        Ok(Self {
            front: back.clone(),
            back,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.back.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.back.height()
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.back.size()
    }

    #[inline]
    pub fn size_vec(&self) -> Vec2 {
        self.back.size_vec()
    }

    /// Fill the back buffer
    pub fn clear(&mut self, color: Vec4) {
        self.back.fill(color);
    }

    /// Pixel of the back buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        self.back.texel(x, y)
    }

    /// The back buffer as drawn so far
    pub fn contents(&self) -> &Texture {
        &self.back
    }

    /// Copy of the back buffer, for passes that read the target they write
    pub fn snapshot(&self) -> Texture {
        self.back.clone()
    }

    /// Publish the back buffer to the front texture
    pub fn display(&mut self) {
        self.front.clone_from(&self.back);
    }

    /// The last displayed frame
    pub fn texture(&self) -> &Texture {
        &self.front
    }

    /// Overwrite the back buffer with a texture of the same size, or stretch
    /// it with nearest sampling when sizes differ
    pub fn blit(&mut self, source: &Texture) {
        if source.size() == self.back.size() {
            self.back.clone_from(source);
            return;
        }
        let scale = source.size_vec() / self.back.size_vec();
        let width = self.back.width();
        for (i, texel) in self.back.texels_mut().iter_mut().enumerate() {
            let x = (i as u32 % width) as f32 + 0.5;
            let y = (i as u32 / width) as f32 + 0.5;
            *texel = source.sample(Vec2::new(x, y) * scale);
        }
    }

    /// Draw a triangle list
    ///
    /// Per fragment: interpolated vertex color, times the bound texture's
    /// sample, replaced by the shader output when a shader is bound, then
    /// blended into the back buffer.
    pub fn draw(&mut self, vertices: &VertexArray, states: &RenderStates<'_>) -> RenderResult<DrawStats> {
        if let Some(binding) = &states.shader {
            binding.program.validate(binding.uniforms)?;
        }

        let blend = states.blend_mode.config();
        let (width, height) = self.back.size();
        let texels = self.back.texels_mut();
        let mut stats = DrawStats::default();

        for tri in vertices.triangles() {
            stats.triangles += 1;
            let (a, b, c) = (tri[0], tri[1], tri[2]);
            rasterize_triangle(width, height, a.pos(), b.pos(), c.pos(), |x, y, w| {
                let mut color = a.rgba() * w.x + b.rgba() * w.y + c.rgba() * w.z;
                let tex_coords = a.uv() * w.x + b.uv() * w.y + c.uv() * w.z;
                if let Some(texture) = states.texture {
                    color *= texture.sample(tex_coords);
                }
                if let Some(binding) = &states.shader {
                    let fragment = Fragment {
                        position: Vec2::new(x as f32 + 0.5, y as f32 + 0.5),
                        color,
                        tex_coords,
                        texture: states.texture,
                    };
                    color = binding.program.shade(&fragment, binding.uniforms);
                }
                let index = y as usize * width as usize + x as usize;
                texels[index] = blend.apply(color, texels[index]);
                stats.fragments += 1;
            });
        }

        log::trace!(
            "Drew {} triangles ({} fragments) with {:?}",
            stats.triangles,
            stats.fragments,
            states.blend_mode
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, TRANSPARENT, WHITE};
    use crate::shader::UniformKind;
    use crate::vertex::Vertex;

    struct Gradient;

    impl FragmentShader for Gradient {
        fn name(&self) -> &str {
            "gradient"
        }

        fn inputs(&self) -> &[(&'static str, UniformKind)] {
            &[("Width", UniformKind::Float)]
        }

        fn shade(&self, fragment: &Fragment<'_>, uniforms: &Uniforms<'_>) -> Vec4 {
            let width = uniforms.float("Width").unwrap_or(1.0);
            Vec4::new(fragment.position.x / width, 0.0, 0.0, 1.0)
        }
    }

    #[test]
    fn test_draw_requires_display() {
        let mut target = RenderTarget::new(4, 4).unwrap();
        target.clear(WHITE);
        assert_eq!(target.pixel(0, 0), Some(WHITE));
        assert_eq!(target.texture().texel(0, 0), Some(TRANSPARENT));
        target.display();
        assert_eq!(target.texture().texel(0, 0), Some(WHITE));
    }

    #[test]
    fn test_textured_quad_copies_texels() {
        let mut source = Texture::new(4, 4).unwrap();
        source.set_texel(2, 1, Vec4::new(0.0, 1.0, 0.0, 1.0));
        let mut target = RenderTarget::new(4, 4).unwrap();
        let quad = VertexArray::quad(Vec2::ZERO, Vec2::splat(4.0), Vec2::ZERO);
        let stats = target
            .draw(&quad, &RenderStates::new(BlendMode::Replace).with_texture(&source))
            .unwrap();
        assert_eq!(stats.triangles, 2);
        assert_eq!(stats.fragments, 16);
        assert_eq!(target.contents(), &source);
    }

    #[test]
    fn test_multiply_zeroes_covered_pixels() {
        let mut target = RenderTarget::new(4, 4).unwrap();
        target.clear(WHITE);
        let mut tri = VertexArray::new();
        tri.push_triangle(
            Vertex::colored(Vec2::ZERO, TRANSPARENT),
            Vertex::colored(Vec2::new(4.0, 0.0), TRANSPARENT),
            Vertex::colored(Vec2::new(0.0, 4.0), TRANSPARENT),
        );
        target.draw(&tri, &RenderStates::new(BlendMode::Multiply)).unwrap();
        assert_eq!(target.pixel(0, 0), Some(TRANSPARENT));
        assert_eq!(target.pixel(3, 3), Some(WHITE));
    }

    #[test]
    fn test_shader_output_and_validation() {
        let mut target = RenderTarget::new(4, 1).unwrap();
        target.clear(BLACK);
        let quad = VertexArray::quad(Vec2::ZERO, Vec2::new(4.0, 1.0), Vec2::ZERO);

        let missing = Uniforms::new();
        let err = target.draw(&quad, &RenderStates::new(BlendMode::Replace).with_shader(&Gradient, &missing));
        assert!(err.is_err());
        assert_eq!(target.pixel(1, 0), Some(BLACK));

        let uniforms = Uniforms::new().with("Width", 4.0f32);
        target
            .draw(&quad, &RenderStates::new(BlendMode::Replace).with_shader(&Gradient, &uniforms))
            .unwrap();
        let px = target.pixel(1, 0).unwrap();
        assert!((px.x - 1.5 / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_blit_stretches() {
        let source = Texture::filled(2, 2, WHITE).unwrap();
        let mut target = RenderTarget::new(4, 4).unwrap();
        target.blit(&source);
        assert!(target.contents().texels().iter().all(|&t| t == WHITE));
    }
}
