//! Lumen Demo
//!
//! Headless version of the two-light shadow scene. Each frame the first
//! light follows a circular path, geometry is rebuilt, and every light is
//! composited onto the background. The last frame is written as a PNG.
//!
//! Run with: cargo run -p lumen_demo -- [scene.json]
//! Verbosity follows `RUST_LOG` (default `info`).

mod scene_config;

use std::f32::consts::TAU;

use glam::{Vec2, Vec4};
use lumen_lighting::{builtin_library, LightSystem};
use lumen_math::Edge;
use lumen_render::{color, BlendMode, ContextSettings, RenderStates, RenderTarget, Texture, Vertex, VertexArray};

use crate::scene_config::SceneConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match SceneConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid scene configuration: {}", e);
            std::process::exit(2);
        }
    };
    config.log_summary();

    if let Err(e) = run(&config) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &SceneConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut system = LightSystem::new(config.lighting.clone(), &ContextSettings::default(), &builtin_library())?;
    let size = system.config().surface_size;
    system.set_view_height(size as f32);

    let mut ids = Vec::with_capacity(config.lights.len());
    for desc in &config.lights {
        ids.push(system.add_light(desc.clone())?);
    }

    let mut outlines = VertexArray::new();
    for shape in &config.occluders {
        let edges = shape.edges();
        append_outline(&mut outlines, &edges);
        system.add_occluder(edges);
    }

    let background = match &config.background {
        Some(path) => Texture::load_png(path)?,
        None => checkerboard(size)?,
    };

    let mut scene = RenderTarget::new(size, size)?;
    let mut output = RenderTarget::new(size, size)?;

    let orbit = ids.first().and_then(|&id| system.light(id).map(|l| (id, l.position())));
    let frames = config.frames.max(1);

    for frame in 0..config.frames {
        if let Some((id, center)) = orbit {
            let angle = frame as f32 / frames as f32 * TAU;
            system.move_light(id, center + Vec2::new(angle.cos(), angle.sin()) * config.orbit_radius);
        }

        let stats = system.update_lights();

        scene.clear(color::BLACK);
        scene.blit(&background);
        let passes = system.render_onto_scene(&mut scene, &mut output)?;

        if frame == 0 {
            system.render_combined()?;
        }
        log::debug!(
            "Frame {}: {} passes, {} shadow triangles",
            frame,
            passes,
            stats.shadow_triangles
        );
    }

    if config.frames == 0 {
        log::warn!("No frames rendered; writing the unlit background");
        output.blit(&background);
    }
    if config.outline_occluders {
        output.draw(&outlines, &RenderStates::new(BlendMode::Alpha))?;
    }
    output.display();
    output.texture().save_png(&config.output)?;
    log::info!("Wrote {} after {} frames", config.output.display(), config.frames);
    Ok(())
}

/// White lines, 1.5 px wide, along every edge
fn append_outline(mesh: &mut VertexArray, edges: &[Edge]) {
    for edge in edges {
        let half = edge.tangent().perp() * 0.75;
        let v = |p: Vec2| Vertex::colored(p, color::WHITE);
        let (a, b) = (edge.start - half, edge.start + half);
        let (c, d) = (edge.end + half, edge.end - half);
        mesh.push_triangle(v(a), v(b), v(c));
        mesh.push_triangle(v(a), v(c), v(d));
    }
}

/// Two-tone checkerboard used when no background image is configured
fn checkerboard(size: u32) -> Result<Texture, lumen_render::RenderError> {
    const CELL: u32 = 50;
    let light = Vec4::new(0.75, 0.72, 0.68, 1.0);
    let dark = Vec4::new(0.45, 0.42, 0.40, 1.0);

    let mut texture = Texture::new(size, size)?;
    for y in 0..size {
        for x in 0..size {
            let c = if (x / CELL + y / CELL) % 2 == 0 { light } else { dark };
            texture.set_texel(x, y, c);
        }
    }
    Ok(texture)
}
