//! Renders the demo cube with the render config and writes a PNG

use anyhow::{Context, Result};
use log::info;
use softshade::rasterizer::{
    create_test_cube, render_frame, showcase_rotation, Color, DiffuseShader, Pipeline,
    StandardVertexShader, Texture,
};
use softshade::scene::RenderConfig;
use softshade::VERSION;
use std::path::Path;

const CONFIG_PATH: &str = "render.ron";
const TEXTURE_PATH: &str = "assets/texture.png";
const OUTPUT_PATH: &str = "output.png";

fn load_texture() -> Texture {
    if Path::new(TEXTURE_PATH).exists() {
        match Texture::from_file(TEXTURE_PATH) {
            Ok(tex) => return tex,
            Err(e) => log::warn!("{}, using checkerboard", e),
        }
    }
    Texture::checkerboard(64, 64, Color::WHITE, Color::new(200, 60, 40))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("=== softshade v{} ===", VERSION);

    let config = if Path::new(CONFIG_PATH).exists() {
        RenderConfig::load(CONFIG_PATH).with_context(|| format!("loading {}", CONFIG_PATH))?
    } else {
        info!("No {} found, using defaults", CONFIG_PATH);
        RenderConfig::default()
    };

    let mesh = create_test_cube();
    let textures = [load_texture()];
    let uniforms = config.uniforms().with_model(showcase_rotation());
    let pipeline = Pipeline::new(StandardVertexShader, DiffuseShader, uniforms);

    let mut fb = config.new_framebuffer();
    let stats = render_frame(&mut fb, &mesh, &textures, &pipeline, &config.settings())?;
    info!(
        "{} faces, {} pixels written ({} discarded, {} hidden)",
        stats.faces, stats.written, stats.discarded, stats.depth_rejected
    );

    // Screen y grows upward from row 0; images store the top row first
    let img = image::imageops::flip_vertical(&fb.color().to_image());
    img.save(OUTPUT_PATH)
        .with_context(|| format!("writing {}", OUTPUT_PATH))?;
    info!("Wrote {}", OUTPUT_PATH);

    Ok(())
}
