//! Cornell box example.
//!
//! Renders the built-in Cornell box progressively and saves a PNG.
//!
//! ```text
//! cargo run --release --example cornell_box -- [frames] [output.png] [config.json]
//! ```

use anyhow::{Context, Result};
use lux_core::presets::cornell_box;
use lux_renderer::{ProgressiveRenderer, RenderConfig, TriangleBvh};

const WIDTH: u32 = 512;
const HEIGHT: u32 = 512;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let frames: u32 = match args.next() {
        Some(arg) => arg.parse().with_context(|| format!("invalid frame count '{arg}'"))?,
        None => 64,
    };
    let output = args.next().unwrap_or_else(|| "cornell_box.png".to_string());
    let config = match args.next() {
        Some(path) => RenderConfig::load(&path).with_context(|| format!("failed to load config {path}"))?,
        None => RenderConfig {
            samples_per_frame: 4,
            ..Default::default()
        },
    };

    let start = std::time::Instant::now();
    let setup = cornell_box(WIDTH as f32 / HEIGHT as f32).context("failed to build Cornell box")?;
    let bvh = TriangleBvh::build(&setup.scene);
    println!("Scene built in {:?}", start.elapsed());

    let mut renderer = ProgressiveRenderer::new(WIDTH, HEIGHT, config)?;
    println!(
        "Rendering {}x{} @ {} frames x {} spp...",
        WIDTH,
        HEIGHT,
        frames,
        renderer.config().samples_per_frame
    );

    let start = std::time::Instant::now();
    for _ in 0..frames {
        renderer.render_frame(&setup.scene, &bvh, setup.camera, setup.light)?;
    }
    println!("Rendered in {:?}", start.elapsed());

    renderer
        .accumulation()
        .to_image()
        .save(&output)
        .with_context(|| format!("failed to save {output}"))?;
    println!("Saved to {}", output);

    Ok(())
}
