//! Umbra command line renderer.
//!
//! Parses a scene file, renders it and writes the result as a PNG.

mod cli;
mod parser;

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Instant;

use cli::Args;
use parser::parse_scene_file;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting Umbra");

    let start = Instant::now();
    let mut file = parse_scene_file(&args.scene)
        .with_context(|| format!("Failed to parse scene {}", args.scene.display()))?;
    log::info!("Scene loaded in {:.2?}", start.elapsed());

    file.scene.settings.seed = args.seed;
    let output = args.output.unwrap_or(file.output);

    let image = umbra_renderer::render(&file.scene).context("Failed to render scene")?;

    image::save_buffer(
        &output,
        image.as_bytes(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!("Saved {}", output.display());
    Ok(())
}
