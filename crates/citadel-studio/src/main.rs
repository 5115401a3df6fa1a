mod app;

use std::path::Path;

use anyhow::{Context, Result};
use citadel_engine::device::GpuInit;
use citadel_engine::logging::{init_logging, LoggingConfig};
use citadel_engine::render::{RendererConfig, TextureSource};
use citadel_engine::window::{Runtime, RuntimeConfig};
use citadel_scene::{CastleLayout, Scene};

use app::CastleApp;

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let scene = Scene::castle(&CastleLayout::default()).context("failed to build the castle scene")?;

    let renderer = RendererConfig {
        textures: castle_textures(),
        ..RendererConfig::default()
    };

    Runtime::run(
        RuntimeConfig {
            title: "Citadel".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        CastleApp::new(scene, renderer),
    )
}

/// Texture table in material texture-index order.
fn castle_textures() -> Vec<TextureSource> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/textures");
    vec![
        TextureSource::new("bricksTex", dir.join("bricks.png")),
        TextureSource::new("stoneTex", dir.join("stone.png")),
        TextureSource::new("tileTex", dir.join("tile.png")),
    ]
}
