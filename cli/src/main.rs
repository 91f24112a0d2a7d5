//! CLI entrypoint for glyphcast
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use glyphcast_application::use_cases::generate_art::GenerateArt;
use glyphcast_application::ports::frame_exporter::FrameExporter;
use glyphcast_domain::{FontId, Model, Rgb, export_frames};
use glyphcast_infrastructure::{
    BlockFontRenderer, ConfigLoader, GifFrameExporter, OllamaGateway,
};
use glyphcast_presentation::{ChatRepl, Cli, ConsoleArt, ReplOptions};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting glyphcast");

    // Load configuration, then apply CLI overrides
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("failed to load configuration")?
    };
    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(font) = &cli.font {
        config.art.font = font.clone();
    }
    if cli.no_animation {
        config.animation.enabled = false;
    }
    config.validate()?;

    let foreground = Rgb::from_hex(&config.art.foreground).context("art.foreground")?;
    let shadow = Rgb::from_hex(&config.art.shadow).context("art.shadow")?;
    let font = FontId::new(&config.art.font);
    let frame_delay = Duration::from_millis(config.animation.interval_ms);

    // === Dependency Injection ===
    let renderer = Arc::new(BlockFontRenderer::new());
    let exporter = Arc::new(GifFrameExporter::new());

    // One-shot mode: render (and optionally export), then exit
    if let Some(text) = &cli.text {
        let art = GenerateArt::new(Arc::clone(&renderer));
        let document = art.generate(text, &font, foreground, shadow)?;
        print!("{}", ConsoleArt::render(&document, document.shadow()));
        if let Some(path) = &cli.export {
            let frames = export_frames(document.shadow());
            exporter.export(&document, &frames, frame_delay, path)?;
            println!("Saved {}", path.display());
        }
        return Ok(());
    }

    // Interactive mode
    let gateway = Arc::new(OllamaGateway::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_seconds),
    )?);

    let options = ReplOptions {
        font,
        foreground,
        shadow,
        animation_enabled: config.animation.enabled,
        frame_delay,
        default_model: cli.model.as_deref().map(Model::new),
        show_status: config.repl.show_status,
        history_file: config.repl.history_file.as_ref().map(Into::into),
    };

    let mut repl = ChatRepl::new(gateway, renderer, exporter, options);
    repl.run().await?;

    Ok(())
}
