#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod editor;
mod error;
mod ffmpeg;
mod player;
mod project;
mod srt;
mod ui;
mod utils;

use app::SubtitleApp;
use config::EditorConfig;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = EditorConfig::default_path();
    let config = match config_path.as_deref() {
        Some(path) => EditorConfig::load_or_create(path).unwrap_or_else(|e| {
            tracing::warn!("Using default settings: {}", e);
            EditorConfig::default()
        }),
        None => EditorConfig::default(),
    };

    let runtime = tokio::runtime::Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Subtitle Editor")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Subtitle Editor",
        options,
        Box::new(|cc| Ok(Box::new(SubtitleApp::new(cc, runtime, config, config_path)))),
    )
    .map_err(|e| anyhow::anyhow!("{}", e))
}
