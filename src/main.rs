mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::Context;
use app::CuratorApp;
use clap::Parser;
use config::{AppConfig, Cli};
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli)?;
    log::debug!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([750.0, 850.0])
            .with_min_inner_size([750.0, 850.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Depth-RGB Curator",
        options,
        Box::new(move |_cc| Ok(Box::new(CuratorApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the curator window")
}
