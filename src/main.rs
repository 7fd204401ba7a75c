mod app;
mod config;
mod upload;
mod utils;

use anyhow::Context;
use app::FormUploaderApp;
use clap::Parser;
use config::Config;
use eframe::CreationContext;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    config.validate()?;

    let runtime = tokio::runtime::Runtime::new().context("failed to build tokio runtime")?;
    let app = FormUploaderApp::new(&config, runtime.handle().clone())?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 600.0])
            .with_min_inner_size([400.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "File Upload",
        options,
        Box::new(move |_cc: &CreationContext| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("failed to run ui: {e}"))?;

    drop(runtime);
    Ok(())
}
