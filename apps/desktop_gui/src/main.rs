use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use client_core::{load_settings, DashboardLocation, RestProductSource};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::{events::UiEvent, orchestration::DashboardController};
use ui::DashboardApp;

#[derive(Parser, Debug)]
#[command(name = "inventory-dashboard-gui", about = "Product inventory dashboard")]
struct Cli {
    /// Dashboard URL or bare query string to open, e.g. `page=2&stockStatus=in_stock`.
    #[arg(long)]
    location: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();
    let settings = load_settings();

    let location = DashboardLocation::parse(
        cli.location
            .as_deref()
            .unwrap_or(settings.dashboard_url.as_str()),
    )
    .context("invalid --location")?;
    tracing::info!(location = location.as_str(), api_url = %settings.api_url, "opening dashboard");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(
        Arc::new(RestProductSource::new(&settings)),
        cmd_rx,
        ui_tx,
    );
    let controller = DashboardController::new(cmd_tx, location, settings.page_size);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Product Inventory Dashboard")
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Product Inventory Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(controller, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("dashboard window failed: {err}"))
}
