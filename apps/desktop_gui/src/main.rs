mod backend_bridge;
mod controller;
mod ui;

use client_core::{load_settings, Settings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{
    backend_bridge::commands::BackendCommand, controller::events::UiEvent, ui::ContactManagerApp,
};

fn main() -> eframe::Result<()> {
    let (settings, settings_error) = match load_settings() {
        Ok(settings) => (settings, None),
        Err(err) => (Settings::default(), Some(err)),
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if let Some(err) = settings_error {
        tracing::error!("failed to load settings, falling back to defaults: {err:#}");
    }
    settings.log_diagnostics();
    tracing::info!(api = %settings.api_base_url, "contacts: using remote collection");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings.api_base_url.clone(), cmd_rx, ui_tx);

    let policy = settings.submit_policy();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Contact List")
            .with_inner_size([1024.0, 680.0])
            .with_min_inner_size([720.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Contact List",
        options,
        Box::new(move |_cc| Ok(Box::new(ContactManagerApp::new(policy, cmd_tx, ui_rx)))),
    )
}
