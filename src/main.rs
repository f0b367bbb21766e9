mod app;
mod color;
mod config;
mod data;
mod export;
mod pipeline;
mod state;
mod ui;

use app::StateViewerApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = config::from_env();
    log::debug!("Using config {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Quantum State Frequencies",
        options,
        Box::new(move |_cc| Ok(Box::new(StateViewerApp::new(config)))),
    )
}
