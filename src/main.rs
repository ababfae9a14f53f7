mod app;
mod color;
mod data;
mod events;
mod settings;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use app::HousingExplorerApp;
use data::cache::DatasetCache;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = settings::load_settings(std::env::args_os().nth(1).map(Into::into));
    let data_path = settings.data_path.clone();
    let window_size = settings.window_size;

    // The startup dataset is required; there is no degraded mode.
    let mut state = AppState::new(settings, DatasetCache::new());
    state
        .open(&data_path)
        .with_context(|| format!("loading startup dataset {}", data_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "California Housing Data (1990)",
        options,
        Box::new(|_cc| Ok(Box::new(HousingExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the UI: {e}"))
}
