use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::IncomeBand;
use crate::events::FilterEvent;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Changes are emitted as events, not applied.
pub fn side_panel(ui: &mut Ui, state: &AppState, events: &mut Vec<FilterEvent>) {
    ui.heading("Filters");
    ui.separator();

    let (Some(dataset), Some(params)) = (&state.dataset, &state.params) else {
        ui.label("No dataset loaded.");
        return;
    };
    let region_counts = state.snapshot().map(|s| &s.region_counts);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Region type ----
            let header_text = format!(
                "Location Type  ({}/{})",
                params.regions.len(),
                dataset.regions.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("regions")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            events.push(FilterEvent::SelectAllRegions);
                        }
                        if ui.small_button("None").clicked() {
                            events.push(FilterEvent::ClearRegions);
                        }
                    });

                    for region in &dataset.regions {
                        let shown = region_counts
                            .and_then(|c| c.get(region))
                            .copied()
                            .unwrap_or(0);
                        let mut text = RichText::new(format!("{region}  ({shown})"));
                        if let Some(cm) = &state.color_map {
                            text = text.color(cm.color_for(region));
                        }

                        let mut checked = params.regions.contains(region);
                        if ui.checkbox(&mut checked, text).changed() {
                            events.push(FilterEvent::ToggleRegion(region.clone()));
                        }
                    }

                    if params.regions.is_empty() {
                        ui.label(
                            RichText::new("Nothing selected: showing all location types")
                                .italics()
                                .weak(),
                        );
                    }
                });
            ui.separator();

            // ---- Income band ----
            ui.strong("Income Level");
            for band in IncomeBand::ALL {
                if ui.radio(params.income == band, band.label()).clicked() {
                    events.push(FilterEvent::SetIncomeBand(band));
                }
            }
            ui.separator();

            // ---- House value range ----
            ui.strong("Median House Value Range");
            let bounds = dataset.price_bounds;
            let mut min = params.price.min;
            let mut max = params.price.max;
            let min_changed = ui
                .add(Slider::new(&mut min, bounds.min..=bounds.max).text("min").fixed_decimals(0))
                .changed();
            let max_changed = ui
                .add(Slider::new(&mut max, bounds.min..=bounds.max).text("max").fixed_decimals(0))
                .changed();
            if min_changed || max_changed {
                events.push(FilterEvent::SetPriceRange { min, max });
            }
            ui.separator();

            if ui.button("Reset filters").clicked() {
                events.push(FilterEvent::Reset);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_reload = state.source_path.is_some();
            if ui.add_enabled(can_reload, egui::Button::new("Reload")).clicked() {
                report_reload(state, AppState::reload);
                ui.close_menu();
            }
            if ui
                .add_enabled(can_reload, egui::Button::new("Force reload"))
                .clicked()
            {
                report_reload(state, AppState::force_reload);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(snap)) = (&state.dataset, state.snapshot()) {
            let summary = ui.label(format!(
                "{} houses loaded, {} visible",
                ds.len(),
                snap.row_count
            ));
            if let Some(identity) = state.cache().identity() {
                let age = state
                    .cache()
                    .loaded_at()
                    .and_then(|t| t.elapsed().ok())
                    .map(|d| format!("{}s ago", d.as_secs()))
                    .unwrap_or_else(|| "unknown".to_string());
                summary.on_hover_text(format!(
                    "{} ({} bytes), loaded {age}",
                    identity.path.display(),
                    identity.len
                ));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

fn report_reload(
    state: &mut AppState,
    reload: fn(&mut AppState) -> Result<(), crate::data::error::LoadError>,
) {
    if let Err(e) = reload(state) {
        log::error!("Failed to reload: {e}");
        state.status_message = Some(format!("Error: {e}"));
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open housing data")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_reporting(&path);
    }
}
