use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::events::ViewSnapshot;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel: summary, map and histogram
// ---------------------------------------------------------------------------

/// Render the summary line, the map and the value histogram.
pub fn central(ui: &mut Ui, state: &AppState) {
    let Some(snap) = state.snapshot() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a housing file to explore it  (File → Open…)");
        });
        return;
    };

    ui.heading(format!(
        "Showing {} houses based on selected filters",
        snap.row_count
    ));

    let map_height = ui.available_height() * 0.55;
    map_plot(ui, state, snap, map_height);

    ui.add_space(6.0);
    ui.heading(format!(
        "Median House Value Distribution ({} bins)",
        snap.histogram.bins().len()
    ));
    histogram_plot(ui, snap);
}

/// Scatter of the visible houses, x = longitude, y = latitude, one series per region.
fn map_plot(ui: &mut Ui, state: &AppState, snap: &ViewSnapshot, height: f32) {
    let mut by_region: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for ((lat, lon), region) in snap.points.iter().zip(&snap.point_regions) {
        by_region.entry(region.as_str()).or_default().push([*lon, *lat]);
    }

    Plot::new("housing_map")
        .height(height)
        .legend(Legend::default())
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (region, coords) in by_region {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(region))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let points: PlotPoints = coords.into_iter().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(region)
                        .color(color)
                        .radius(state.settings.point_radius),
                );
            }
        });
}

/// Bar chart of the fixed-width house value bins.
fn histogram_plot(ui: &mut Ui, snap: &ViewSnapshot) {
    let bars: Vec<Bar> = snap
        .histogram
        .bins()
        .iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(snap.histogram.bin_width())
                .name(format!("{:.0}–{:.0}", bin.lo, bin.hi))
        })
        .collect();

    let (lo, hi) = snap.histogram.range();
    Plot::new("value_histogram")
        .include_x(lo)
        .include_x(hi)
        .include_y(0.0)
        .x_axis_label("Median House Value")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(Color32::from_rgb(70, 130, 180))
                    .name("houses"),
            );
        });
}
