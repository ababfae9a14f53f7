use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HousingExplorerApp {
    pub state: AppState,
}

impl HousingExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for HousingExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        let mut events = Vec::new();
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state, &mut events);
            });

        // Widgets only read state; the frame's interactions are applied here.
        let changed = !events.is_empty();
        for event in events {
            self.state.handle(event);
        }

        // ---- Central panel: map and histogram ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::central(ui, &self.state);
        });

        if changed {
            ctx.request_repaint();
        }
    }
}
