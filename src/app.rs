use eframe::egui;

use crate::state::AppState;
use crate::ui::panels::{self, RangeInputs};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DashboardApp {
    pub state: AppState,
    pub range: RangeInputs,
}

impl DashboardApp {
    /// Start with an already-loaded state (see `main`).
    pub fn new(state: AppState) -> Self {
        let mut range = RangeInputs::default();
        range.reset(&state);
        Self { state, range }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &mut self.range);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &mut self.range);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::events_chart(ui, &self.state);
        });
    }
}
