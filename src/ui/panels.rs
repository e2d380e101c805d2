use std::path::Path;

use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::{AxisPolicy, date_bounds};
use crate::data::model::DateRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Date range inputs
// ---------------------------------------------------------------------------

/// Widget-side buffer for the two date pickers. The pickers always hold a
/// date; the interval only reaches [`AppState`] while `enabled` is set.
pub struct RangeInputs {
    pub enabled: bool,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for RangeInputs {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            enabled: false,
            start: today,
            end: today,
        }
    }
}

impl RangeInputs {
    /// Seed both pickers with the dataset's first and last dates.
    pub fn reset(&mut self, state: &AppState) {
        self.enabled = false;
        if let Some(bounds) = state.dataset.as_ref().and_then(date_bounds) {
            self.start = bounds.start;
            self.end = bounds.end;
        }
    }

    /// The end picker may not precede the start picker.
    fn clamp(&mut self) {
        if self.end < self.start {
            self.end = self.start;
        }
    }

    fn interval(&self) -> Option<DateRange> {
        self.enabled.then(|| DateRange::new(self.start, self.end))
    }
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, range: &mut RangeInputs) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- App selector ----
            ui.strong("App");
            let current = state.filter.category.clone();
            let mut picked: Option<Option<String>> = None;
            egui::ComboBox::from_id_salt("app_filter")
                .selected_text(current.as_deref().unwrap_or("(all apps)"))
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    if ui.selectable_label(current.is_none(), "(all apps)").clicked() {
                        picked = Some(None);
                    }
                    for app in &state.categories {
                        if ui
                            .selectable_label(current.as_deref() == Some(app), app)
                            .clicked()
                        {
                            picked = Some(Some(app.clone()));
                        }
                    }
                });
            if let Some(category) = picked {
                if category != current {
                    log::debug!("category filter -> {category:?}");
                    state.set_category(category);
                }
            }
            ui.separator();

            // ---- Date range ----
            let mut changed = ui.checkbox(&mut range.enabled, "Limit date range").changed();
            ui.add_enabled_ui(range.enabled, |ui: &mut Ui| {
                egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
                    ui.label("From");
                    changed |= ui
                        .add(DatePickerButton::new(&mut range.start).id_salt("range_start"))
                        .changed();
                    ui.end_row();

                    ui.label("To");
                    changed |= ui
                        .add(DatePickerButton::new(&mut range.end).id_salt("range_end"))
                        .changed();
                    ui.end_row();
                });
            });
            if changed {
                range.clamp();
                let interval = range.interval();
                log::debug!("date filter -> {interval:?}");
                state.set_interval(interval);
            }
            ui.separator();

            // ---- Axis policy ----
            let mut matched_only = state.filter.axis == AxisPolicy::MatchedDatesOnly;
            if ui
                .checkbox(&mut matched_only, "Hide dates without events")
                .on_hover_text("Only show dates where the selected app has events")
                .changed()
            {
                state.set_axis_policy(if matched_only {
                    AxisPolicy::MatchedDatesOnly
                } else {
                    AxisPolicy::AllCandidateDates
                });
            }
            ui.separator();

            if ui.button("Clear filters").clicked() {
                range.enabled = false;
                state.clear_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, range: &mut RangeInputs) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state, range);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.series.is_empty(), egui::Button::new("Export series…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{}: {} events, {} shown on {} dates",
                state.source.as_deref().unwrap_or("dataset"),
                ds.len(),
                state.visible_total(),
                state.series.len()
            ))
            .on_hover_text(format!("Columns: {}", ds.column_names.join(", ")));
            if ds.malformed_dates > 0 {
                ui.separator();
                ui.label(
                    RichText::new(format!("{} rows with invalid dates", ds.malformed_dates))
                        .color(Color32::YELLOW),
                )
                .on_hover_text("Dates must be DD/MM/YYYY; these rows never match a date range");
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Load `path` into `state`. On failure the previous dataset stays and the
/// error goes to the status line.
pub fn load_into(state: &mut AppState, range: &mut RangeInputs, path: &Path) {
    match crate::data::loader::load_file(path) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} events with columns {:?}",
                dataset.len(),
                dataset.column_names
            );
            state.set_dataset(dataset, path.display().to_string());
            range.reset(state);
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn open_file_dialog(state: &mut AppState, range: &mut RangeInputs) {
    let file = rfd::FileDialog::new()
        .set_title("Open event data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        load_into(state, range, &path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart series")
        .add_filter("JSON", &["json"])
        .set_file_name("series.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = crate::data::export::save_series(&path, &state.series) {
            log::error!("Failed to export series: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
