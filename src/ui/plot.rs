use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::state::AppState;

/// Bar fill, `#cad9f3`.
const BAR_COLOR: Color32 = Color32::from_rgb(0xca, 0xd9, 0xf3);
const BAR_WIDTH: f64 = 0.7;

// ---------------------------------------------------------------------------
// Events-per-date bar chart (central panel)
// ---------------------------------------------------------------------------

/// Render the bar chart in the central panel.
pub fn events_chart(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to chart events  (File → Open…)");
            });
            return;
        }
    };
    if dataset.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("The loaded file has no event rows");
        });
        return;
    }
    if state.series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No events match the current filters");
        });
        return;
    }

    let bars: Vec<Bar> = state
        .series
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Bar::new(i as f64, p.count as f64)
                .name(&p.label)
                .width(BAR_WIDTH)
        })
        .collect();

    let labels: Vec<String> = state.series.iter().map(|p| p.label.clone()).collect();

    Plot::new("events_chart")
        .y_axis_label("Events")
        .show_grid([false, true])
        .include_y(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .x_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(BAR_COLOR)
                    .name("Events")
                    .element_formatter(Box::new(|bar, _chart| {
                        format!("{}\n{} events", bar.name, bar.value)
                    })),
            );
        });
}

/// Date label for an x-axis grid mark; only whole indices carry a label.
fn axis_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}
