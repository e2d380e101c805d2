mod app;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::DashboardApp;
use data::model::Dataset;
use eframe::egui;
use state::AppState;

/// Dataset shown when no path is given on the command line.
const BUNDLED_DATA: &str = include_str!("../assets/data.csv");

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = AppState::default();
    match startup_dataset() {
        Ok((dataset, source)) => {
            log::info!("Loaded {} events from {source}", dataset.len());
            state.set_dataset(dataset, source);
        }
        Err(e) => {
            log::error!("Failed to load startup dataset: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 720.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "App Events Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
}

/// First command-line argument if present, otherwise the bundled CSV.
fn startup_dataset() -> Result<(Dataset, String)> {
    match std::env::args_os().nth(1) {
        Some(arg) => {
            let path = PathBuf::from(arg);
            let dataset = data::loader::load_file(&path)?;
            Ok((dataset, path.display().to_string()))
        }
        None => {
            let dataset =
                data::loader::parse_csv_str(BUNDLED_DATA).context("decoding bundled dataset")?;
            Ok((dataset, "bundled data.csv".to_string()))
        }
    }
}
