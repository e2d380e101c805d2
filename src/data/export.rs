use std::path::Path;

use anyhow::{Context, Result};

use super::model::SeriesPoint;

/// Render the series as the `[{ "label": ..., "value": ... }, ...]` array a
/// chart front end consumes.
pub fn series_json(series: &[SeriesPoint]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(series)
}

/// Write the series to `path` as JSON.
pub fn save_series(path: &Path, series: &[SeriesPoint]) -> Result<()> {
    let text = series_json(series).context("serializing series")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} points to {}", series.len(), path.display());
    Ok(())
}
