use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{DateKey, Dataset, Record};

/// Header of the date column.
pub const DATE_COLUMN: &str = "Date";
/// Header of the category column.
pub const APP_COLUMN: &str = "App";

/// Failure to turn source text into a [`Dataset`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("record {0} has more than one '{1}' key")]
    DuplicateColumn(usize, &'static str),
    #[error("expected a top-level JSON array of records")]
    NotAnArray,
    #[error("record {0} is not a JSON object")]
    NotAnObject(usize),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with at least `Date` and `App`
/// * `.json` – `[{ "Date": "01/02/2023", "App": "A", ...other }, ...]`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_csv_reader(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse_json_str(&text)
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    dataset.with_context(|| format!("decoding {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV decoder
// ---------------------------------------------------------------------------

/// Decode CSV text. See [`parse_csv_reader`].
pub fn parse_csv_str(text: &str) -> Result<Dataset, DecodeError> {
    parse_csv_reader(text.as_bytes())
}

/// CSV layout: header row with column names; `Date` and `App` are required,
/// matched ignoring case and surrounding whitespace. Other columns are only
/// listed in [`Dataset::column_names`]. Blank lines are skipped and short rows
/// read missing cells as empty.
pub fn parse_csv_reader<R: Read>(source: R) -> Result<Dataset, DecodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let date_idx = find_column(&headers, DATE_COLUMN)?;
    let app_idx = find_column(&headers, APP_COLUMN)?;

    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;

        let (date, parse_err) = DateKey::from_cell(row.get(date_idx).unwrap_or(""));
        if let Some(e) = parse_err {
            log::debug!("CSV line {}: {e}", source_line(&row));
        }

        records.push(Record {
            date,
            app: row.get(app_idx).unwrap_or("").to_string(),
        });
    }

    Ok(finish(records, headers))
}

/// 1-based line of `row` in the source text.
fn source_line(row: &csv::StringRecord) -> u64 {
    row.position().map_or(0, |p| p.line())
}

fn find_column(headers: &[String], name: &'static str) -> Result<usize, DecodeError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or(DecodeError::MissingColumn(name))
}

// ---------------------------------------------------------------------------
// JSON decoder
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "Date": "01/02/2023", "App": "Chess", "User": "u17" },
///   ...
/// ]
/// ```
///
/// `Date` and `App` keys match ignoring case; a record carrying either twice
/// (e.g. `"Date"` and `"date"`) is rejected. Non-string values are read as
/// their JSON text.
pub fn parse_json_str(text: &str) -> Result<Dataset, DecodeError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root.as_array().ok_or(DecodeError::NotAnArray)?;

    let mut column_names: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or(DecodeError::NotAnObject(i))?;

        for key in obj.keys() {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
        }

        let date_cell = required_field(obj, i, DATE_COLUMN)?;
        let app = required_field(obj, i, APP_COLUMN)?;

        let (date, parse_err) = DateKey::from_cell(&date_cell);
        if let Some(e) = parse_err {
            log::debug!("JSON record {i}: {e}");
        }

        records.push(Record { date, app });
    }

    Ok(finish(records, column_names))
}

fn required_field(
    obj: &serde_json::Map<String, JsonValue>,
    record: usize,
    name: &'static str,
) -> Result<String, DecodeError> {
    let mut found = obj
        .iter()
        .filter(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, val)| val);
    let val = found.next().ok_or(DecodeError::MissingColumn(name))?;
    if found.next().is_some() {
        return Err(DecodeError::DuplicateColumn(record, name));
    }
    Ok(json_to_text(val))
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn finish(records: Vec<Record>, column_names: Vec<String>) -> Dataset {
    let dataset = Dataset::from_records(records, column_names);
    if dataset.malformed_dates > 0 {
        log::warn!(
            "{} of {} rows have a date that is not DD/MM/YYYY",
            dataset.malformed_dates,
            dataset.len()
        );
    }
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_required_and_extra_columns() {
        let text = "Date,App,User\n01/02/2023,A,u1\n02/02/2023,B,u2\n";
        let ds = parse_csv_str(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names, vec!["Date", "App", "User"]);
        assert_eq!(ds.records[1].app, "B");
        assert_eq!(ds.records[1].date, DateKey::from_cell("02/02/2023").0);
        assert_eq!(ds.malformed_dates, 0);
    }

    #[test]
    fn header_match_ignores_case_and_order() {
        let text = "user, app ,DATE\nu1,A,01/02/2023\n";
        let ds = parse_csv_str(text).unwrap();
        assert_eq!(ds.records[0].app, "A");
        assert!(ds.records[0].has_valid_date());
    }

    #[test]
    fn missing_header_is_a_decode_error() {
        let err = parse_csv_str("Date,User\n01/02/2023,u1\n").unwrap_err();
        assert!(matches!(err, DecodeError::MissingColumn("App")));
    }

    #[test]
    fn blank_lines_and_short_rows_are_tolerated() {
        let text = "Date,App,User\n01/02/2023,A,u1\n\n02/02/2023,B\n03/02/2023\n";
        let ds = parse_csv_str(text).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[1].app, "B");
        assert_eq!(ds.records[2].app, "");
    }

    #[test]
    fn malformed_dates_are_kept_and_counted() {
        let text = "Date,App\n2023-02-01,A\n01/02/2023,A\n";
        let ds = parse_csv_str(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.malformed_dates, 1);
        assert_eq!(ds.records[0].date, DateKey::Malformed("2023-02-01".into()));
    }

    #[test]
    fn date_like_cells_with_wrong_widths_are_malformed() {
        let text = "Date,App\n01/02/23,A\n1/2/2023,A\n01/02/+2023,B\n01/02/2023,B\n";
        let ds = parse_csv_str(text).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.malformed_dates, 3);
        assert_eq!(ds.records[0].date, DateKey::Malformed("01/02/23".into()));
        assert!(ds.records[3].has_valid_date());
    }

    #[test]
    fn empty_body_gives_empty_dataset() {
        let ds = parse_csv_str("Date,App\n").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn decodes_json_records() {
        let text = r#"[
            {"Date": "01/02/2023", "App": "A", "Duration": 12},
            {"Date": "02/02/2023", "App": "B", "Duration": null}
        ]"#;
        let ds = parse_json_str(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].app, "B");
        assert!(ds.column_names.iter().any(|c| c == "Duration"));
        assert_eq!(ds.malformed_dates, 0);
    }

    #[test]
    fn log_lines_point_at_the_source_line() {
        let text = "Date,App\n01/02/2023,A\n\nbad,B\n";
        let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
        let lines: Vec<u64> = reader
            .records()
            .map(|r| source_line(&r.unwrap()))
            .collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn json_date_key_given_twice_is_rejected() {
        let text = r#"[{"Date": "01/02/2023", "date": "02/02/2023", "App": "A"}]"#;
        assert!(matches!(
            parse_json_str(text),
            Err(DecodeError::DuplicateColumn(0, "Date"))
        ));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(matches!(parse_json_str("{}"), Err(DecodeError::NotAnArray)));
        assert!(matches!(parse_json_str("[1]"), Err(DecodeError::NotAnObject(0))));
        assert!(matches!(
            parse_json_str(r#"[{"Date": "01/02/2023"}]"#),
            Err(DecodeError::MissingColumn("App"))
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("events.parquet")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
