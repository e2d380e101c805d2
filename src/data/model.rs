use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// On-disk date format of the `Date` column.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// A date cell that is not `DD/MM/YYYY`.
#[derive(Debug, Clone, Error)]
pub enum DateParseError {
    #[error("'{0}' is not shaped DD/MM/YYYY")]
    Shape(String),
    #[error("'{input}' is not a calendar date: {source}")]
    Calendar {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Parse a `DD/MM/YYYY` cell into a calendar date.
///
/// The cell must be exactly two-digit day, two-digit month and four-digit
/// year; chrono alone would also take `1/2/2023` or `01/02/23`.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let cell = input.trim();
    if !has_date_shape(cell) {
        return Err(DateParseError::Shape(input.to_string()));
    }
    NaiveDate::parse_from_str(cell, DATE_FORMAT).map_err(|source| DateParseError::Calendar {
        input: input.to_string(),
        source,
    })
}

fn has_date_shape(cell: &str) -> bool {
    let bytes = cell.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'/',
            _ => b.is_ascii_digit(),
        })
}

/// Format a calendar date back into the dataset's `DD/MM/YYYY` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// DateKey – grouping key for a row's date
// ---------------------------------------------------------------------------

/// The bucket a row is counted under.
///
/// Parsed dates sort by calendar; malformed cells sort after every valid date,
/// by raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateKey {
    Day(NaiveDate),
    Malformed(String),
}

impl DateKey {
    /// Build the key for a raw `Date` cell.
    pub fn from_cell(cell: &str) -> (Self, Option<DateParseError>) {
        match parse_date(cell) {
            Ok(day) => (DateKey::Day(day), None),
            Err(e) => (DateKey::Malformed(cell.trim().to_string()), Some(e)),
        }
    }

    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            DateKey::Day(d) => Some(*d),
            DateKey::Malformed(_) => None,
        }
    }

    /// Chart label: canonical `DD/MM/YYYY` for valid dates, raw text otherwise.
    pub fn label(&self) -> String {
        match self {
            DateKey::Day(d) => format_date(*d),
            DateKey::Malformed(raw) => raw.clone(),
        }
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DateKey::Day(a), DateKey::Day(b)) => a.cmp(b),
            (DateKey::Day(_), DateKey::Malformed(_)) => Ordering::Less,
            (DateKey::Malformed(_), DateKey::Day(_)) => Ordering::Greater,
            (DateKey::Malformed(a), DateKey::Malformed(b)) => a.cmp(b),
        }
    }
}

// ---------------------------------------------------------------------------
// DateRange – inclusive calendar interval
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` interval. An interval with `start > end` contains
/// no date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Malformed keys never fall inside an interval.
    pub fn contains_key(&self, key: &DateKey) -> bool {
        key.day().is_some_and(|d| self.contains(d))
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single event row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Grouping key parsed from the `Date` cell.
    pub date: DateKey,
    /// `App` cell.
    pub app: String,
}

impl Record {
    pub fn has_valid_date(&self) -> bool {
        matches!(self.date, DateKey::Day(_))
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All records of one session, in source order. Never mutated after loading.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Column names in source order, including `Date` and `App`.
    pub column_names: Vec<String>,
    /// Rows whose `Date` cell failed to parse.
    pub malformed_dates: usize,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>, column_names: Vec<String>) -> Self {
        let malformed_dates = records.iter().filter(|r| !r.has_valid_date()).count();
        Dataset {
            records,
            column_names,
            malformed_dates,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SeriesPoint – one bar of the chart
// ---------------------------------------------------------------------------

/// One `(date, count)` pair, serialized as `{ "label": ..., "value": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    #[serde(skip)]
    pub date: DateKey,
    pub label: String,
    #[serde(rename = "value")]
    pub count: usize,
}

impl SeriesPoint {
    pub fn new(date: DateKey, count: usize) -> Self {
        let label = date.label();
        Self { date, label, count }
    }
}

#[cfg(test)]
impl Record {
    /// Build a record from its `Date` and `App` cells.
    pub fn new(date_cell: &str, app: impl Into<String>) -> Self {
        Self {
            date: DateKey::from_cell(date_cell).0,
            app: app.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_day_first_dates() {
        assert_eq!(parse_date("01/02/2023").unwrap(), day(2023, 2, 1));
        assert_eq!(parse_date(" 31/12/2022 ").unwrap(), day(2022, 12, 31));
    }

    #[test]
    fn rejects_other_formats() {
        assert!(parse_date("2023-02-01").is_err());
        assert!(parse_date("31/02/2023").is_err());
        assert!(parse_date("").is_err());
        let err = parse_date("yesterday").unwrap_err();
        assert!(matches!(err, DateParseError::Shape(ref input) if input == "yesterday"));
    }

    #[test]
    fn rejects_loose_day_month_year_widths() {
        for cell in ["01/02/23", "1/2/2023", "01/02/+2023", "001/02/2023", "01-02-2023"] {
            let err = parse_date(cell).unwrap_err();
            assert!(matches!(err, DateParseError::Shape(_)), "{cell} -> {err}");
        }
        assert_eq!(DateKey::from_cell("01/02/23").0, DateKey::Malformed("01/02/23".into()));
    }

    #[test]
    fn impossible_day_is_a_calendar_error() {
        let err = parse_date("31/02/2023").unwrap_err();
        assert!(matches!(err, DateParseError::Calendar { ref input, .. } if input == "31/02/2023"));
    }

    #[test]
    fn date_keys_order_by_calendar_not_text() {
        let mut keys = vec![
            DateKey::from_cell("02/01/2024").0,
            DateKey::from_cell("not a date").0,
            DateKey::from_cell("10/12/2023").0,
            DateKey::from_cell("01/02/2023").0,
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(DateKey::label).collect();
        assert_eq!(
            labels,
            vec!["01/02/2023", "10/12/2023", "02/01/2024", "not a date"]
        );
    }

    #[test]
    fn range_is_inclusive_and_skips_malformed() {
        let range = DateRange::new(day(2023, 2, 1), day(2023, 2, 3));
        assert!(range.contains(day(2023, 2, 1)));
        assert!(range.contains(day(2023, 2, 3)));
        assert!(!range.contains(day(2023, 2, 4)));
        assert!(!range.contains_key(&DateKey::Malformed("x".into())));
        assert!(DateRange::new(day(2023, 2, 3), day(2023, 2, 1)).is_inverted());
    }

    #[test]
    fn dataset_counts_malformed_rows() {
        let ds = Dataset::from_records(
            vec![Record::new("01/02/2023", "A"), Record::new("bad", "A")],
            vec!["Date".into(), "App".into()],
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.malformed_dates, 1);
    }

    #[test]
    fn series_point_serializes_as_label_value() {
        let point = SeriesPoint::new(DateKey::Day(day(2023, 2, 1)), 2);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"label":"01/02/2023","value":2}"#);
    }
}
