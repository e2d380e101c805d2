use std::collections::BTreeSet;

use super::model::{DateKey, DateRange, Dataset, Record};

// ---------------------------------------------------------------------------
// Filter predicate: category + date interval
// ---------------------------------------------------------------------------

/// How the chart's date axis reacts to the category filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AxisPolicy {
    /// Every dataset date inside the interval, whether or not the selected
    /// app has events on it. Unmatched dates get a zero bar.
    #[default]
    AllCandidateDates,
    /// Only dates where the selected app has at least one event.
    MatchedDatesOnly,
}

/// User-selected narrowing of the dataset. `None` fields mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub category: Option<String>,
    pub interval: Option<DateRange>,
    pub axis: AxisPolicy,
}

impl Filter {
    pub fn category(mut self, app: impl Into<String>) -> Self {
        self.category = Some(app.into());
        self
    }

    pub fn interval(mut self, range: DateRange) -> Self {
        self.interval = Some(range);
        self
    }

    pub fn axis(mut self, axis: AxisPolicy) -> Self {
        self.axis = axis;
        self
    }

    /// Exact match on `App`; passes everything when no category is set.
    pub fn matches_category(&self, record: &Record) -> bool {
        self.category.as_deref().is_none_or(|c| record.app == c)
    }

    /// Interval membership; passes everything when no interval is set.
    /// Malformed dates never fall inside an interval.
    pub fn matches_date(&self, key: &DateKey) -> bool {
        self.interval.as_ref().is_none_or(|r| r.contains_key(key))
    }
}

// ---------------------------------------------------------------------------
// Column extraction helpers
// ---------------------------------------------------------------------------

/// Distinct `App` values, sorted alphabetically for the selector.
pub fn categories(dataset: &Dataset) -> Vec<String> {
    dataset
        .records
        .iter()
        .map(|r| r.app.as_str())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Distinct date keys, ascending by calendar date.
pub fn distinct_dates(dataset: &Dataset) -> BTreeSet<DateKey> {
    dataset.records.iter().map(|r| r.date.clone()).collect()
}

/// The chart's date axis before any category filtering: all distinct dates,
/// narrowed to the filter's interval when one is set.
pub fn candidate_dates(dataset: &Dataset, filter: &Filter) -> BTreeSet<DateKey> {
    if let Some(range) = filter.interval.filter(DateRange::is_inverted) {
        log::debug!("interval {} > {} contains no dates", range.start, range.end);
    }
    let mut dates = distinct_dates(dataset);
    dates.retain(|d| filter.matches_date(d));
    dates
}

/// Earliest and latest valid dates, used to seed the date pickers.
pub fn date_bounds(dataset: &Dataset) -> Option<DateRange> {
    let mut days = dataset.records.iter().filter_map(|r| r.date.day());
    let first = days.next()?;
    let (start, end) = days.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateRange::new(start, end))
}
