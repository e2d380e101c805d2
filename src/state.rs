use crate::data::aggregate::aggregate;
use crate::data::filter::{AxisPolicy, Filter, categories};
use crate::data::model::{DateRange, Dataset, SeriesPoint};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every mutator ends in [`AppState::recompute`], which replaces `series`
/// wholesale from `dataset` and `filter`.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// Where the dataset came from, for the top bar.
    pub source: Option<String>,

    /// Distinct apps for the category selector.
    pub categories: Vec<String>,

    /// Current category / interval selection.
    pub filter: Filter,

    /// Chart series derived from `dataset` and `filter`.
    pub series: Vec<SeriesPoint>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: Dataset, source: impl Into<String>) {
        self.categories = categories(&dataset);
        self.filter = Filter::default().axis(self.filter.axis);
        self.dataset = Some(dataset);
        self.source = Some(source.into());
        self.status_message = None;
        self.recompute();
    }

    /// `None` clears the category filter.
    pub fn set_category(&mut self, category: Option<String>) {
        self.filter.category = category;
        self.recompute();
    }

    /// `None` clears the date interval.
    pub fn set_interval(&mut self, interval: Option<DateRange>) {
        self.filter.interval = interval;
        self.recompute();
    }

    pub fn set_axis_policy(&mut self, axis: AxisPolicy) {
        self.filter.axis = axis;
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.filter.category = None;
        self.filter.interval = None;
        self.recompute();
    }

    /// Derive the chart series from the current dataset and filter.
    pub fn recompute(&mut self) {
        self.series = match &self.dataset {
            Some(ds) => aggregate(ds, &self.filter),
            None => Vec::new(),
        };
    }

    /// Events represented by the current series.
    pub fn visible_total(&self) -> usize {
        self.series.iter().map(|p| p.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::loader::parse_csv_str;

    fn loaded() -> AppState {
        let ds = parse_csv_str("Date,App\n01/02/2023,A\n01/02/2023,B\n02/02/2023,A\n").unwrap();
        let mut state = AppState::default();
        state.set_dataset(ds, "test.csv");
        state
    }

    #[test]
    fn no_dataset_means_no_series() {
        let mut state = AppState::default();
        state.set_category(Some("A".into()));
        assert!(state.series.is_empty());
        assert_eq!(state.visible_total(), 0);
    }

    #[test]
    fn loading_derives_categories_and_series() {
        let state = loaded();
        assert_eq!(state.categories, vec!["A", "B"]);
        assert_eq!(state.series.len(), 2);
        assert_eq!(state.visible_total(), 3);
        assert_eq!(state.source.as_deref(), Some("test.csv"));
    }

    #[test]
    fn each_mutator_replaces_the_series() {
        let mut state = loaded();

        state.set_category(Some("B".into()));
        assert_eq!(state.visible_total(), 1);

        let day = NaiveDate::from_ymd_opt(2023, 2, 2).unwrap();
        state.set_interval(Some(DateRange::new(day, day)));
        assert_eq!(state.series.len(), 1);
        assert_eq!(state.series[0].count, 0);

        state.set_axis_policy(AxisPolicy::MatchedDatesOnly);
        assert!(state.series.is_empty());

        state.clear_filters();
        assert_eq!(state.filter.axis, AxisPolicy::MatchedDatesOnly);
        assert_eq!(state.visible_total(), 3);
    }

    #[test]
    fn reloading_resets_filters() {
        let mut state = loaded();
        state.set_category(Some("A".into()));
        state.status_message = Some("Error: boom".into());

        let ds = parse_csv_str("Date,App\n05/05/2023,C\n").unwrap();
        state.set_dataset(ds, "other.csv");
        assert_eq!(state.filter.category, None);
        assert_eq!(state.categories, vec!["C"]);
        assert_eq!(state.visible_total(), 1);
        assert!(state.status_message.is_none());
    }
}
