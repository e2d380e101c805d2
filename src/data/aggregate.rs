use std::collections::HashMap;

use super::filter::{AxisPolicy, Filter, candidate_dates};
use super::model::{DateKey, Dataset, SeriesPoint};

/// Count events per date for the bar chart.
///
/// The date axis is computed from the whole dataset (narrowed by the
/// interval) before the category filter applies, so under
/// [`AxisPolicy::AllCandidateDates`] a date with no matching event yields a
/// zero point. [`AxisPolicy::MatchedDatesOnly`] drops those points.
///
/// Output is ascending by calendar date; malformed dates come last and never
/// survive an interval.
pub fn aggregate(dataset: &Dataset, filter: &Filter) -> Vec<SeriesPoint> {
    let axis = candidate_dates(dataset, filter);

    let mut counts: HashMap<&DateKey, usize> = HashMap::new();
    for record in dataset.records.iter().filter(|r| filter.matches_category(r)) {
        *counts.entry(&record.date).or_default() += 1;
    }

    let series: Vec<SeriesPoint> = axis
        .into_iter()
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            SeriesPoint::new(date, count)
        })
        .filter(|p| filter.axis == AxisPolicy::AllCandidateDates || p.count > 0)
        .collect();

    log::debug!(
        "aggregated {} rows into {} points (category={:?}, interval={:?})",
        dataset.len(),
        series.len(),
        filter.category,
        filter.interval
    );
    series
}
