//! Shared-axis histograms and rolling-mean trends.

use drift_model::{AnalyticsOptions, HistogramComparison, Record, TimeSeriesTrend, finite, format_minute, round_to};

use crate::binning::EqualWidthBins;

/// Bin both partitions against an axis spanning every value in `all`.
///
/// Returns `None` when `all` is empty. An empty partition yields all-zero
/// counts.
pub fn histogram(all: &[f64], reference: &[f64], comparison: &[f64], bins: usize) -> Option<HistogramComparison> {
    let bins = EqualWidthBins::spanning(all, bins)?;
    Some(HistogramComparison {
        labels: bins
            .midpoints()
            .into_iter()
            .map(|midpoint| round_to(midpoint, 2))
            .collect(),
        reference: bins.counts(reference),
        comparison: bins.counts(comparison),
    })
}

/// Trailing moving average that starts emitting from the first value.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut sum = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            sum += value;
            if index >= window {
                sum -= values[index - window];
            }
            sum / (index + 1).min(window) as f64
        })
        .collect()
}

/// Rolling mean of one feature ordered by timestamp.
///
/// Requires `options.min_trend_values` non-missing values among `records`
/// and at least one value with a timestamp. The window grows with the
/// number of timestamped values and the output is thinned to roughly
/// `options.max_trend_points` points.
pub fn trend(
    records: &[&Record],
    column: usize,
    split_label: &str,
    options: &AnalyticsOptions,
) -> Option<TimeSeriesTrend> {
    let valid = records.iter().filter(|record| record.value(column).is_some()).count();
    if valid < options.min_trend_values {
        return None;
    }

    let mut pairs: Vec<_> = records
        .iter()
        .filter_map(|record| Some((record.timestamp?, record.value(column)?)))
        .collect();
    if pairs.is_empty() {
        return None;
    }
    pairs.sort_by_key(|(timestamp, _)| *timestamp);

    let n = pairs.len();
    let window = options.min_trend_window.max(n / 20);
    let step = (n / options.max_trend_points.max(1)).max(1);
    let values: Vec<f64> = pairs.iter().map(|(_, value)| *value).collect();
    let rolling = rolling_mean(&values, window);

    let (dates, values): (Vec<String>, Vec<Option<f64>>) = pairs
        .iter()
        .zip(rolling)
        .step_by(step)
        .map(|((timestamp, _), mean)| (format_minute(timestamp), finite(round_to(mean, 3))))
        .unzip();

    Some(TimeSeriesTrend {
        dates,
        values,
        window,
        split_label: split_label.to_string(),
    })
}
