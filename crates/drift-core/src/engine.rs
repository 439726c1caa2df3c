//! End-to-end analytics over one dataset snapshot.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::NaiveDate;
use drift_model::{
    AnalyticsOptions, AnalyticsReport, AnalyticsRequest, Dataset, DateRange, FeatureAnalytics,
    Record, Result, format_date, format_iso,
};
use tracing::{debug, info, info_span};

use crate::drift::detect_drift;
use crate::partition::{Partitions, column_values, partition};
use crate::stats::{apply_mean_shift, column_statistics};
use crate::summarize::{histogram, trend};

/// Run the full analytics pipeline for one request.
///
/// Only an unparseable cutoff fails the whole request. Every per-feature
/// degeneracy resolves to absent fields inside the report. Feature columns
/// listed in `options` but absent from the dataset are skipped.
pub fn analyze(
    dataset: &Dataset,
    request: &AnalyticsRequest,
    options: &AnalyticsOptions,
) -> Result<AnalyticsReport> {
    let span = info_span!(
        "analyze",
        total_rows = dataset.len(),
        category = request.category.as_deref().unwrap_or("all"),
        cutoff = request.cutoff().unwrap_or("")
    );
    let _guard = span.enter();
    let start = Instant::now();

    let (records, partitions) = partition(dataset, request.category.as_deref(), request.cutoff())?;
    debug!(
        strategy = partitions.strategy,
        split_label = %partitions.split_label,
        reference = partitions.reference.len(),
        comparison = partitions.comparison.len(),
        "partitioned records"
    );

    let mut features = BTreeMap::new();
    for name in &options.feature_columns {
        let Some(column) = dataset.column_index(name) else {
            debug!(column = %name, "feature column not in dataset, skipping");
            continue;
        };
        let analytics = analyze_feature(&records, &partitions, column, options);
        features.insert(name.clone(), analytics);
    }

    let report = AnalyticsReport {
        total_rows: records.len(),
        reference_count: partitions.reference.len(),
        comparison_count: partitions.comparison.len(),
        split_label: partitions.split_label.clone(),
        split_strategy: partitions.strategy.to_string(),
        has_dates: records.iter().any(|record| record.timestamp.is_some()),
        date_range: date_range(&records),
        features,
    };

    info!(
        total_rows = report.total_rows,
        features = report.features.len(),
        drifted = report.drifted_features().len(),
        duration_ms = start.elapsed().as_millis(),
        "analytics complete"
    );
    Ok(report)
}

fn analyze_feature(
    records: &[&Record],
    partitions: &Partitions<'_>,
    column: usize,
    options: &AnalyticsOptions,
) -> FeatureAnalytics {
    let all = column_values(records, column);
    let reference = partitions.reference.values(column);
    let comparison = partitions.comparison.values(column);

    let reference_stats = column_statistics(&reference);
    let mut comparison_stats = column_statistics(&comparison);
    if let (Some(reference_stats), Some(comparison_stats)) =
        (reference_stats.as_ref(), comparison_stats.as_mut())
    {
        apply_mean_shift(comparison_stats, reference_stats);
    }

    FeatureAnalytics {
        overall: column_statistics(&all),
        reference: reference_stats,
        comparison: comparison_stats,
        drift: detect_drift(&reference, &comparison, options),
        histogram: histogram(&all, &reference, &comparison, options.histogram_bins),
        timeseries: trend(records, column, &partitions.split_label, options),
    }
}

fn date_range(records: &[&Record]) -> DateRange {
    let timestamps = records.iter().filter_map(|record| record.timestamp);
    let min = timestamps.clone().min();
    let max = timestamps.clone().max();
    let dates: BTreeSet<NaiveDate> = timestamps.map(|timestamp| timestamp.date()).collect();
    DateRange {
        min: min.as_ref().map(format_iso),
        max: max.as_ref().map(format_iso),
        unique_dates: dates.iter().map(format_date).collect(),
    }
}
