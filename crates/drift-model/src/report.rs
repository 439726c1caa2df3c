//! Analytics result types.
//!
//! All floats are `Option<f64>` wherever a degenerate input can produce
//! NaN or Infinity; constructors in the engine normalize through
//! [`crate::finite`] so the serialized form never carries invalid JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Descriptive statistics for one feature over one partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator), 0.0 for one value.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sum: Option<f64>,
    pub median: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub iqr: Option<f64>,
    /// Lower Tukey fence clipped to the observed minimum.
    pub whisker_lo: Option<f64>,
    /// Upper Tukey fence clipped to the observed maximum.
    pub whisker_hi: Option<f64>,
    /// Bias-corrected skewness, only for more than two values.
    pub skew: Option<f64>,
    /// Bias-corrected excess kurtosis, only for more than three values.
    pub kurtosis: Option<f64>,
    /// Standardized mean shift against the reference partition.
    pub z_mean: f64,
}

/// Two-sample drift test outcome for one feature.
///
/// The default value is the gated result: every statistic absent and
/// `drifted == false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftResult {
    pub ks_statistic: Option<f64>,
    pub ks_pvalue: Option<f64>,
    pub psi: Option<f64>,
    pub drifted: bool,
}

/// Reference and comparison counts over a shared set of bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramComparison {
    /// Bin midpoints rounded to two decimals.
    pub labels: Vec<f64>,
    pub reference: Vec<u64>,
    pub comparison: Vec<u64>,
}

/// Downsampled rolling mean ordered by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesTrend {
    /// Timestamps formatted as `YYYY-MM-DD HH:MM`.
    pub dates: Vec<String>,
    pub values: Vec<Option<f64>>,
    pub window: usize,
    pub split_label: String,
}

/// Everything computed for one feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAnalytics {
    pub overall: Option<ColumnStatistics>,
    pub reference: Option<ColumnStatistics>,
    pub comparison: Option<ColumnStatistics>,
    pub drift: DriftResult,
    pub histogram: Option<HistogramComparison>,
    pub timeseries: Option<TimeSeriesTrend>,
}

/// Timestamp coverage of the analyzed records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: Option<String>,
    pub max: Option<String>,
    pub unique_dates: Vec<String>,
}

/// Complete analytics response for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub total_rows: usize,
    pub reference_count: usize,
    pub comparison_count: usize,
    pub split_label: String,
    /// Name of the partition strategy that produced the split.
    pub split_strategy: String,
    pub has_dates: bool,
    pub date_range: DateRange,
    pub features: BTreeMap<String, FeatureAnalytics>,
}

impl AnalyticsReport {
    /// Names of features whose drift test flagged a shift.
    pub fn drifted_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .filter(|(_, analytics)| analytics.drift.drifted)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
