//! Configuration options for drift analytics.

use serde::{Deserialize, Serialize};

/// Feature columns analyzed when no explicit list is configured.
pub const DEFAULT_FEATURE_COLUMNS: [&str; 9] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
    "Outcome",
];

/// Options controlling snapshot interpretation and analytics thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsOptions {
    /// Numeric feature columns, in report order.
    pub feature_columns: Vec<String>,

    /// Integer label column used by the category filter.
    pub label_column: String,

    /// Timestamp column used for partitioning and trends.
    pub timestamp_column: String,

    /// Number of equal-width bins for the histogram comparison.
    pub histogram_bins: usize,

    /// Number of equal-width bins for the Population Stability Index.
    pub psi_bins: usize,

    /// Minimum valid values per partition before drift tests run.
    pub min_drift_samples: usize,

    /// KS p-value below which a feature is flagged as drifted.
    pub significance_level: f64,

    /// Minimum valid values across the dataset before a trend is built.
    pub min_trend_values: usize,

    /// Lower bound for the rolling-mean window.
    pub min_trend_window: usize,

    /// Upper bound on the number of points in a downsampled trend.
    pub max_trend_points: usize,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            feature_columns: DEFAULT_FEATURE_COLUMNS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            label_column: "Outcome".to_string(),
            timestamp_column: "event_timestamp".to_string(),
            histogram_bins: 20,
            psi_bins: 10,
            min_drift_samples: 5,
            significance_level: 0.05,
            min_trend_values: 20,
            min_trend_window: 10,
            max_trend_points: 100,
        }
    }
}

impl AnalyticsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feature_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label_column(mut self, column: impl Into<String>) -> Self {
        self.label_column = column.into();
        self
    }

    pub fn with_timestamp_column(mut self, column: impl Into<String>) -> Self {
        self.timestamp_column = column.into();
        self
    }

    pub fn with_significance_level(mut self, level: f64) -> Self {
        self.significance_level = level;
        self
    }

    pub fn with_min_drift_samples(mut self, samples: usize) -> Self {
        self.min_drift_samples = samples;
        self
    }
}

/// Request parameters passed through unchanged from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    /// Category filter, matched as an integer against the label column.
    pub category: Option<String>,

    /// Cutoff date (ISO 8601); records up to the end of that day are the reference.
    pub cutoff: Option<String>,
}

impl AnalyticsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_cutoff(mut self, cutoff: impl Into<String>) -> Self {
        self.cutoff = Some(cutoff.into());
        self
    }

    /// Cutoff string with surrounding whitespace removed, `None` when blank.
    pub fn cutoff(&self) -> Option<&str> {
        self.cutoff
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}
