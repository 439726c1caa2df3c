//! Data model types for feature drift analytics.
//!
//! This crate holds the value objects shared by the ingest, engine and CLI
//! crates:
//! - [`record`]: immutable snapshot records and the dataset that owns them
//! - [`report`]: per-feature statistics, drift, histogram and trend results
//! - [`options`]: analytics configuration and request parameters
//! - [`schema`]: feature value ranges used for record validation
//! - [`validation`]: per-cell schema violations
//! - [`timestamp`]: lenient timestamp parsing and output formatting
//! - [`numeric`]: JSON-safe float normalization

pub mod error;
pub mod numeric;
pub mod options;
pub mod record;
pub mod report;
pub mod schema;
pub mod timestamp;
pub mod validation;

pub use error::{DriftError, Result};
pub use numeric::{finite, round_to};
pub use options::{AnalyticsOptions, AnalyticsRequest, DEFAULT_FEATURE_COLUMNS};
pub use record::{Dataset, Record};
pub use report::{
    AnalyticsReport, ColumnStatistics, DateRange, DriftResult, FeatureAnalytics,
    HistogramComparison, TimeSeriesTrend,
};
pub use schema::{FeatureSchema, FeatureSpec};
pub use timestamp::{format_date, format_iso, format_minute, parse_timestamp};
pub use validation::{SchemaViolation, ValidationReport, ViolationKind};
