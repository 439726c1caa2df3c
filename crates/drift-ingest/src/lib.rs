//! Snapshot ingestion for drift analytics.
//!
//! This crate turns files on disk into [`drift_model::Dataset`] values and
//! back:
//!
//! - **Snapshot loading**: read a prepared CSV or Parquet snapshot with Polars
//! - **Preparation**: validate a raw CSV, stamp `patient_id` and
//!   `event_timestamp`, and write Parquet
//! - **Raw tables**: read a CSV as strings for inspection, with column hints
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use drift_ingest::load_snapshot;
//! use drift_model::AnalyticsOptions;
//!
//! let dataset = load_snapshot(Path::new("data/processed/patient_features.parquet"), &AnalyticsOptions::default())?;
//! ```

mod error;
mod frame;
mod prepare;
mod raw_table;
mod snapshot;

// === Error Types ===
pub use error::{IngestError, Result};

// === Frame Conversion ===
pub use frame::{dataset_from_frame, float_values, string_values};

// === Snapshot Loading ===
pub use snapshot::{SnapshotFormat, load_snapshot, read_frame};

// === Preparation ===
pub use prepare::{EnrichmentMode, PrepareConfig, PrepareSummary, prepare_snapshot, validate_raw};

// === Raw Tables ===
pub use raw_table::{ColumnHint, RawTable, build_column_hints, read_raw_table};
