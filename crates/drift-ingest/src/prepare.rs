//! Raw data preparation: validate, stamp, and write the Parquet snapshot.

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use drift_model::{AnalyticsOptions, FeatureSchema, ValidationReport, format_iso};
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::frame::{dataset_from_frame, has_column, string_values};
use crate::snapshot::{SnapshotFormat, read_frame};

/// Row identifier column added during preparation.
pub const PATIENT_ID_COLUMN: &str = "patient_id";

/// Violations listed in a validation failure message.
const VALIDATION_SUMMARY_LIMIT: usize = 10;

/// Inputs for one preparation run.
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    pub raw_path: PathBuf,
    pub output_path: PathBuf,
    /// Stamp applied to rows that have no earlier timestamp.
    pub timestamp: NaiveDateTime,
    pub schema: FeatureSchema,
    /// Name of the timestamp column to write.
    pub timestamp_column: String,
}

impl PrepareConfig {
    pub fn new(raw_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>, timestamp: NaiveDateTime) -> Self {
        Self {
            raw_path: raw_path.into(),
            output_path: output_path.into(),
            timestamp,
            schema: FeatureSchema::patient_default(),
            timestamp_column: AnalyticsOptions::default().timestamp_column,
        }
    }

    pub fn with_schema(mut self, schema: FeatureSchema) -> Self {
        self.schema = schema;
        self
    }
}

/// How event timestamps were assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentMode {
    /// No earlier output: every row stamped.
    FirstRun,
    /// Earlier rows keep their timestamps; appended rows are stamped.
    Incremental,
    /// Same row count: every timestamp preserved.
    Unchanged,
    /// The dataset shrank: every row re-stamped.
    Restamped,
}

impl fmt::Display for EnrichmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FirstRun => "first run",
            Self::Incremental => "incremental",
            Self::Unchanged => "unchanged",
            Self::Restamped => "re-stamped",
        };
        f.write_str(label)
    }
}

/// Result of a preparation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrepareSummary {
    pub mode: EnrichmentMode,
    pub rows: usize,
    /// Rows that kept a timestamp from the previous output.
    pub preserved: usize,
    /// Rows stamped with the run timestamp.
    pub stamped: usize,
    pub output_path: PathBuf,
}

/// Validate a raw CSV or Parquet file against a feature schema.
pub fn validate_raw(path: &Path, schema: &FeatureSchema) -> Result<ValidationReport> {
    let df = read_frame(path)?;
    let options = AnalyticsOptions::default().with_feature_columns(schema.names());
    let dataset = dataset_from_frame(&df, &options)?;
    Ok(schema.validate(&dataset))
}

/// Validate the raw data, add identifiers and timestamps, and write Parquet.
///
/// Timestamps from an existing output file are carried over so repeated runs
/// only stamp rows that are new since the last run.
pub fn prepare_snapshot(config: &PrepareConfig) -> Result<PrepareSummary> {
    let format = SnapshotFormat::from_path(&config.output_path)?;
    if format != SnapshotFormat::Parquet {
        return Err(IngestError::UnsupportedFormat {
            path: config.output_path.clone(),
            extension: format.extension().to_string(),
        });
    }

    let mut df = read_frame(&config.raw_path)?;
    let options = AnalyticsOptions::default().with_feature_columns(config.schema.names());
    let report = config.schema.validate(&dataset_from_frame(&df, &options)?);
    if !report.is_valid() {
        return Err(IngestError::Validation {
            failed: report.failed_records(),
            total: report.total_records,
            summary: report.summary(VALIDATION_SUMMARY_LIMIT),
        });
    }

    let existing = previous_timestamps(&config.output_path, &config.timestamp_column)?;
    let stamp = format_iso(&config.timestamp);
    let (mode, timestamps, preserved) = enrich_timestamps(existing, df.height(), &stamp);
    info!(
        mode = %mode,
        rows = df.height(),
        preserved,
        stamp = %stamp,
        "assigned event timestamps"
    );

    let ids: Vec<i64> = (0..df.height() as i64).collect();
    df.with_column(Column::new(PATIENT_ID_COLUMN.into(), ids))?;
    df.with_column(Column::new(config.timestamp_column.as_str().into(), timestamps))?;
    write_parquet(&mut df, &config.output_path)?;

    info!(
        path = %config.output_path.display(),
        rows = df.height(),
        "wrote snapshot"
    );
    Ok(PrepareSummary {
        mode,
        rows: df.height(),
        preserved,
        stamped: df.height() - preserved,
        output_path: config.output_path.clone(),
    })
}

/// Timestamps of a previous output, if one exists with a timestamp column.
fn previous_timestamps(path: &Path, column: &str) -> Result<Option<Vec<Option<String>>>> {
    if !path.exists() {
        return Ok(None);
    }
    let df = read_frame(path)?;
    if !has_column(&df, column) {
        tracing::warn!(path = %path.display(), column, "previous snapshot has no timestamp column");
        return Ok(None);
    }
    string_values(&df, column).map(Some)
}

/// Decide each row's timestamp given the previous run's timestamps.
///
/// Rows whose previous timestamp is missing are stamped as well.
fn enrich_timestamps(
    existing: Option<Vec<Option<String>>>,
    rows: usize,
    stamp: &str,
) -> (EnrichmentMode, Vec<String>, usize) {
    let Some(existing) = existing else {
        return (EnrichmentMode::FirstRun, vec![stamp.to_string(); rows], 0);
    };
    let mode = match rows.cmp(&existing.len()) {
        std::cmp::Ordering::Greater => EnrichmentMode::Incremental,
        std::cmp::Ordering::Equal => EnrichmentMode::Unchanged,
        std::cmp::Ordering::Less => {
            return (EnrichmentMode::Restamped, vec![stamp.to_string(); rows], 0);
        }
    };
    let mut preserved = 0;
    let timestamps = (0..rows)
        .map(|row| match existing.get(row).cloned().flatten() {
            Some(previous) => {
                preserved += 1;
                previous
            }
            None => stamp.to_string(),
        })
        .collect();
    (mode, timestamps, preserved)
}

fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| IngestError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut file = File::create(path).map_err(|source| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    ParquetWriter::new(&mut file).finish(df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAMP: &str = "2024-02-01T00:00:00";

    fn previous(values: &[Option<&str>]) -> Option<Vec<Option<String>>> {
        Some(values.iter().map(|value| value.map(str::to_string)).collect())
    }

    #[test]
    fn first_run_stamps_everything() {
        let (mode, timestamps, preserved) = enrich_timestamps(None, 3, STAMP);
        assert_eq!(mode, EnrichmentMode::FirstRun);
        assert_eq!(timestamps, vec![STAMP; 3]);
        assert_eq!(preserved, 0);
    }

    #[test]
    fn appended_rows_are_stamped() {
        let existing = previous(&[Some("2024-01-01T00:00:00"), Some("2024-01-01T00:00:00")]);
        let (mode, timestamps, preserved) = enrich_timestamps(existing, 3, STAMP);
        assert_eq!(mode, EnrichmentMode::Incremental);
        assert_eq!(timestamps, vec!["2024-01-01T00:00:00", "2024-01-01T00:00:00", STAMP]);
        assert_eq!(preserved, 2);
    }

    #[test]
    fn same_size_preserves_timestamps() {
        let existing = previous(&[Some("2024-01-01T00:00:00"), None]);
        let (mode, timestamps, preserved) = enrich_timestamps(existing, 2, STAMP);
        assert_eq!(mode, EnrichmentMode::Unchanged);
        assert_eq!(timestamps, vec!["2024-01-01T00:00:00", STAMP]);
        assert_eq!(preserved, 1);
    }

    #[test]
    fn shrunk_dataset_is_restamped() {
        let existing = previous(&[Some("a"), Some("b"), Some("c")]);
        let (mode, timestamps, preserved) = enrich_timestamps(existing, 2, STAMP);
        assert_eq!(mode, EnrichmentMode::Restamped);
        assert_eq!(timestamps, vec![STAMP; 2]);
        assert_eq!(preserved, 0);
    }

    #[test]
    fn csv_output_is_rejected() {
        let config = PrepareConfig::new(
            "raw.csv",
            "out.CSV",
            drift_model::parse_timestamp(STAMP).unwrap(),
        );
        let err = prepare_snapshot(&config).unwrap_err();
        match err {
            IngestError::UnsupportedFormat { path, extension } => {
                assert_eq!(path, PathBuf::from("out.CSV"));
                assert_eq!(extension, "csv");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
