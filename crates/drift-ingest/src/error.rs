//! Error types for snapshot ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or preparing snapshots.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Snapshot file does not exist.
    #[error("snapshot not found: {path}. Run the data preparation step first")]
    SnapshotNotFound { path: PathBuf },

    /// File extension is neither `.csv` nor `.parquet`.
    #[error("unsupported file format '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Failed to write output.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to read Parquet.
    #[error("failed to read Parquet {path}: {message}")]
    ParquetParse { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Column not found in DataFrame.
    #[error("column '{column}' not found in DataFrame")]
    ColumnNotFound { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    // === Validation Errors ===
    /// Records failed the feature schema.
    #[error("validation failed for {failed}/{total} records:\n{summary}")]
    Validation {
        failed: usize,
        total: usize,
        summary: String,
    },
}

impl IngestError {
    /// Whether this error means the input file is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SnapshotNotFound { .. })
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl From<drift_model::DriftError> for IngestError {
    fn from(err: drift_model::DriftError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::SnapshotNotFound {
            path: PathBuf::from("data/patient_features.parquet"),
        };
        assert_eq!(
            err.to_string(),
            "snapshot not found: data/patient_features.parquet. Run the data preparation step first"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("Glucose".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
        assert!(!ingest_err.is_not_found());
    }

    #[test]
    fn test_validation_message() {
        let err = IngestError::Validation {
            failed: 1,
            total: 3,
            summary: "Row 0: Age = 12 outside [18, 100]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "validation failed for 1/3 records:\nRow 0: Age = 12 outside [18, 100]"
        );
    }
}
