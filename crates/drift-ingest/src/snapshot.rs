//! Snapshot loading from CSV or Parquet.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use drift_model::{AnalyticsOptions, Dataset};
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::frame::dataset_from_frame;

/// On-disk snapshot formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Csv,
    Parquet,
}

impl SnapshotFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    /// Lower-case file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

/// Read a CSV or Parquet file into a DataFrame.
pub fn read_frame(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::SnapshotNotFound {
            path: path.to_path_buf(),
        });
    }
    match SnapshotFormat::from_path(path)? {
        SnapshotFormat::Csv => read_csv(path),
        SnapshotFormat::Parquet => read_parquet(path),
    }
}

/// Load a prepared snapshot as a dataset for analytics.
pub fn load_snapshot(path: &Path, options: &AnalyticsOptions) -> Result<Dataset> {
    let start = Instant::now();
    let df = read_frame(path)?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "snapshot frame read"
    );
    let dataset = dataset_from_frame(&df, options)?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        features = dataset.feature_columns().len(),
        duration_ms = start.elapsed().as_millis(),
        "snapshot loaded"
    );
    Ok(dataset)
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| IngestError::ParquetParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| IngestError::ParquetParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
