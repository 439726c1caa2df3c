//! Raw CSV tables for inspection and column hints.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use csv::ReaderBuilder;
use serde::Serialize;

use crate::error::{IngestError, Result};

/// A CSV file read entirely as trimmed strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Cell at `row` / `column`, empty when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or("", String::as_str)
    }
}

/// Per-column statistics used to pick a filter kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHint {
    /// Whether more than 90% of non-empty values parse as numbers.
    pub is_numeric: bool,
    pub unique_ratio: f64,
    pub null_ratio: f64,
}

/// Read a CSV with a single header row.
///
/// Handles a UTF-8 BOM on the first header and trims every cell.
pub fn read_raw_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(IngestError::SnapshotNotFound {
            path: path.to_path_buf(),
        });
    }
    let csv_error = |e: csv::Error| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
    }
    tracing::debug!(path = %path.display(), rows = rows.len(), "read raw table");
    Ok(RawTable { headers, rows })
}

/// Build column hints for every header of a raw table.
pub fn build_column_hints(table: &RawTable) -> BTreeMap<String, ColumnHint> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), analyze_column(table, index)))
        .collect()
}

fn analyze_column(table: &RawTable, column: usize) -> ColumnHint {
    let total = table.rows.len();
    if total == 0 {
        return ColumnHint {
            is_numeric: false,
            unique_ratio: 0.0,
            null_ratio: 1.0,
        };
    }

    let mut null_count = 0usize;
    let mut numeric_count = 0usize;
    let mut unique_values: BTreeSet<&str> = BTreeSet::new();
    for row in 0..total {
        let value = table.cell(row, column);
        if value.is_empty() {
            null_count += 1;
            continue;
        }
        unique_values.insert(value);
        if value.parse::<f64>().is_ok() {
            numeric_count += 1;
        }
    }

    let non_null = total - null_count;
    ColumnHint {
        is_numeric: non_null > 0 && (numeric_count as f64 / non_null as f64) > 0.9,
        unique_ratio: if non_null > 0 {
            unique_values.len() as f64 / non_null as f64
        } else {
            0.0
        },
        null_ratio: null_count as f64 / total as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_raw_table_strips_bom() {
        let file = create_temp_csv("\u{feff}Glucose, Notes\n148, ok \n85,\n");
        let table = read_raw_table(file.path()).unwrap();
        assert_eq!(table.headers, vec!["Glucose", "Notes"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, 1), "ok");
        assert_eq!(table.cell(1, 1), "");
        assert_eq!(table.cell(5, 0), "");
    }

    #[test]
    fn test_column_hints() {
        let file = create_temp_csv("Glucose,Notes\n148,a\n85,a\n,b\n");
        let hints = build_column_hints(&read_raw_table(file.path()).unwrap());

        let glucose = &hints["Glucose"];
        assert!(glucose.is_numeric);
        assert!((glucose.null_ratio - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(glucose.unique_ratio, 1.0);

        let notes = &hints["Notes"];
        assert!(!notes.is_numeric);
        assert_eq!(notes.unique_ratio, 2.0 / 3.0);
    }
}
