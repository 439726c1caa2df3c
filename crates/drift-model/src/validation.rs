//! Record validation against a [`FeatureSchema`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Dataset;
use crate::schema::FeatureSchema;

/// What is wrong with a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationKind {
    Missing,
    OutOfRange { value: f64, min: f64, max: f64 },
    NotInteger { value: f64 },
}

/// One invalid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// Zero-based record position in the dataset.
    pub row: usize,
    pub column: String,
    pub kind: ViolationKind,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "Row {}: {} is missing", self.row, self.column),
            ViolationKind::OutOfRange { value, min, max } => write!(
                f,
                "Row {}: {} = {} outside [{}, {}]",
                self.row, self.column, value, min, max
            ),
            ViolationKind::NotInteger { value } => write!(
                f,
                "Row {}: {} = {} is not a whole number",
                self.row, self.column, value
            ),
        }
    }
}

/// Outcome of validating a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_records: usize,
    /// Schema columns absent from the dataset entirely.
    pub missing_columns: Vec<String>,
    pub violations: Vec<SchemaViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.missing_columns.is_empty() && self.violations.is_empty()
    }

    /// Number of distinct records with at least one violation.
    pub fn failed_records(&self) -> usize {
        if !self.missing_columns.is_empty() {
            return self.total_records;
        }
        self.violations
            .iter()
            .map(|violation| violation.row)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Newline-separated description of the first `limit` problems.
    pub fn summary(&self, limit: usize) -> String {
        let mut lines: Vec<String> = self
            .missing_columns
            .iter()
            .map(|column| format!("Column {column} is missing from the snapshot"))
            .collect();
        lines.extend(self.violations.iter().map(ToString::to_string));
        lines.truncate(limit);
        lines.join("\n")
    }
}

impl FeatureSchema {
    /// Check every record's values against the schema ranges.
    pub fn validate(&self, dataset: &Dataset) -> ValidationReport {
        let mut report = ValidationReport {
            total_records: dataset.len(),
            ..ValidationReport::default()
        };
        let mut present = Vec::new();
        for feature in &self.features {
            match dataset.column_index(&feature.name) {
                Some(index) => present.push((index, feature)),
                None => report.missing_columns.push(feature.name.clone()),
            }
        }
        for (row, record) in dataset.records().iter().enumerate() {
            for (index, feature) in &present {
                let kind = match record.value(*index) {
                    None => Some(ViolationKind::Missing),
                    Some(value) if !feature.contains(value) => Some(ViolationKind::OutOfRange {
                        value,
                        min: feature.min,
                        max: feature.max,
                    }),
                    Some(value) if feature.integer && value.fract() != 0.0 => {
                        Some(ViolationKind::NotInteger { value })
                    }
                    Some(_) => None,
                };
                if let Some(kind) = kind {
                    report.violations.push(SchemaViolation {
                        row,
                        column: feature.name.clone(),
                        kind,
                    });
                }
            }
        }
        report
    }
}
