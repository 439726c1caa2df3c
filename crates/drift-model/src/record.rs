//! Snapshot records and the dataset that owns them.

use chrono::NaiveDateTime;

use crate::error::{DriftError, Result};
use crate::numeric::finite;

/// One entity of the snapshot (e.g. a patient).
///
/// `values` holds one slot per feature column of the owning [`Dataset`];
/// `None` marks a missing or non-finite cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub values: Vec<Option<f64>>,
    pub label: Option<i64>,
    pub timestamp: Option<NaiveDateTime>,
}

impl Record {
    pub fn new(
        values: Vec<Option<f64>>,
        label: Option<i64>,
        timestamp: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            values,
            label,
            timestamp,
        }
    }

    /// Value of the feature at `index`, `None` when missing or non-finite.
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten().and_then(finite)
    }
}

/// Ordered collection of records for one analytics request.
///
/// The engine only ever borrows from a dataset; it never mutates it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    feature_columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new<I, S>(feature_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            feature_columns: feature_columns.into_iter().map(Into::into).collect(),
            records: Vec::new(),
        }
    }

    /// Build a dataset from records, checking every record's width.
    pub fn from_records<I, S>(feature_columns: I, records: Vec<Record>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::new(feature_columns);
        for record in records {
            dataset.push(record)?;
        }
        Ok(dataset)
    }

    pub fn push(&mut self, record: Record) -> Result<()> {
        if record.values.len() != self.feature_columns.len() {
            return Err(DriftError::ShapeMismatch {
                expected: self.feature_columns.len(),
                found: record.values.len(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a feature column, matched exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.feature_columns.iter().position(|column| column == name)
    }
}
