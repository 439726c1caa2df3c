//! Reference/comparison partitioning.
//!
//! Splitting is an ordered list of [`SplitStrategy`] values. Each strategy
//! either produces a split or explicitly skips, and the first split wins:
//!
//! 1. [`CutoffSplit`]: records up to the end of the cutoff day are the reference.
//! 2. [`EarliestBatchSplit`]: the earliest timestamp batch is the reference.
//! 3. [`PositionalSplit`]: first 80% of rows by position are the reference.
//!
//! The positional split assumes row order approximates arrival order when
//! timestamps are degenerate. That is a heuristic, not a guarantee.

use std::collections::BTreeSet;

use chrono::{NaiveDateTime, TimeDelta};
use drift_model::{Dataset, DriftError, Record, Result, format_minute, parse_timestamp};
use tracing::debug;

use crate::filter::CategoryFilter;

/// Which side of the comparison a partition represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionKind {
    /// "Before" records.
    Reference,
    /// "After" records.
    Comparison,
}

/// Non-owning view over a subset of dataset records.
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    kind: PartitionKind,
    records: Vec<&'a Record>,
}

impl<'a> Partition<'a> {
    pub fn new(kind: PartitionKind, records: Vec<&'a Record>) -> Self {
        Self { kind, records }
    }

    pub fn kind(&self) -> PartitionKind {
        self.kind
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Non-missing values of the feature at `column`, in record order.
    pub fn values(&self, column: usize) -> Vec<f64> {
        column_values(&self.records, column)
    }
}

/// Non-missing values of one feature across borrowed records.
pub(crate) fn column_values(records: &[&Record], column: usize) -> Vec<f64> {
    records
        .iter()
        .filter_map(|record| record.value(column))
        .collect()
}

/// Result of a successful split.
#[derive(Debug, Clone)]
pub struct Partitions<'a> {
    pub reference: Partition<'a>,
    pub comparison: Partition<'a>,
    /// Human-readable description of where the split happened.
    pub split_label: String,
    /// Name of the strategy that produced the split.
    pub strategy: &'static str,
}

impl<'a> Partitions<'a> {
    fn from_predicate<F>(
        records: &[&'a Record],
        strategy: &'static str,
        split_label: String,
        is_reference: F,
    ) -> Self
    where
        F: Fn(&Record) -> bool,
    {
        let (reference, comparison): (Vec<&Record>, Vec<&Record>) =
            records.iter().copied().partition(|record| is_reference(record));
        Self {
            reference: Partition::new(PartitionKind::Reference, reference),
            comparison: Partition::new(PartitionKind::Comparison, comparison),
            split_label,
            strategy,
        }
    }
}

/// Outcome of asking one strategy to split.
#[derive(Debug)]
pub enum SplitOutcome<'a> {
    Split(Partitions<'a>),
    /// The strategy does not apply to these records.
    Skip,
}

/// One way of splitting records into reference and comparison partitions.
pub trait SplitStrategy {
    fn name(&self) -> &'static str;

    fn split<'a>(&self, records: &[&'a Record]) -> SplitOutcome<'a>;
}

/// Split at the end of an explicit cutoff day.
#[derive(Debug, Clone)]
pub struct CutoffSplit {
    label: String,
    end_of_day: NaiveDateTime,
}

impl CutoffSplit {
    /// Parse a cutoff date; the reference window ends one second before the
    /// following day starts.
    pub fn parse(raw: &str) -> Result<Self> {
        let cutoff = parse_timestamp(raw).ok_or_else(|| DriftError::InvalidCutoff(raw.to_string()))?;
        let end_of_day = cutoff
            .checked_add_signed(TimeDelta::days(1) - TimeDelta::seconds(1))
            .ok_or_else(|| DriftError::InvalidCutoff(raw.to_string()))?;
        Ok(Self {
            label: raw.to_string(),
            end_of_day,
        })
    }

    pub fn end_of_day(&self) -> NaiveDateTime {
        self.end_of_day
    }
}

impl SplitStrategy for CutoffSplit {
    fn name(&self) -> &'static str {
        "cutoff"
    }

    fn split<'a>(&self, records: &[&'a Record]) -> SplitOutcome<'a> {
        let end = self.end_of_day;
        SplitOutcome::Split(Partitions::from_predicate(
            records,
            self.name(),
            self.label.clone(),
            |record| record.timestamp.is_some_and(|ts| ts <= end),
        ))
    }
}

/// Earliest timestamp batch versus everything later.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarliestBatchSplit;

impl SplitStrategy for EarliestBatchSplit {
    fn name(&self) -> &'static str {
        "earliest_batch"
    }

    fn split<'a>(&self, records: &[&'a Record]) -> SplitOutcome<'a> {
        let distinct: BTreeSet<NaiveDateTime> =
            records.iter().filter_map(|record| record.timestamp).collect();
        if distinct.len() < 2 {
            return SplitOutcome::Skip;
        }
        let Some(first) = distinct.first().copied() else {
            return SplitOutcome::Skip;
        };
        SplitOutcome::Split(Partitions::from_predicate(
            records,
            self.name(),
            format!("First batch ({})", format_minute(&first)),
            |record| record.timestamp == Some(first),
        ))
    }
}

/// Leading share of rows by position versus the trailing rows.
#[derive(Debug, Clone, Copy)]
pub struct PositionalSplit {
    reference_percent: usize,
}

impl Default for PositionalSplit {
    fn default() -> Self {
        Self {
            reference_percent: 80,
        }
    }
}

impl PositionalSplit {
    /// Number of leading rows placed in the reference partition.
    pub fn split_index(&self, len: usize) -> usize {
        len * self.reference_percent / 100
    }

    /// Positional split never skips, so it is also the last resort of
    /// [`Partitioner::partition`].
    pub fn split_records<'a>(&self, records: &[&'a Record]) -> Partitions<'a> {
        let index = self.split_index(records.len());
        let (reference, comparison) = records.split_at(index);
        Partitions {
            reference: Partition::new(PartitionKind::Reference, reference.to_vec()),
            comparison: Partition::new(PartitionKind::Comparison, comparison.to_vec()),
            split_label: format!(
                "Row {index} ({}/{} split, single timestamp)",
                self.reference_percent,
                100 - self.reference_percent
            ),
            strategy: "positional",
        }
    }
}

impl SplitStrategy for PositionalSplit {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn split<'a>(&self, records: &[&'a Record]) -> SplitOutcome<'a> {
        SplitOutcome::Split(self.split_records(records))
    }
}

/// Ordered strategy list; the first strategy that splits wins.
pub struct Partitioner {
    strategies: Vec<Box<dyn SplitStrategy>>,
}

impl Partitioner {
    pub fn new(strategies: Vec<Box<dyn SplitStrategy>>) -> Self {
        Self { strategies }
    }

    /// Strategy list for an analytics request.
    pub fn for_request(cutoff: Option<&str>) -> Result<Self> {
        let mut strategies: Vec<Box<dyn SplitStrategy>> = Vec::with_capacity(3);
        if let Some(cutoff) = cutoff.map(str::trim).filter(|value| !value.is_empty()) {
            strategies.push(Box::new(CutoffSplit::parse(cutoff)?));
        }
        strategies.push(Box::new(EarliestBatchSplit));
        strategies.push(Box::new(PositionalSplit::default()));
        Ok(Self::new(strategies))
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    pub fn partition<'a>(&self, records: &[&'a Record]) -> Partitions<'a> {
        for strategy in &self.strategies {
            match strategy.split(records) {
                SplitOutcome::Split(partitions) => return partitions,
                SplitOutcome::Skip => {
                    debug!(strategy = strategy.name(), "split strategy skipped");
                }
            }
        }
        PositionalSplit::default().split_records(records)
    }
}

/// Records that pass the category filter, in dataset order.
///
/// When the dataset carries no labels at all, the filter is ignored.
pub fn select_records<'a>(dataset: &'a Dataset, filter: Option<CategoryFilter>) -> Vec<&'a Record> {
    let records = dataset.records();
    match filter {
        Some(filter) if records.iter().any(|record| record.label.is_some()) => records
            .iter()
            .filter(|record| filter.matches(record))
            .collect(),
        Some(filter) => {
            debug!(category = filter.0, "dataset has no labels, ignoring category filter");
            records.iter().collect()
        }
        None => records.iter().collect(),
    }
}

/// Filter and split a dataset in one step.
///
/// Returns the working record set alongside the partitions.
pub fn partition<'a>(
    dataset: &'a Dataset,
    category: Option<&str>,
    cutoff: Option<&str>,
) -> Result<(Vec<&'a Record>, Partitions<'a>)> {
    let records = select_records(dataset, CategoryFilter::parse(category));
    let partitions = Partitioner::for_request(cutoff)?.partition(&records);
    Ok((records, partitions))
}
