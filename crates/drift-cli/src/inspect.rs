//! Column filters over raw CSV tables.
//!
//! Filter arguments take the form `COLUMN=EXPR`. Whether `EXPR` is read as
//! a numeric range or a substring depends on the column hint, so a typo in
//! a numeric filter is reported instead of silently matching text.

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow, bail};
use drift_core::{ColumnFilter, ColumnKind};
use drift_ingest::{ColumnHint, RawTable};
use tracing::trace;

use crate::logging::redact_value;

/// A parsed filter bound to a table column.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundFilter {
    pub column: String,
    pub index: usize,
    pub filter: ColumnFilter,
}

/// Split a `COLUMN=EXPR` argument.
pub fn split_filter_arg(raw: &str) -> Result<(&str, &str)> {
    let (column, expr) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("filter '{raw}' must look like COLUMN=EXPR"))?;
    let column = column.trim();
    if column.is_empty() {
        bail!("filter '{raw}' has an empty column name");
    }
    Ok((column, expr))
}

/// Parse filter arguments against a table and its column hints.
///
/// Blank expressions are dropped.
pub fn bind_filters(
    table: &RawTable,
    hints: &BTreeMap<String, ColumnHint>,
    args: &[String],
) -> Result<Vec<BoundFilter>> {
    let mut filters = Vec::with_capacity(args.len());
    for raw in args {
        let (column, expr) = split_filter_arg(raw)?;
        let index = table
            .column_index(column)
            .ok_or_else(|| anyhow!("unknown column '{column}'"))?;
        let kind = ColumnKind::from_is_numeric(hints.get(column).is_some_and(|hint| hint.is_numeric));
        let filter = ColumnFilter::parse(kind, expr).with_context(|| format!("filter on {column}"))?;
        if let Some(filter) = filter {
            filters.push(BoundFilter {
                column: column.to_string(),
                index,
                filter,
            });
        }
    }
    Ok(filters)
}

/// Indices of rows passing every filter, in table order.
pub fn matching_rows(table: &RawTable, filters: &[BoundFilter]) -> Vec<usize> {
    (0..table.rows.len())
        .filter(|&row| {
            filters.iter().all(|bound| {
                let cell = table.cell(row, bound.index);
                let matched = bound.filter.matches(cell);
                trace!(row, column = %bound.column, value = redact_value(cell), matched, "filter");
                matched
            })
        })
        .collect()
}
