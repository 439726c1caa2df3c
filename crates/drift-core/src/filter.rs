//! Record and cell filters.
//!
//! Filter behavior is chosen from the column's declared kind up front;
//! a value is never "tried as a number" and reinterpreted on failure.

use drift_model::Record;
use thiserror::Error;

/// Errors raised while parsing a column filter expression.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("invalid numeric filter '{raw}' for a numeric column")]
    InvalidNumber { raw: String },
}

/// Integer equality filter on a record's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter(pub i64);

impl CategoryFilter {
    /// Parse a category parameter.
    ///
    /// Blank values, `all`, and anything that is not an integer yield
    /// `None`: an uninterpretable filter is ignored, not rejected.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return None;
        }
        match trimmed.parse::<i64>() {
            Ok(value) => Some(Self(value)),
            Err(_) => {
                tracing::debug!(category = %trimmed, "ignoring non-integer category filter");
                None
            }
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.label == Some(self.0)
    }
}

/// Declared value kind of a raw table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn from_is_numeric(is_numeric: bool) -> Self {
        if is_numeric { Self::Numeric } else { Self::Text }
    }
}

/// Filter applied to one raw string cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Inclusive numeric range; either bound may be open.
    Range { lo: Option<f64>, hi: Option<f64> },
    /// Exact numeric match.
    Equals(f64),
    /// Case-insensitive substring match (stored lowercase).
    Contains(String),
}

impl ColumnFilter {
    /// Parse a filter expression for a column of the given kind.
    ///
    /// Numeric columns accept `lo:hi`, `lo:`, `:hi` or a single number.
    /// Text columns always use substring matching. Blank input yields `None`.
    pub fn parse(kind: ColumnKind, raw: &str) -> Result<Option<Self>, FilterError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let filter = match kind {
            ColumnKind::Text => Self::Contains(trimmed.to_lowercase()),
            ColumnKind::Numeric => match trimmed.split_once(':') {
                Some((lo, hi)) => Self::Range {
                    lo: parse_bound(lo, trimmed)?,
                    hi: parse_bound(hi, trimmed)?,
                },
                None => Self::Equals(parse_number(trimmed, trimmed)?),
            },
        };
        Ok(Some(filter))
    }

    /// Whether a raw cell passes the filter.
    ///
    /// Numeric filters reject empty or non-numeric cells.
    pub fn matches(&self, cell: &str) -> bool {
        let cell = cell.trim();
        match self {
            Self::Contains(needle) => cell.to_lowercase().contains(needle.as_str()),
            Self::Equals(expected) => cell.parse::<f64>().is_ok_and(|value| value == *expected),
            Self::Range { lo, hi } => cell.parse::<f64>().is_ok_and(|value| {
                lo.is_none_or(|lo| value >= lo) && hi.is_none_or(|hi| value <= hi)
            }),
        }
    }
}

fn parse_bound(part: &str, raw: &str) -> Result<Option<f64>, FilterError> {
    let part = part.trim();
    if part.is_empty() {
        return Ok(None);
    }
    parse_number(part, raw).map(Some)
}

fn parse_number(part: &str, raw: &str) -> Result<f64, FilterError> {
    part.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| FilterError::InvalidNumber {
            raw: raw.to_string(),
        })
}
