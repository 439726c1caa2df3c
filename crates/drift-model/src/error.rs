//! Error types for drift analytics.

use thiserror::Error;

/// Errors that abort a whole analytics response.
///
/// Per-feature numeric problems never show up here; they degrade the
/// affected fields to `None` instead. A missing snapshot is reported by the
/// ingest layer before a dataset exists.
#[derive(Debug, Error)]
pub enum DriftError {
    /// Cutoff date could not be parsed.
    #[error("invalid cutoff date '{0}'")]
    InvalidCutoff(String),

    /// A record does not carry one value per feature column.
    #[error("record has {found} values but the dataset declares {expected} feature columns")]
    ShapeMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, DriftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        assert_eq!(
            DriftError::InvalidCutoff("soon".to_string()).to_string(),
            "invalid cutoff date 'soon'"
        );
        assert_eq!(
            DriftError::ShapeMismatch { expected: 2, found: 1 }.to_string(),
            "record has 1 values but the dataset declares 2 feature columns"
        );
    }
}
