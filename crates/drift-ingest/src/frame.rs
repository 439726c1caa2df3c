//! DataFrame to [`Dataset`] conversion.

use drift_model::{AnalyticsOptions, Dataset, Record, finite, parse_timestamp};
use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Numeric cells of a column; unparseable and non-finite cells are `None`.
pub fn float_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let series = lookup(df, column)?.cast(&DataType::Float64)?;
    Ok(series.f64()?.iter().map(|value| value.and_then(finite)).collect())
}

/// Cells of a column rendered as trimmed strings; blanks are `None`.
pub fn string_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let series = lookup(df, column)?.cast(&DataType::String)?;
    Ok(series
        .str()?
        .iter()
        .map(|value| {
            value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        })
        .collect())
}

/// Build a dataset from a snapshot frame.
///
/// Configured feature columns missing from the frame are left out of the
/// dataset. A missing label or timestamp column yields missing labels or
/// timestamps for every record.
pub fn dataset_from_frame(df: &DataFrame, options: &AnalyticsOptions) -> Result<Dataset> {
    let height = df.height();
    let features: Vec<&String> = options
        .feature_columns
        .iter()
        .filter(|name| has_column(df, name))
        .collect();

    let mut columns = Vec::with_capacity(features.len());
    for name in &features {
        columns.push(float_values(df, name)?);
    }

    let labels = if has_column(df, &options.label_column) {
        float_values(df, &options.label_column)?
            .into_iter()
            .map(|value| value.filter(|v| v.fract() == 0.0).map(|v| v as i64))
            .collect()
    } else {
        tracing::debug!(column = %options.label_column, "label column absent");
        vec![None; height]
    };

    let timestamps = if has_column(df, &options.timestamp_column) {
        string_values(df, &options.timestamp_column)?
            .into_iter()
            .map(|value| value.as_deref().and_then(parse_timestamp))
            .collect()
    } else {
        tracing::debug!(column = %options.timestamp_column, "timestamp column absent");
        vec![None; height]
    };

    let records = (0..height)
        .map(|row| {
            Record::new(
                columns.iter().map(|column| column[row]).collect(),
                labels[row],
                timestamps[row],
            )
        })
        .collect();

    Ok(Dataset::from_records(features, records)?)
}

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|column| column.as_str() == name)
}

fn lookup(df: &DataFrame, column: &str) -> Result<Series> {
    df.column(column)
        .map(|column| column.as_materialized_series().clone())
        .map_err(|_| IngestError::ColumnNotFound {
            column: column.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Glucose".into(), &[Some(148.0), None, Some(f64::NAN)]),
            Column::new("Outcome".into(), &[Some(1i64), Some(0), None]),
            Column::new(
                "event_timestamp".into(),
                &[Some("2024-01-01T10:00:00"), Some("garbage"), None],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn converts_cells_to_records() {
        let options = AnalyticsOptions::default().with_feature_columns(["Glucose", "BMI"]);
        let dataset = dataset_from_frame(&frame(), &options).unwrap();

        assert_eq!(dataset.feature_columns(), &["Glucose".to_string()]);
        assert_eq!(dataset.len(), 3);
        let records = dataset.records();
        assert_eq!(records[0].value(0), Some(148.0));
        assert_eq!(records[1].value(0), None);
        assert_eq!(records[2].value(0), None);
        assert_eq!(records[0].label, Some(1));
        assert_eq!(records[2].label, None);
        assert!(records[0].timestamp.is_some());
        assert!(records[1].timestamp.is_none());
    }

    #[test]
    fn missing_timestamp_column_is_not_an_error() {
        let options = AnalyticsOptions::default()
            .with_feature_columns(["Glucose"])
            .with_timestamp_column("collected_at");
        let dataset = dataset_from_frame(&frame(), &options).unwrap();
        assert!(dataset.records().iter().all(|record| record.timestamp.is_none()));
    }

    #[test]
    fn string_values_trim_blanks() {
        let df = DataFrame::new(vec![Column::new("name".into(), &["  a ", "", "b"])]).unwrap();
        assert_eq!(
            string_values(&df, "name").unwrap(),
            vec![Some("a".to_string()), None, Some("b".to_string())]
        );
        assert!(matches!(
            string_values(&df, "missing"),
            Err(IngestError::ColumnNotFound { .. })
        ));
    }
}
