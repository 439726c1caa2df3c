//! File-based snapshot loading and preparation.

use std::fs;
use std::path::Path;

use drift_ingest::{EnrichmentMode, IngestError, PrepareConfig, load_snapshot, prepare_snapshot, validate_raw};
use drift_model::{AnalyticsOptions, FeatureSchema, parse_timestamp};
use tempfile::tempdir;

const HEADER: &str =
    "Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age,Outcome";

const ROWS: [&str; 3] = [
    "6,148,72,35,0,33.6,0.627,50,1",
    "1,85,66,29,0,26.6,0.351,31,0",
    "8,183,64,0,0,23.3,0.672,32,1",
];

fn write_raw(path: &Path, rows: &[&str]) {
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(path, content).expect("write raw csv");
}

#[test]
fn loads_csv_snapshot() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.csv");
    fs::write(
        &path,
        "Glucose,Age,Outcome,event_timestamp\n148,50,1,2024-01-01 10:00:00\n85,,0,2024-01-02T11:30:00\n",
    )
    .expect("write");

    let dataset = load_snapshot(&path, &AnalyticsOptions::default()).expect("load");
    assert_eq!(dataset.feature_columns(), &["Glucose", "Age", "Outcome"]);
    assert_eq!(dataset.len(), 2);
    let records = dataset.records();
    assert_eq!(records[1].value(1), None);
    assert_eq!(records[1].label, Some(0));
    assert_eq!(records[1].timestamp, parse_timestamp("2024-01-02 11:30"));
}

#[test]
fn missing_snapshot_is_not_found() {
    let dir = tempdir().expect("tempdir");
    let err = load_snapshot(&dir.path().join("absent.parquet"), &AnalyticsOptions::default())
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn prepare_then_append_keeps_earlier_timestamps() {
    let dir = tempdir().expect("tempdir");
    let raw = dir.path().join("diabetes.csv");
    let output = dir.path().join("processed").join("patient_features.parquet");
    let first = parse_timestamp("2024-01-01").expect("timestamp");
    let second = parse_timestamp("2024-02-01").expect("timestamp");

    write_raw(&raw, &ROWS[..2]);
    let summary = prepare_snapshot(&PrepareConfig::new(&raw, &output, first)).expect("first run");
    assert_eq!(summary.mode, EnrichmentMode::FirstRun);
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.stamped, 2);

    write_raw(&raw, &ROWS);
    let summary = prepare_snapshot(&PrepareConfig::new(&raw, &output, second)).expect("second run");
    assert_eq!(summary.mode, EnrichmentMode::Incremental);
    assert_eq!(summary.preserved, 2);
    assert_eq!(summary.stamped, 1);

    let dataset = load_snapshot(&output, &AnalyticsOptions::default()).expect("load");
    let stamps: Vec<_> = dataset.records().iter().map(|record| record.timestamp).collect();
    assert_eq!(stamps, vec![Some(first), Some(first), Some(second)]);
}

#[test]
fn invalid_records_abort_preparation() {
    let dir = tempdir().expect("tempdir");
    let raw = dir.path().join("diabetes.csv");
    let output = dir.path().join("patient_features.parquet");
    write_raw(&raw, &["6,148,72,35,0,33.6,0.627,12,1"]);

    let config = PrepareConfig::new(&raw, &output, parse_timestamp("2024-01-01").expect("ts"));
    let err = prepare_snapshot(&config).unwrap_err();
    match err {
        IngestError::Validation { failed, total, summary } => {
            assert_eq!((failed, total), (1, 1));
            assert_eq!(summary, "Row 0: Age = 12 outside [18, 100]");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn validate_raw_reports_missing_columns() {
    let dir = tempdir().expect("tempdir");
    let raw = dir.path().join("partial.csv");
    fs::write(&raw, "Glucose,Age\n148,50\n").expect("write");

    let report = validate_raw(&raw, &FeatureSchema::patient_default()).expect("validate");
    assert!(!report.is_valid());
    assert!(report.missing_columns.contains(&"BMI".to_string()));
    assert!(report.violations.is_empty());
}
