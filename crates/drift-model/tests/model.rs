//! Tests for drift-model types.

use std::collections::BTreeMap;

use drift_model::{
    AnalyticsOptions, AnalyticsReport, AnalyticsRequest, ColumnStatistics, DateRange,
    DriftResult, FeatureAnalytics, TimeSeriesTrend, finite,
};

fn sample_stats() -> ColumnStatistics {
    ColumnStatistics {
        count: 1,
        mean: Some(5.0),
        std: Some(0.0),
        min: Some(5.0),
        max: Some(5.0),
        sum: Some(5.0),
        median: Some(5.0),
        q1: Some(5.0),
        q3: Some(5.0),
        iqr: Some(0.0),
        whisker_lo: Some(5.0),
        whisker_hi: Some(5.0),
        skew: None,
        kurtosis: None,
        z_mean: 0.0,
    }
}

#[test]
fn gated_drift_result_serializes_as_nulls() {
    let json = serde_json::to_string(&DriftResult::default()).expect("serialize drift");
    insta::assert_snapshot!(json, @r#"{"ks_statistic":null,"ks_pvalue":null,"psi":null,"drifted":false}"#);
}

#[test]
fn non_finite_values_never_reach_json() {
    let trend = TimeSeriesTrend {
        dates: vec!["2024-01-01 00:00".to_string(), "2024-01-02 00:00".to_string()],
        values: vec![finite(f64::NAN), finite(1.5)],
        window: 10,
        split_label: "2024-01-01".to_string(),
    };
    let json = serde_json::to_string(&trend).expect("serialize trend");
    assert!(json.contains("\"values\":[null,1.5]"));
    assert!(!json.contains("NaN"));
    assert!(!json.contains("Infinity"));
}

#[test]
fn report_round_trips_and_lists_drifted_features() {
    let mut features = BTreeMap::new();
    features.insert(
        "Glucose".to_string(),
        FeatureAnalytics {
            overall: Some(sample_stats()),
            reference: Some(sample_stats()),
            comparison: Some(sample_stats()),
            drift: DriftResult {
                ks_statistic: Some(0.8),
                ks_pvalue: Some(0.001),
                psi: Some(1.2),
                drifted: true,
            },
            histogram: None,
            timeseries: None,
        },
    );
    features.insert(
        "BMI".to_string(),
        FeatureAnalytics {
            overall: None,
            reference: None,
            comparison: None,
            drift: DriftResult::default(),
            histogram: None,
            timeseries: None,
        },
    );
    let report = AnalyticsReport {
        total_rows: 2,
        reference_count: 1,
        comparison_count: 1,
        split_label: "2024-01-01".to_string(),
        split_strategy: "cutoff".to_string(),
        has_dates: true,
        date_range: DateRange::default(),
        features,
    };

    assert_eq!(report.drifted_features(), vec!["Glucose"]);

    let json = serde_json::to_string(&report).expect("serialize report");
    let round: AnalyticsReport = serde_json::from_str(&json).expect("deserialize report");
    assert_eq!(round, report);
}

#[test]
fn options_fill_missing_fields_from_defaults() {
    let options: AnalyticsOptions =
        serde_json::from_str(r#"{"label_column":"Class","psi_bins":5}"#).expect("parse options");
    assert_eq!(options.label_column, "Class");
    assert_eq!(options.psi_bins, 5);
    assert_eq!(options.histogram_bins, 20);
    assert_eq!(options.timestamp_column, "event_timestamp");
    assert_eq!(options.feature_columns.len(), 9);
}

#[test]
fn request_cutoff_ignores_blank_values() {
    assert_eq!(AnalyticsRequest::new().with_cutoff("  ").cutoff(), None);
    assert_eq!(
        AnalyticsRequest::new().with_cutoff(" 2024-01-01 ").cutoff(),
        Some("2024-01-01")
    );
}
