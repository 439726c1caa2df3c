//! Property tests for partitioning and descriptive statistics.

use chrono::{NaiveDateTime, TimeDelta};
use drift_core::{column_statistics, detect_drift, partition};
use drift_model::{AnalyticsOptions, Dataset, Record, parse_timestamp};
use proptest::prelude::*;

fn base() -> NaiveDateTime {
    parse_timestamp("2024-01-01").expect("timestamp")
}

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        proptest::option::of(-1e6f64..1e6),
        proptest::option::of(0i64..2),
        proptest::option::of(0i64..5),
    )
        .prop_map(|(value, label, day)| {
            Record::new(vec![value], label, day.map(|d| base() + TimeDelta::days(d)))
        })
}

fn noisy_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        6 => -1e3f64..1e3,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn partitions_are_complete_and_disjoint(
        records in proptest::collection::vec(record_strategy(), 0..60),
        category in proptest::option::of(prop_oneof![Just("0"), Just("1"), Just("all")]),
        cutoff in proptest::option::of(prop_oneof![Just("2024-01-02"), Just("2024-01-04")]),
    ) {
        let data = Dataset::from_records(["x"], records).expect("dataset");
        let (selected, parts) = partition(&data, category, cutoff).expect("partition");
        prop_assert_eq!(parts.reference.len() + parts.comparison.len(), selected.len());
        for record in parts.reference.records() {
            prop_assert!(!parts.comparison.records().iter().any(|other| std::ptr::eq(*other, *record)));
        }
    }

    #[test]
    fn statistics_are_ordered(values in proptest::collection::vec(-1e6f64..1e6, 1..80)) {
        let stats = column_statistics(&values).expect("stats");
        let min = stats.min.expect("min");
        let max = stats.max.expect("max");
        let q1 = stats.q1.expect("q1");
        let median = stats.median.expect("median");
        let q3 = stats.q3.expect("q3");
        prop_assert!(min <= q1 && q1 <= median && median <= q3 && q3 <= max);
        let lo = stats.whisker_lo.expect("whisker_lo");
        let hi = stats.whisker_hi.expect("whisker_hi");
        prop_assert!(min <= lo && lo <= q1);
        prop_assert!(q3 <= hi && hi <= max);
        prop_assert!(stats.std.expect("std") >= 0.0);
    }

    #[test]
    fn drift_fields_stay_finite_with_non_finite_input(
        reference in proptest::collection::vec(noisy_value(), 0..60),
        comparison in proptest::collection::vec(noisy_value(), 0..60),
    ) {
        let result = detect_drift(&reference, &comparison, &AnalyticsOptions::default());
        for field in [result.ks_statistic, result.ks_pvalue, result.psi] {
            prop_assert!(field.is_none_or(f64::is_finite));
        }
        if let Some(pvalue) = result.ks_pvalue {
            prop_assert!((0.0..=1.0).contains(&pvalue));
        }
    }
}
