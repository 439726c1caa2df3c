//! Two-sample drift detection: Kolmogorov–Smirnov and PSI.

use std::f64::consts::PI;

use drift_model::{AnalyticsOptions, DriftResult, finite};

use crate::binning::{EqualWidthBins, value_range};

/// Additive smoothing per PSI bin.
const PSI_SMOOTHING: f64 = 1e-6;

/// Two-sample KS statistic and its asymptotic p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsTest {
    pub statistic: f64,
    pub pvalue: f64,
}

/// Gated drift test between two partitions.
///
/// Both sides need at least `options.min_drift_samples` values, otherwise
/// the default (all absent, not drifted) result is returned. A PSI that
/// cannot be computed is `None` without affecting the KS fields.
pub fn detect_drift(reference: &[f64], comparison: &[f64], options: &AnalyticsOptions) -> DriftResult {
    let reference = finite_values(reference);
    let comparison = finite_values(comparison);
    let (reference, comparison) = (reference.as_slice(), comparison.as_slice());
    let minimum = options.min_drift_samples.max(1);
    if reference.len() < minimum || comparison.len() < minimum {
        return DriftResult::default();
    }
    let Some(ks) = ks_two_sample(reference, comparison) else {
        return DriftResult::default();
    };
    DriftResult {
        ks_statistic: finite(ks.statistic),
        ks_pvalue: finite(ks.pvalue),
        psi: population_stability_index(reference, comparison, options.psi_bins),
        drifted: ks.pvalue < options.significance_level,
    }
}

/// Maximum distance between the two empirical CDFs over the pooled values.
///
/// Non-finite values are ignored. Returns `None` when either sample has no
/// finite values.
pub fn ks_two_sample(reference: &[f64], comparison: &[f64]) -> Option<KsTest> {
    let mut a = finite_values(reference);
    let mut b = finite_values(comparison);
    if a.is_empty() || b.is_empty() {
        return None;
    }
    a.sort_by(f64::total_cmp);
    b.sort_by(f64::total_cmp);
    let (n1, n2) = (a.len() as f64, b.len() as f64);

    let (mut i, mut j) = (0usize, 0usize);
    let mut statistic = 0.0f64;
    while i < a.len() && j < b.len() {
        // Step both CDFs past every copy of the next pooled value.
        let value = a[i].min(b[j]);
        while i < a.len() && a[i] <= value {
            i += 1;
        }
        while j < b.len() && b[j] <= value {
            j += 1;
        }
        statistic = statistic.max((i as f64 / n1 - j as f64 / n2).abs());
    }

    let effective = n1 * n2 / (n1 + n2);
    let pvalue = kolmogorov_survival(statistic * effective.sqrt()).clamp(0.0, 1.0);
    Some(KsTest { statistic, pvalue })
}

/// Survival function of the Kolmogorov distribution, `P(K > z)`.
///
/// Uses the theta-function form for small `z` and the alternating series
/// otherwise; both are accurate to well below 1e-6.
pub fn kolmogorov_survival(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    if z < 0.042 {
        return 1.0;
    }
    if z < 1.18 {
        let y = (-PI * PI / (8.0 * z * z)).exp();
        let cdf = (2.0 * PI).sqrt() / z * (y + y.powi(9) + y.powi(25) + y.powi(49));
        1.0 - cdf
    } else {
        let x = (-2.0 * z * z).exp();
        2.0 * (x - x.powi(4) + x.powi(9))
    }
}

/// Population Stability Index over equal-width bins spanning both samples.
///
/// Proportions are smoothed by 1e-6 per bin so empty bins never divide by
/// zero. Non-finite values are ignored. Returns `None` for samples without
/// finite values, a constant combined range, or a non-finite result.
pub fn population_stability_index(reference: &[f64], comparison: &[f64], bins: usize) -> Option<f64> {
    let reference = finite_values(reference);
    let comparison = finite_values(comparison);
    let (reference, comparison) = (reference.as_slice(), comparison.as_slice());
    let (ref_lo, ref_hi) = value_range(reference)?;
    let (cmp_lo, cmp_hi) = value_range(comparison)?;
    let bins = EqualWidthBins::new(ref_lo.min(cmp_lo), ref_hi.max(cmp_hi), bins)?;

    let ref_props = smoothed_proportions(&bins.counts(reference));
    let cmp_props = smoothed_proportions(&bins.counts(comparison));
    let psi = ref_props
        .iter()
        .zip(&cmp_props)
        .map(|(expected, actual)| (actual - expected) * (actual / expected).ln())
        .sum();
    finite(psi)
}

fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|value| value.is_finite()).collect()
}

fn smoothed_proportions(counts: &[u64]) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    let denominator = total as f64 + PSI_SMOOTHING * counts.len() as f64;
    counts
        .iter()
        .map(|count| (*count as f64 + PSI_SMOOTHING) / denominator)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survival_function_reference_points() {
        assert_eq!(kolmogorov_survival(0.0), 1.0);
        // P(K > 1.3581) ≈ 0.05, the classic 5% critical value.
        assert!((kolmogorov_survival(1.3581) - 0.05).abs() < 1e-3);
        assert!((kolmogorov_survival(1.0) - 0.26999967).abs() < 1e-6);
        assert!(kolmogorov_survival(3.0) < 1e-6);
    }

    #[test]
    fn survival_function_is_continuous_at_branch() {
        let below = kolmogorov_survival(1.18 - 1e-9);
        let above = kolmogorov_survival(1.18);
        assert!((below - above).abs() < 1e-6);
    }

    #[test]
    fn ks_statistic_handles_ties() {
        let ks = ks_two_sample(&[1.0, 2.0, 2.0, 3.0], &[2.0, 2.0, 4.0, 5.0]).unwrap();
        // After 2.0: 3/4 vs 2/4; after 3.0: 4/4 vs 2/4.
        assert!((ks.statistic - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ks_disjoint_samples_reach_one() {
        let ks = ks_two_sample(&[1.0, 2.0, 3.0], &[10.0, 11.0, 12.0]).unwrap();
        assert_eq!(ks.statistic, 1.0);
        assert!(ks.pvalue < 0.1);
    }

    #[test]
    fn psi_is_none_for_constant_range() {
        assert_eq!(population_stability_index(&[2.0; 6], &[2.0; 6], 10), None);
    }

    #[test]
    fn psi_grows_with_shift() {
        let reference: Vec<f64> = (0..50).map(f64::from).collect();
        let near: Vec<f64> = (2..52).map(f64::from).collect();
        let far: Vec<f64> = (30..80).map(f64::from).collect();
        let small = population_stability_index(&reference, &near, 10).unwrap();
        let large = population_stability_index(&reference, &far, 10).unwrap();
        assert!(small >= 0.0);
        assert!(large > small);
    }

    #[test]
    fn ks_skips_nan_shared_by_both_samples() {
        let ks = ks_two_sample(&[1.0, 2.0, 3.0, 4.0, f64::NAN], &[1.0, 2.0, 3.0, 4.0, f64::NAN]).unwrap();
        assert_eq!(ks.statistic, 0.0);
        assert_eq!(ks.pvalue, 1.0);
        assert!(ks_two_sample(&[f64::NAN], &[1.0]).is_none());
    }

    #[test]
    fn non_finite_values_do_not_reach_the_result() {
        let mut reference: Vec<f64> = (0..30).map(f64::from).collect();
        let mut comparison: Vec<f64> = (20..50).map(f64::from).collect();
        reference.extend([f64::NAN, f64::INFINITY, f64::NEG_INFINITY]);
        comparison.extend([f64::NAN, f64::NEG_INFINITY, f64::INFINITY]);

        let result = detect_drift(&reference, &comparison, &AnalyticsOptions::default());
        let statistic = result.ks_statistic.unwrap();
        let pvalue = result.ks_pvalue.unwrap();
        assert!(statistic.is_finite() && (0.0..=1.0).contains(&statistic));
        assert!(pvalue.is_finite() && (0.0..=1.0).contains(&pvalue));
        assert!(result.psi.is_some_and(f64::is_finite));

        let clean = detect_drift(&reference[..30], &comparison[..30], &AnalyticsOptions::default());
        assert_eq!(result, clean);
    }

    #[test]
    fn non_finite_values_do_not_count_toward_the_gate() {
        let mut reference = vec![1.0, 2.0, 3.0];
        reference.extend([f64::NAN; 10]);
        let comparison: Vec<f64> = (0..10).map(f64::from).collect();
        let result = detect_drift(&reference, &comparison, &AnalyticsOptions::default());
        assert_eq!(result, DriftResult::default());
    }

    #[test]
    fn drift_is_gated_on_sample_size() {
        let options = AnalyticsOptions::default();
        let result = detect_drift(&[1.0, 2.0, 3.0], &(0..10).map(f64::from).collect::<Vec<_>>(), &options);
        assert_eq!(result, DriftResult::default());
    }
}
