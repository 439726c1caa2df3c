//! Descriptive statistics for one feature over one partition.

use drift_model::{ColumnStatistics, finite, round_to};

/// Absolute moment sums below this are floating-point noise.
const MOMENT_EPSILON: f64 = 1e-14;

/// Tukey fence multiplier.
const FENCE_FACTOR: f64 = 1.5;

/// Compute summary statistics, or `None` for an empty input.
///
/// Quantiles use linear interpolation between order statistics. Skewness
/// and kurtosis are the bias-corrected sample estimators and require more
/// than two and three values respectively. `z_mean` starts at 0.0; see
/// [`apply_mean_shift`].
pub fn column_statistics(values: &[f64]) -> Option<ColumnStatistics> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;
    let std = if count > 1 { sample_std(&sorted, mean) } else { 0.0 };
    let min = sorted[0];
    let max = sorted[count - 1];
    let q1 = quantile_sorted(&sorted, 0.25);
    let median = quantile_sorted(&sorted, 0.5);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;

    Some(ColumnStatistics {
        count,
        mean: finite(mean),
        std: finite(std),
        min: finite(min),
        max: finite(max),
        sum: finite(sum),
        median: finite(median),
        q1: finite(q1),
        q3: finite(q3),
        iqr: finite(iqr),
        whisker_lo: finite(min.max(q1 - FENCE_FACTOR * iqr)),
        whisker_hi: finite(max.min(q3 + FENCE_FACTOR * iqr)),
        skew: (count > 2).then(|| skewness(&sorted, mean)).and_then(finite),
        kurtosis: (count > 3).then(|| kurtosis(&sorted, mean)).and_then(finite),
        z_mean: 0.0,
    })
}

/// Linear-interpolated quantile of already sorted values.
///
/// Returns NaN for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Standardize the comparison mean against the reference distribution.
///
/// Only applied when the reference standard deviation is positive;
/// otherwise `z_mean` stays at 0.0. Rounded to three decimals.
pub fn apply_mean_shift(comparison: &mut ColumnStatistics, reference: &ColumnStatistics) {
    let (Some(ref_mean), Some(ref_std), Some(cmp_mean)) =
        (reference.mean, reference.std, comparison.mean)
    else {
        return;
    };
    if ref_std > 0.0 {
        if let Some(z) = finite(round_to((cmp_mean - ref_mean) / ref_std, 3)) {
            comparison.z_mean = z;
        }
    }
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    let squares: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    (squares / (values.len() - 1) as f64).sqrt()
}

fn central_sums(values: &[f64], mean: f64) -> (f64, f64, f64) {
    values.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), value| {
        let d = value - mean;
        let d2 = d * d;
        (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
    })
}

fn zero_noise(value: f64) -> f64 {
    if value.abs() < MOMENT_EPSILON { 0.0 } else { value }
}

fn skewness(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;
    let (m2, m3, _) = central_sums(values, mean);
    let m2 = zero_noise(m2);
    if m2 == 0.0 {
        return 0.0;
    }
    let m3 = zero_noise(m3);
    (n * (n - 1.0).sqrt() / (n - 2.0)) * (m3 / m2.powf(1.5))
}

fn kurtosis(values: &[f64], mean: f64) -> f64 {
    let n = values.len() as f64;
    let (m2, _, m4) = central_sums(values, mean);
    let m2 = zero_noise(m2);
    if m2 == 0.0 {
        return 0.0;
    }
    let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    let numerator = zero_noise(n * (n + 1.0) * (n - 1.0) * m4);
    let denominator = zero_noise((n - 2.0) * (n - 3.0) * m2 * m2);
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator - adjustment
}
