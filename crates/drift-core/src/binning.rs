//! Equal-width binning shared by the PSI and the histogram comparison.

/// `count` equal-width bins over `[lo, hi]`.
///
/// Bins are half-open `[edge_i, edge_i+1)` except the last, which also
/// includes `hi`. Values outside the range are not counted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualWidthBins {
    lo: f64,
    hi: f64,
    count: usize,
}

impl EqualWidthBins {
    /// Bins over a strictly increasing finite range, `None` otherwise.
    pub fn new(lo: f64, hi: f64, count: usize) -> Option<Self> {
        if count == 0 || !lo.is_finite() || !hi.is_finite() || hi <= lo {
            return None;
        }
        Some(Self { lo, hi, count })
    }

    /// Bins spanning the observed range of `values`.
    ///
    /// A constant input is widened by 0.5 on each side so it still lands in
    /// a bin. Returns `None` for empty input.
    pub fn spanning(values: &[f64], count: usize) -> Option<Self> {
        let (lo, hi) = value_range(values)?;
        if lo == hi {
            Self::new(lo - 0.5, hi + 0.5, count)
        } else {
            Self::new(lo, hi, count)
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Left edge of bin `index`; `edge(len())` is the upper bound.
    pub fn edge(&self, index: usize) -> f64 {
        if index >= self.count {
            return self.hi;
        }
        self.lo + (self.hi - self.lo) * index as f64 / self.count as f64
    }

    /// Bin holding `value`, or `None` when it falls outside the range.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if !(value >= self.lo && value <= self.hi) {
            return None;
        }
        let last = self.count - 1;
        let scaled = (value - self.lo) / (self.hi - self.lo) * self.count as f64;
        let mut index = (scaled as usize).min(last);
        // Correct for rounding near an edge.
        if index > 0 && value < self.edge(index) {
            index -= 1;
        } else if index < last && value >= self.edge(index + 1) {
            index += 1;
        }
        Some(index)
    }

    pub fn counts(&self, values: &[f64]) -> Vec<u64> {
        let mut counts = vec![0u64; self.count];
        for value in values {
            if let Some(index) = self.index_of(*value) {
                counts[index] += 1;
            }
        }
        counts
    }

    pub fn midpoints(&self) -> Vec<f64> {
        (0..self.count)
            .map(|index| (self.edge(index) + self.edge(index + 1)) / 2.0)
            .collect()
    }
}

/// Minimum and maximum of finite values, `None` when there are none.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_ranges() {
        assert!(EqualWidthBins::new(1.0, 1.0, 10).is_none());
        assert!(EqualWidthBins::new(0.0, 1.0, 0).is_none());
        assert!(EqualWidthBins::new(f64::NAN, 1.0, 4).is_none());
    }

    #[test]
    fn last_bin_is_closed() {
        let bins = EqualWidthBins::new(0.0, 10.0, 10).unwrap();
        assert_eq!(bins.index_of(0.0), Some(0));
        assert_eq!(bins.index_of(1.0), Some(1));
        assert_eq!(bins.index_of(9.999), Some(9));
        assert_eq!(bins.index_of(10.0), Some(9));
        assert_eq!(bins.index_of(10.5), None);
        assert_eq!(bins.index_of(-0.1), None);
    }

    #[test]
    fn constant_values_are_widened() {
        let bins = EqualWidthBins::spanning(&[3.0, 3.0], 20).unwrap();
        assert_eq!(bins.edge(0), 2.5);
        assert_eq!(bins.edge(20), 3.5);
        assert_eq!(bins.counts(&[3.0, 3.0]).iter().sum::<u64>(), 2);
    }

    #[test]
    fn midpoints_sit_between_edges() {
        let bins = EqualWidthBins::new(0.0, 4.0, 4).unwrap();
        assert_eq!(bins.midpoints(), vec![0.5, 1.5, 2.5, 3.5]);
        assert_eq!(bins.counts(&[0.2, 1.0, 1.9, 4.0, 7.0]), vec![1, 2, 0, 1]);
    }

    #[test]
    fn spanning_empty_is_none() {
        assert!(EqualWidthBins::spanning(&[], 5).is_none());
    }
}
