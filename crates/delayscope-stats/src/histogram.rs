use std::ops::Range;

/// A histogram of a dataset's distribution with equal-width bins spanning
/// the data range.
#[derive(Debug, Clone)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    ///
    /// The last bin also contains values equal to its end.
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Builds a histogram with `num_bins` equal-width bins from `min` to `max`
    /// of the values.
    ///
    /// Non-finite values are ignored. When every value is identical, the bins
    /// span `value - 0.5 .. value + 0.5`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use delayscope_stats::histogram::Histogram;
    /// let values = [1.0, 2.0, 2.0, 3.0, 4.0];
    /// let histogram = Histogram::new(values, 3);
    /// assert_eq!(histogram.bins.len(), 3);
    /// assert_eq!(histogram.total_count(), 5);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if values.is_empty() || num_bins == 0 {
            return Self { bins: vec![] };
        }

        let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max - min < f64::EPSILON {
            min -= 0.5;
            max += 0.5;
        }
        let bin_width = (max - min) / num_bins as f64;

        let mut bins = (0..num_bins)
            .map(|idx| {
                // Recompute from `min` to avoid accumulating rounding error.
                let start = min + bin_width * idx as f64;
                let end = if idx == num_bins - 1 {
                    max
                } else {
                    min + bin_width * (idx + 1) as f64
                };
                HistogramBin {
                    range: start..end,
                    count: 0,
                }
            })
            .collect::<Vec<_>>();

        for val in values {
            let idx = (((val - min) / bin_width) as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(Histogram::new([], 10).bins.is_empty());
        assert!(Histogram::new([1.0], 0).bins.is_empty());
        assert!(Histogram::new([f64::NAN], 4).bins.is_empty());
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let histogram = Histogram::new([0.0, 5.0, 10.0], 2);
        let counts = histogram.bins.iter().map(|b| b.count).collect::<Vec<_>>();
        assert_eq!(counts, vec![1, 2]);
        assert_eq!(histogram.bins[1].range.end, 10.0);
    }

    #[test]
    fn test_constant_values() {
        let histogram = Histogram::new([3.0; 4], 5);
        assert_eq!(histogram.bins.len(), 5);
        assert_eq!(histogram.total_count(), 4);
        assert_eq!(histogram.max_count(), 4);
        assert_eq!(histogram.bins[0].range.start, 2.5);
    }
}
