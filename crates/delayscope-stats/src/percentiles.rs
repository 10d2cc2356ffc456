/// Computes a quantile of sorted data by linear interpolation between the
/// two closest ranks.
///
/// `q` is a fraction in `0.0..=1.0`. Returns `f64::NAN` for empty input.
///
/// # Examples
///
/// ```
/// use delayscope_stats::percentiles::quantile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(quantile(&values, 0.5), 2.5);
/// assert_eq!(quantile(&values, 0.25), 1.75);
/// assert_eq!(quantile(&values, 1.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn quantile(sorted_values: &[f64], q: f64) -> f64 {
    debug_assert!(
        sorted_values.is_sorted_by(|a, b| a <= b),
        "values must be sorted in ascending order"
    );
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted_values.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * frac
}

/// Summary used to draw a box plot.
///
/// Whiskers extend to the most extreme observations within 1.5 × IQR of the
/// quartiles; everything beyond is listed in `outliers`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    const WHISKER_IQR_FACTOR: f64 = 1.5;

    /// NaN values are skipped. Returns `None` when nothing is left.
    ///
    /// ```
    /// use delayscope_stats::percentiles::BoxSummary;
    ///
    /// let summary = BoxSummary::new([1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
    /// assert_eq!(summary.outliers, vec![100.0]);
    /// assert_eq!(summary.whisker_high, 5.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        if sorted_values.is_empty() {
            return None;
        }
        let q1 = quantile(sorted_values, 0.25);
        let median = quantile(sorted_values, 0.5);
        let q3 = quantile(sorted_values, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - Self::WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + Self::WHISKER_IQR_FACTOR * iqr;

        let inside = sorted_values
            .iter()
            .copied()
            .filter(|v| (low_fence..=high_fence).contains(v));
        let whisker_low = inside.clone().next().unwrap_or(q1);
        let whisker_high = inside.last().unwrap_or(q3);
        let outliers = sorted_values
            .iter()
            .copied()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_bounds() {
        let values = [2.0, 4.0, 8.0];
        assert_eq!(quantile(&values, 0.0), 2.0);
        assert_eq!(quantile(&values, 1.0), 8.0);
        assert_eq!(quantile(&values, 0.5), 4.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_single_value_box() {
        let summary = BoxSummary::new([7.0]).unwrap();
        assert_eq!(summary.q1, 7.0);
        assert_eq!(summary.q3, 7.0);
        assert_eq!(summary.whisker_low, 7.0);
        assert_eq!(summary.whisker_high, 7.0);
        assert!(summary.outliers.is_empty());
    }

    #[test]
    fn test_box_skips_nan() {
        let summary = BoxSummary::new([f64::NAN, 3.0, 1.0, f64::NAN, 2.0]).unwrap();
        assert_eq!(summary.median, 2.0);
        assert_eq!(summary.whisker_high, 3.0);
        assert!(summary.outliers.is_empty());
        assert_eq!(BoxSummary::new([f64::NAN]), None);
    }

    #[test]
    fn test_box_with_low_outlier() {
        let summary = BoxSummary::new([-50.0, 10.0, 11.0, 12.0, 13.0, 14.0]).unwrap();
        assert_eq!(summary.outliers, vec![-50.0]);
        assert_eq!(summary.whisker_low, 10.0);
        assert_eq!(summary.whisker_high, 14.0);
        assert!(BoxSummary::new([]).is_none());
    }
}
