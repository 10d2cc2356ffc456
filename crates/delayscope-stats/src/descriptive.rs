/// Arithmetic mean of `values`, or `None` if empty.
///
/// ```
/// # use delayscope_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of unsorted `values`, or `None` if empty.
///
/// ```
/// # use delayscope_stats::descriptive::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_sorted(&sorted)
}

/// Median of values already sorted in ascending order.
#[must_use]
pub fn median_sorted(sorted_values: &[f64]) -> Option<f64> {
    let n = sorted_values.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted_values[mid])
    } else {
        Some(f64::midpoint(sorted_values[mid - 1], sorted_values[mid]))
    }
}

/// Sample variance (`n - 1` denominator), or `None` for fewer than two values.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Sample standard deviation, or `None` for fewer than two values.
///
/// ```
/// # use delayscope_stats::descriptive::sample_std_dev;
/// let std = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((std - 2.138_089_935).abs() < 1e-6);
/// ```
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum WeightedMeanError {
    #[display("No values to average")]
    Empty,
    #[display("Values and weights differ in length ({values} vs {weights})")]
    LengthMismatch { values: usize, weights: usize },
    #[display("Sum of weights is zero")]
    ZeroWeightSum,
}

/// Weighted mean `Σ(value·weight) / Σ(weight)`.
///
/// ```
/// # use delayscope_stats::descriptive::weighted_mean;
/// let wm = weighted_mean(&[10.0, 20.0], &[1.0, 3.0]).unwrap();
/// assert_eq!(wm, 17.5);
/// ```
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Result<f64, WeightedMeanError> {
    if values.len() != weights.len() {
        return Err(WeightedMeanError::LengthMismatch {
            values: values.len(),
            weights: weights.len(),
        });
    }
    if values.is_empty() {
        return Err(WeightedMeanError::Empty);
    }

    // Zero up to the rounding error accumulated over the weights' magnitudes.
    let weight_sum = weights.iter().sum::<f64>();
    let magnitude = weights.iter().map(|w| w.abs()).sum::<f64>();
    if weight_sum.abs() <= magnitude * f64::EPSILON {
        return Err(WeightedMeanError::ZeroWeightSum);
    }
    let weighted_sum = values
        .iter()
        .zip(weights)
        .map(|(v, w)| v * w)
        .sum::<f64>();
    Ok(weighted_sum / weight_sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(sample_std_dev(&[]), None);
    }

    #[test]
    fn test_single_value_has_no_std_dev() {
        assert_eq!(mean(&[42.0]), Some(42.0));
        assert_eq!(median(&[42.0]), Some(42.0));
        assert!(sample_variance(&[42.0]).is_none());
        assert!(sample_std_dev(&[42.0]).is_none());
    }

    #[test]
    fn test_even_length_median_averages_middle_pair() {
        assert_eq!(median(&[10.0, 1.0, 7.0, 3.0]), Some(5.0));
        assert_eq!(median_sorted(&[1.0, 3.0, 7.0, 10.0]), Some(5.0));
    }

    #[test]
    fn test_sample_variance_uses_n_minus_one() {
        let variance = sample_variance(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((variance - 1.666_666_666_7).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_mean_zero_weight_sum() {
        assert_eq!(
            weighted_mean(&[1.0, 2.0], &[1.0, -1.0]),
            Err(WeightedMeanError::ZeroWeightSum)
        );
        assert_eq!(
            weighted_mean(&[1.0, 2.0], &[0.0, 0.0]),
            Err(WeightedMeanError::ZeroWeightSum)
        );
    }

    #[test]
    fn test_weighted_mean_tiny_weights() {
        let wm = weighted_mean(&[10.0, 20.0], &[1e-20, 3e-20]).unwrap();
        assert!((wm - 17.5).abs() < 1e-9);
        assert_eq!(
            weighted_mean(&[1.0, 2.0, 3.0], &[0.1, 0.2, -0.3]),
            Err(WeightedMeanError::ZeroWeightSum)
        );
    }

    #[test]
    fn test_weighted_mean_length_mismatch() {
        assert_eq!(
            weighted_mean(&[1.0, 2.0], &[1.0]),
            Err(WeightedMeanError::LengthMismatch {
                values: 2,
                weights: 1
            })
        );
        assert_eq!(weighted_mean(&[], &[]), Err(WeightedMeanError::Empty));
    }

    #[test]
    fn test_weighted_mean_equal_weights_is_mean() {
        let values = [3.0, 9.0, 12.0];
        let wm = weighted_mean(&values, &[2.0, 2.0, 2.0]).unwrap();
        assert!((wm - mean(&values).unwrap()).abs() < 1e-12);
    }
}
