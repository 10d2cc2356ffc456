//! Gaussian kernel density estimation, used for violin plots.

use std::f64::consts::PI;

use crate::descriptive;

/// One-dimensional Gaussian KDE with Scott's rule bandwidth.
#[derive(Debug, Clone)]
pub struct KernelDensity {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl KernelDensity {
    /// Bandwidth used when the samples have no spread.
    const FALLBACK_BANDWIDTH: f64 = 1.0;

    /// Returns `None` when there are no finite samples.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let samples = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let bandwidth = descriptive::sample_std_dev(&samples)
            .map(|std| std * n.powf(-0.2))
            .filter(|bw| *bw > f64::EPSILON)
            .unwrap_or(Self::FALLBACK_BANDWIDTH);
        Some(Self { samples, bandwidth })
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density at `x`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / ((2.0 * PI).sqrt() * self.bandwidth * self.samples.len() as f64);
        self.samples
            .iter()
            .map(|s| {
                let z = (x - s) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            * norm
    }

    /// Evaluates the density at `num_points` evenly spaced positions covering
    /// the sample range extended by `cut` bandwidths on each side.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn curve(&self, num_points: usize, cut: f64) -> Vec<(f64, f64)> {
        let min = self.samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lo = min - cut * self.bandwidth;
        let hi = max + cut * self.bandwidth;
        if num_points < 2 {
            return vec![(lo, self.evaluate(lo))];
        }
        let step = (hi - lo) / (num_points - 1) as f64;
        (0..num_points)
            .map(|i| {
                let x = lo + step * i as f64;
                (x, self.evaluate(x))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_samples() {
        assert!(KernelDensity::new([]).is_none());
        assert!(KernelDensity::new([f64::INFINITY]).is_none());
    }

    #[test]
    fn test_density_integrates_to_one() {
        let kde = KernelDensity::new([1.0, 2.0, 2.5, 4.0, 7.0]).unwrap();
        let curve = kde.curve(2000, 6.0);
        let step = curve[1].0 - curve[0].0;
        let area = curve.iter().map(|(_, y)| y * step).sum::<f64>();
        assert!((area - 1.0).abs() < 1e-3, "area = {area}");
    }

    #[test]
    fn test_constant_samples_use_fallback_bandwidth() {
        let kde = KernelDensity::new([5.0, 5.0, 5.0]).unwrap();
        assert_eq!(kde.bandwidth(), 1.0);
        assert!(kde.evaluate(5.0) > kde.evaluate(6.0));
    }
}
