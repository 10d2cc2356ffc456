//! Helpers for axis ranges and categorical labels.

use std::ops::Range;

/// Range spanning `values` with a margin, widened when the values are constant.
pub(crate) fn padded_range<I>(values: I, margin: f64) -> Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return 0.0..1.0;
    }
    let span = max - min;
    if span < f64::EPSILON {
        return (min - 0.5)..(max + 0.5);
    }
    (min - span * margin)..(max + span * margin)
}

/// Range from zero up to `max` plus headroom.
pub(crate) fn count_range(max: f64) -> Range<f64> {
    0.0..(max.max(1.0) * 1.1)
}

/// Horizontal range placing `n` categories at `0, 1, .., n - 1`.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn category_range(n: usize) -> Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Label for an axis position: the category name at integer positions, empty elsewhere.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn category_label(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}
