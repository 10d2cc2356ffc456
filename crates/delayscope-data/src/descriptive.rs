//! Descriptive statistics over table columns.

use std::fmt;

use chrono::{DateTime, Utc};
use delayscope_stats::descriptive;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AnalysisError, AnalysisResult},
    table::Table,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticKind {
    Mean,
    Median,
    Std,
    WeightedMean,
}

impl StatisticKind {
    /// Suffix used in result file names.
    #[must_use]
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Std => "std",
            Self::WeightedMean => "weighted_mean",
        }
    }
}

impl fmt::Display for StatisticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mean => "Mean",
            Self::Median => "Median",
            Self::Std => "Standard Deviation",
            Self::WeightedMean => "Weighted Mean",
        })
    }
}

/// A computed statistic together with what it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticRecord {
    pub statistic: StatisticKind,
    pub column: String,
    pub weights_column: Option<String>,
    pub value: f64,
    pub computed_at: DateTime<Utc>,
}

impl fmt::Display for StatisticRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.weights_column {
            Some(weights) => write!(
                f,
                "{} of {} (weighted by {weights}): {:.4}",
                self.statistic, self.column, self.value
            ),
            None => write!(f, "{} of {}: {:.4}", self.statistic, self.column, self.value),
        }
    }
}

fn non_empty_values(table: &Table, column: &str) -> AnalysisResult<Vec<f64>> {
    let values = table.present_values(column)?;
    if values.is_empty() {
        return Err(AnalysisError::NoValues {
            column: column.to_owned(),
        });
    }
    Ok(values)
}

pub fn mean(table: &Table, column: &str) -> AnalysisResult<f64> {
    let values = non_empty_values(table, column)?;
    descriptive::mean(&values).ok_or_else(|| AnalysisError::NoValues {
        column: column.to_owned(),
    })
}

pub fn median(table: &Table, column: &str) -> AnalysisResult<f64> {
    let values = non_empty_values(table, column)?;
    descriptive::median(&values).ok_or_else(|| AnalysisError::NoValues {
        column: column.to_owned(),
    })
}

/// Sample standard deviation; needs at least two present values.
pub fn std_dev(table: &Table, column: &str) -> AnalysisResult<f64> {
    let values = non_empty_values(table, column)?;
    descriptive::sample_std_dev(&values).ok_or_else(|| {
        AnalysisError::numeric(format!(
            "Standard deviation of '{column}' needs at least two values, found {}",
            values.len()
        ))
    })
}

/// `Σ(value·weight) / Σ(weight)` over rows where both cells are present.
pub fn weighted_mean(table: &Table, column: &str, weights: &str) -> AnalysisResult<f64> {
    let value_cells = table.numeric_column(column)?;
    let weight_cells = table.numeric_column(weights)?;
    let (values, weights): (Vec<_>, Vec<_>) = value_cells
        .iter()
        .zip(weight_cells)
        .filter_map(|(v, w)| Some(((*v)?, (*w)?)))
        .unzip();
    if values.is_empty() {
        return Err(AnalysisError::NoValues {
            column: column.to_owned(),
        });
    }
    Ok(descriptive::weighted_mean(&values, &weights)?)
}

/// Computes `kind` for `column`.
///
/// `weights` is required for [`StatisticKind::WeightedMean`] and ignored
/// otherwise.
pub fn compute(
    table: &Table,
    kind: StatisticKind,
    column: &str,
    weights: Option<&str>,
) -> AnalysisResult<f64> {
    match kind {
        StatisticKind::Mean => mean(table, column),
        StatisticKind::Median => median(table, column),
        StatisticKind::Std => std_dev(table, column),
        StatisticKind::WeightedMean => {
            let weights = weights.ok_or_else(|| {
                AnalysisError::validation("Weighted mean requires a weights column")
            })?;
            weighted_mean(table, column, weights)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, tests::sample_table};

    #[test]
    fn test_basic_statistics_skip_missing() {
        let table = sample_table();
        // 250, 300, 90, 120
        assert_eq!(mean(&table, "arr_delay").unwrap(), 190.0);
        assert_eq!(median(&table, "arr_delay").unwrap(), 185.0);
        let std = std_dev(&table, "arr_delay").unwrap();
        assert!((std - 10_200f64.sqrt()).abs() < 1e-9, "std = {std}");
    }

    #[test]
    fn test_weighted_mean_uses_complete_rows() {
        let table = sample_table();
        // rows with both arr_delay and arr_flights: (250,100) (300,120) (90,40) (120,60)
        let wm = weighted_mean(&table, "arr_delay", "arr_flights").unwrap();
        let expected = (250.0 * 100.0 + 300.0 * 120.0 + 90.0 * 40.0 + 120.0 * 60.0) / 320.0;
        assert!((wm - expected).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_mean_zero_weights() {
        let table = Table::new(vec![
            Column::numeric("v", vec![Some(1.0), Some(2.0)]),
            Column::numeric("w", vec![Some(0.0), Some(0.0)]),
        ])
        .unwrap();
        let err = weighted_mean(&table, "v", "w").unwrap_err();
        assert!(matches!(err, AnalysisError::Numeric { .. }));
    }

    #[test]
    fn test_std_needs_two_values() {
        let table = Table::new(vec![Column::numeric("v", vec![Some(1.0), None])]).unwrap();
        assert!(matches!(
            std_dev(&table, "v"),
            Err(AnalysisError::Numeric { .. })
        ));
    }

    #[test]
    fn test_all_missing_column() {
        let table = Table::new(vec![Column::numeric("v", vec![None, None])]).unwrap();
        assert!(matches!(
            mean(&table, "v"),
            Err(AnalysisError::NoValues { .. })
        ));
    }

    #[test]
    fn test_compute_weighted_mean_requires_weights() {
        let table = sample_table();
        let err = compute(&table, StatisticKind::WeightedMean, "arr_delay", None).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation { .. }));
    }
}
