//! Cross-tabulation of two categorical variables and the probability tables
//! derived from it.
//!
//! Row and column labels are kept in ascending order of their `Ord`
//! implementation, so the layout of a table is deterministic.

use std::collections::{BTreeMap, BTreeSet};

/// Dense table of co-occurrence counts.
///
/// Combinations that never occur are present with a count of zero.
///
/// # Examples
///
/// ```
/// use delayscope_stats::crosstab::CrossTab;
///
/// let pairs = [("A", "X"), ("A", "Y"), ("B", "X")];
/// let table = CrossTab::from_pairs(pairs);
///
/// assert_eq!(table.rows(), &["A", "B"]);
/// assert_eq!(table.columns(), &["X", "Y"]);
/// assert_eq!(table.count(&"B", &"Y"), Some(0));
/// assert_eq!(table.total(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossTab<R, C> {
    rows: Vec<R>,
    columns: Vec<C>,
    counts: Vec<Vec<u64>>,
}

impl<R, C> CrossTab<R, C>
where
    R: Ord + Clone,
    C: Ord + Clone,
{
    /// Counts every `(row, column)` pair.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
    {
        let mut grouped = BTreeMap::<R, BTreeMap<C, u64>>::new();
        let mut columns = BTreeSet::<C>::new();
        for (row, column) in pairs {
            columns.insert(column.clone());
            *grouped.entry(row).or_default().entry(column).or_default() += 1;
        }

        let columns = columns.into_iter().collect::<Vec<_>>();
        let (rows, counts) = grouped
            .into_iter()
            .map(|(row, by_column)| {
                let line = columns
                    .iter()
                    .map(|c| by_column.get(c).copied().unwrap_or(0))
                    .collect::<Vec<_>>();
                (row, line)
            })
            .unzip();

        Self {
            rows,
            columns,
            counts,
        }
    }

    #[must_use]
    pub fn count(&self, row: &R, column: &C) -> Option<u64> {
        let r = self.rows.binary_search(row).ok()?;
        let c = self.columns.binary_search(column).ok()?;
        Some(self.counts[r][c])
    }
}

impl<R, C> CrossTab<R, C> {
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &[C] {
        &self.columns
    }

    /// Counts in row-major order, one inner `Vec` per row label.
    #[must_use]
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every cell.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.row_sums().sum()
    }

    /// Marginal count of each row label.
    pub fn row_sums(&self) -> impl Iterator<Item = u64> + '_ {
        self.counts.iter().map(|line| line.iter().sum::<u64>())
    }

    /// `P(row and column)`: every count divided by `total_rows`.
    ///
    /// `total_rows` is usually the number of records in the source table,
    /// which can exceed [`CrossTab::total`] when some records had a missing
    /// value in either variable. A zero denominator yields an all-zero table.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn joint_probability(&self, total_rows: usize) -> ProbabilityTable<R, C>
    where
        R: Clone,
        C: Clone,
    {
        let denom = total_rows as f64;
        self.map_probabilities(|_, count| {
            if total_rows == 0 {
                0.0
            } else {
                count as f64 / denom
            }
        })
    }

    /// `P(column | row)`: every count divided by its row sum.
    ///
    /// Rows whose sum is zero are filled with zeros.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn conditional_probability(&self) -> ProbabilityTable<R, C>
    where
        R: Clone,
        C: Clone,
    {
        let sums = self.row_sums().collect::<Vec<_>>();
        self.map_probabilities(|row_idx, count| {
            let sum = sums[row_idx];
            if sum == 0 {
                0.0
            } else {
                count as f64 / sum as f64
            }
        })
    }

    fn map_probabilities<F>(&self, mut f: F) -> ProbabilityTable<R, C>
    where
        R: Clone,
        C: Clone,
        F: FnMut(usize, u64) -> f64,
    {
        let values = self
            .counts
            .iter()
            .enumerate()
            .map(|(row_idx, line)| line.iter().map(|&count| f(row_idx, count)).collect())
            .collect();
        ProbabilityTable {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            values,
        }
    }
}

/// Table of probabilities sharing the layout of the [`CrossTab`] it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable<R, C> {
    rows: Vec<R>,
    columns: Vec<C>,
    values: Vec<Vec<f64>>,
}

impl<R, C> ProbabilityTable<R, C> {
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &[C] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().flatten().sum()
    }

    pub fn row_sums(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|line| line.iter().sum::<f64>())
    }
}

impl<R: Ord, C: Ord> ProbabilityTable<R, C> {
    #[must_use]
    pub fn get(&self, row: &R, column: &C) -> Option<f64> {
        let r = self.rows.binary_search(row).ok()?;
        let c = self.columns.binary_search(column).ok()?;
        Some(self.values[r][c])
    }
}
