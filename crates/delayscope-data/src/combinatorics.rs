//! Combinatorics calculations and their result records.

use std::fmt;

use delayscope_stats::combinatorics;
use serde::{Serialize, Serializer};

use crate::{
    error::{AnalysisError, AnalysisResult},
    table::Table,
};

fn serialize_u128<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

/// One permutation or combination request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Calculation {
    Permutation { n: u64, r: u64 },
    Combination { n: u64, r: u64 },
    PermutationWithRepetition { n: u64, r: u64 },
    CombinationWithRepetition { n: u64, r: u64 },
    CircularPermutation { n: u64 },
    PermutationFromFrequencies { frequencies: Vec<u64> },
}

impl Calculation {
    /// Identifier used in result records and file names.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Permutation { .. } => "permutation",
            Self::Combination { .. } => "combination",
            Self::PermutationWithRepetition { .. } => "permutation_with_repetition",
            Self::CombinationWithRepetition { .. } => "combination_with_repetition",
            Self::CircularPermutation { .. } => "circular_permutation",
            Self::PermutationFromFrequencies { .. } => "permutation_with_frequencies",
        }
    }

    /// `n`, or the total item count for frequency-based permutations.
    #[must_use]
    pub fn n(&self) -> u64 {
        match self {
            Self::Permutation { n, .. }
            | Self::Combination { n, .. }
            | Self::PermutationWithRepetition { n, .. }
            | Self::CombinationWithRepetition { n, .. }
            | Self::CircularPermutation { n } => *n,
            Self::PermutationFromFrequencies { frequencies } => {
                frequencies.iter().copied().fold(0, u64::saturating_add)
            }
        }
    }

    #[must_use]
    pub fn r(&self) -> Option<u64> {
        match self {
            Self::Permutation { r, .. }
            | Self::Combination { r, .. }
            | Self::PermutationWithRepetition { r, .. }
            | Self::CombinationWithRepetition { r, .. } => Some(*r),
            Self::CircularPermutation { .. } | Self::PermutationFromFrequencies { .. } => None,
        }
    }

    pub fn evaluate(&self) -> AnalysisResult<u128> {
        let result = match self {
            Self::Permutation { n, r } => combinatorics::permutation(*n, *r),
            Self::Combination { n, r } => combinatorics::combination(*n, *r),
            Self::PermutationWithRepetition { n, r } => {
                combinatorics::permutation_with_repetition(*n, *r)
            }
            Self::CombinationWithRepetition { n, r } => {
                combinatorics::combination_with_repetition(*n, *r)
            }
            Self::CircularPermutation { n } => combinatorics::circular_permutation(*n),
            Self::PermutationFromFrequencies { frequencies } => {
                combinatorics::permutation_from_frequencies(frequencies)
            }
        }?;
        Ok(result)
    }

    /// Evaluates the calculation into a record.
    pub fn record(&self) -> AnalysisResult<CombinatoricsRecord> {
        Ok(CombinatoricsRecord {
            calculation_type: self.kind(),
            n: self.n(),
            r: self.r(),
            result: self.evaluate()?,
        })
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permutation { n, r } => write!(f, "P({n}, {r})"),
            Self::Combination { n, r } => write!(f, "C({n}, {r})"),
            Self::PermutationWithRepetition { n, r } => write!(f, "{n}^{r}"),
            Self::CombinationWithRepetition { n, r } => write!(f, "C({n}+{r}-1, {r})"),
            Self::CircularPermutation { n } => write!(f, "({n}-1)!"),
            Self::PermutationFromFrequencies { frequencies } => {
                write!(f, "multiset permutations of {frequencies:?}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinatoricsRecord {
    pub calculation_type: &'static str,
    pub n: u64,
    pub r: Option<u64>,
    #[serde(serialize_with = "serialize_u128")]
    pub result: u128,
}

impl CombinatoricsRecord {
    /// File stem `{kind}_n{n}` with an `_r{r}` suffix when `r` applies.
    #[must_use]
    pub fn file_stem(&self) -> String {
        match self.r {
            Some(r) => format!("{}_n{}_r{r}", self.calculation_type, self.n),
            None => format!("{}_n{}", self.calculation_type, self.n),
        }
    }
}

/// Combination counts for the distinct values of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCombinationReport {
    pub column: String,
    pub unique_values: u64,
    pub combination_size: u64,
    #[serde(serialize_with = "serialize_u128")]
    pub simple_combinations: u128,
    #[serde(serialize_with = "serialize_u128")]
    pub combinations_with_repetition: u128,
}

impl ColumnCombinationReport {
    /// Uses the number of distinct non-missing values in `column` as `n`.
    pub fn analyze(table: &Table, column: &str, r: u64) -> AnalysisResult<Self> {
        let unique = u64::try_from(table.unique_count(column)?)
            .map_err(|_| AnalysisError::numeric("Too many unique values"))?;
        Ok(Self {
            column: column.to_owned(),
            unique_values: unique,
            combination_size: r,
            simple_combinations: Calculation::Combination { n: unique, r }.evaluate()?,
            combinations_with_repetition: Calculation::CombinationWithRepetition { n: unique, r }
                .evaluate()?,
        })
    }
}

/// Parses a non-negative integer argument named `name`.
///
/// ```
/// # use delayscope_data::combinatorics::parse_count;
/// assert_eq!(parse_count("n", " 5 ").unwrap(), 5);
/// assert!(parse_count("n", "-1").is_err());
/// assert!(parse_count("r", "2.5").is_err());
/// ```
pub fn parse_count(name: &str, input: &str) -> AnalysisResult<u64> {
    input.trim().parse::<u64>().map_err(|_| {
        AnalysisError::validation(format!(
            "{name} must be a non-negative integer, got '{}'",
            input.trim()
        ))
    })
}

/// Parses a comma- or whitespace-separated list of frequencies.
pub fn parse_frequencies(input: &str) -> AnalysisResult<Vec<u64>> {
    let frequencies = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| parse_count("frequency", s))
        .collect::<AnalysisResult<Vec<_>>>()?;
    if frequencies.is_empty() {
        return Err(AnalysisError::validation("Frequency list is empty"));
    }
    Ok(frequencies)
}
