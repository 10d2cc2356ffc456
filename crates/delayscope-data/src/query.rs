//! Row filtering with a typed comparator.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{AnalysisError, AnalysisResult},
    table::{Category, ColumnData, Table},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

impl CompareOp {
    pub const ALL: [Self; 6] = [Self::Lt, Self::Le, Self::Eq, Self::Ne, Self::Ge, Self::Gt];

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }

    #[must_use]
    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => ordering.is_lt(),
            Self::Le => ordering.is_le(),
            Self::Eq => ordering.is_eq(),
            Self::Ne => ordering.is_ne(),
            Self::Ge => ordering.is_ge(),
            Self::Gt => ordering.is_gt(),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOp {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim() {
            "<" | "lt" => Self::Lt,
            "<=" | "le" => Self::Le,
            "==" | "=" | "eq" => Self::Eq,
            "!=" | "ne" => Self::Ne,
            ">=" | "ge" => Self::Ge,
            ">" | "gt" => Self::Gt,
            other => {
                return Err(AnalysisError::validation(format!(
                    "Unsupported operator '{other}' (expected one of <, <=, ==, !=, >=, >)"
                )));
            }
        };
        Ok(op)
    }
}

/// A comparison against a fixed value, e.g. `> 10` or `== Delta Air Lines Inc.`.
///
/// ```
/// # use delayscope_data::query::{CompareOp, Condition};
/// let cond: Condition = ">= 15".parse().unwrap();
/// assert_eq!(cond.op, CompareOp::Ge);
/// assert_eq!(cond.value, "15");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub op: CompareOp,
    pub value: String,
}

impl Condition {
    pub fn new(op: CompareOp, value: impl Into<String>) -> Self {
        Self {
            op,
            value: value.into(),
        }
    }

    /// Whether the condition holds for a numeric cell. Missing cells never match.
    fn matches_number(&self, cell: Option<f64>, target: f64) -> bool {
        cell.and_then(|v| v.partial_cmp(&target))
            .is_some_and(|ordering| self.op.matches(ordering))
    }

    fn matches_text(&self, cell: Option<&str>) -> bool {
        cell.is_some_and(|v| self.op.matches(v.cmp(self.value.as_str())))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.value)
    }
}

impl FromStr for Condition {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Two-character operators first so `>=` is not read as `>`.
        let (op, rest) = ["<=", ">=", "==", "!=", "<", ">", "="]
            .iter()
            .find_map(|sym| s.strip_prefix(sym).map(|rest| (*sym, rest)))
            .ok_or_else(|| {
                AnalysisError::validation(format!("Condition '{s}' must start with an operator"))
            })?;
        let value = rest.trim();
        if value.is_empty() {
            return Err(AnalysisError::validation(format!("Condition '{s}' has no value")));
        }
        Ok(Self::new(op.parse()?, value))
    }
}

/// Rows of `table` whose `column` satisfies `condition`.
///
/// Numeric columns require a numeric value; text columns compare
/// lexicographically.
pub fn query(table: &Table, column: &str, condition: &Condition) -> AnalysisResult<Table> {
    let filtered = match table.column(column)?.data() {
        ColumnData::Numeric(values) => {
            let target = condition.value.parse::<f64>().map_err(|_| {
                AnalysisError::validation(format!(
                    "Column '{column}' is numeric but '{}' is not a number",
                    condition.value
                ))
            })?;
            table.filter_rows(|row| condition.matches_number(values[row], target))
        }
        ColumnData::Categorical(values) => {
            table.filter_rows(|row| condition.matches_text(values[row].as_deref()))
        }
    };
    Ok(filtered)
}

pub const CARRIER_COLUMN: &str = "carrier_name";
pub const ARRIVAL_DELAY_COLUMN: &str = "arr_delay";

/// Number of rows for `carrier` with a recorded arrival delay.
///
/// A carrier that never appears in the table is a validation error rather
/// than a count of zero.
pub fn carrier_delay_count(table: &Table, carrier: &str) -> AnalysisResult<usize> {
    let carriers = table.column(CARRIER_COLUMN)?;
    let delays = table.numeric_column(ARRIVAL_DELAY_COLUMN)?;
    let carrier = carrier.trim();
    let rows = (0..table.row_count())
        .filter(|&row| {
            matches!(carriers.category(row), Some(Category::Text(name)) if name == carrier)
        })
        .collect::<Vec<_>>();
    if rows.is_empty() {
        return Err(AnalysisError::validation(format!(
            "Carrier '{carrier}' not found in the dataset"
        )));
    }
    Ok(rows.iter().filter(|&&row| delays[row].is_some()).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::sample_table;

    #[test]
    fn test_parse_condition() {
        let cond: Condition = ">10".parse().unwrap();
        assert_eq!(cond, Condition::new(CompareOp::Gt, "10"));
        let cond: Condition = "<= 5.5".parse().unwrap();
        assert_eq!(cond, Condition::new(CompareOp::Le, "5.5"));
        let cond: Condition = "== Delta Air Lines Inc.".parse().unwrap();
        assert_eq!(cond, Condition::new(CompareOp::Eq, "Delta Air Lines Inc."));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("10".parse::<Condition>().is_err());
        assert!(">=".parse::<Condition>().is_err());
        assert!("~ 3".parse::<Condition>().is_err());
        assert!("=~".parse::<CompareOp>().is_err());
    }

    #[test]
    fn test_op_words() {
        for op in CompareOp::ALL {
            let word = format!("{op:?}").to_lowercase();
            assert_eq!(word.parse::<CompareOp>().unwrap(), op);
            assert_eq!(op.symbol().parse::<CompareOp>().unwrap(), op);
        }
    }

    #[test]
    fn test_numeric_query_skips_missing() {
        let table = sample_table();
        let result = query(&table, "arr_delay", &"> 100".parse().unwrap()).unwrap();
        assert_eq!(result.row_count(), 3);
        let result = query(&table, "arr_delay", &"!= 250".parse().unwrap()).unwrap();
        // the missing cell does not count as "not equal"
        assert_eq!(result.row_count(), 3);
    }

    #[test]
    fn test_text_query() {
        let table = sample_table();
        let result = query(
            &table,
            "carrier_name",
            &"== United Air Lines Inc.".parse().unwrap(),
        )
        .unwrap();
        assert_eq!(result.row_count(), 2);
    }

    #[test]
    fn test_numeric_query_needs_number() {
        let table = sample_table();
        let err = query(&table, "arr_delay", &"> abc".parse().unwrap()).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation { .. }));
    }

    #[test]
    fn test_carrier_delay_count() {
        let table = sample_table();
        assert_eq!(carrier_delay_count(&table, "Delta Air Lines Inc.").unwrap(), 1);
        assert_eq!(carrier_delay_count(&table, " United Air Lines Inc. ").unwrap(), 2);
        assert!(matches!(
            carrier_delay_count(&table, "Nope Air"),
            Err(AnalysisError::Validation { .. })
        ));
    }
}
