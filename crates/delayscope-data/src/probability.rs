//! Joint counts and probability tables between two columns.

use delayscope_stats::crosstab::{CrossTab, ProbabilityTable};

use crate::{
    error::AnalysisResult,
    table::{Category, Table},
};

pub type JointCounts = CrossTab<Category, Category>;
pub type Probabilities = ProbabilityTable<Category, Category>;

/// Cross-tabulates `row_column` against `column_column`.
///
/// Rows where either value is missing are not counted.
pub fn joint_counts(table: &Table, row_column: &str, column_column: &str) -> AnalysisResult<JointCounts> {
    let rows = table.column(row_column)?;
    let columns = table.column(column_column)?;
    let pairs = (0..table.row_count())
        .filter_map(|row| Some((rows.category(row)?, columns.category(row)?)));
    Ok(CrossTab::from_pairs(pairs))
}

/// Joint counts divided by the total number of rows in the table.
pub fn joint_probability(
    table: &Table,
    row_column: &str,
    column_column: &str,
) -> AnalysisResult<Probabilities> {
    Ok(joint_counts(table, row_column, column_column)?.joint_probability(table.row_count()))
}

/// Joint counts divided by their row sums; all-zero rows stay zero.
pub fn conditional_probability(
    table: &Table,
    row_column: &str,
    column_column: &str,
) -> AnalysisResult<Probabilities> {
    Ok(joint_counts(table, row_column, column_column)?.conditional_probability())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, tests::sample_table};

    fn letters() -> Table {
        let text = |v: &[&str]| v.iter().map(|s| Some((*s).to_owned())).collect();
        Table::new(vec![
            Column::categorical("a", text(&["A", "A", "B"])),
            Column::categorical("b", text(&["X", "Y", "X"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_joint_counts_fill_missing_combinations() {
        let counts = joint_counts(&letters(), "a", "b").unwrap();
        let get = |r: &str, c: &str| counts.count(&r.into(), &c.into());
        assert_eq!(get("A", "X"), Some(1));
        assert_eq!(get("A", "Y"), Some(1));
        assert_eq!(get("B", "X"), Some(1));
        assert_eq!(get("B", "Y"), Some(0));
    }

    #[test]
    fn test_joint_probability_sums_to_one() {
        let joint = joint_probability(&letters(), "a", "b").unwrap();
        assert!((joint.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_conditional_rows_sum_to_one() {
        let conditional = conditional_probability(&letters(), "a", "b").unwrap();
        for sum in conditional.row_sums() {
            assert!((sum - 1.0).abs() < 1e-12);
        }
        assert_eq!(conditional.get(&"B".into(), &"X".into()), Some(1.0));
    }

    #[test]
    fn test_missing_pairs_are_dropped_but_total_counts_all_rows() {
        let table = sample_table();
        // one weather_delay is missing, so four of five rows are counted
        let counts = joint_counts(&table, "carrier_name", "weather_delay").unwrap();
        assert_eq!(counts.total(), 4);
        let joint = joint_probability(&table, "carrier_name", "weather_delay").unwrap();
        assert!((joint.total() - 0.8).abs() < 1e-12);
    }
}
