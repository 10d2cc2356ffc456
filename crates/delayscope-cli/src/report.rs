//! Plain-text rendering of analysis results.
//!
//! Every function writes to any [`Write`] so the interactive menu and the
//! one-shot subcommands share the same layout.

use std::{fmt::Display, io, io::Write};

use delayscope_data::{
    combinatorics::{ColumnCombinationReport, CombinatoricsRecord},
    probability::{JointCounts, Probabilities},
    table::{Category, Table},
    vector::VectorReport,
};
use serde::Serialize;

const LABEL_WIDTH: usize = 24;
const CELL_WIDTH: usize = 12;

pub(crate) fn write_frequencies<W>(
    writer: &mut W,
    column: &str,
    frequencies: &[(Category, usize)],
) -> io::Result<()>
where
    W: Write,
{
    writeln!(writer, "  {column:<LABEL_WIDTH$} {:>CELL_WIDTH$}", "Count")?;
    writeln!(writer, "  {}", "-".repeat(LABEL_WIDTH + CELL_WIDTH + 1))?;
    for (value, count) in frequencies {
        writeln!(
            writer,
            "  {:<LABEL_WIDTH$} {count:>CELL_WIDTH$}",
            value.to_string()
        )?;
    }
    Ok(())
}

/// Rows labelled by `row_column` values, one cell per `columns` value.
fn write_matrix<W, T>(
    writer: &mut W,
    row_column: &str,
    rows: &[Category],
    columns: &[Category],
    values: &[Vec<T>],
    format_cell: impl Fn(&T) -> String,
) -> io::Result<()>
where
    W: Write,
{
    write!(writer, "  {row_column:<LABEL_WIDTH$}")?;
    for column in columns {
        write!(writer, " {:>CELL_WIDTH$}", truncate(&column.to_string()))?;
    }
    writeln!(writer)?;
    writeln!(
        writer,
        "  {}",
        "-".repeat(LABEL_WIDTH + (CELL_WIDTH + 1) * columns.len())
    )?;
    for (row, line) in rows.iter().zip(values) {
        write!(writer, "  {:<LABEL_WIDTH$}", row.to_string())?;
        for value in line {
            write!(writer, " {:>CELL_WIDTH$}", format_cell(value))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn truncate(label: &str) -> String {
    if label.chars().count() <= CELL_WIDTH {
        label.to_owned()
    } else {
        let mut short = label.chars().take(CELL_WIDTH - 1).collect::<String>();
        short.push('~');
        short
    }
}

pub(crate) fn write_joint_counts<W>(
    writer: &mut W,
    row_column: &str,
    counts: &JointCounts,
) -> io::Result<()>
where
    W: Write,
{
    write_matrix(
        writer,
        row_column,
        counts.rows(),
        counts.columns(),
        counts.counts(),
        u64::to_string,
    )?;
    writeln!(writer, "  Total: {}", counts.total())
}

pub(crate) fn write_probabilities<W>(
    writer: &mut W,
    row_column: &str,
    table: &Probabilities,
) -> io::Result<()>
where
    W: Write,
{
    write_matrix(
        writer,
        row_column,
        table.rows(),
        table.columns(),
        table.values(),
        |p| format!("{p:.4}"),
    )
}

/// Cross table in a shape `serde_json` can write.
#[derive(Debug, Serialize)]
pub(crate) struct MatrixJson<T> {
    pub row_column: String,
    pub column_column: String,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<T>>,
}

impl<T: Clone> MatrixJson<T> {
    pub fn new(
        row_column: &str,
        column_column: &str,
        rows: &[Category],
        columns: &[Category],
        values: &[Vec<T>],
    ) -> Self {
        Self {
            row_column: row_column.to_owned(),
            column_column: column_column.to_owned(),
            rows: rows.iter().map(ToString::to_string).collect(),
            columns: columns.iter().map(ToString::to_string).collect(),
            values: values.to_vec(),
        }
    }
}

pub(crate) fn write_vector_report<W>(
    writer: &mut W,
    report: &VectorReport,
    full: bool,
) -> io::Result<()>
where
    W: Write,
{
    if let Some(truncation) = &report.truncation {
        writeln!(
            writer,
            "Warning: {} has {} values and {} has {}; using the first {}",
            report.left_column,
            truncation.left_len,
            report.right_column,
            truncation.right_len,
            truncation.used_len
        )?;
    }
    writeln!(writer, "Vector 1 ({}): {}", report.left_column, report.left_preview())?;
    writeln!(writer, "Vector 2 ({}): {}", report.right_column, report.right_preview())?;
    let rows = if full {
        report.rows()
    } else {
        report.preview_rows()
    };
    for (operation, result) in rows {
        writeln!(writer, "  {operation:<30} {result}")?;
    }
    Ok(())
}

pub(crate) fn write_combinatorics<W>(
    writer: &mut W,
    description: impl Display,
    record: &CombinatoricsRecord,
) -> io::Result<()>
where
    W: Write,
{
    writeln!(writer, "{description} = {}", record.result)
}

pub(crate) fn write_column_combinations<W>(
    writer: &mut W,
    report: &ColumnCombinationReport,
    values: &[(Category, usize)],
) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        writer,
        "Column '{}' has {} unique values:",
        report.column, report.unique_values
    )?;
    let names = values
        .iter()
        .map(|(value, _)| value.to_string())
        .collect::<Vec<_>>();
    writeln!(writer, "  {}", names.join(", "))?;
    let r = report.combination_size;
    writeln!(
        writer,
        "Combinations of {r}: {}",
        report.simple_combinations
    )?;
    writeln!(
        writer,
        "Combinations of {r} with repetition: {}",
        report.combinations_with_repetition
    )
}

pub(crate) fn write_columns<W>(writer: &mut W, table: &Table) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        writer,
        "{} rows x {} columns",
        table.row_count(),
        table.column_count()
    )?;
    writeln!(writer, "Numeric columns:")?;
    for name in table.numeric_column_names() {
        writeln!(writer, "  {name}")?;
    }
    writeln!(writer, "Categorical columns:")?;
    for name in table.categorical_column_names() {
        writeln!(writer, "  {name}")?;
    }
    Ok(())
}

/// Column names in a shape `serde_json` can write.
#[derive(Debug, Serialize)]
pub(crate) struct ColumnsJson<'a> {
    pub rows: usize,
    pub numeric: Vec<&'a str>,
    pub categorical: Vec<&'a str>,
}

impl<'a> ColumnsJson<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self {
            rows: table.row_count(),
            numeric: table.numeric_column_names().collect(),
            categorical: table.categorical_column_names().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use delayscope_data::probability;

    use super::*;

    const CSV: &str = "\
carrier_name,airport,arr_delay
Delta,ATL,10
Delta,JFK,
United,ATL,30
";

    fn table() -> Table {
        Table::from_csv_reader(CSV.as_bytes()).unwrap()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_joint_counts_layout() {
        let counts = probability::joint_counts(&table(), "carrier_name", "airport").unwrap();
        let text = render(|out| write_joint_counts(out, "carrier_name", &counts));
        let lines = text.lines().collect::<Vec<_>>();
        assert!(lines[0].starts_with("  carrier_name"));
        assert!(lines[0].contains("ATL") && lines[0].contains("JFK"));
        assert!(lines[2].starts_with("  Delta"));
        assert!(lines[3].starts_with("  United"));
        assert_eq!(lines[4], "  Total: 3");
    }

    #[test]
    fn test_long_labels_are_shortened() {
        assert_eq!(truncate("ATL"), "ATL");
        let short = truncate("Delta Air Lines Inc.");
        assert_eq!(short.chars().count(), CELL_WIDTH);
        assert!(short.ends_with('~'));
    }

    #[test]
    fn test_columns() {
        let text = render(|out| write_columns(out, &table()));
        assert_eq!(
            text,
            "3 rows x 3 columns\nNumeric columns:\n  arr_delay\nCategorical columns:\n  carrier_name\n  airport\n"
        );
    }

    #[test]
    fn test_matrix_json() {
        let probs = probability::joint_probability(&table(), "carrier_name", "airport").unwrap();
        let json = MatrixJson::new(
            "carrier_name",
            "airport",
            probs.rows(),
            probs.columns(),
            probs.values(),
        );
        assert_eq!(json.rows, ["Delta", "United"]);
        assert_eq!(json.columns, ["ATL", "JFK"]);
        let value = serde_json::to_value(&json).unwrap();
        assert_eq!(value["values"][1][1], 0.0);
    }
}
