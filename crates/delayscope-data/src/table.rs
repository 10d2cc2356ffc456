//! In-memory table of named, typed columns loaded from a delimited file.
//!
//! Column types are inferred when loading: a column whose every present
//! cell parses as a number is [`ColumnData::Numeric`], anything else is
//! [`ColumnData::Categorical`]. Empty cells and the usual "not available"
//! spellings become missing values.

use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fmt,
    fs::File,
    io::{self, BufReader},
    num::ParseFloatError,
    path::Path,
};

use tracing::{info, warn};

use crate::error::{AnalysisError, AnalysisResult};

/// Cell spellings treated as missing when loading.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single cell value usable as a grouping key.
///
/// Numbers sort before text; numbers are ordered with [`f64::total_cmp`].
#[derive(Debug, Clone)]
pub enum Category {
    Number(f64),
    Text(String),
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Category {}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => fmt::Display::fmt(n, f),
            Self::Text(s) => fmt::Display::fmt(s, f),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for Category {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    /// Builds a column from raw text cells, inferring its type.
    ///
    /// Numeric cells that parse to NaN or an infinity are missing.
    fn from_cells(name: String, cells: Vec<Option<String>>) -> Self {
        let parsed = cells
            .iter()
            .map(|cell| -> Result<Option<f64>, ParseFloatError> {
                let value = cell.as_deref().map(str::parse::<f64>).transpose()?;
                Ok(value.filter(|v| v.is_finite()))
            })
            .collect::<Result<Vec<_>, _>>();
        match parsed {
            Ok(numbers) if cells.iter().any(Option::is_some) => Self::numeric(name, numbers),
            _ => Self::categorical(name, cells),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// Value at `row` as a grouping key, or `None` if missing.
    #[must_use]
    pub fn category(&self, row: usize) -> Option<Category> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map(Category::Number),
            ColumnData::Categorical(v) => v.get(row).cloned().flatten().map(Category::Text),
        }
    }

    /// Cell at `row` formatted for display; missing cells render as `NaN`.
    #[must_use]
    pub fn display_cell(&self, row: usize) -> String {
        self.category(row)
            .map_or_else(|| "NaN".to_owned(), |c| c.to_string())
    }

    fn take_rows(&self, rows: &[usize]) -> Self {
        let data = match &self.data {
            ColumnData::Numeric(v) => ColumnData::Numeric(rows.iter().map(|&i| v[i]).collect()),
            ColumnData::Categorical(v) => {
                ColumnData::Categorical(rows.iter().map(|&i| v[i].clone()).collect())
            }
        };
        Self {
            name: self.name.clone(),
            data,
        }
    }
}

/// An ordered collection of equal-length named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> AnalysisResult<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(AnalysisError::validation(format!(
                "Column '{}' has {} rows, expected {row_count}",
                bad.name(),
                bad.len()
            )));
        }
        Ok(Self { columns, row_count })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a delimited table with a header row.
    ///
    /// Short records are padded with missing values.
    pub fn from_csv_reader<R>(reader: R) -> Result<Self, csv::Error>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader.headers()?.clone();
        let mut cells = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (idx, column) in cells.iter_mut().enumerate() {
                let cell = record
                    .get(idx)
                    .filter(|cell| !MISSING_TOKENS.contains(cell))
                    .map(str::to_owned);
                column.push(cell);
            }
        }

        let row_count = cells.first().map_or(0, Vec::len);
        let columns = headers
            .iter()
            .zip(cells)
            .map(|(name, cells)| Column::from_cells(name.to_owned(), cells))
            .collect();
        Ok(Self { columns, row_count })
    }

    /// Loads a table from a CSV file.
    pub fn load<P>(path: P) -> AnalysisResult<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AnalysisError::Io {
            path: path.to_owned(),
            source,
        })?;
        let table =
            Self::from_csv_reader(BufReader::new(file)).map_err(|source| AnalysisError::Csv {
                path: path.to_owned(),
                source,
            })?;
        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "Data loaded"
        );
        Ok(table)
    }

    /// Loads a table, degrading to an empty table when the file is missing
    /// or unreadable.
    ///
    /// The diagnostic is logged and also returned so callers can show it.
    pub fn load_or_empty<P>(path: P) -> (Self, Option<AnalysisError>)
    where
        P: AsRef<Path>,
    {
        match Self::load(path) {
            Ok(table) => (table, None),
            Err(err) => {
                warn!("{err}; continuing with an empty table");
                (Self::empty(), Some(err))
            }
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `true` when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn numeric_column_names(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(Column::name)
    }

    pub fn categorical_column_names(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| !c.is_numeric())
            .map(Column::name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    /// Fails with [`AnalysisError::NoData`] when the table has no rows.
    pub fn require_data(&self) -> AnalysisResult<()> {
        if self.is_empty() {
            Err(AnalysisError::NoData)
        } else {
            Ok(())
        }
    }

    /// Looks up a column of a non-empty table.
    pub fn column(&self, name: &str) -> AnalysisResult<&Column> {
        self.require_data()?;
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| AnalysisError::unknown_column(name))
    }

    /// Looks up a numeric column of a non-empty table.
    pub fn numeric_column(&self, name: &str) -> AnalysisResult<&[Option<f64>]> {
        match self.column(name)?.data() {
            ColumnData::Numeric(values) => Ok(values),
            ColumnData::Categorical(_) => Err(AnalysisError::NotNumeric {
                column: name.to_owned(),
            }),
        }
    }

    /// Present (non-missing) values of a numeric column.
    pub fn present_values(&self, name: &str) -> AnalysisResult<Vec<f64>> {
        Ok(self.numeric_column(name)?.iter().flatten().copied().collect())
    }

    /// Adds a column, replacing any existing column with the same name.
    pub fn set_column(&mut self, column: Column) -> AnalysisResult<()> {
        if !self.columns.is_empty() && column.len() != self.row_count {
            return Err(AnalysisError::validation(format!(
                "Column '{}' has {} rows, expected {}",
                column.name(),
                column.len(),
                self.row_count
            )));
        }
        if self.columns.is_empty() {
            self.row_count = column.len();
        }
        match self.columns.iter_mut().find(|c| c.name() == column.name()) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Table containing only the rows for which `keep` returns `true`.
    #[must_use]
    pub fn filter_rows<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let rows = (0..self.row_count).filter(|&i| keep(i)).collect::<Vec<_>>();
        Self {
            columns: self.columns.iter().map(|c| c.take_rows(&rows)).collect(),
            row_count: rows.len(),
        }
    }

    /// First `n` rows.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        self.filter_rows(|i| i < n)
    }

    /// Number of distinct non-missing values in a column.
    pub fn unique_count(&self, name: &str) -> AnalysisResult<usize> {
        Ok(self.value_frequencies(name)?.len())
    }

    /// Non-missing values of a column with their counts, most frequent first
    /// (ties in value order).
    pub fn value_frequencies(&self, name: &str) -> AnalysisResult<Vec<(Category, usize)>> {
        let column = self.column(name)?;
        let mut counts = BTreeMap::<Category, usize>::new();
        for row in 0..self.row_count {
            if let Some(value) = column.category(row) {
                *counts.entry(value).or_default() += 1;
            }
        }
        let mut counts = counts.into_iter().collect::<Vec<_>>();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(counts)
    }

    /// Mean of `value` for every distinct value of `key`, in key order.
    ///
    /// Rows where either cell is missing are skipped.
    #[expect(clippy::cast_precision_loss)]
    pub fn group_mean(&self, key: &str, value: &str) -> AnalysisResult<Vec<(Category, f64)>> {
        let key_column = self.column(key)?;
        let values = self.numeric_column(value)?;
        let mut groups = BTreeMap::<Category, (f64, usize)>::new();
        for (row, v) in values.iter().enumerate() {
            if let (Some(k), Some(v)) = (key_column.category(row), v) {
                let entry = groups.entry(k).or_default();
                entry.0 += v;
                entry.1 += 1;
            }
        }
        Ok(groups
            .into_iter()
            .map(|(k, (sum, n))| (k, sum / n as f64))
            .collect())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self
            .columns
            .iter()
            .map(|c| {
                (0..self.row_count)
                    .map(|row| c.display_cell(row).len())
                    .chain([c.name().len()])
                    .max()
                    .unwrap_or(0)
            })
            .collect::<Vec<_>>();

        for (column, width) in self.columns.iter().zip(&widths) {
            write!(f, "{:>width$}  ", column.name())?;
        }
        writeln!(f)?;
        for row in 0..self.row_count {
            for (column, width) in self.columns.iter().zip(&widths) {
                write!(f, "{:>width$}  ", column.display_cell(row))?;
            }
            writeln!(f)?;
        }
        write!(f, "[{} rows x {} columns]", self.row_count, self.columns.len())
    }
}
