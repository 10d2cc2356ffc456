//! Persistence of per-operation results under an output directory.

use std::{
    fmt::Display,
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::info;

use crate::{
    cache::StatCache,
    combinatorics::{ColumnCombinationReport, CombinatoricsRecord},
    descriptive::StatisticRecord,
    error::{AnalysisError, AnalysisResult},
    vector::VectorReport,
};

pub const CACHE_SNAPSHOT_FILE: &str = "stat_cache.json";

/// Replaces characters that are unsafe in file names with `_`.
///
/// ```
/// # use delayscope_data::store::sanitize_file_stem;
/// assert_eq!(sanitize_file_stem("arr delay/2023"), "arr_delay_2023");
/// ```
#[must_use]
pub fn sanitize_file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct VectorRow<'a> {
    operation: &'a str,
    result: &'a str,
}

/// Writes result files into a directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of `{stem}.{ext}` in the output directory, creating the directory.
    pub fn path_for(&self, stem: &str, ext: &str) -> AnalysisResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| AnalysisError::Io {
            path: self.dir.clone(),
            source,
        })?;
        Ok(self.dir.join(format!("{}.{ext}", sanitize_file_stem(stem))))
    }

    fn csv_writer(&self, stem: &str) -> AnalysisResult<(PathBuf, csv::Writer<File>)> {
        let path = self.path_for(stem, "csv")?;
        let writer = csv::Writer::from_path(&path).map_err(|source| AnalysisError::Csv {
            path: path.clone(),
            source,
        })?;
        Ok((path, writer))
    }

    fn write_records<T, I>(&self, stem: &str, records: I) -> AnalysisResult<PathBuf>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let (path, mut writer) = self.csv_writer(stem)?;
        let csv_err = |source| AnalysisError::Csv {
            path: path.clone(),
            source,
        };
        for record in records {
            writer.serialize(record).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| AnalysisError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Result saved");
        Ok(path)
    }

    /// Writes a labelled matrix: a header of column labels, then one line per row label.
    fn write_matrix<R, C, V>(
        &self,
        stem: &str,
        corner: &str,
        rows: &[R],
        columns: &[C],
        values: &[Vec<V>],
    ) -> AnalysisResult<PathBuf>
    where
        R: Display,
        C: Display,
        V: Display,
    {
        let (path, mut writer) = self.csv_writer(stem)?;
        let csv_err = |source| AnalysisError::Csv {
            path: path.clone(),
            source,
        };
        let header = std::iter::once(corner.to_owned()).chain(columns.iter().map(ToString::to_string));
        writer.write_record(header).map_err(csv_err)?;
        for (label, line) in rows.iter().zip(values) {
            let record =
                std::iter::once(label.to_string()).chain(line.iter().map(ToString::to_string));
            writer.write_record(record).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| AnalysisError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "Result saved");
        Ok(path)
    }

    /// `{column}_{kind}.csv`
    pub fn save_statistic(&self, record: &StatisticRecord) -> AnalysisResult<PathBuf> {
        let stem = format!("{}_{}", record.column, record.statistic.file_suffix());
        self.write_records(&stem, [record])
    }

    /// `{a}_{b}_{suffix}.csv`, where `suffix` names the table kind.
    pub fn save_table<R, C, V>(
        &self,
        row_column: &str,
        column_column: &str,
        suffix: &str,
        rows: &[R],
        columns: &[C],
        values: &[Vec<V>],
    ) -> AnalysisResult<PathBuf>
    where
        R: Display,
        C: Display,
        V: Display,
    {
        let stem = format!("{row_column}_{column_column}_{suffix}");
        self.write_matrix(&stem, row_column, rows, columns, values)
    }

    /// `{kind}_n{n}[_r{r}].csv`
    pub fn save_combinatorics(&self, record: &CombinatoricsRecord) -> AnalysisResult<PathBuf> {
        self.write_records(&record.file_stem(), [record])
    }

    /// `{column}_combination_analysis.csv`
    pub fn save_column_combinations(
        &self,
        report: &ColumnCombinationReport,
    ) -> AnalysisResult<PathBuf> {
        let stem = format!("{}_combination_analysis", report.column);
        self.write_records(&stem, [report])
    }

    /// `{a}_{b}_vector_operations.csv`
    pub fn save_vector_report(&self, report: &VectorReport) -> AnalysisResult<PathBuf> {
        let stem = format!(
            "{}_{}_vector_operations",
            report.left_column, report.right_column
        );
        let rows = report.rows();
        self.write_records(
            &stem,
            rows.iter().map(|(operation, result)| VectorRow { operation, result }),
        )
    }

    /// Writes every cached statistic to `stat_cache.json`.
    pub fn save_cache_snapshot(&self, cache: &StatCache) -> AnalysisResult<PathBuf> {
        let path = self.path_for("stat_cache", "json")?;
        let file = File::create(&path).map_err(|source| AnalysisError::Io {
            path: path.clone(),
            source,
        })?;
        let records = cache.records().collect::<Vec<_>>();
        serde_json::to_writer_pretty(BufWriter::new(file), &records).map_err(|source| {
            AnalysisError::Json {
                path: path.clone(),
                source,
            }
        })?;
        info!(path = %path.display(), entries = records.len(), "Cache snapshot saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        combinatorics::Calculation, descriptive::StatisticKind, probability,
        table::tests::sample_table,
    };

    #[test]
    fn test_save_statistic() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("out"));
        let record = StatisticRecord {
            statistic: StatisticKind::Mean,
            column: "arr_delay".to_owned(),
            weights_column: None,
            value: 190.0,
            computed_at: Utc::now(),
        };
        let path = store.save_statistic(&record).unwrap();
        assert_eq!(path, dir.path().join("out/arr_delay_mean.csv"));
        let text = fs::read_to_string(path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("statistic,column,weights_column,value,computed_at")
        );
        assert!(lines.next().unwrap().starts_with("mean,arr_delay,,190.0,"));
    }

    #[test]
    fn test_save_combinatorics() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let record = Calculation::CircularPermutation { n: 4 }.record().unwrap();
        let path = store.save_combinatorics(&record).unwrap();
        assert!(path.ends_with("circular_permutation_n4.csv"));
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text, "calculation_type,n,r,result\ncircular_permutation,4,,6\n");
    }

    #[test]
    fn test_save_joint_counts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let table = sample_table();
        let counts = probability::joint_counts(&table, "carrier_name", "airport").unwrap();
        let path = store
            .save_table(
                "carrier_name",
                "airport",
                "joint_counts",
                counts.rows(),
                counts.columns(),
                counts.counts(),
            )
            .unwrap();
        assert!(path.ends_with("carrier_name_airport_joint_counts.csv"));
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(
            text.lines().next(),
            Some("carrier_name,ANC,ATL,JFK,ORD,XYZ")
        );
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_save_vector_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let report = VectorReport::from_vectors("a", "b", vec![1.0, 0.0], vec![0.0, 1.0]).unwrap();
        let path = store.save_vector_report(&report).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.starts_with("operation,result\nAddition,\"[1, 1]\"\n"));
        assert!(text.contains("Orthogonal,true"));
    }

    #[test]
    fn test_save_cache_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let path = store.save_cache_snapshot(&StatCache::new()).unwrap();
        assert_eq!(path.file_name().unwrap(), CACHE_SNAPSHOT_FILE);
        assert_eq!(fs::read_to_string(path).unwrap().trim(), "[]");
    }

    #[test]
    fn test_unwritable_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let store = ResultStore::new(blocker.join("sub"));
        let err = store.path_for("x", "csv").unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }
}
