//! The analysis session: one loaded table plus its cache and result store.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    cache::{StatCache, StatKey},
    combinatorics::{Calculation, ColumnCombinationReport, CombinatoricsRecord},
    descriptive::{self, StatisticKind, StatisticRecord},
    error::{AnalysisError, AnalysisResult},
    probability::{self, JointCounts, Probabilities},
    query::{self, Condition},
    region::{self, REGION_COLUMN},
    store::ResultStore,
    table::{Category, Table},
    vector::VectorReport,
};

/// Something the caller should show the user after an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Saved(PathBuf),
    Warning(String),
}

/// Owns the working table and runs every analysis operation against it.
///
/// When a [`ResultStore`] is attached, each operation also writes its result
/// file. Persistence failures do not fail the operation; they are logged and
/// reported through [`AnalysisSession::take_notices`].
#[derive(Debug)]
pub struct AnalysisSession {
    table: Table,
    cache: StatCache,
    store: Option<ResultStore>,
    notices: Vec<Notice>,
}

impl AnalysisSession {
    pub fn new(table: Table, store: Option<ResultStore>) -> Self {
        Self {
            table,
            cache: StatCache::new(),
            store,
            notices: Vec::new(),
        }
    }

    /// Loads `path`, starting with an empty table if it cannot be read.
    pub fn load<P>(path: P, store: Option<ResultStore>) -> Self
    where
        P: AsRef<Path>,
    {
        let (table, err) = Table::load_or_empty(path);
        let mut session = Self::new(table, store);
        if let Some(err) = err {
            session.notices.push(Notice::Warning(err.to_string()));
        }
        session
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Swaps in a new table and drops every cached statistic.
    pub fn replace_table(&mut self, table: Table) {
        self.table = table;
        self.cache.clear();
    }

    #[must_use]
    pub fn cache(&self) -> &StatCache {
        &self.cache
    }

    #[must_use]
    pub fn store(&self) -> Option<&ResultStore> {
        self.store.as_ref()
    }

    /// Drains the notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn persist<F>(&mut self, what: &str, save: F)
    where
        F: FnOnce(&ResultStore) -> AnalysisResult<PathBuf>,
    {
        let Some(store) = &self.store else {
            return;
        };
        match save(store) {
            Ok(path) => self.notices.push(Notice::Saved(path)),
            Err(err) => {
                warn!("Could not save {what}: {err}");
                self.notices
                    .push(Notice::Warning(format!("Could not save {what}: {err}")));
            }
        }
    }

    /// Computes (or recalls) a statistic for `column`.
    pub fn statistic(
        &mut self,
        kind: StatisticKind,
        column: &str,
        weights: Option<&str>,
    ) -> AnalysisResult<StatisticRecord> {
        let weights = weights.filter(|_| kind == StatisticKind::WeightedMean);
        let key = StatKey::new(column, kind, weights);
        if let Some(record) = self.cache.get(&key) {
            debug!(column, %kind, "Using cached statistic");
            return Ok(record.clone());
        }

        let value = descriptive::compute(&self.table, kind, column, weights)?;
        let record = StatisticRecord {
            statistic: kind,
            column: column.to_owned(),
            weights_column: weights.map(str::to_owned),
            value,
            computed_at: Utc::now(),
        };
        self.cache.insert(key, record.clone());
        self.persist("statistic", |store| store.save_statistic(&record));
        Ok(record)
    }

    pub fn mean(&mut self, column: &str) -> AnalysisResult<f64> {
        Ok(self.statistic(StatisticKind::Mean, column, None)?.value)
    }

    pub fn median(&mut self, column: &str) -> AnalysisResult<f64> {
        Ok(self.statistic(StatisticKind::Median, column, None)?.value)
    }

    pub fn std_dev(&mut self, column: &str) -> AnalysisResult<f64> {
        Ok(self.statistic(StatisticKind::Std, column, None)?.value)
    }

    pub fn weighted_mean(&mut self, column: &str, weights: &str) -> AnalysisResult<f64> {
        Ok(self
            .statistic(StatisticKind::WeightedMean, column, Some(weights))?
            .value)
    }

    pub fn joint_counts(&mut self, a: &str, b: &str) -> AnalysisResult<JointCounts> {
        let counts = probability::joint_counts(&self.table, a, b)?;
        self.persist("joint counts", |store| {
            store.save_table(
                a,
                b,
                "joint_counts",
                counts.rows(),
                counts.columns(),
                counts.counts(),
            )
        });
        Ok(counts)
    }

    pub fn joint_probability(&mut self, a: &str, b: &str) -> AnalysisResult<Probabilities> {
        let table = probability::joint_probability(&self.table, a, b)?;
        self.persist_probabilities(a, b, "joint_probability", &table);
        Ok(table)
    }

    pub fn conditional_probability(&mut self, a: &str, b: &str) -> AnalysisResult<Probabilities> {
        let table = probability::conditional_probability(&self.table, a, b)?;
        self.persist_probabilities(a, b, "conditional_probability", &table);
        Ok(table)
    }

    fn persist_probabilities(&mut self, a: &str, b: &str, suffix: &str, table: &Probabilities) {
        self.persist("probability table", |store| {
            store.save_table(a, b, suffix, table.rows(), table.columns(), table.values())
        });
    }

    pub fn combinatorics(
        &mut self,
        calculation: &Calculation,
    ) -> AnalysisResult<CombinatoricsRecord> {
        let record = calculation.record()?;
        self.persist("combinatorics result", |store| store.save_combinatorics(&record));
        Ok(record)
    }

    /// Combination counts using the number of distinct values in `column` as `n`.
    pub fn analyze_column_combinations(
        &mut self,
        column: &str,
        r: u64,
    ) -> AnalysisResult<ColumnCombinationReport> {
        let report = ColumnCombinationReport::analyze(&self.table, column, r)?;
        for calculation in [
            Calculation::Combination {
                n: report.unique_values,
                r,
            },
            Calculation::CombinationWithRepetition {
                n: report.unique_values,
                r,
            },
        ] {
            self.combinatorics(&calculation)?;
        }
        self.persist("combination analysis", |store| {
            store.save_column_combinations(&report)
        });
        Ok(report)
    }

    pub fn vector_ops(&mut self, a: &str, b: &str) -> AnalysisResult<VectorReport> {
        let report = VectorReport::compute(&self.table, a, b)?;
        if let Some(t) = report.truncation {
            self.notices.push(Notice::Warning(format!(
                "Vectors had lengths {} and {}; both truncated to {}",
                t.left_len, t.right_len, t.used_len
            )));
        }
        self.persist("vector operations", |store| store.save_vector_report(&report));
        Ok(report)
    }

    pub fn query(&self, column: &str, condition: &Condition) -> AnalysisResult<Table> {
        query::query(&self.table, column, condition)
    }

    pub fn carrier_delay_count(&self, carrier: &str) -> AnalysisResult<usize> {
        query::carrier_delay_count(&self.table, carrier)
    }

    pub fn unique_count(&self, column: &str) -> AnalysisResult<usize> {
        self.table.unique_count(column)
    }

    pub fn value_frequencies(&self, column: &str) -> AnalysisResult<Vec<(Category, usize)>> {
        self.table.value_frequencies(column)
    }

    /// Adds the `region` column; statistics cached for it are dropped.
    pub fn categorize_airports(&mut self) -> AnalysisResult<()> {
        region::categorize_airports(&mut self.table)?;
        self.cache.invalidate(REGION_COLUMN);
        Ok(())
    }

    /// Adds the `region` column only if it is not there yet.
    pub fn ensure_regions(&mut self) -> AnalysisResult<()> {
        if self.table.has_column(REGION_COLUMN) {
            Ok(())
        } else {
            self.categorize_airports()
        }
    }

    pub fn invalidate(&mut self, column: &str) -> usize {
        self.cache.invalidate(column)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Writes the cache snapshot; fails when persistence is disabled.
    pub fn export_cache(&self) -> AnalysisResult<PathBuf> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| AnalysisError::validation("Result persistence is disabled"))?;
        store.save_cache_snapshot(&self.cache)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::table::{Column, tests::sample_table};

    fn in_memory() -> AnalysisSession {
        AnalysisSession::new(sample_table(), None)
    }

    #[test]
    fn test_statistic_is_cached() {
        let mut session = in_memory();
        let first = session.statistic(StatisticKind::Mean, "arr_delay", None).unwrap();
        let second = session.statistic(StatisticKind::Mean, "arr_delay", None).unwrap();
        assert_eq!(first, second);
        assert_eq!(session.cache().len(), 1);
    }

    #[test]
    fn test_statistics_skip_not_a_number_cells() {
        let csv = "arr_delay,x\n10,1\n-nan,#N/A\n20,3\nNAN,4\n";
        let table = Table::from_csv_reader(csv.as_bytes()).unwrap();
        let mut session = AnalysisSession::new(table, None);
        assert_eq!(session.mean("arr_delay").unwrap(), 15.0);
        assert_eq!(session.median("x").unwrap(), 3.0);
    }

    #[test]
    fn test_replace_table_clears_cache() {
        let mut session = in_memory();
        assert_eq!(session.mean("arr_delay").unwrap(), 190.0);
        session.replace_table(
            Table::new(vec![Column::numeric("arr_delay", vec![Some(1.0), Some(3.0)])]).unwrap(),
        );
        assert!(session.cache().is_empty());
        assert_eq!(session.mean("arr_delay").unwrap(), 2.0);
    }

    #[test]
    fn test_invalidate_drops_weighted_entries() {
        let mut session = in_memory();
        session.weighted_mean("arr_delay", "arr_flights").unwrap();
        session.median("arr_delay").unwrap();
        assert_eq!(session.invalidate("arr_flights"), 1);
        assert_eq!(session.cache().len(), 1);
    }

    #[test]
    fn test_empty_session_reports_no_data() {
        let mut session = AnalysisSession::load("/nonexistent/input.csv", None);
        assert!(matches!(
            session.take_notices().as_slice(),
            [Notice::Warning(_)]
        ));
        assert!(matches!(session.mean("arr_delay"), Err(AnalysisError::NoData)));
    }

    #[test]
    fn test_results_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = AnalysisSession::new(sample_table(), Some(ResultStore::new(dir.path())));

        session.std_dev("arr_delay").unwrap();
        session.joint_probability("carrier_name", "airport").unwrap();
        session.analyze_column_combinations("carrier_name", 2).unwrap();
        session.vector_ops("arr_delay", "weather_delay").unwrap();

        for name in [
            "arr_delay_std.csv",
            "carrier_name_airport_joint_probability.csv",
            "combination_n3_r2.csv",
            "combination_with_repetition_n3_r2.csv",
            "carrier_name_combination_analysis.csv",
            "arr_delay_weather_delay_vector_operations.csv",
        ] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
        let saved = session
            .take_notices()
            .into_iter()
            .filter(|n| matches!(n, Notice::Saved(_)))
            .count();
        assert_eq!(saved, 6);
    }

    #[test]
    fn test_save_failure_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut session = AnalysisSession::new(sample_table(), Some(ResultStore::new(&blocker)));

        assert_eq!(session.mean("arr_delay").unwrap(), 190.0);
        assert!(matches!(
            session.take_notices().as_slice(),
            [Notice::Warning(_)]
        ));
    }

    #[test]
    fn test_export_cache_requires_store() {
        let session = in_memory();
        assert!(matches!(
            session.export_cache(),
            Err(AnalysisError::Validation { .. })
        ));
    }

    #[test]
    fn test_ensure_regions() {
        let mut session = in_memory();
        session.ensure_regions().unwrap();
        assert!(session.table().has_column(REGION_COLUMN));
        assert_eq!(session.unique_count(REGION_COLUMN).unwrap(), 5);
    }
}
