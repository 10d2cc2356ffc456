//! Memoization of computed statistics with explicit invalidation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptive::{StatisticKind, StatisticRecord};

/// Identifies one cached statistic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatKey {
    pub column: String,
    pub kind: StatisticKind,
    pub weights: Option<String>,
}

impl StatKey {
    pub fn new(column: &str, kind: StatisticKind, weights: Option<&str>) -> Self {
        Self {
            column: column.to_owned(),
            kind,
            weights: weights.map(str::to_owned),
        }
    }

    /// Whether this statistic was computed from `column`.
    #[must_use]
    pub fn reads(&self, column: &str) -> bool {
        self.column == column || self.weights.as_deref() == Some(column)
    }
}

/// In-memory statistic cache.
///
/// Entries stay valid until [`StatCache::invalidate`] or [`StatCache::clear`]
/// is called; the owner is responsible for invalidating after the data changes.
#[derive(Debug, Clone, Default)]
pub struct StatCache {
    entries: BTreeMap<StatKey, StatisticRecord>,
}

impl StatCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &StatKey) -> Option<&StatisticRecord> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: StatKey, record: StatisticRecord) {
        self.entries.insert(key, record);
    }

    /// Drops every entry that reads `column`. Returns the number removed.
    pub fn invalidate(&mut self, column: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.reads(column));
        let removed = before - self.entries.len();
        debug!(column, removed, "Invalidated cached statistics");
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &StatisticRecord> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record(column: &str, kind: StatisticKind, weights: Option<&str>) -> StatisticRecord {
        StatisticRecord {
            statistic: kind,
            column: column.to_owned(),
            weights_column: weights.map(str::to_owned),
            value: 1.0,
            computed_at: Utc::now(),
        }
    }

    fn fill(cache: &mut StatCache, column: &str, kind: StatisticKind, weights: Option<&str>) {
        cache.insert(
            StatKey::new(column, kind, weights),
            record(column, kind, weights),
        );
    }

    #[test]
    fn test_get_after_insert() {
        let mut cache = StatCache::new();
        fill(&mut cache, "arr_delay", StatisticKind::Mean, None);
        assert!(
            cache
                .get(&StatKey::new("arr_delay", StatisticKind::Mean, None))
                .is_some()
        );
        assert!(
            cache
                .get(&StatKey::new("arr_delay", StatisticKind::Median, None))
                .is_none()
        );
    }

    #[test]
    fn test_weights_are_part_of_key() {
        let mut cache = StatCache::new();
        fill(&mut cache, "a", StatisticKind::WeightedMean, Some("w1"));
        assert!(
            cache
                .get(&StatKey::new("a", StatisticKind::WeightedMean, Some("w2")))
                .is_none()
        );
    }

    #[test]
    fn test_invalidate_matches_value_and_weights() {
        let mut cache = StatCache::new();
        fill(&mut cache, "a", StatisticKind::Mean, None);
        fill(&mut cache, "a", StatisticKind::Std, None);
        fill(&mut cache, "b", StatisticKind::WeightedMean, Some("a"));
        fill(&mut cache, "b", StatisticKind::Median, None);

        assert_eq!(cache.invalidate("a"), 3);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.invalidate("zzz"), 0);

        cache.clear();
        assert!(cache.is_empty());
    }
}
