//! Recently searched cities, newest first.

use crate::client::storage::{LocalStore, LocalStoreError, RECENT_SEARCHES_KEY};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

pub const MAX_RECENT_SEARCHES: usize = 5;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSearchEntry {
    pub city: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// Bounded list of distinct cities (compared case-insensitively)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecentSearches {
    entries: Vec<RecentSearchEntry>,
}

impl RecentSearches {
    pub fn entries(&self) -> &[RecentSearchEntry] {
        &self.entries
    }

    pub fn cities(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.city.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `city` to the front, dropping the oldest entry past the cap
    pub fn record(&mut self, city: &str, now_ms: i64) {
        let key = city.to_lowercase();
        self.entries.retain(|e| e.city.to_lowercase() != key);
        self.entries.insert(
            0,
            RecentSearchEntry {
                city: city.to_string(),
                timestamp: now_ms,
            },
        );
        self.entries.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Missing or unreadable history starts empty
    pub fn load(store: &dyn LocalStore) -> Result<Self, LocalStoreError> {
        let entries = match store.get(RECENT_SEARCHES_KEY)? {
            Some(raw) => serde_json::from_str::<Vec<RecentSearchEntry>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable recent searches");
                Vec::new()
            }),
            None => Vec::new(),
        };

        let mut searches = Self { entries };
        searches.entries.truncate(MAX_RECENT_SEARCHES);
        Ok(searches)
    }

    /// An empty list removes the key
    pub fn save(&self, store: &dyn LocalStore) -> Result<(), LocalStoreError> {
        if self.entries.is_empty() {
            return store.remove(RECENT_SEARCHES_KEY);
        }
        store.set(RECENT_SEARCHES_KEY, &serde_json::to_string(&self.entries)?)
    }
}

/// "Just now", "5m ago", "3h ago", "2d ago", or the date for older entries
pub fn time_ago(timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed = now_ms.saturating_sub(timestamp_ms).max(0);

    if elapsed < MINUTE_MS {
        "Just now".to_string()
    } else if elapsed < HOUR_MS {
        format!("{}m ago", elapsed / MINUTE_MS)
    } else if elapsed < DAY_MS {
        format!("{}h ago", elapsed / HOUR_MS)
    } else if elapsed < 7 * DAY_MS {
        format!("{}d ago", elapsed / DAY_MS)
    } else {
        DateTime::from_timestamp_millis(timestamp_ms)
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryStore;

    #[test]
    fn test_repeat_search_moves_to_front() {
        let mut recent = RecentSearches::default();
        recent.record("Paris", 1);
        recent.record("London", 2);
        recent.record("paris", 3);

        assert_eq!(recent.cities(), ["paris", "London"]);
        assert_eq!(recent.entries()[0].timestamp, 3);
    }

    #[test]
    fn test_sixth_city_drops_oldest() {
        let mut recent = RecentSearches::default();
        for (i, city) in ["A1", "B2", "C3", "D4", "E5", "F6"].iter().enumerate() {
            recent.record(city, i as i64);
        }

        assert_eq!(recent.cities(), ["F6", "E5", "D4", "C3", "B2"]);
    }

    #[test]
    fn test_clear() {
        let mut recent = RecentSearches::default();
        recent.record("Oslo", 0);
        recent.clear();
        assert!(recent.is_empty());
    }

    #[test]
    fn test_time_ago_buckets() {
        let now = 1_700_000_000_000;
        assert_eq!(time_ago(now - 59_999, now), "Just now");
        assert_eq!(time_ago(now - 60_000, now), "1m ago");
        assert_eq!(time_ago(now - 59 * MINUTE_MS, now), "59m ago");
        assert_eq!(time_ago(now - HOUR_MS, now), "1h ago");
        assert_eq!(time_ago(now - 23 * HOUR_MS, now), "23h ago");
        assert_eq!(time_ago(now - DAY_MS, now), "1d ago");
        assert_eq!(time_ago(now - 6 * DAY_MS, now), "6d ago");
        assert_eq!(time_ago(now - 7 * DAY_MS, now), "2023-11-07");
        assert_eq!(time_ago(now + 5_000, now), "Just now");
    }

    #[test]
    fn test_load_and_save() {
        let store = MemoryStore::new();
        assert!(RecentSearches::load(&store).unwrap().is_empty());

        let mut recent = RecentSearches::default();
        recent.record("Lima", 10);
        recent.save(&store).unwrap();
        assert_eq!(RecentSearches::load(&store).unwrap(), recent);

        recent.clear();
        recent.save(&store).unwrap();
        assert_eq!(store.get(RECENT_SEARCHES_KEY).unwrap(), None);
    }

    #[test]
    fn test_unreadable_history_starts_empty() {
        let store = MemoryStore::new();
        store.set(RECENT_SEARCHES_KEY, "not json").unwrap();
        assert!(RecentSearches::load(&store).unwrap().is_empty());
    }
}
