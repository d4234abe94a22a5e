//! Search history persistence.
//!
//! Every weather lookup is recorded as a [`SearchRecord`]. The write happens
//! on a detached task: callers never wait for it and its failure never reaches
//! the client.

use crate::{
    models::{SearchRecord, WeatherRecord},
    services::AppMetrics,
};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const RECENT_SEARCH_LIMIT: usize = 20;
pub const USER_SEARCH_LIMIT: usize = 50;
/// Oldest records are dropped past this many in [`InMemorySearchStore`]
pub const IN_MEMORY_RETENTION: usize = 1_000;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("email {0} is already registered")]
    DuplicateEmail(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage seam for search records
#[async_trait]
pub trait SearchStore: Send + Sync {
    async fn record(&self, search: SearchRecord) -> Result<(), StoreError>;

    /// Searches made by `user_id`, newest first
    async fn for_user(&self, user_id: &str, limit: usize) -> Result<Vec<SearchRecord>, StoreError>;

    /// Searches from everyone, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<SearchRecord>, StoreError>;
}

/// Process-local store. Records are kept in insertion order, which is also
/// creation order, and capped at [`IN_MEMORY_RETENTION`].
#[derive(Clone, Default)]
pub struct InMemorySearchStore {
    searches: Arc<RwLock<Vec<SearchRecord>>>,
}

impl InMemorySearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.searches.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.searches.read().await.is_empty()
    }
}

#[async_trait]
impl SearchStore for InMemorySearchStore {
    async fn record(&self, search: SearchRecord) -> Result<(), StoreError> {
        let mut searches = self.searches.write().await;
        searches.push(search);
        if searches.len() > IN_MEMORY_RETENTION {
            let excess = searches.len() - IN_MEMORY_RETENTION;
            searches.drain(..excess);
        }
        Ok(())
    }

    async fn for_user(&self, user_id: &str, limit: usize) -> Result<Vec<SearchRecord>, StoreError> {
        let searches = self.searches.read().await;
        Ok(searches
            .iter()
            .rev()
            .filter(|s| s.user.as_deref() == Some(user_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<SearchRecord>, StoreError> {
        let searches = self.searches.read().await;
        Ok(searches.iter().rev().take(limit).cloned().collect())
    }
}

impl SearchRecord {
    pub fn new(user: Option<String>, city: &str, response: WeatherRecord) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user,
            city: city.to_string(),
            response,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Persist `search` on a detached task. The returned handle is only useful
/// to tests; request handlers drop it.
pub fn spawn_search_write(
    store: Arc<dyn SearchStore>,
    search: SearchRecord,
    metrics: Option<AppMetrics>,
) -> tokio::task::JoinHandle<()> {
    actix_web::rt::spawn(async move {
        let city = search.city.clone();
        match store.record(search).await {
            Ok(()) => tracing::debug!(target: "search_history", city = %city, "Search saved"),
            Err(e) => {
                tracing::warn!(target: "search_history", city = %city, error = %e, "Search save failed");
                if let Some(metrics) = metrics {
                    metrics.search_persist_failures_total.inc();
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock_weather::current_for_city;

    fn search(user: Option<&str>, city: &str) -> SearchRecord {
        SearchRecord::new(user.map(str::to_string), city, current_for_city(city, 1_700_000_000))
    }

    #[actix_web::test]
    async fn test_recent_is_newest_first_and_bounded() {
        let store = InMemorySearchStore::new();
        for i in 0..25 {
            store.record(search(None, &format!("City{i}"))).await.unwrap();
        }

        let recent = store.recent(RECENT_SEARCH_LIMIT).await.unwrap();
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].city, "City24");
        assert_eq!(recent[19].city, "City5");
    }

    #[actix_web::test]
    async fn test_in_memory_store_drops_oldest_past_retention() {
        let store = InMemorySearchStore::new();
        for i in 0..IN_MEMORY_RETENTION + 3 {
            store.record(search(None, &format!("City{i}"))).await.unwrap();
        }

        assert_eq!(store.len().await, IN_MEMORY_RETENTION);
        let newest = store.recent(1).await.unwrap();
        assert_eq!(newest[0].city, format!("City{}", IN_MEMORY_RETENTION + 2));
        let oldest = store.recent(IN_MEMORY_RETENTION).await.unwrap();
        assert_eq!(oldest.last().unwrap().city, "City3");
    }

    #[actix_web::test]
    async fn test_for_user_filters_by_owner() {
        let store = InMemorySearchStore::new();
        store.record(search(Some("u1"), "Paris")).await.unwrap();
        store.record(search(None, "Rome")).await.unwrap();
        store.record(search(Some("u2"), "Oslo")).await.unwrap();
        store.record(search(Some("u1"), "Lima")).await.unwrap();

        let mine = store.for_user("u1", USER_SEARCH_LIMIT).await.unwrap();
        let cities: Vec<_> = mine.iter().map(|s| s.city.as_str()).collect();
        assert_eq!(cities, ["Lima", "Paris"]);
        assert!(store.for_user("nobody", 50).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_spawned_write_lands_in_store() {
        let store = InMemorySearchStore::new();
        let handle = spawn_search_write(Arc::new(store.clone()), search(None, "Paris"), None);
        handle.await.unwrap();

        assert_eq!(store.len().await, 1);
    }

    struct BrokenStore;

    #[async_trait]
    impl SearchStore for BrokenStore {
        async fn record(&self, _search: SearchRecord) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk full".to_string()))
        }

        async fn for_user(&self, _: &str, _: usize) -> Result<Vec<SearchRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn recent(&self, _: usize) -> Result<Vec<SearchRecord>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[actix_web::test]
    async fn test_failed_write_is_counted_not_propagated() {
        let metrics = AppMetrics::new().unwrap();
        let handle = spawn_search_write(
            Arc::new(BrokenStore),
            search(None, "Paris"),
            Some(metrics.clone()),
        );
        handle.await.unwrap();

        assert_eq!(metrics.search_persist_failures_total.get(), 1.0);
    }
}
