//! In-memory cache implementation.

use async_trait::async_trait;
use chrono::Utc;
use period_core::{RankingCache, RankingRequest, RankingResponse, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Cache entry with timestamp for TTL-based invalidation.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    cached_at: chrono::DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age > chrono::TimeDelta::from_std(ttl).unwrap_or(chrono::TimeDelta::MAX)
    }
}

/// Key for cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    provider: String,
    request: RankingRequest,
}

/// Simple in-memory cache for ranking responses.
///
/// Data is stored in a `RwLock`-protected `HashMap` and is lost when the cache
/// is dropped. Responses are cloned on get/put operations.
///
/// With a TTL set, entries older than the TTL are treated as misses and are
/// evicted on the next `put`, so a long-lived cache does not grow without bound.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry<RankingResponse>>>,
    ttl: Option<Duration>,
}

impl InMemoryCache {
    /// Create a new empty in-memory cache whose entries never expire.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty in-memory cache whose entries expire after `ttl`.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::default(),
            ttl: Some(ttl),
        }
    }

    /// Returns the configured time to live, if any.
    #[must_use]
    pub const fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns the number of cached responses.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RankingCache for InMemoryCache {
    #[instrument(
        skip(self, request),
        fields(provider = %provider, selection = ?request.selection())
    )]
    async fn get(
        &self,
        provider: &str,
        request: &RankingRequest,
    ) -> Result<Option<RankingResponse>> {
        let key = CacheKey {
            provider: provider.to_string(),
            request: request.clone(),
        };

        let cache = self.entries.read().await;
        match cache.get(&key) {
            Some(entry) if self.ttl.is_some_and(|ttl| entry.is_stale(ttl)) => {
                debug!("Cache entry expired for ranking");
                Ok(None)
            }
            Some(entry) => {
                debug!("Cache hit for ranking");
                Ok(Some(entry.data.clone()))
            }
            None => {
                debug!("Cache miss for ranking");
                Ok(None)
            }
        }
    }

    #[instrument(
        skip(self, request, response),
        fields(provider = %provider, selection = ?request.selection())
    )]
    async fn put(
        &self,
        provider: &str,
        request: &RankingRequest,
        response: &RankingResponse,
    ) -> Result<()> {
        let key = CacheKey {
            provider: provider.to_string(),
            request: request.clone(),
        };

        let mut cache = self.entries.write().await;
        if let Some(ttl) = self.ttl {
            cache.retain(|_, entry| !entry.is_stale(ttl));
        }
        cache.insert(key, CacheEntry::new(response.clone()));
        debug!("Cached ranking response");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize> {
        let mut cache = self.entries.write().await;
        let before = cache.len();
        cache.retain(|_, entry| !entry.is_stale(ttl));
        let removed = before - cache.len();

        if removed > 0 {
            debug!("Invalidated {} stale cache entries", removed);
        }

        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use period_core::{
        PeriodType, RankingPage, RankingQuery, Selection, StatementType, StockRanking,
        StockRankingQuery,
    };

    fn leaderboard() -> (RankingRequest, RankingResponse) {
        let selection = Selection::new(StatementType::CashFlow, 2024, PeriodType::Annual, 4);
        let query = RankingQuery::new("free_cash_flow", selection).unwrap();
        let page = RankingPage {
            query: query.clone(),
            entries: Vec::new(),
            has_next_page: false,
        };
        (
            RankingRequest::Leaderboard(query),
            RankingResponse::Leaderboard(page),
        )
    }

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = InMemoryCache::new();
        let (request, response) = leaderboard();

        // Initially no data
        assert!(cache.get("test", &request).await.unwrap().is_none());

        cache.put("test", &request, &response).await.unwrap();

        let cached = cache.get("test", &request).await.unwrap();
        assert_eq!(cached, Some(response));
        assert_eq!(cache.len().await, 1);

        // Entries are scoped per provider
        assert!(cache.get("other", &request).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_distinguishes_selections() {
        let cache = InMemoryCache::new();
        let (request, response) = leaderboard();
        cache.put("test", &request, &response).await.unwrap();

        let selection = Selection::new(StatementType::CashFlow, 2023, PeriodType::Annual, 4);
        let other = RankingRequest::Leaderboard(
            RankingQuery::new("free_cash_flow", selection).unwrap(),
        );
        assert!(cache.get("test", &other).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_stock_ranking() {
        let cache = InMemoryCache::new();
        let selection = Selection::new(StatementType::BalanceSheet, 2024, PeriodType::Quarterly, 2);
        let query = StockRankingQuery::new("2330", selection).unwrap();
        let response = RankingResponse::Stock(StockRanking {
            query: query.clone(),
            country: "台灣".to_string(),
            sector: "半導體業".to_string(),
            ranks: Vec::new(),
        });
        let request = RankingRequest::Stock(query);

        cache.put("test", &request, &response).await.unwrap();
        assert_eq!(cache.get("test", &request).await.unwrap(), Some(response));
    }

    #[tokio::test]
    async fn test_memory_cache_invalidate_stale() {
        let cache = InMemoryCache::new();
        let (request, response) = leaderboard();
        cache.put("test", &request, &response).await.unwrap();

        assert_eq!(cache.invalidate_stale(Duration::from_secs(3600)).await.unwrap(), 0);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(cache.invalidate_stale(Duration::ZERO).await.unwrap(), 1);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_cache_ttl_expires_entries() {
        let cache = InMemoryCache::with_ttl(Duration::from_millis(1));
        let (request, response) = leaderboard();
        cache.put("test", &request, &response).await.unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.get("test", &request).await.unwrap().is_none());

        // The expired entry is evicted when the next response is stored.
        let selection = Selection::new(StatementType::CashFlow, 2023, PeriodType::Annual, 4);
        let other = RankingRequest::Leaderboard(
            RankingQuery::new("free_cash_flow", selection).unwrap(),
        );
        cache.put("test", &other, &response).await.unwrap();
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("test", &other).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_memory_cache_without_ttl_keeps_entries() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.ttl(), None);
        let (request, response) = leaderboard();
        cache.put("test", &request, &response).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(cache.get("test", &request).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_memory_cache_clear() {
        let cache = InMemoryCache::new();
        let (request, response) = leaderboard();
        cache.put("test", &request, &response).await.unwrap();

        cache.clear().await.unwrap();

        assert!(cache.get("test", &request).await.unwrap().is_none());
    }
}
