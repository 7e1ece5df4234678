//! Cache trait for storing ranking responses.
//!
//! This module defines the [`RankingCache`] trait that provides a unified interface
//! for caching backend responses keyed by the request that produced them.

use async_trait::async_trait;
use std::time::Duration;

use crate::{
    error::Result,
    ranking::{RankingRequest, RankingResponse},
};

/// Trait for caching ranking responses.
///
/// Requests are built from normalized selections, so two UI states that
/// normalize to the same selection share a cache entry.
#[async_trait]
pub trait RankingCache: Send + Sync {
    /// Retrieves a cached response.
    ///
    /// Returns `Ok(Some(response))` if cached, `Ok(None)` if not cached.
    async fn get(&self, provider: &str, request: &RankingRequest)
    -> Result<Option<RankingResponse>>;

    /// Stores a response in the cache.
    async fn put(
        &self,
        provider: &str,
        request: &RankingRequest,
        response: &RankingResponse,
    ) -> Result<()>;

    /// Removes cache entries older than the specified TTL.
    ///
    /// Returns the number of entries invalidated.
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}
