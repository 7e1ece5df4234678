//! Provider trait for querying a ranking backend.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    ranking::{
        RankingPage, RankingQuery, RankingRequest, RankingResponse, StockRanking,
        StockRankingQuery,
    },
};

/// A backend that ranks companies on financial-statement metrics.
///
/// Callers must only pass queries built from normalized selections.
#[async_trait]
pub trait RankingProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Ranking API").
    fn name(&self) -> &str;

    /// Fetches one page of a leaderboard.
    async fn fetch_ranking(&self, query: &RankingQuery) -> Result<RankingPage>;

    /// Fetches a stock's ranks on every metric of the selected statement.
    async fn fetch_stock_ranking(&self, query: &StockRankingQuery) -> Result<StockRanking>;

    /// Dispatches either kind of request.
    async fn fetch(&self, request: &RankingRequest) -> Result<RankingResponse> {
        match request {
            RankingRequest::Leaderboard(query) => {
                self.fetch_ranking(query).await.map(RankingResponse::Leaderboard)
            }
            RankingRequest::Stock(query) => self
                .fetch_stock_ranking(query)
                .await
                .map(RankingResponse::Stock),
        }
    }
}
