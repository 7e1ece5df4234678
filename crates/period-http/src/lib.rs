#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/period/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! HTTP ranking provider.
//!
//! This crate implements the period-core [`RankingProvider`] trait for the
//! financial ranking and search API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use period_http::HttpRankingProvider;
//! use period_core::{PeriodResolver, RankingProvider, RankingQuery, StatementType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = HttpRankingProvider::new("http://localhost:8000");
//!
//!     let resolved = PeriodResolver::default()
//!         .normalize(StatementType::IncomeStatement, 2024, None, None)?;
//!     let query = RankingQuery::new("revenue", resolved.selection)?;
//!
//!     let page = provider.fetch_ranking(&query).await?;
//!     println!("{} rows", page.entries.len());
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use period_core::{
    MetricRank, PeriodError, RankingEntry, RankingMetric, RankingPage, RankingProvider,
    RankingQuery, Result, StockRanking, StockRankingQuery,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Path of the leaderboard endpoint.
const RANKING_ENDPOINT: &str = "api/advanced_search/ranking";

/// Path of the per-stock ranking endpoint.
const STOCK_RANKING_ENDPOINT: &str = "api/advanced_search/stock_ranking";

/// Ranking provider backed by the ranking and search HTTP API.
#[derive(Clone, Debug)]
pub struct HttpRankingProvider {
    client: Client,
    base_url: String,
}

impl HttpRankingProvider {
    /// Create a new provider for the API served at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a new provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL of an endpoint.
    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    /// Make a GET request and return the response body.
    async fn get(&self, endpoint: &str, params: &[(&'static str, String)]) -> Result<String> {
        let url = self.url(endpoint);
        tracing::debug!(endpoint, ?params, "Ranking API request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| PeriodError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PeriodError::RateLimited {
                provider: self.name().to_string(),
                retry_after: None,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PeriodError::Network(format!("HTTP {status}: {text}")));
        }

        response
            .text()
            .await
            .map_err(|e| PeriodError::Network(e.to_string()))
    }
}

#[async_trait]
impl RankingProvider for HttpRankingProvider {
    fn name(&self) -> &str {
        "Ranking API"
    }

    async fn fetch_ranking(&self, query: &RankingQuery) -> Result<RankingPage> {
        let text = self.get(RANKING_ENDPOINT, &query.query_pairs()).await?;
        parse_ranking_page(query, &text)
    }

    async fn fetch_stock_ranking(&self, query: &StockRankingQuery) -> Result<StockRanking> {
        let text = self
            .get(STOCK_RANKING_ENDPOINT, &query.query_pairs())
            .await?;
        parse_stock_ranking(query, &text)
    }
}

/// Leaderboard response envelope.
#[derive(Debug, Deserialize)]
struct ApiRankingResponse {
    #[serde(default)]
    data: Vec<ApiRankingRow>,
    #[serde(default)]
    metadata: Option<ApiMetadata>,
}

/// Leaderboard pagination metadata.
#[derive(Debug, Deserialize)]
struct ApiMetadata {
    #[serde(default)]
    has_next_page: bool,
}

/// Leaderboard row. The metric value is keyed by the metric name.
#[derive(Debug, Deserialize)]
struct ApiRankingRow {
    stock_symbol: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    sector_name: String,
    year: i32,
    quarter: Option<u8>,
    rank: u32,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// Stock ranking response envelope.
#[derive(Debug, Deserialize)]
struct ApiStockRankingResponse {
    data: ApiStockRankingData,
}

#[derive(Debug, Deserialize)]
struct ApiStockRankingData {
    stock_info: ApiStockInfo,
    #[serde(default)]
    rankings: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ApiStockInfo {
    #[serde(default)]
    country: String,
    #[serde(default)]
    sector: String,
}

/// One metric entry of a stock ranking.
#[derive(Debug, Deserialize)]
struct ApiMetricRank {
    #[serde(default)]
    description: String,
    value: Option<f64>,
    rank: Option<u32>,
    #[serde(default)]
    total_count: u32,
}

fn parse_ranking_page(query: &RankingQuery, text: &str) -> Result<RankingPage> {
    let response: ApiRankingResponse =
        serde_json::from_str(text).map_err(|e| PeriodError::Parse(format!("{e}: {text}")))?;

    let entries = response
        .data
        .into_iter()
        .map(|row| RankingEntry {
            value: row.fields.get(&query.metric).and_then(Value::as_f64),
            stock_symbol: row.stock_symbol,
            company_name: row.company_name,
            sector_name: row.sector_name,
            year: row.year,
            quarter: row.quarter,
            rank: row.rank,
        })
        .collect();

    Ok(RankingPage {
        query: query.clone(),
        entries,
        has_next_page: response.metadata.is_some_and(|m| m.has_next_page),
    })
}

fn parse_stock_ranking(query: &StockRankingQuery, text: &str) -> Result<StockRanking> {
    let response: ApiStockRankingResponse =
        serde_json::from_str(text).map_err(|e| PeriodError::Parse(format!("{e}: {text}")))?;
    let data = response.data;

    // Report metrics in catalog order; the backend returns an unordered map.
    let mut ranks = Vec::new();
    for metric in RankingMetric::for_statement(query.selection.statement_type) {
        let Some(raw) = data.rankings.get(metric.key) else {
            continue;
        };
        let entry: ApiMetricRank = serde_json::from_value(raw.clone())
            .map_err(|e| PeriodError::Parse(format!("{}: {e}", metric.key)))?;
        ranks.push(MetricRank {
            metric: metric.key.to_string(),
            description: if entry.description.is_empty() {
                metric.description.to_string()
            } else {
                entry.description
            },
            value: entry.value,
            rank: entry.rank,
            total_count: entry.total_count,
        });
    }

    Ok(StockRanking {
        query: query.clone(),
        country: data.stock_info.country,
        sector: data.stock_info.sector,
        ranks,
    })
}
