//! Ranking catalog, queries and results.
//!
//! This module defines the data exchanged with a ranking backend:
//!
//! - [`RankingMetric`] / [`RANKING_METRICS`] - The metrics that can be ranked, per statement
//! - [`RankingQuery`] - A leaderboard query for one metric
//! - [`StockRankingQuery`] - A per-stock query over all metrics of a statement
//! - [`RankingRequest`] / [`RankingResponse`] - Either kind of query and its result

use serde::{Deserialize, Serialize};

use crate::error::{PeriodError, Result};
use crate::resolver::Selection;
use crate::statement::StatementType;

/// Default number of leaderboard rows per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Largest page size the backend accepts.
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// A financial metric that can be ranked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RankingMetric {
    /// Key used by the ranking API (`ranking_type`).
    pub key: &'static str,
    /// Statement the metric is reported on.
    pub statement: StatementType,
    /// Leaderboard title.
    pub description: &'static str,
}

const fn metric(
    key: &'static str,
    statement: StatementType,
    description: &'static str,
) -> RankingMetric {
    RankingMetric {
        key,
        statement,
        description,
    }
}

use StatementType::{BalanceSheet, CashFlow, IncomeStatement};

/// Every rankable metric, grouped by statement in menu order.
pub static RANKING_METRICS: [RankingMetric; 30] = [
    metric("operating_cash_flow", CashFlow, "營業活動之現金流量排行榜"),
    metric("free_cash_flow", CashFlow, "自由現金流量排行榜"),
    metric("net_change_in_cash", CashFlow, "現金及約當現金淨變動排行榜"),
    metric("revenue", IncomeStatement, "營收排行榜"),
    metric("gross_profit", IncomeStatement, "營業毛利排行榜"),
    metric("operating_expenses", IncomeStatement, "營業費用排行榜"),
    metric("operating_income", IncomeStatement, "營業利益排行榜"),
    metric("net_income", IncomeStatement, "稅後淨利排行榜"),
    metric("gross_profit_pct", IncomeStatement, "營業毛利佔營收百分比排行榜"),
    metric("sales_expenses_pct", IncomeStatement, "銷售費用佔營收百分比排行榜"),
    metric("administrative_expenses_pct", IncomeStatement, "管理費用佔營收百分比排行榜"),
    metric(
        "research_and_development_expenses_pct",
        IncomeStatement,
        "研發費用佔營收百分比排行榜",
    ),
    metric("operating_expenses_pct", IncomeStatement, "營業費用佔營收百分比排行榜"),
    metric("operating_income_pct", IncomeStatement, "營業利益佔營收百分比排行榜"),
    metric("net_income_pct", IncomeStatement, "稅後淨利佔營收百分比排行榜"),
    metric("cost_of_revenue_pct", IncomeStatement, "營業成本佔營收百分比排行榜"),
    metric("cash_and_equivalents", BalanceSheet, "現金及約當現金排行榜"),
    metric("short_term_investments", BalanceSheet, "短期投資排行榜"),
    metric("accounts_receivable_and_notes", BalanceSheet, "應收帳款及票據排行榜"),
    metric("inventory", BalanceSheet, "存貨排行榜"),
    metric("current_assets", BalanceSheet, "流動資產排行榜"),
    metric("fixed_assets_total", BalanceSheet, "固定資產排行榜"),
    metric("total_assets", BalanceSheet, "總資產排行榜"),
    metric("cash_and_equivalents_pct", BalanceSheet, "現金及約當現金佔總資產百分比排行榜"),
    metric("short_term_investments_pct", BalanceSheet, "短期投資佔總資產百分比排行榜"),
    metric(
        "accounts_receivable_and_notes_pct",
        BalanceSheet,
        "應收帳款及票據佔總資產百分比排行榜",
    ),
    metric("inventory_pct", BalanceSheet, "存貨佔總資產百分比排行榜"),
    metric("current_assets_pct", BalanceSheet, "流動資產佔總資產百分比排行榜"),
    metric("fixed_assets_total_pct", BalanceSheet, "固定資產佔總資產百分比排行榜"),
    metric("other_non_current_assets_pct", BalanceSheet, "其餘資產佔總資產百分比排行榜"),
];

impl RankingMetric {
    /// Looks up a metric by its API key.
    #[must_use]
    pub fn find(key: &str) -> Option<&'static Self> {
        RANKING_METRICS.iter().find(|m| m.key == key)
    }

    /// Returns the metrics reported on a statement, in menu order.
    pub fn for_statement(statement: StatementType) -> impl Iterator<Item = &'static Self> {
        RANKING_METRICS.iter().filter(move |m| m.statement == statement)
    }

    /// Returns the first metric of a statement's menu.
    #[must_use]
    pub fn default_for(statement: StatementType) -> &'static Self {
        // Every statement has catalogued metrics.
        Self::for_statement(statement)
            .next()
            .unwrap_or(&RANKING_METRICS[0])
    }

    /// Looks up a metric and checks that it belongs to `statement`.
    pub fn for_key(key: &str, statement: StatementType) -> Result<&'static Self> {
        match Self::find(key) {
            Some(m) if m.statement == statement => Ok(m),
            Some(m) => Err(PeriodError::InvalidParameter(format!(
                "metric {key} belongs to {}, not {statement}",
                m.statement
            ))),
            None => Err(PeriodError::InvalidParameter(format!(
                "unknown ranking metric: {key}"
            ))),
        }
    }
}

/// Query parameters shared by both query kinds.
fn selection_pairs(selection: &Selection) -> [(&'static str, String); 4] {
    [
        ("statement_type", selection.statement_type.as_str().to_string()),
        ("year", selection.year.to_string()),
        ("report_type", selection.period_type.as_str().to_string()),
        ("quarter", selection.quarter.to_string()),
    ]
}

/// A leaderboard query: companies ranked by one metric for a selection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankingQuery {
    /// Metric key.
    pub metric: String,
    /// Normalized statement-period selection.
    pub selection: Selection,
    /// Restrict the leaderboard to one sector.
    pub sector: Option<String>,
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub limit: u32,
}

impl RankingQuery {
    /// Creates a first-page query, checking that the metric belongs to the
    /// selection's statement.
    pub fn new(metric: &str, selection: Selection) -> Result<Self> {
        let metric = RankingMetric::for_key(metric, selection.statement_type)?;
        Ok(Self {
            metric: metric.key.to_string(),
            selection,
            sector: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Restricts the query to a sector. An empty name clears the restriction.
    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        let sector = sector.into();
        self.sector = (!sector.trim().is_empty()).then_some(sector);
        self
    }

    /// Sets the page number and size.
    pub fn with_page(mut self, page: u32, limit: u32) -> Result<Self> {
        if page == 0 {
            return Err(PeriodError::InvalidParameter(
                "page numbers start at 1".to_string(),
            ));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(PeriodError::InvalidParameter(format!(
                "limit must be 1..={MAX_PAGE_LIMIT}, got {limit}"
            )));
        }
        self.page = page;
        self.limit = limit;
        Ok(self)
    }

    /// Returns the ranking API query parameters.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("ranking_type", self.metric.clone())];
        pairs.extend(selection_pairs(&self.selection));
        if let Some(sector) = &self.sector {
            pairs.push(("sector_name", sector.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

/// A per-stock query: one company's rank on every metric of a statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockRankingQuery {
    /// Stock symbol.
    pub stock_symbol: String,
    /// Normalized statement-period selection.
    pub selection: Selection,
}

impl StockRankingQuery {
    /// Creates a query. Symbols are at least three ASCII letters or digits.
    pub fn new(stock_symbol: impl Into<String>, selection: Selection) -> Result<Self> {
        let stock_symbol = stock_symbol.into().trim().to_uppercase();
        if stock_symbol.len() < 3 || !stock_symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PeriodError::InvalidParameter(format!(
                "invalid stock symbol: {stock_symbol:?}"
            )));
        }
        Ok(Self {
            stock_symbol,
            selection,
        })
    }

    /// Returns the stock-ranking API query parameters.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("stock_symbol", self.stock_symbol.clone())];
        pairs.extend(selection_pairs(&self.selection));
        pairs
    }
}

/// Either kind of ranking query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankingRequest {
    /// Leaderboard for one metric.
    Leaderboard(RankingQuery),
    /// Ranks of one stock.
    Stock(StockRankingQuery),
}

impl RankingRequest {
    /// Returns the selection the request was built from.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        match self {
            Self::Leaderboard(q) => &q.selection,
            Self::Stock(q) => &q.selection,
        }
    }
}

/// One leaderboard row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// Stock symbol.
    pub stock_symbol: String,
    /// Company name.
    pub company_name: String,
    /// Sector name.
    pub sector_name: String,
    /// Fiscal year of the figure.
    pub year: i32,
    /// Fiscal quarter of the figure, if reported.
    pub quarter: Option<u8>,
    /// 1-based rank.
    pub rank: u32,
    /// Metric value.
    pub value: Option<f64>,
}

/// One page of a leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingPage {
    /// The query that produced the page.
    pub query: RankingQuery,
    /// Rows in rank order.
    pub entries: Vec<RankingEntry>,
    /// Whether another page follows.
    pub has_next_page: bool,
}

/// A stock's rank on a single metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRank {
    /// Metric key.
    pub metric: String,
    /// Leaderboard title.
    pub description: String,
    /// Metric value, if reported for the period.
    pub value: Option<f64>,
    /// Rank within the stock's country and sector, if ranked.
    pub rank: Option<u32>,
    /// Number of ranked companies.
    pub total_count: u32,
}

/// A stock's ranks on every metric of a statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockRanking {
    /// The query that produced the result.
    pub query: StockRankingQuery,
    /// Country the stock is listed in.
    pub country: String,
    /// Sector the stock is ranked within.
    pub sector: String,
    /// Ranks in catalog order.
    pub ranks: Vec<MetricRank>,
}

impl StockRanking {
    /// Returns the number of metrics the stock holds a rank on.
    #[must_use]
    pub fn ranked_count(&self) -> usize {
        self.ranks.iter().filter(|r| r.rank.is_some()).count()
    }
}

/// Result of a [`RankingRequest`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankingResponse {
    /// Leaderboard page.
    Leaderboard(RankingPage),
    /// Stock ranks.
    Stock(StockRanking),
}
