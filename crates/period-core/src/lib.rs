#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/period/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core rules and types for financial-statement period selection.
//!
//! This crate provides the pure period rule engine and the abstractions around it:
//!
//! - [`PeriodRules`](rules::PeriodRules) - Legal period types and quarters per statement
//! - [`PeriodResolver`](resolver::PeriodResolver) - Normalizes proposed selections
//! - [`PeriodLabel`](label::PeriodLabel) - Display labels for periods
//! - [`PeriodConfig`](config::PeriodConfig) - Data-availability configuration
//! - [`RankingProvider`](provider::RankingProvider) - Ranking backend trait
//! - [`RankingCache`](cache::RankingCache) - Caching abstraction

/// Cache trait for storing ranking responses.
pub mod cache;
/// Data-availability configuration.
pub mod config;
/// Error types for resolution and ranking queries.
pub mod error;
/// Period labels.
pub mod label;
/// Period type and quarter set definitions.
pub mod period;
/// Provider trait for ranking backends.
pub mod provider;
/// Ranking catalog, queries and results.
pub mod ranking;
/// Selection normalization.
pub mod resolver;
/// Period legality rules.
pub mod rules;
/// Financial statement types.
pub mod statement;

// Re-export commonly used items at crate root
pub use cache::RankingCache;
pub use config::{PeriodConfig, YearBounds};
pub use error::{PeriodError, Result};
pub use label::{PeriodLabel, format_period};
pub use period::{ANNUAL_QUARTER, PeriodType, QuarterSet};
pub use provider::RankingProvider;
pub use ranking::{
    MetricRank, RankingEntry, RankingMetric, RankingPage, RankingQuery, RankingRequest,
    RankingResponse, StockRanking, StockRankingQuery,
};
pub use resolver::{EnablementMask, OptionState, PeriodResolver, Resolved, Selection};
pub use rules::{PeriodRules, StatementRule, YearOption};
pub use statement::StatementType;
