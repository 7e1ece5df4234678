#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/period/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial-statement period selection.
//!
//! This crate bundles the period rule engine with ranking providers and
//! caches, and provides a [`SelectionController`] that drives a ranking panel:
//! every control change is normalized, the enablement mask is handed to a
//! [`SelectionView`], and at most one ranking request is issued.
//!
//! # Features
//!
//! - `http` - HTTP ranking provider for the ranking and search API
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use period::{
//!     ControlChange, HttpRankingProvider, InMemoryCache, PanelTarget, PeriodResolver,
//!     PeriodType, Selection, SelectionController, StatementType,
//! };
//!
//! #[tokio::main]
//! async fn main() -> period::Result<()> {
//!     let provider = Arc::new(HttpRankingProvider::new("http://localhost:8000"));
//!     let view = Arc::new(MyView::default());
//!
//!     let controller = SelectionController::new(
//!         PeriodResolver::default(),
//!         provider,
//!         view,
//!         Selection::new(StatementType::CashFlow, 2024, PeriodType::Annual, 4),
//!         PanelTarget::leaderboard("free_cash_flow"),
//!     )?
//!     .with_cache(Arc::new(InMemoryCache::new()));
//!
//!     controller.load().await?;
//!     controller.on_change(ControlChange::Year(2023)).await?;
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use period_core::*;

// Cache implementations
pub use period_cache::{InMemoryCache, NoopCache};

// Providers
#[cfg(feature = "http")]
pub use period_http::HttpRankingProvider;

mod controller;
pub use controller::{
    ChangeOutcome, ControlChange, LeaderboardRow, PanelTarget, SelectionController, SelectionView,
};
