//! Selection controller tying the resolver, a ranking provider and a view together.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use period_core::{
    PeriodError, PeriodResolver, PeriodType, RankingCache, RankingEntry, RankingMetric,
    RankingPage, RankingProvider, RankingQuery, RankingRequest, RankingResponse, Resolved, Result,
    Selection, StatementType, StockRanking, StockRankingQuery, format_period,
    ranking::DEFAULT_PAGE_LIMIT,
};

/// What a ranking panel shows for the current selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelTarget {
    /// A paged metric leaderboard.
    Leaderboard {
        /// Ranking metric key.
        metric: String,
        /// Optional sector filter.
        sector: Option<String>,
        /// Page number, starting at 1.
        page: u32,
    },
    /// One stock's rank on every metric of the statement.
    Stock {
        /// Stock ticker.
        stock_symbol: String,
    },
}

impl PanelTarget {
    /// A first-page leaderboard for `metric` without a sector filter.
    #[must_use]
    pub fn leaderboard(metric: impl Into<String>) -> Self {
        Self::Leaderboard {
            metric: metric.into(),
            sector: None,
            page: 1,
        }
    }

    /// A per-stock ranking panel.
    #[must_use]
    pub fn stock(stock_symbol: impl Into<String>) -> Self {
        Self::Stock {
            stock_symbol: stock_symbol.into(),
        }
    }
}

/// A single control change on the panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlChange {
    /// Statement type select changed.
    StatementType(StatementType),
    /// Year select changed.
    Year(i32),
    /// Period type select changed.
    PeriodType(PeriodType),
    /// Quarter select changed.
    Quarter(u8),
    /// Metric select changed (leaderboard panels only).
    Metric(String),
    /// Sector filter changed; `None` or a blank name clears it (leaderboard panels only).
    Sector(Option<String>),
    /// Page navigation (leaderboard panels only).
    Page(u32),
    /// Stock symbol changed (stock panels only).
    StockSymbol(String),
}

/// What happened to a change after normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeOutcome {
    /// The normalized request matched the one already issued; nothing was fetched.
    Unchanged,
    /// A response was fetched and rendered.
    Rendered,
    /// A newer request was issued while this one was running; the response was dropped.
    Stale,
    /// The fetch failed and the error was rendered.
    Failed,
}

/// A leaderboard row ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardRow {
    /// Rank position.
    pub rank: u32,
    /// Stock ticker.
    pub stock_symbol: String,
    /// Company name.
    pub company_name: String,
    /// Industry sector.
    pub sector_name: String,
    /// Metric value, if reported.
    pub value: Option<f64>,
    /// Fiscal year of the row.
    pub year: i32,
    /// Formatted period label, e.g. `Q2累計`.
    pub period_label: String,
}

impl LeaderboardRow {
    fn from_entry(entry: &RankingEntry, selection: &Selection) -> Self {
        Self {
            rank: entry.rank,
            stock_symbol: entry.stock_symbol.clone(),
            company_name: entry.company_name.clone(),
            sector_name: entry.sector_name.clone(),
            value: entry.value,
            year: entry.year,
            period_label: format_period(selection.period_type, entry.quarter),
        }
    }
}

/// Receives controller output.
///
/// Implementations render synchronously; the controller calls them while it
/// holds its state lock so that renders are delivered in request order.
pub trait SelectionView: Send + Sync {
    /// Update the selects to the normalized selection and its enablement mask.
    fn apply_mask(&self, resolved: &Resolved);

    /// Render a leaderboard page.
    fn render_leaderboard(&self, page: &RankingPage, rows: &[LeaderboardRow]);

    /// Render a per-stock ranking.
    fn render_stock_ranking(&self, ranking: &StockRanking, period_label: &str);

    /// Render a failed fetch.
    fn render_error(&self, error: &PeriodError);
}

#[derive(Debug)]
struct PanelState {
    selection: Selection,
    target: PanelTarget,
    /// Sequence number of the latest issued request.
    seq: u64,
    /// Request in flight or last successfully rendered.
    issued: Option<RankingRequest>,
}

impl PanelState {
    fn request(&self) -> Result<RankingRequest> {
        match &self.target {
            PanelTarget::Leaderboard {
                metric,
                sector,
                page,
            } => {
                let mut query = RankingQuery::new(metric, self.selection)?
                    .with_page(*page, DEFAULT_PAGE_LIMIT)?;
                if let Some(sector) = sector {
                    query = query.with_sector(sector.as_str());
                }
                Ok(RankingRequest::Leaderboard(query))
            }
            PanelTarget::Stock { stock_symbol } => Ok(RankingRequest::Stock(
                StockRankingQuery::new(stock_symbol.as_str(), self.selection)?,
            )),
        }
    }
}

/// Drives one ranking panel.
///
/// Every control change is normalized, pushed back to the view as an
/// enablement mask, and turned into at most one ranking request. A request
/// identical to the one in flight (or last rendered) is not sent again, and
/// responses overtaken by a newer request are discarded.
pub struct SelectionController {
    resolver: PeriodResolver,
    provider: Arc<dyn RankingProvider>,
    cache: Option<Arc<dyn RankingCache>>,
    view: Arc<dyn SelectionView>,
    state: Mutex<PanelState>,
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionController")
            .field("resolver", &self.resolver)
            .field("provider", &self.provider.name())
            .field("cache", &self.cache.as_ref().map(|_| "configured"))
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SelectionController {
    /// Create a controller for the given initial selection and panel target.
    ///
    /// The initial selection is normalized and the target validated against it;
    /// nothing is fetched until [`load`](Self::load) or [`on_change`](Self::on_change).
    pub fn new(
        resolver: PeriodResolver,
        provider: Arc<dyn RankingProvider>,
        view: Arc<dyn SelectionView>,
        initial: Selection,
        target: PanelTarget,
    ) -> Result<Self> {
        let resolved = resolver.normalize_selection(&initial)?;
        let state = PanelState {
            selection: resolved.selection,
            target,
            seq: 0,
            issued: None,
        };
        state.request()?;

        Ok(Self {
            resolver,
            provider,
            cache: None,
            view,
            state: Mutex::new(state),
        })
    }

    /// Consult `cache` before the provider and store fetched responses in it.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn RankingCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns the current normalized selection.
    pub async fn selection(&self) -> Selection {
        self.state.lock().await.selection
    }

    /// Returns the current panel target.
    pub async fn target(&self) -> PanelTarget {
        self.state.lock().await.target.clone()
    }

    /// Apply the mask for the current selection and fetch it.
    pub async fn load(&self) -> Result<ChangeOutcome> {
        self.submit(|_, target| Ok(target)).await
    }

    /// Handle a control change.
    ///
    /// Returns an error, leaving the panel untouched, when the change is
    /// malformed: an out-of-range year, a metric that does not belong to the
    /// statement, or a control that does not apply to the panel. Fetch
    /// failures are rendered through the view and reported as
    /// [`ChangeOutcome::Failed`].
    ///
    /// Switching the statement type moves the year into the new statement's
    /// bounds, since each statement covers a different range of years.
    #[instrument(skip(self))]
    pub async fn on_change(&self, change: ControlChange) -> Result<ChangeOutcome> {
        let rules = self.resolver.rules();
        self.submit(move |selection, target| {
            let target = match change {
                ControlChange::StatementType(statement) => {
                    let year = rules.year_bounds(statement).clamp(selection.year);
                    if year != selection.year {
                        debug!(from = selection.year, to = year, %statement, "Clamping year");
                    }
                    selection.statement_type = statement;
                    selection.year = year;
                    reset_page(target)
                }
                ControlChange::Year(year) => {
                    selection.year = year;
                    reset_page(target)
                }
                ControlChange::PeriodType(period_type) => {
                    selection.period_type = period_type;
                    reset_page(target)
                }
                ControlChange::Quarter(quarter) => {
                    selection.quarter = quarter;
                    reset_page(target)
                }
                ControlChange::Metric(key) => match target {
                    PanelTarget::Leaderboard { sector, .. } => {
                        let metric = RankingMetric::for_key(&key, selection.statement_type)?;
                        PanelTarget::Leaderboard {
                            metric: metric.key.to_string(),
                            sector,
                            page: 1,
                        }
                    }
                    PanelTarget::Stock { .. } => return Err(not_applicable("metric")),
                },
                ControlChange::Sector(sector) => match target {
                    PanelTarget::Leaderboard { metric, .. } => PanelTarget::Leaderboard {
                        metric,
                        sector: sector.filter(|s| !s.trim().is_empty()),
                        page: 1,
                    },
                    PanelTarget::Stock { .. } => return Err(not_applicable("sector")),
                },
                ControlChange::Page(page) => match target {
                    PanelTarget::Leaderboard { metric, sector, .. } => PanelTarget::Leaderboard {
                        metric,
                        sector,
                        page,
                    },
                    PanelTarget::Stock { .. } => return Err(not_applicable("page")),
                },
                ControlChange::StockSymbol(stock_symbol) => match target {
                    PanelTarget::Stock { .. } => PanelTarget::Stock { stock_symbol },
                    PanelTarget::Leaderboard { .. } => {
                        return Err(not_applicable("stock symbol"));
                    }
                },
            };
            Ok(target)
        })
        .await
    }

    /// Applies `edit` to a copy of the current selection and target, then
    /// normalizes and commits the result and fetches it.
    ///
    /// Reading, editing and committing happen under one lock so concurrent
    /// changes each build on the state left by the previous one.
    async fn submit<F>(&self, edit: F) -> Result<ChangeOutcome>
    where
        F: FnOnce(&mut Selection, PanelTarget) -> Result<PanelTarget> + Send,
    {
        let (seq, selection, request) = {
            let mut state = self.state.lock().await;

            let mut proposed = state.selection;
            let target = edit(&mut proposed, state.target.clone())?;
            let resolved = self.resolver.normalize_selection(&proposed)?;
            let selection = resolved.selection;
            let target = align_metric(target, selection.statement_type);

            let candidate = PanelState {
                selection,
                target,
                seq: state.seq,
                issued: None,
            };
            let request = candidate.request()?;
            state.selection = candidate.selection;
            state.target = candidate.target;

            self.view.apply_mask(&resolved);

            if state.issued.as_ref() == Some(&request) {
                debug!(?selection, "Selection unchanged, skipping fetch");
                return Ok(ChangeOutcome::Unchanged);
            }

            state.seq += 1;
            state.issued = Some(request.clone());
            (state.seq, selection, request)
        };

        debug!(seq, ?selection, "Issuing ranking request");
        let result = self.fetch(&request).await;

        let mut state = self.state.lock().await;
        if state.seq != seq {
            debug!(seq, latest = state.seq, "Discarding stale ranking response");
            return Ok(ChangeOutcome::Stale);
        }

        match result {
            Ok(response) => {
                self.render(&selection, &response);
                Ok(ChangeOutcome::Rendered)
            }
            Err(e) => {
                warn!(seq, error = %e, "Ranking fetch failed");
                state.issued = None;
                self.view.render_error(&e);
                Ok(ChangeOutcome::Failed)
            }
        }
    }

    async fn fetch(&self, request: &RankingRequest) -> Result<RankingResponse> {
        let provider = self.provider.name();

        if let Some(cache) = &self.cache {
            match cache.get(provider, request).await {
                Ok(Some(cached)) => {
                    debug!(provider, "Cache hit for ranking request");
                    return Ok(cached);
                }
                Ok(None) => {}
                Err(e) => warn!(provider, error = %e, "Failed to read ranking cache"),
            }
        }

        let response = self.provider.fetch(request).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(provider, request, &response).await {
                warn!(provider, error = %e, "Failed to cache ranking response");
            }
        }

        Ok(response)
    }

    fn render(&self, selection: &Selection, response: &RankingResponse) {
        match response {
            RankingResponse::Leaderboard(page) => {
                let rows: Vec<_> = page
                    .entries
                    .iter()
                    .map(|entry| LeaderboardRow::from_entry(entry, selection))
                    .collect();
                self.view.render_leaderboard(page, &rows);
            }
            RankingResponse::Stock(ranking) => {
                let label = selection.period_label().to_string();
                self.view.render_stock_ranking(ranking, &label);
            }
        }
    }
}

fn reset_page(target: PanelTarget) -> PanelTarget {
    match target {
        PanelTarget::Leaderboard { metric, sector, .. } => PanelTarget::Leaderboard {
            metric,
            sector,
            page: 1,
        },
        stock @ PanelTarget::Stock { .. } => stock,
    }
}

/// Replace a leaderboard metric that does not belong to `statement`.
fn align_metric(target: PanelTarget, statement: StatementType) -> PanelTarget {
    match target {
        PanelTarget::Leaderboard {
            metric,
            sector,
            page,
        } if RankingMetric::for_key(&metric, statement).is_err() => {
            let replacement = RankingMetric::default_for(statement);
            debug!(from = %metric, to = replacement.key, "Resetting metric for statement");
            PanelTarget::Leaderboard {
                metric: replacement.key.to_string(),
                sector,
                page,
            }
        }
        other => other,
    }
}

fn not_applicable(control: &str) -> PeriodError {
    PeriodError::InvalidParameter(format!("{control} does not apply to this panel"))
}
