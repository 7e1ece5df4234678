//! Terminal rendering for the ranking commands.

use period::{
    LeaderboardRow, PeriodError, RankingMetric, RankingPage, Resolved, SelectionView,
    StockRanking,
};
use tracing::debug;

/// Prints ranking results to stdout as text or JSON.
#[derive(Debug)]
pub(crate) struct TerminalView {
    json: bool,
}

impl TerminalView {
    pub(crate) const fn new(json: bool) -> Self {
        Self { json }
    }

    fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

impl SelectionView for TerminalView {
    fn apply_mask(&self, resolved: &Resolved) {
        debug!(
            selection = ?resolved.selection,
            quarters = ?resolved.mask.enabled_quarters(),
            "Normalized selection"
        );
    }

    fn render_leaderboard(&self, page: &RankingPage, rows: &[LeaderboardRow]) {
        if self.json {
            Self::print_json(page);
            return;
        }

        let title = RankingMetric::find(&page.query.metric)
            .map_or(page.query.metric.as_str(), |m| m.description);
        println!("{title} (page {})", page.query.page);

        if rows.is_empty() {
            println!("  查無資料");
            return;
        }

        for row in rows {
            println!(
                "{:>5}  {} ({})  {}  {:>16}  {} {}",
                row.rank,
                row.company_name,
                row.stock_symbol,
                row.sector_name,
                format_value(row.value),
                row.year,
                row.period_label,
            );
        }

        if page.has_next_page {
            println!("  more results on page {}", page.query.page + 1);
        }
    }

    fn render_stock_ranking(&self, ranking: &StockRanking, period_label: &str) {
        if self.json {
            Self::print_json(ranking);
            return;
        }

        let selection = ranking.query.selection;
        println!(
            "{} {} {} {}  ({} / {})",
            ranking.query.stock_symbol,
            selection.statement_type.display_name(),
            selection.year,
            period_label,
            ranking.country,
            ranking.sector,
        );

        for rank in &ranking.ranks {
            let position = rank
                .rank
                .map_or_else(|| "-".to_string(), |r| format!("{r}/{}", rank.total_count));
            println!(
                "  {:<32} {:>16}  {}",
                rank.description,
                format_value(rank.value),
                position
            );
        }
    }

    fn render_error(&self, error: &PeriodError) {
        eprintln!("Error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(None), "-");
        assert_eq!(format_value(Some(1234.5)), "1234.50");
    }
}
