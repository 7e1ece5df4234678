//! Period CLI binary.
//!
//! Normalizes statement-period selections and queries the ranking API with them.

mod view;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use period::{
    ChangeOutcome, HttpRankingProvider, PanelTarget, PeriodConfig, PeriodResolver, PeriodRules,
    PeriodType, RankingMetric, Resolved, SelectionController, StatementType,
};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use view::TerminalView;

#[derive(Parser)]
#[command(name = "period")]
#[command(about = "Financial-statement period selection and rankings", long_about = None)]
#[command(version)]
struct Cli {
    /// Data-availability configuration (JSON)
    #[arg(long, global = true, env = "PERIOD_CONFIG")]
    config: Option<PathBuf>,

    /// Ranking API base URL
    #[arg(
        long,
        global = true,
        env = "PERIOD_API_URL",
        default_value = "http://localhost:8000"
    )]
    base_url: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// A proposed selection as typed on the command line.
#[derive(Args)]
struct SelectionArgs {
    /// Statement type (cash_flow, income_statement, balance_sheet)
    #[arg(long, short = 's')]
    statement: String,

    /// Fiscal year
    #[arg(long, short = 'y')]
    year: i32,

    /// Period type (annual, quarterly, accumulated)
    #[arg(long, short = 'p')]
    period: Option<String>,

    /// Fiscal quarter
    #[arg(long, short = 'q')]
    quarter: Option<u8>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a selection and print it with its enablement mask
    Resolve {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// List the year options for a statement and period type
    Years {
        /// Statement type
        #[arg(long, short = 's')]
        statement: String,

        /// Period type (defaults to the statement's default)
        #[arg(long, short = 'p')]
        period: Option<String>,
    },

    /// List the ranking metrics
    Metrics {
        /// Only list metrics of one statement type
        #[arg(long, short = 's')]
        statement: Option<String>,
    },

    /// Fetch a metric leaderboard
    Rank {
        /// Metric key (defaults to the statement's first metric)
        #[arg(long, short = 'm')]
        metric: Option<String>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Restrict to one sector
        #[arg(long)]
        sector: Option<String>,

        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Print the raw page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch one stock's rank on every metric of a statement
    Stock {
        /// Stock symbol
        symbol: String,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => PeriodConfig::from_path(path)?,
        None => PeriodConfig::default(),
    };
    debug!(?config, "Loaded period configuration");
    let resolver = PeriodResolver::from_config(config)?;

    match cli.command {
        Commands::Resolve { selection } => {
            let resolved = resolve(&resolver, &selection)?;
            print_resolved(&resolved)?;
        }
        Commands::Years { statement, period } => {
            let statement: StatementType = statement.parse()?;
            let period_type = match period {
                Some(p) => p.parse()?,
                None => PeriodRules::default_period_type(statement),
            };
            list_years(&resolver, statement, period_type);
        }
        Commands::Metrics { statement } => {
            let statement = statement
                .map(|s| s.parse::<StatementType>())
                .transpose()?;
            list_metrics(statement);
        }
        Commands::Rank {
            metric,
            selection,
            sector,
            page,
            json,
        } => {
            let resolved = resolve(&resolver, &selection)?;
            let statement = resolved.selection.statement_type;
            let metric = match metric {
                Some(key) => RankingMetric::for_key(&key, statement)?,
                None => RankingMetric::default_for(statement),
            };
            let target = PanelTarget::Leaderboard {
                metric: metric.key.to_string(),
                sector,
                page,
            };
            fetch(&cli.base_url, resolver, resolved, target, json).await?;
        }
        Commands::Stock {
            symbol,
            selection,
            json,
        } => {
            let resolved = resolve(&resolver, &selection)?;
            fetch(
                &cli.base_url,
                resolver,
                resolved,
                PanelTarget::stock(symbol),
                json,
            )
            .await?;
        }
    }

    Ok(())
}

fn resolve(resolver: &PeriodResolver, args: &SelectionArgs) -> period::Result<Resolved> {
    resolver.normalize_raw(&args.statement, args.year, args.period.as_deref(), args.quarter)
}

fn print_resolved(resolved: &Resolved) -> Result<(), Box<dyn std::error::Error>> {
    let output = json!({
        "selection": resolved.selection,
        "label": resolved.selection.period_label().to_string(),
        "mask": resolved.mask,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn list_years(resolver: &PeriodResolver, statement: StatementType, period_type: PeriodType) {
    println!("{} / {}", statement.display_name(), period_type.display_name());
    for option in resolver.rules().year_options(statement, period_type) {
        let marker = if option.enabled { "" } else { "  (unavailable)" };
        println!("  {}{}", option.year, marker);
    }
}

fn list_metrics(statement: Option<StatementType>) {
    for statement in StatementType::ALL
        .into_iter()
        .filter(|s| statement.is_none_or(|wanted| wanted == *s))
    {
        println!("{}", statement.display_name());
        for metric in RankingMetric::for_statement(statement) {
            println!("  {:<32} {}", metric.key, metric.description);
        }
    }
}

async fn fetch(
    base_url: &str,
    resolver: PeriodResolver,
    resolved: Resolved,
    target: PanelTarget,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = Arc::new(HttpRankingProvider::new(base_url));
    let view = Arc::new(TerminalView::new(json));

    let controller =
        SelectionController::new(resolver, provider, view, resolved.selection, target)?;

    // The view has already printed the cause.
    if controller.load().await? == ChangeOutcome::Failed {
        return Err("ranking request failed".into());
    }
    Ok(())
}
