mod commands;
mod input;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use findash_core::TaxConfig;
use findash_data::load_tax_config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::forecast::ForecastKind;
use commands::tax::SuggestionFilter;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Personal-finance dashboard backend.
///
/// Reads a user's stored transactions, investments and deduction claims,
/// and answers the dashboard queries: tax calculations, summaries,
/// forecasts and rule-based recommendations.
#[derive(Debug, Parser)]
#[command(name = "findash", version)]
struct Cli {
    /// Database backend to use.
    #[arg(long, default_value = "sqlite", global = true)]
    backend: String,

    /// Database connection string.
    /// For SQLite this is a URL (e.g. `sqlite:findash.db?mode=rwc`) or
    /// `sqlite::memory:`.
    #[arg(long, default_value = "sqlite:findash.db?mode=rwc", global = true)]
    db: String,

    /// Slab-table document (JSON, keyed country -> regime -> slabs).
    #[arg(long, default_value = "data/slabs.json", global = true)]
    slabs: PathBuf,

    /// Deduction-cap document (JSON); statutory defaults when omitted.
    #[arg(long, global = true)]
    caps: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the what-if tax calculator on a JSON request
    CalculateTax {
        /// Request JSON file; read from stdin when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Tax summary over a user's stored records
    TaxSummary {
        #[arg(short, long)]
        user: i64,
    },
    /// Rule-based recommendations
    Suggestions {
        #[arg(short, long)]
        user: i64,

        /// Limit to one surface; all four when omitted
        #[arg(short, long, value_enum)]
        category: Option<SuggestionFilter>,
    },
    /// Date-ranged financial summary
    Summary {
        #[arg(short, long)]
        user: i64,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },
    /// Project a monthly series forward
    Forecast {
        #[arg(short, long)]
        user: i64,

        /// How many months ahead to project
        #[arg(short, long, default_value_t = 3)]
        months: u32,

        /// Which series to project
        #[arg(short, long, value_enum, default_value = "cashflow")]
        kind: ForecastKind,
    },
    /// Portfolio valuation and allocation
    Portfolio {
        #[arg(short, long)]
        user: i64,

        /// Only holdings of this asset type
        #[arg(long)]
        asset_type: Option<String>,
    },
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn tax_config(cli: &Cli) -> Result<TaxConfig> {
    debug!("loading slab document from {}", cli.slabs.display());
    Ok(load_tax_config(&cli.slabs, cli.caps.as_deref())?)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match &cli.command {
        Commands::CalculateTax { file } => {
            let config = tax_config(&cli)?;
            commands::tax::run_calculate(&config, file.as_deref())
        }
        Commands::TaxSummary { user } => {
            let config = tax_config(&cli)?;
            let repo = commands::open_repository(&cli.backend, &cli.db).await?;
            commands::tax::run_tax_summary(&config, repo.as_ref(), *user).await
        }
        Commands::Suggestions { user, category } => {
            let config = tax_config(&cli)?;
            let repo = commands::open_repository(&cli.backend, &cli.db).await?;
            commands::tax::run_suggestions(&config, repo.as_ref(), *user, *category).await
        }
        Commands::Summary { user, start, end } => {
            let config = tax_config(&cli)?;
            let repo = commands::open_repository(&cli.backend, &cli.db).await?;
            commands::summary::run_summary(&config, repo.as_ref(), *user, *start, *end).await
        }
        Commands::Forecast { user, months, kind } => {
            let repo = commands::open_repository(&cli.backend, &cli.db).await?;
            commands::forecast::run_forecast(repo.as_ref(), *user, *months, *kind).await
        }
        Commands::Portfolio { user, asset_type } => {
            let repo = commands::open_repository(&cli.backend, &cli.db).await?;
            commands::summary::run_portfolio(repo.as_ref(), *user, asset_type.as_deref()).await
        }
    }
}
