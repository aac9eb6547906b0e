use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use findash_data::{DeductionCsvLoader, TransactionCsvLoader};
use findash_db_sqlite::SqliteRepository;

/// Import user records from CSV files into the database.
///
/// Transactions CSV columns: date, merchant, description, amount,
/// category, source. Deductions CSV columns: category, amount, with
/// category one of 80C, 80D, HRA, 24B, 80CCD1B, 80G, Investment.
#[derive(Parser, Debug)]
#[command(name = "findash-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// User id the imported records belong to
    #[arg(short, long)]
    user: i64,

    /// Path to a transactions CSV file
    #[arg(short, long)]
    transactions: Option<PathBuf>,

    /// Path to a deductions CSV file
    #[arg(short = 'e', long)]
    deductions: Option<PathBuf>,

    /// SQLite database URL (e.g. sqlite:findash.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:findash.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.transactions.is_none() && args.deductions.is_none() {
        anyhow::bail!("nothing to do: pass --transactions and/or --deductions");
    }

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    if let Some(path) = &args.transactions {
        println!("Loading transactions from: {}", path.display());

        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = TransactionCsvLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;

        println!("Parsed {} records from CSV", records.len());

        let inserted = TransactionCsvLoader::load(&repo, args.user, &records)
            .await
            .context("Failed to load transactions into database")?;

        println!("Successfully loaded {} transactions.", inserted);
    }

    if let Some(path) = &args.deductions {
        println!("Loading deductions from: {}", path.display());

        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let records = DeductionCsvLoader::parse(file)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;

        println!("Parsed {} records from CSV", records.len());

        let inserted = DeductionCsvLoader::load(&repo, args.user, &records)
            .await
            .context("Failed to load deductions into database")?;

        println!("Successfully loaded {} deduction claims.", inserted);
    }

    Ok(())
}
