use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveTime};
use findash_core::calculations::summary::{financial_summary, portfolio_performance};
use findash_core::calculations::tax::TaxCalculator;
use findash_core::{DateRange, FinanceRepository, TaxConfig};

use crate::commands::print_json;

/// Builds the date-ranged dashboard summary. Both dates are inclusive.
pub async fn run_summary(
    config: &TaxConfig,
    repo: &dyn FinanceRepository,
    user: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<()> {
    if end < start {
        bail!("invalid range: end date precedes start date");
    }
    let range = DateRange {
        start: start.and_time(NaiveTime::MIN).and_utc(),
        end: end
            .and_hms_opt(23, 59, 59)
            .context("invalid end date")?
            .and_utc(),
    };

    let transactions = repo.list_transactions(user, Some(range)).await?;
    let deductions = repo.list_deductions(user, Some(range)).await?;
    let mut investments = repo.list_investments(user, None).await?;
    investments.retain(|i| i.created_at >= range.start && i.created_at <= range.end);

    let calculator = TaxCalculator::new(config);
    let summary = financial_summary(&calculator, &transactions, &investments, &deductions)?;
    print_json(&summary)
}

/// Valuation and allocation across a user's holdings.
pub async fn run_portfolio(
    repo: &dyn FinanceRepository,
    user: i64,
    asset_type: Option<&str>,
) -> Result<()> {
    let investments = repo.list_investments(user, asset_type).await?;
    print_json(&portfolio_performance(&investments))
}
