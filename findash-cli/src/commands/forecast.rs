use anyhow::Result;
use clap::ValueEnum;
use findash_core::FinanceRepository;
use findash_core::calculations::forecast::{
    forecast_cashflow, forecast_expenses, forecast_income,
};

use crate::commands::print_json;

/// Which monthly series to project.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ForecastKind {
    Income,
    Expenses,
    Cashflow,
}

/// Projects the chosen series `months` months past the last observation.
pub async fn run_forecast(
    repo: &dyn FinanceRepository,
    user: i64,
    months: u32,
    kind: ForecastKind,
) -> Result<()> {
    let transactions = repo.list_transactions(user, None).await?;

    let points = match kind {
        ForecastKind::Income => forecast_income(&transactions, months),
        ForecastKind::Expenses => forecast_expenses(&transactions, months),
        ForecastKind::Cashflow => forecast_cashflow(&transactions, months),
    };

    print_json(&points)
}
