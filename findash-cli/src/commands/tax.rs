use std::path::Path;

use anyhow::{Result, bail};
use chrono::Utc;
use clap::ValueEnum;
use findash_core::calculations::forecast::Month;
use findash_core::calculations::suggestions::{
    SuggestionCategory, cashflow_alerts, expense_suggestions, investment_suggestions,
    tax_suggestions,
};
use findash_core::calculations::tax::{TaxCalculator, TaxComputationInput};
use findash_core::{FinanceRepository, TaxConfig};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::commands::print_json;
use crate::input::read_request;

/// Runs the what-if calculator on a JSON request read from `file` or
/// stdin.
pub fn run_calculate(config: &TaxConfig, file: Option<&Path>) -> Result<()> {
    let request: TaxComputationInput = read_request(file)?;
    if request.gross_income < Decimal::ZERO || request.total_expenses < Decimal::ZERO {
        bail!("invalid input: gross_income and total_expenses must be non-negative");
    }

    debug!(regime = %request.regime, "running what-if tax calculation");
    let result = TaxCalculator::new(config).calculate(&request)?;
    print_json(&result)
}

/// Builds the stored-data tax summary for one user.
pub async fn run_tax_summary(
    config: &TaxConfig,
    repo: &dyn FinanceRepository,
    user: i64,
) -> Result<()> {
    let transactions = repo.list_transactions(user, None).await?;
    let deductions = repo.list_deductions(user, None).await?;

    let summary = TaxCalculator::new(config).summarize(&transactions, &deductions)?;
    print_json(&summary)
}

/// CLI-facing filter for the recommendation surfaces.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SuggestionFilter {
    Expenses,
    Tax,
    Investments,
    Cashflow,
}

impl From<SuggestionFilter> for SuggestionCategory {
    fn from(filter: SuggestionFilter) -> Self {
        match filter {
            SuggestionFilter::Expenses => Self::Expenses,
            SuggestionFilter::Tax => Self::Tax,
            SuggestionFilter::Investments => Self::Investments,
            SuggestionFilter::Cashflow => Self::Cashflow,
        }
    }
}

#[derive(Debug, Serialize)]
struct SuggestionGroup {
    category: &'static str,
    suggestions: Vec<String>,
}

/// Evaluates the recommendation rules, all surfaces or one.
pub async fn run_suggestions(
    config: &TaxConfig,
    repo: &dyn FinanceRepository,
    user: i64,
    filter: Option<SuggestionFilter>,
) -> Result<()> {
    let categories: Vec<SuggestionCategory> = match filter {
        Some(filter) => vec![filter.into()],
        None => SuggestionCategory::ALL.to_vec(),
    };

    let needs_transactions = categories
        .iter()
        .any(|c| matches!(c, SuggestionCategory::Expenses | SuggestionCategory::Cashflow));
    let transactions = if needs_transactions {
        repo.list_transactions(user, None).await?
    } else {
        Vec::new()
    };
    let current_month = Month::of(&Utc::now());

    let mut groups = Vec::new();
    for category in categories {
        let suggestions = match category {
            SuggestionCategory::Expenses => expense_suggestions(&transactions, current_month),
            SuggestionCategory::Tax => {
                tax_suggestions(&repo.list_deductions(user, None).await?, config.caps())
            }
            SuggestionCategory::Investments => {
                investment_suggestions(&repo.list_investments(user, None).await?)
            }
            SuggestionCategory::Cashflow => cashflow_alerts(&transactions),
        };
        groups.push(SuggestionGroup {
            category: category.as_str(),
            suggestions,
        });
    }

    print_json(&groups)
}
