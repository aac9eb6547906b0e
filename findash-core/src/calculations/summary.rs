//! Aggregation of stored records into the dashboard summary views.
//!
//! Pure glue: sign partitioning, month bucketing and valuation. The tax
//! figure is delegated to [`TaxCalculator::summarize`] so there is no
//! second liability computation here.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculations::common::round_half_up;
use crate::calculations::forecast::{Month, monthly_expenses, monthly_income};
use crate::calculations::tax::{TaxCalculator, TaxError};
use crate::models::{DeductionRecord, Investment, Transaction};

/// One month of the income-vs-expenses chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCashflow {
    pub month: Month,
    pub income: Decimal,
    pub expenses: Decimal,
}

/// One slice of the expense-breakdown chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialSummary {
    pub total_income: Decimal,
    /// Reported as a positive figure.
    pub total_expenses: Decimal,
    pub net_savings: Decimal,
    /// `sum(units * current_price)` over the holdings.
    pub investment_value: Decimal,
    pub tax_liability: Decimal,
    pub income_vs_expenses: Vec<MonthlyCashflow>,
    /// Spending per category, largest first.
    pub expense_breakdown: Vec<CategoryTotal>,
}

/// Builds the date-ranged dashboard summary. The caller fetches the
/// records (ranged or not); this only aggregates them.
pub fn financial_summary(
    calculator: &TaxCalculator<'_>,
    transactions: &[Transaction],
    investments: &[Investment],
    deductions: &[DeductionRecord],
) -> Result<FinancialSummary, TaxError> {
    let total_income: Decimal = transactions
        .iter()
        .filter(|t| t.amount > Decimal::ZERO)
        .map(|t| t.amount)
        .sum();
    let total_expenses: Decimal = transactions
        .iter()
        .filter(|t| t.amount < Decimal::ZERO)
        .map(|t| t.amount.abs())
        .sum();

    let income_by_month = monthly_income(transactions);
    let expenses_by_month = monthly_expenses(transactions);
    let mut months: Vec<Month> = income_by_month
        .keys()
        .chain(expenses_by_month.keys())
        .copied()
        .collect();
    months.sort_unstable();
    months.dedup();

    let income_vs_expenses = months
        .into_iter()
        .map(|month| MonthlyCashflow {
            month,
            income: income_by_month.get(&month).copied().unwrap_or(Decimal::ZERO),
            expenses: expenses_by_month
                .get(&month)
                .copied()
                .unwrap_or(Decimal::ZERO),
        })
        .collect();

    let mut breakdown: Vec<CategoryTotal> = Vec::new();
    for transaction in transactions.iter().filter(|t| t.amount < Decimal::ZERO) {
        match breakdown
            .iter_mut()
            .find(|entry| entry.category == transaction.category)
        {
            Some(entry) => entry.amount += transaction.amount.abs(),
            None => breakdown.push(CategoryTotal {
                category: transaction.category.clone(),
                amount: transaction.amount.abs(),
            }),
        }
    }
    breakdown.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));

    let investment_value = investments.iter().map(Investment::current_value).sum();
    let tax_liability = calculator.summarize(transactions, deductions)?.tax_liability;

    Ok(FinancialSummary {
        total_income,
        total_expenses,
        net_savings: total_income - total_expenses,
        investment_value,
        tax_liability,
        income_vs_expenses,
        expense_breakdown: breakdown,
    })
}

/// Value held in one asset type and its share of the portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetAllocation {
    pub asset_type: String,
    pub value: Decimal,
    /// Share of the portfolio's current value, in percent.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioPerformance {
    pub total_invested: Decimal,
    pub current_value: Decimal,
    pub unrealized_pnl: Decimal,
    /// Largest allocation first.
    pub allocations: Vec<AssetAllocation>,
}

/// Valuation and allocation across a user's holdings.
pub fn portfolio_performance(investments: &[Investment]) -> PortfolioPerformance {
    let total_invested: Decimal = investments.iter().map(|i| i.units * i.buy_price).sum();
    let current_value: Decimal = investments.iter().map(Investment::current_value).sum();

    let mut allocations: Vec<AssetAllocation> = Vec::new();
    for investment in investments {
        let value = investment.current_value();
        match allocations
            .iter_mut()
            .find(|a| a.asset_type == investment.asset_type)
        {
            Some(allocation) => allocation.value += value,
            None => allocations.push(AssetAllocation {
                asset_type: investment.asset_type.clone(),
                value,
                percentage: Decimal::ZERO,
            }),
        }
    }
    for allocation in &mut allocations {
        allocation.percentage = if current_value == Decimal::ZERO {
            Decimal::ZERO
        } else {
            round_half_up(allocation.value / current_value * Decimal::from(100))
        };
    }
    allocations.sort_by(|a, b| b.value.cmp(&a.value).then(a.asset_type.cmp(&b.asset_type)));

    PortfolioPerformance {
        total_invested,
        current_value,
        unrealized_pnl: current_value - total_invested,
        allocations,
    }
}
