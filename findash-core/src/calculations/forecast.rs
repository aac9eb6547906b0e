//! Trailing-mean cashflow projection.
//!
//! Transactions are bucketed into calendar months; the prediction for
//! every future month is the mean of the last three observed months (or
//! of whatever is available when the history is shorter). Deliberately
//! naive: no model selection, no error evaluation.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculations::common::round_half_up;
use crate::models::Transaction;

/// A calendar month, the bucketing unit for series and forecasts.
///
/// Serializes as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// `month` is 1-based; values outside 1..=12 are a caller bug.
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn of(date: &DateTime<Utc>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One projected month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastPoint {
    pub month: Month,
    pub predicted_value: Decimal,
}

/// Monthly income totals (positive amounts).
pub fn monthly_income(transactions: &[Transaction]) -> BTreeMap<Month, Decimal> {
    monthly_totals(transactions, |amount| amount > Decimal::ZERO)
}

/// Monthly expense totals (negative amounts, as absolute values).
pub fn monthly_expenses(transactions: &[Transaction]) -> BTreeMap<Month, Decimal> {
    monthly_totals(transactions, |amount| amount < Decimal::ZERO)
}

/// Monthly net cashflow: income minus expenses over the union of months,
/// missing sides treated as zero.
pub fn monthly_net_cashflow(transactions: &[Transaction]) -> BTreeMap<Month, Decimal> {
    let income = monthly_income(transactions);
    let expenses = monthly_expenses(transactions);

    let mut net = income;
    for (month, spent) in expenses {
        *net.entry(month).or_insert(Decimal::ZERO) -= spent;
    }
    net
}

fn monthly_totals(
    transactions: &[Transaction],
    keep: impl Fn(Decimal) -> bool,
) -> BTreeMap<Month, Decimal> {
    let mut totals = BTreeMap::new();
    for transaction in transactions.iter().filter(|t| keep(t.amount)) {
        *totals
            .entry(Month::of(&transaction.date))
            .or_insert(Decimal::ZERO) += transaction.amount.abs();
    }
    totals
}

/// Projects a monthly series `months_ahead` months past its last
/// observation. Empty series produce an empty forecast.
pub fn forecast_series(
    series: &BTreeMap<Month, Decimal>,
    months_ahead: u32,
) -> Vec<ForecastPoint> {
    let Some((&last_month, _)) = series.iter().next_back() else {
        return Vec::new();
    };

    let window: Vec<Decimal> = series.values().rev().take(3).copied().collect();
    let sum: Decimal = window.iter().copied().sum();
    let predicted_value = round_half_up(sum / Decimal::from(window.len()));

    let mut month = last_month;
    (0..months_ahead)
        .map(|_| {
            month = month.next();
            ForecastPoint {
                month,
                predicted_value,
            }
        })
        .collect()
}

pub fn forecast_income(transactions: &[Transaction], months_ahead: u32) -> Vec<ForecastPoint> {
    forecast_series(&monthly_income(transactions), months_ahead)
}

pub fn forecast_expenses(transactions: &[Transaction], months_ahead: u32) -> Vec<ForecastPoint> {
    forecast_series(&monthly_expenses(transactions), months_ahead)
}

pub fn forecast_cashflow(transactions: &[Transaction], months_ahead: u32) -> Vec<ForecastPoint> {
    forecast_series(&monthly_net_cashflow(transactions), months_ahead)
}
