//! Rule-based recommendations.
//!
//! Every rule is an independent, side-effect-free threshold comparison
//! over already-aggregated figures; each rule set returns its findings in
//! a fixed order and falls back to a single "looks good" message when
//! nothing fires. No statistics, no learning, on purpose.

use rust_decimal::Decimal;

use crate::calculations::forecast::{Month, forecast_cashflow, monthly_expenses};
use crate::models::{DeductionCapTable, DeductionCategory, DeductionRecord, Investment, Transaction};

/// The four recommendation surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionCategory {
    Expenses,
    Tax,
    Investments,
    Cashflow,
}

impl SuggestionCategory {
    pub const ALL: [SuggestionCategory; 4] = [
        Self::Expenses,
        Self::Tax,
        Self::Investments,
        Self::Cashflow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expenses => "expenses",
            Self::Tax => "tax",
            Self::Investments => "investments",
            Self::Cashflow => "cashflow",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "expenses" => Some(Self::Expenses),
            "tax" => Some(Self::Tax),
            "investments" => Some(Self::Investments),
            "cashflow" => Some(Self::Cashflow),
            _ => None,
        }
    }
}

impl std::fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spending review. `current_month` is passed in rather than read from a
/// clock so the rules stay deterministic.
pub fn expense_suggestions(
    transactions: &[Transaction],
    current_month: Month,
) -> Vec<String> {
    if transactions.is_empty() {
        return vec![
            "No transaction data available to provide expense recommendations.".to_string(),
        ];
    }

    let by_month = monthly_expenses(transactions);
    if by_month.is_empty() {
        return vec!["No expense transactions found. Keep up the good work!".to_string()];
    }

    let mut suggestions = Vec::new();

    let monthly_average: Decimal =
        by_month.values().copied().sum::<Decimal>() / Decimal::from(by_month.len());
    let current = by_month
        .get(&current_month)
        .copied()
        .unwrap_or(Decimal::ZERO);
    if monthly_average > Decimal::ZERO && current > monthly_average * Decimal::new(12, 1) {
        suggestions.push(format!(
            "Your expenses this month ({current:.2}) are significantly higher than your \
             average monthly expenses ({monthly_average:.2}). Consider reviewing your \
             spending to identify areas for cutbacks."
        ));
    }

    let mut by_category: Vec<(&str, Decimal)> = Vec::new();
    for transaction in transactions.iter().filter(|t| t.amount < Decimal::ZERO) {
        match by_category
            .iter_mut()
            .find(|(category, _)| *category == transaction.category)
        {
            Some((_, total)) => *total += transaction.amount.abs(),
            None => by_category.push((transaction.category.as_str(), transaction.amount.abs())),
        }
    }
    if let Some((category, total)) = by_category
        .iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)))
    {
        suggestions.push(format!(
            "You spend the most on '{category}' ({total:.2}). Look for alternatives or \
             set a budget for this category."
        ));
    }

    if suggestions.is_empty() {
        suggestions.push("Your spending looks good! Keep tracking your expenses.".to_string());
    }
    suggestions
}

/// Deduction planning: 80C headroom against the cap table, plus an NPS
/// reminder while no 80CCD(1B) claim exists.
pub fn tax_suggestions(
    deductions: &[DeductionRecord],
    caps: &DeductionCapTable,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    let used_80c: Decimal = deductions
        .iter()
        .filter(|d| d.category == DeductionCategory::Section80C)
        .map(|d| d.amount)
        .sum();
    if let Some(cap) = caps.effective_cap(DeductionCategory::Section80C) {
        if used_80c < cap {
            let headroom = cap - used_80c;
            suggestions.push(format!(
                "Invest up to \u{20b9}{headroom:.0} in Section 80C instruments (PPF, ELSS, \
                 Insurance)."
            ));
        }
    }

    if !deductions.iter().any(|d| d.category == DeductionCategory::Nps) {
        suggestions.push(
            "Consider NPS contributions under Section 80CCD(1B) for an extra \u{20b9}50,000 \
             deduction."
                .to_string(),
        );
    }

    if suggestions.is_empty() {
        suggestions.push(
            "Your tax planning looks good based on your current deductions.".to_string(),
        );
    }
    suggestions
}

/// Portfolio review: diversification breadth and losing positions.
pub fn investment_suggestions(investments: &[Investment]) -> Vec<String> {
    if investments.is_empty() {
        return vec!["No investment data available. Start investing to grow your wealth!".to_string()];
    }

    let portfolio_value: Decimal = investments.iter().map(Investment::current_value).sum();
    if portfolio_value == Decimal::ZERO {
        return vec!["Your investments currently have no value. Review your portfolio.".to_string()];
    }

    let mut suggestions = Vec::new();

    let mut asset_types: Vec<&str> = investments.iter().map(|i| i.asset_type.as_str()).collect();
    asset_types.sort_unstable();
    asset_types.dedup();
    if asset_types.len() < 3 {
        suggestions.push(format!(
            "Your portfolio is concentrated in {} asset types. Consider diversifying \
             across more asset classes like stocks, bonds, and real estate.",
            asset_types.len()
        ));
    }

    let losing = investments
        .iter()
        .filter(|i| i.unrealized_pnl() < Decimal::ZERO)
        .count();
    if losing > 0 {
        suggestions.push(format!(
            "You have {losing} investments currently at a loss. Review these positions \
             and consider whether to hold or rebalance."
        ));
    }

    if suggestions.is_empty() {
        suggestions.push(
            "Your investment portfolio looks well-balanced and performing adequately.".to_string(),
        );
    }
    suggestions
}

/// Shortfall alerts over the next three forecast months.
pub fn cashflow_alerts(transactions: &[Transaction]) -> Vec<String> {
    if transactions.is_empty() {
        return vec!["No transaction data to predict cash flow. Please add some transactions.".to_string()];
    }

    let mut suggestions = Vec::new();
    for point in forecast_cashflow(transactions, 3) {
        if point.predicted_value < Decimal::ZERO {
            suggestions.push(format!(
                "Alert: Your projected cashflow for {} is negative ({:.2}). Review your \
                 upcoming expenses and income to avoid a shortfall.",
                point.month, point.predicted_value
            ));
        }
    }

    if suggestions.is_empty() {
        suggestions.push(
            "Your projected cashflow looks healthy for the upcoming months.".to_string(),
        );
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn transaction(amount: Decimal, category: &str, year: i32, month: u32) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            date: Utc.with_ymd_and_hms(year, month, 5, 0, 0, 0).unwrap(),
            merchant: "m".to_string(),
            description: None,
            amount,
            category: category.to_string(),
            source: None,
        }
    }

    fn deduction(category: DeductionCategory, amount: Decimal) -> DeductionRecord {
        DeductionRecord {
            id: 0,
            user_id: 1,
            category,
            amount,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn holding(asset_type: &str, units: Decimal, buy: Decimal, current: Decimal) -> Investment {
        Investment {
            id: 0,
            user_id: 1,
            asset_type: asset_type.to_string(),
            name: "holding".to_string(),
            units,
            buy_price: buy,
            current_price: current,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    // ── expenses ────────────────────────────────────────────────────────

    #[test]
    fn expense_rules_need_transaction_data() {
        let suggestions = expense_suggestions(&[], Month::new(2024, 6));

        assert_eq!(
            suggestions,
            vec!["No transaction data available to provide expense recommendations.".to_string()]
        );
    }

    #[test]
    fn income_only_history_is_praised() {
        let transactions = vec![transaction(dec!(50000), "salary", 2024, 5)];

        let suggestions = expense_suggestions(&transactions, Month::new(2024, 6));

        assert_eq!(
            suggestions,
            vec!["No expense transactions found. Keep up the good work!".to_string()]
        );
    }

    #[test]
    fn overspending_month_triggers_the_alert() {
        let transactions = vec![
            transaction(dec!(-10000), "rent", 2024, 3),
            transaction(dec!(-10000), "rent", 2024, 4),
            transaction(dec!(-40000), "rent", 2024, 5),
        ];

        let suggestions = expense_suggestions(&transactions, Month::new(2024, 5));

        // Average is 20000, current month is 40000 > 1.2x.
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].contains("significantly higher"));
        assert!(suggestions[1].contains("'rent'"));
    }

    #[test]
    fn top_category_is_always_called_out() {
        let transactions = vec![
            transaction(dec!(-1000), "groceries", 2024, 5),
            transaction(dec!(-5000), "travel", 2024, 5),
        ];

        let suggestions = expense_suggestions(&transactions, Month::new(2024, 5));

        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("'travel'"));
        assert!(suggestions[0].contains("5000.00"));
    }

    // ── tax ─────────────────────────────────────────────────────────────

    #[test]
    fn headroom_and_nps_reminder_fire_together() {
        let deductions = vec![deduction(DeductionCategory::Section80C, dec!(100000))];

        let suggestions = tax_suggestions(&deductions, &DeductionCapTable::default());

        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].contains("\u{20b9}50000 in Section 80C"));
        assert!(suggestions[1].contains("Section 80CCD(1B)"));
    }

    #[test]
    fn exhausted_80c_with_nps_claim_looks_good() {
        let deductions = vec![
            deduction(DeductionCategory::Section80C, dec!(150000)),
            deduction(DeductionCategory::Nps, dec!(50000)),
        ];

        let suggestions = tax_suggestions(&deductions, &DeductionCapTable::default());

        assert_eq!(
            suggestions,
            vec!["Your tax planning looks good based on your current deductions.".to_string()]
        );
    }

    // ── investments ─────────────────────────────────────────────────────

    #[test]
    fn empty_portfolio_prompts_to_start() {
        let suggestions = investment_suggestions(&[]);

        assert_eq!(
            suggestions,
            vec!["No investment data available. Start investing to grow your wealth!".to_string()]
        );
    }

    #[test]
    fn worthless_portfolio_prompts_a_review() {
        let suggestions = investment_suggestions(&[holding("stock", dec!(10), dec!(5), dec!(0))]);

        assert_eq!(
            suggestions,
            vec!["Your investments currently have no value. Review your portfolio.".to_string()]
        );
    }

    #[test]
    fn narrow_portfolio_and_losses_both_flag() {
        let investments = vec![
            holding("stock", dec!(10), dec!(100), dec!(80)),
            holding("bond", dec!(10), dec!(100), dec!(110)),
        ];

        let suggestions = investment_suggestions(&investments);

        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].contains("concentrated in 2 asset types"));
        assert!(suggestions[1].contains("1 investments currently at a loss"));
    }

    #[test]
    fn diversified_profitable_portfolio_looks_good() {
        let investments = vec![
            holding("stock", dec!(10), dec!(100), dec!(110)),
            holding("bond", dec!(10), dec!(100), dec!(105)),
            holding("gold", dec!(5), dec!(50), dec!(55)),
        ];

        let suggestions = investment_suggestions(&investments);

        assert_eq!(
            suggestions,
            vec!["Your investment portfolio looks well-balanced and performing adequately."
                .to_string()]
        );
    }

    // ── cashflow ────────────────────────────────────────────────────────

    #[test]
    fn cashflow_rules_need_transaction_data() {
        let suggestions = cashflow_alerts(&[]);

        assert_eq!(
            suggestions,
            vec!["No transaction data to predict cash flow. Please add some transactions."
                .to_string()]
        );
    }

    #[test]
    fn negative_forecast_months_raise_alerts() {
        let transactions = vec![
            transaction(dec!(10000), "salary", 2024, 4),
            transaction(dec!(-18000), "rent", 2024, 4),
        ];

        let suggestions = cashflow_alerts(&transactions);

        assert_eq!(suggestions.len(), 3);
        assert!(suggestions[0].contains("2024-05"));
        assert!(suggestions[0].contains("-8000.00"));
    }

    #[test]
    fn healthy_forecast_says_so() {
        let transactions = vec![
            transaction(dec!(10000), "salary", 2024, 4),
            transaction(dec!(-2000), "rent", 2024, 4),
        ];

        let suggestions = cashflow_alerts(&transactions);

        assert_eq!(
            suggestions,
            vec!["Your projected cashflow looks healthy for the upcoming months.".to_string()]
        );
    }
}
