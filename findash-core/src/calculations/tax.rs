//! Progressive income-tax computation.
//!
//! This module implements the marginal slab walk and the two entry points
//! built on it: the ad-hoc what-if calculation (`calculate`) and the
//! stored-data summary (`summarize`). Both share the same walk and the
//! same normalizer, so there is exactly one place that gets the slab
//! boundary arithmetic right.
//!
//! # Computation steps
//!
//! `calculate` performs, in order:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Clamp each claimed deduction to its category cap |
//! | 2    | Taxable income = max(0, income - expenses - deductions used) |
//! | 3    | Liability = marginal walk over the requested regime's slabs |
//! | 4    | Counterfactual liability with deductions zeroed out |
//! | 5    | Savings = counterfactual - liability |
//! | 6    | Old-regime liability (keeps capped deductions) |
//! | 7    | New-regime liability (forfeits all deductions) |
//! | 8    | Recommend whichever regime owes strictly less; Old on a tie |
//!
//! Steps 6-8 ignore the regime the caller asked for: the comparison is
//! always both regimes, computed under each regime's own deduction policy.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use rust_decimal_macros::dec;
//! use findash_core::calculations::tax::{TaxCalculator, TaxComputationInput};
//! use findash_core::config::{SlabDocument, TaxConfig};
//! use findash_core::models::{DeductionCapTable, DeductionCategory, TaxRegime, TaxSlab};
//!
//! let mut document = SlabDocument::new();
//! document.insert(
//!     "IN".to_string(),
//!     BTreeMap::from([
//!         (TaxRegime::Old, vec![
//!             TaxSlab { min_income: dec!(0), max_income: Some(dec!(250000)), tax_rate: dec!(0) },
//!             TaxSlab { min_income: dec!(250000), max_income: Some(dec!(500000)), tax_rate: dec!(0.05) },
//!             TaxSlab { min_income: dec!(500000), max_income: Some(dec!(1000000)), tax_rate: dec!(0.20) },
//!             TaxSlab { min_income: dec!(1000000), max_income: None, tax_rate: dec!(0.30) },
//!         ]),
//!         (TaxRegime::New, vec![
//!             TaxSlab { min_income: dec!(0), max_income: Some(dec!(300000)), tax_rate: dec!(0) },
//!             TaxSlab { min_income: dec!(300000), max_income: Some(dec!(600000)), tax_rate: dec!(0.05) },
//!             TaxSlab { min_income: dec!(600000), max_income: None, tax_rate: dec!(0.20) },
//!         ]),
//!     ]),
//! );
//! let config = TaxConfig::new(document, DeductionCapTable::default()).unwrap();
//!
//! let input = TaxComputationInput {
//!     country: None,
//!     gross_income: dec!(900000),
//!     total_expenses: dec!(0),
//!     deduction_claims: BTreeMap::from([(DeductionCategory::Section80C, dec!(200000))]),
//!     regime: TaxRegime::Old,
//! };
//!
//! let result = TaxCalculator::new(&config).calculate(&input).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(750000));
//! assert_eq!(result.tax_liability, dec!(62500));
//! assert_eq!(result.tax_savings, dec!(30000));
//! assert_eq!(result.regime_recommendation, "Old Regime");
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::max;
use crate::calculations::deductions::{DeductionUsage, normalize_deductions};
use crate::config::TaxConfig;
use crate::models::{DeductionCategory, DeductionRecord, SlabTable, TaxRegime, Transaction};

/// Errors that can occur during a tax computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    /// No slab table is configured for the requested pair. Surfaced to the
    /// caller as a not-found failure, never defaulted.
    #[error("no slab table configured for country '{country}' regime '{regime}'")]
    SlabTableNotFound { country: String, regime: TaxRegime },
}

/// Input to a what-if tax calculation.
///
/// Constructed per request and never persisted. Amount fields are
/// validated non-negative at the request edge before this is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationInput {
    /// Country whose slab document applies; the configured default when
    /// absent.
    #[serde(default)]
    pub country: Option<String>,
    #[serde(alias = "income")]
    pub gross_income: Decimal,
    #[serde(alias = "expenses")]
    pub total_expenses: Decimal,
    /// Claimed amount per category, pre-cap.
    #[serde(default, alias = "deductions")]
    pub deduction_claims: BTreeMap<DeductionCategory, Decimal>,
    pub regime: TaxRegime,
}

/// Full output of a what-if tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationResult {
    pub taxable_income: Decimal,
    /// Liability under the regime the caller asked for.
    pub tax_liability: Decimal,
    /// Liability under the same regime with deductions zeroed out.
    pub tax_liability_without_deductions: Decimal,
    pub tax_savings: Decimal,
    /// Post-cap amount used per claimed category.
    pub deductions_used: BTreeMap<DeductionCategory, Decimal>,
    pub total_deductions: Decimal,
    /// `"Old Regime"` or `"New Regime"`; Old wins ties.
    pub regime_recommendation: String,
    pub old_regime_liability: Decimal,
    pub new_regime_liability: Decimal,
}

/// The stored-data tax summary view.
///
/// Per-category figures report the raw claimed sums; `total_deductions`
/// is what the liability was actually computed from (capped 80C, the
/// other categories as claimed, plus the flat standard deduction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub deductions_80c: Decimal,
    pub deductions_80d: Decimal,
    pub hra_deduction: Decimal,
    pub investment_deduction: Decimal,
    pub standard_deduction: Decimal,
    pub total_deductions: Decimal,
    pub taxable_income: Decimal,
    pub tax_liability: Decimal,
}

/// Stateless calculator over an immutable [`TaxConfig`].
///
/// Borrowing the configuration keeps the calculator trivially shareable:
/// every call is a pure function of its arguments and the tables.
#[derive(Debug, Clone)]
pub struct TaxCalculator<'a> {
    config: &'a TaxConfig,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(config: &'a TaxConfig) -> Self {
        Self { config }
    }

    /// Runs the full what-if computation for one request.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::SlabTableNotFound`] when the requested country
    /// has no table for the requested regime, or is missing either table
    /// needed for the regime comparison.
    pub fn calculate(
        &self,
        input: &TaxComputationInput,
    ) -> Result<TaxComputationResult, TaxError> {
        let country = input
            .country
            .as_deref()
            .unwrap_or_else(|| self.config.default_country());

        let usage = normalize_deductions(&input.deduction_claims, self.config.caps());

        let taxable_raw = max(input.gross_income - input.total_expenses, Decimal::ZERO);
        let taxable_income = self.taxable_income(input.gross_income, input.total_expenses, &usage);

        let table = self.slab_table(country, input.regime)?;
        let tax_liability = table.tax_on(taxable_income);
        let tax_liability_without_deductions = table.tax_on(taxable_raw);
        let tax_savings = tax_liability_without_deductions - tax_liability;

        // The comparison ignores the requested regime: old keeps the
        // capped deductions, new forfeits them entirely.
        let old_regime_liability = self
            .slab_table(country, TaxRegime::Old)?
            .tax_on(taxable_income);
        let new_regime_liability = self
            .slab_table(country, TaxRegime::New)?
            .tax_on(taxable_raw);

        let recommendation = if new_regime_liability < old_regime_liability {
            TaxRegime::New
        } else {
            TaxRegime::Old
        };

        Ok(TaxComputationResult {
            taxable_income,
            tax_liability,
            tax_liability_without_deductions,
            tax_savings,
            deductions_used: usage.used,
            total_deductions: usage.total,
            regime_recommendation: recommendation.display_name().to_string(),
            old_regime_liability,
            new_regime_liability,
        })
    }

    /// Builds the tax summary for a user's stored records.
    ///
    /// Income is the sum of positive transaction amounts, expenses the
    /// absolute sum of negative ones. Claims are summed per category from
    /// the stored deduction rows; in this view only 80C is capped and the
    /// flat standard deduction always applies. The walk runs against the
    /// default country's old-regime table (this path is not regime-aware).
    pub fn summarize(
        &self,
        transactions: &[Transaction],
        deductions: &[DeductionRecord],
    ) -> Result<TaxSummary, TaxError> {
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

        let mut claims: BTreeMap<DeductionCategory, Decimal> = BTreeMap::new();
        for deduction in deductions {
            *claims.entry(deduction.category).or_insert(Decimal::ZERO) += deduction.amount;
        }
        let claimed = |category: DeductionCategory| {
            claims.get(&category).copied().unwrap_or(Decimal::ZERO)
        };

        let caps = self
            .config
            .caps()
            .restricted_to(&[DeductionCategory::Section80C]);
        let usage = normalize_deductions(&claims, &caps);

        let standard_deduction = self.config.standard_deduction();
        let total_deductions = usage.total + standard_deduction;
        let taxable_income = max(total_income - total_expenses - total_deductions, Decimal::ZERO);

        let table = self.slab_table(self.config.default_country(), TaxRegime::Old)?;
        let tax_liability = table.tax_on(taxable_income);

        Ok(TaxSummary {
            total_income,
            total_expenses,
            deductions_80c: claimed(DeductionCategory::Section80C),
            deductions_80d: claimed(DeductionCategory::Section80D),
            hra_deduction: claimed(DeductionCategory::HouseRent),
            investment_deduction: claimed(DeductionCategory::Investment),
            standard_deduction,
            total_deductions,
            taxable_income,
            tax_liability,
        })
    }

    fn taxable_income(
        &self,
        gross_income: Decimal,
        total_expenses: Decimal,
        usage: &DeductionUsage,
    ) -> Decimal {
        let net = gross_income - total_expenses - usage.total;
        if net < Decimal::ZERO {
            debug!(%gross_income, %total_expenses, deductions = %usage.total,
                "deductions exceed net income; taxable income floored at zero");
        }
        max(net, Decimal::ZERO)
    }

    fn slab_table(
        &self,
        country: &str,
        regime: TaxRegime,
    ) -> Result<&SlabTable, TaxError> {
        self.config
            .slab_table(country, regime)
            .ok_or_else(|| TaxError::SlabTableNotFound {
                country: country.to_string(),
                regime,
            })
    }
}
