//! Deduction normalization: clamping claimed amounts to their statutory
//! caps before they reach the tax calculator.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{DeductionCapTable, DeductionCategory};

/// Post-cap deduction usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeductionUsage {
    /// Amount actually used per claimed category.
    pub used: BTreeMap<DeductionCategory, Decimal>,
    /// Sum of the used amounts.
    pub total: Decimal,
}

/// Clamps each claimed amount to its category's effective cap.
///
/// Claims are already summed per category by the caller; categories
/// without a cap rule pass through unchanged. Negative claims also pass
/// through: amounts are validated at the edges, not here, and a negative
/// claim is below any cap anyway.
pub fn normalize_deductions(
    claims: &BTreeMap<DeductionCategory, Decimal>,
    caps: &DeductionCapTable,
) -> DeductionUsage {
    let mut used = BTreeMap::new();
    let mut total = Decimal::ZERO;

    for (&category, &claimed) in claims {
        let allowed = match caps.effective_cap(category) {
            Some(cap) => claimed.min(cap),
            None => claimed,
        };
        used.insert(category, allowed);
        total += allowed;
    }

    DeductionUsage { used, total }
}
