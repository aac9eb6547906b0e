use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::DeductionCategory;

/// Capping policy for one deduction category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapRule {
    /// Claims above the cap are clamped to it.
    Capped(Decimal),
    /// The cap depends on a sub-variant. Only the default tier is ever
    /// applied; there is no age-based selection in this engine.
    Tiered { default: Decimal, senior: Decimal },
    /// Claims pass through unclamped. HRA and 80G stay uncapped as an
    /// explicit simplification of the real statutory rules.
    Uncapped,
}

impl CapRule {
    /// The cap actually enforced, or `None` for pass-through rules.
    pub fn effective_cap(&self) -> Option<Decimal> {
        match self {
            Self::Capped(cap) => Some(*cap),
            Self::Tiered { default, .. } => Some(*default),
            Self::Uncapped => None,
        }
    }
}

/// Per-category capping policy, loaded once and immutable afterwards.
///
/// Categories without an entry pass through uncapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeductionCapTable {
    rules: BTreeMap<DeductionCategory, CapRule>,
}

impl DeductionCapTable {
    pub fn new(rules: BTreeMap<DeductionCategory, CapRule>) -> Self {
        Self { rules }
    }

    pub fn rule(&self, category: DeductionCategory) -> &CapRule {
        self.rules.get(&category).unwrap_or(&CapRule::Uncapped)
    }

    pub fn effective_cap(&self, category: DeductionCategory) -> Option<Decimal> {
        self.rule(category).effective_cap()
    }

    /// A view keeping only the listed categories' rules; every other
    /// category passes through uncapped. The stored-data summary uses this
    /// to cap 80C alone.
    pub fn restricted_to(&self, categories: &[DeductionCategory]) -> Self {
        let rules = self
            .rules
            .iter()
            .filter(|(category, _)| categories.contains(category))
            .map(|(category, rule)| (*category, rule.clone()))
            .collect();
        Self { rules }
    }
}

impl Default for DeductionCapTable {
    /// The statutory caps the original system shipped with.
    fn default() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(
            DeductionCategory::Section80C,
            CapRule::Capped(Decimal::from(150_000)),
        );
        rules.insert(
            DeductionCategory::Section80D,
            CapRule::Tiered {
                default: Decimal::from(25_000),
                senior: Decimal::from(50_000),
            },
        );
        rules.insert(
            DeductionCategory::Nps,
            CapRule::Capped(Decimal::from(50_000)),
        );
        rules.insert(
            DeductionCategory::HomeLoanInterest,
            CapRule::Capped(Decimal::from(200_000)),
        );
        rules.insert(DeductionCategory::HouseRent, CapRule::Uncapped);
        rules.insert(DeductionCategory::Donations, CapRule::Uncapped);
        rules.insert(DeductionCategory::Investment, CapRule::Uncapped);
        Self { rules }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn tiered_rule_resolves_to_default_tier() {
        let caps = DeductionCapTable::default();

        assert_eq!(
            caps.effective_cap(DeductionCategory::Section80D),
            Some(dec!(25000))
        );
    }

    #[test]
    fn missing_category_passes_through() {
        let caps = DeductionCapTable::new(BTreeMap::new());

        assert_eq!(caps.effective_cap(DeductionCategory::Section80C), None);
    }

    #[test]
    fn restricted_view_keeps_only_listed_rules() {
        let caps = DeductionCapTable::default();

        let restricted = caps.restricted_to(&[DeductionCategory::Section80C]);

        assert_eq!(
            restricted.effective_cap(DeductionCategory::Section80C),
            Some(dec!(150000))
        );
        assert_eq!(restricted.effective_cap(DeductionCategory::Section80D), None);
        assert_eq!(restricted.effective_cap(DeductionCategory::Nps), None);
    }

    #[test]
    fn cap_document_round_trips_through_json() {
        let caps = DeductionCapTable::default();

        let json = serde_json::to_string(&caps).unwrap();
        let parsed: DeductionCapTable = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, caps);
    }
}
