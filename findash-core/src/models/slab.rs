use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_half_up;

/// One income band taxed at a single marginal rate.
///
/// Field names match the slab document on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub min_income: Decimal,
    /// Upper bound of the band; `None` means unbounded.
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

/// Errors raised when a slab list violates the table invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlabTableError {
    /// The table has no slabs at all.
    #[error("slab table is empty")]
    Empty,

    /// The first slab must start at zero income.
    #[error("first slab must start at 0, got {0}")]
    FirstSlabNotZero(Decimal),

    /// A slab does not continue exactly where the previous one ended.
    #[error("slab starting at {found} does not continue from {expected}")]
    Discontinuous { expected: Decimal, found: Decimal },

    /// A slab's upper bound does not exceed its lower bound.
    #[error("slab upper bound {max} does not exceed its lower bound {min}")]
    EmptySlab { min: Decimal, max: Decimal },

    /// An unbounded slab appeared before the end of the table.
    #[error("slab starting at {0} is unbounded but is not the last slab")]
    UnboundedInnerSlab(Decimal),

    /// The final slab must be unbounded so the table covers all incomes.
    #[error("last slab must be unbounded, got upper bound {0}")]
    BoundedTopSlab(Decimal),

    /// A marginal rate outside [0, 1].
    #[error("tax rate must be within [0, 1], got {0}")]
    RateOutOfRange(Decimal),
}

/// An ordered, gap-free marginal rate schedule covering `[0, +inf)`.
///
/// Construction validates the invariants, so a `SlabTable` in hand is
/// always safe to walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlabTable {
    slabs: Vec<TaxSlab>,
}

impl SlabTable {
    /// Validates and wraps an ordered slab list.
    ///
    /// # Errors
    ///
    /// Returns [`SlabTableError`] when the list is empty, does not start
    /// at zero, has gaps or overlaps, ends in a bounded slab, or carries a
    /// rate outside [0, 1].
    pub fn new(slabs: Vec<TaxSlab>) -> Result<Self, SlabTableError> {
        let last_index = match slabs.len().checked_sub(1) {
            Some(i) => i,
            None => return Err(SlabTableError::Empty),
        };

        let mut expected_min = Decimal::ZERO;
        for (index, slab) in slabs.iter().enumerate() {
            if index == 0 && slab.min_income != Decimal::ZERO {
                return Err(SlabTableError::FirstSlabNotZero(slab.min_income));
            }
            if slab.min_income != expected_min {
                return Err(SlabTableError::Discontinuous {
                    expected: expected_min,
                    found: slab.min_income,
                });
            }
            if slab.tax_rate < Decimal::ZERO || slab.tax_rate > Decimal::ONE {
                return Err(SlabTableError::RateOutOfRange(slab.tax_rate));
            }
            match slab.max_income {
                Some(max) if max <= slab.min_income => {
                    return Err(SlabTableError::EmptySlab {
                        min: slab.min_income,
                        max,
                    });
                }
                Some(max) => expected_min = max,
                None if index != last_index => {
                    return Err(SlabTableError::UnboundedInnerSlab(slab.min_income));
                }
                None => {}
            }
        }

        if let Some(max) = slabs[last_index].max_income {
            return Err(SlabTableError::BoundedTopSlab(max));
        }

        Ok(Self { slabs })
    }

    pub fn slabs(&self) -> &[TaxSlab] {
        &self.slabs
    }

    /// Marginal tax on `taxable_income`.
    ///
    /// Negative income is clamped to zero. Each slab whose lower bound is
    /// exceeded contributes `(min(income, upper) - lower) * rate`, so only
    /// the income inside a band is taxed at that band's rate and the total
    /// is continuous across band boundaries. The result is rounded to two
    /// decimal places, half up.
    pub fn tax_on(&self, taxable_income: Decimal) -> Decimal {
        let taxable = taxable_income.max(Decimal::ZERO);

        let mut liability = Decimal::ZERO;
        for slab in &self.slabs {
            if taxable <= slab.min_income {
                break;
            }
            let upper = match slab.max_income {
                Some(max) => taxable.min(max),
                None => taxable,
            };
            liability += (upper - slab.min_income) * slab.tax_rate;
        }

        round_half_up(liability)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    /// 0-250k @0%, 250k-500k @5%, 500k-1M @20%, 1M+ @30%.
    fn old_regime_table() -> SlabTable {
        SlabTable::new(vec![
            TaxSlab {
                min_income: dec!(0),
                max_income: Some(dec!(250000)),
                tax_rate: dec!(0),
            },
            TaxSlab {
                min_income: dec!(250000),
                max_income: Some(dec!(500000)),
                tax_rate: dec!(0.05),
            },
            TaxSlab {
                min_income: dec!(500000),
                max_income: Some(dec!(1000000)),
                tax_rate: dec!(0.20),
            },
            TaxSlab {
                min_income: dec!(1000000),
                max_income: None,
                tax_rate: dec!(0.30),
            },
        ])
        .expect("valid table")
    }

    // ── construction ────────────────────────────────────────────────────

    #[test]
    fn new_rejects_empty_table() {
        let result = SlabTable::new(vec![]);

        assert_eq!(result, Err(SlabTableError::Empty));
    }

    #[test]
    fn new_rejects_first_slab_above_zero() {
        let result = SlabTable::new(vec![TaxSlab {
            min_income: dec!(100),
            max_income: None,
            tax_rate: dec!(0.1),
        }]);

        assert_eq!(result, Err(SlabTableError::FirstSlabNotZero(dec!(100))));
    }

    #[test]
    fn new_rejects_gap_between_slabs() {
        let result = SlabTable::new(vec![
            TaxSlab {
                min_income: dec!(0),
                max_income: Some(dec!(1000)),
                tax_rate: dec!(0),
            },
            TaxSlab {
                min_income: dec!(2000),
                max_income: None,
                tax_rate: dec!(0.1),
            },
        ]);

        assert_eq!(
            result,
            Err(SlabTableError::Discontinuous {
                expected: dec!(1000),
                found: dec!(2000),
            })
        );
    }

    #[test]
    fn new_rejects_inverted_slab() {
        let result = SlabTable::new(vec![TaxSlab {
            min_income: dec!(0),
            max_income: Some(dec!(0)),
            tax_rate: dec!(0),
        }]);

        assert_eq!(
            result,
            Err(SlabTableError::EmptySlab {
                min: dec!(0),
                max: dec!(0),
            })
        );
    }

    #[test]
    fn new_rejects_unbounded_inner_slab() {
        let result = SlabTable::new(vec![
            TaxSlab {
                min_income: dec!(0),
                max_income: None,
                tax_rate: dec!(0),
            },
            TaxSlab {
                min_income: dec!(1000),
                max_income: None,
                tax_rate: dec!(0.1),
            },
        ]);

        assert_eq!(result, Err(SlabTableError::UnboundedInnerSlab(dec!(0))));
    }

    #[test]
    fn new_rejects_bounded_top_slab() {
        let result = SlabTable::new(vec![TaxSlab {
            min_income: dec!(0),
            max_income: Some(dec!(1000)),
            tax_rate: dec!(0),
        }]);

        assert_eq!(result, Err(SlabTableError::BoundedTopSlab(dec!(1000))));
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let result = SlabTable::new(vec![TaxSlab {
            min_income: dec!(0),
            max_income: None,
            tax_rate: dec!(1.5),
        }]);

        assert_eq!(result, Err(SlabTableError::RateOutOfRange(dec!(1.5))));
    }

    // ── tax_on ──────────────────────────────────────────────────────────

    #[test]
    fn tax_is_zero_at_zero_income() {
        let table = old_regime_table();

        assert_eq!(table.tax_on(dec!(0)), dec!(0));
    }

    #[test]
    fn negative_income_is_clamped_to_zero() {
        let table = old_regime_table();

        assert_eq!(table.tax_on(dec!(-50000)), dec!(0));
    }

    #[test]
    fn tax_at_first_slab_boundary_is_zero() {
        let table = old_regime_table();

        assert_eq!(table.tax_on(dec!(250000)), dec!(0));
    }

    #[test]
    fn tax_at_second_slab_boundary() {
        let table = old_regime_table();

        // 250000 * 0.05
        assert_eq!(table.tax_on(dec!(500000)), dec!(12500));
    }

    #[test]
    fn tax_at_third_slab_boundary() {
        let table = old_regime_table();

        // 12500 + 500000 * 0.20
        assert_eq!(table.tax_on(dec!(1000000)), dec!(112500));
    }

    #[test]
    fn tax_in_unbounded_top_slab() {
        let table = old_regime_table();

        // 112500 + 500000 * 0.30
        assert_eq!(table.tax_on(dec!(1500000)), dec!(262500));
    }

    #[test]
    fn tax_is_marginal_not_flat() {
        let table = old_regime_table();

        // One rupee into the 20% band is taxed at 20% on that rupee only.
        assert_eq!(table.tax_on(dec!(500001)), dec!(12500.20));
    }

    #[test]
    fn tax_is_nondecreasing_in_income() {
        let table = old_regime_table();

        let mut income = dec!(0);
        let mut previous = dec!(0);
        while income <= dec!(1600000) {
            let tax = table.tax_on(income);
            assert!(
                tax >= previous,
                "tax fell from {previous} to {tax} at income {income}"
            );
            previous = tax;
            income += dec!(25000);
        }
    }

    #[test]
    fn tax_is_continuous_at_slab_boundaries() {
        let table = old_regime_table();

        for boundary in [dec!(250000), dec!(500000), dec!(1000000)] {
            let below = table.tax_on(boundary - dec!(0.01));
            let at = table.tax_on(boundary);
            assert!(
                at - below <= dec!(0.01),
                "jump of {} crossing {boundary}",
                at - below
            );
        }
    }
}
