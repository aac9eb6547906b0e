use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{DeductionCapTable, SlabTable, SlabTableError, TaxRegime, TaxSlab};

/// Raw slab document as shipped on disk: country code -> regime -> bands.
pub type SlabDocument = BTreeMap<String, BTreeMap<TaxRegime, Vec<TaxSlab>>>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A slab list in the document violates the table invariants.
    #[error("invalid slab table for country '{country}' regime '{regime}': {source}")]
    InvalidSlabTable {
        country: String,
        regime: TaxRegime,
        #[source]
        source: SlabTableError,
    },
}

/// Immutable computation configuration.
///
/// Constructed once at startup from the slab and cap documents, then
/// shared by reference across concurrent computations. Nothing mutates it
/// after load; tests construct their own instance with whatever tables
/// they need.
#[derive(Debug, Clone)]
pub struct TaxConfig {
    slab_tables: BTreeMap<String, BTreeMap<TaxRegime, SlabTable>>,
    caps: DeductionCapTable,
    standard_deduction: Decimal,
    default_country: String,
}

impl TaxConfig {
    /// Validates a slab document and pairs it with a cap table.
    ///
    /// The standard deduction defaults to 50 000 and the default country
    /// to `"IN"`; override with [`Self::with_standard_deduction`] and
    /// [`Self::with_default_country`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSlabTable`] naming the offending
    /// (country, regime) pair when any slab list fails validation.
    pub fn new(document: SlabDocument, caps: DeductionCapTable) -> Result<Self, ConfigError> {
        let mut slab_tables = BTreeMap::new();
        for (country, regimes) in document {
            let mut tables = BTreeMap::new();
            for (regime, slabs) in regimes {
                let table =
                    SlabTable::new(slabs).map_err(|source| ConfigError::InvalidSlabTable {
                        country: country.clone(),
                        regime,
                        source,
                    })?;
                tables.insert(regime, table);
            }
            slab_tables.insert(country, tables);
        }

        Ok(Self {
            slab_tables,
            caps,
            standard_deduction: Decimal::from(50_000),
            default_country: "IN".to_string(),
        })
    }

    pub fn with_standard_deduction(mut self, amount: Decimal) -> Self {
        self.standard_deduction = amount;
        self
    }

    pub fn with_default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = country.into();
        self
    }

    /// The slab table for a (country, regime) pair, if configured.
    ///
    /// Callers surface `None` as a not-found failure; a missing pair is
    /// never silently defaulted.
    pub fn slab_table(&self, country: &str, regime: TaxRegime) -> Option<&SlabTable> {
        self.slab_tables.get(country)?.get(&regime)
    }

    pub fn caps(&self) -> &DeductionCapTable {
        &self.caps
    }

    /// Flat standard deduction applied by the stored-data summary.
    pub fn standard_deduction(&self) -> Decimal {
        self.standard_deduction
    }

    pub fn default_country(&self) -> &str {
        &self.default_country
    }
}
