mod caps;
mod deduction;
mod investment;
mod regime;
mod slab;
mod transaction;

pub use caps::{CapRule, DeductionCapTable};
pub use deduction::{DeductionCategory, DeductionRecord, NewDeduction};
pub use investment::{Investment, NewInvestment};
pub use regime::TaxRegime;
pub use slab::{SlabTable, SlabTableError, TaxSlab};
pub use transaction::{NewTransaction, Transaction};
