mod documents;
mod import;

pub use documents::{DocumentError, load_deduction_caps, load_slab_document, load_tax_config};
pub use import::{
    DeductionCsvLoader, DeductionCsvRecord, ImportError, TransactionCsvLoader,
    TransactionCsvRecord,
};
