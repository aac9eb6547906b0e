//! Loading of the versioned reference documents: the slab-table document
//! and the deduction-cap document.
//!
//! Both are plain JSON files, read once at startup and turned into an
//! immutable [`TaxConfig`]. A document that fails validation aborts the
//! load with an error naming the offending table; nothing is defaulted.

use std::fs;
use std::path::Path;

use findash_core::{ConfigError, DeductionCapTable, SlabDocument, TaxConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    let contents = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| DocumentError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Reads a slab document: `{country: {regime: [{min_income, max_income,
/// tax_rate}, ...]}}`, with `max_income: null` marking the unbounded top
/// slab.
pub fn load_slab_document(path: &Path) -> Result<SlabDocument, DocumentError> {
    read_json(path)
}

/// Reads a deduction-cap document: `{category: cap-rule}`.
pub fn load_deduction_caps(path: &Path) -> Result<DeductionCapTable, DocumentError> {
    read_json(path)
}

/// Loads and validates both documents into a [`TaxConfig`]. When no cap
/// document is given, the statutory defaults apply.
pub fn load_tax_config(
    slabs_path: &Path,
    caps_path: Option<&Path>,
) -> Result<TaxConfig, DocumentError> {
    let document = load_slab_document(slabs_path)?;
    let caps = match caps_path {
        Some(path) => load_deduction_caps(path)?,
        None => DeductionCapTable::default(),
    };
    Ok(TaxConfig::new(document, caps)?)
}
