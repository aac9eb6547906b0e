pub mod calculations;
pub mod config;
pub mod db;
pub mod models;

pub use config::{ConfigError, SlabDocument, TaxConfig};
pub use db::repository::{DateRange, FinanceRepository, RepositoryError};
pub use models::*;
