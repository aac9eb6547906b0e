pub mod forecast;
pub mod summary;
pub mod tax;

use anyhow::{Context, Result};
use findash_core::FinanceRepository;
use findash_core::db::{DbConfig, RepositoryRegistry};
use findash_db_sqlite::SqliteRepositoryFactory;

/// Opens the configured storage backend through the factory registry.
pub async fn open_repository(
    backend: &str,
    connection_string: &str,
) -> Result<Box<dyn FinanceRepository>> {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));

    let config = DbConfig {
        backend: backend.to_string(),
        connection_string: connection_string.to_string(),
    };
    registry
        .create(&config)
        .await
        .with_context(|| format!("failed to open '{backend}' repository"))
}

/// Prints a response as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
