use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    DeductionRecord, Investment, NewDeduction, NewInvestment, NewTransaction, Transaction,
};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Inclusive date range for listing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Storage for a user's financial records.
///
/// Listings take an optional [`DateRange`]: the dashboard summary reads a
/// window, the tax summary reads everything. All records are keyed by a
/// bare user id; account management lives elsewhere.
#[async_trait]
pub trait FinanceRepository: Send + Sync {
    // Transactions
    async fn create_transaction(
        &self,
        user_id: i64,
        new: NewTransaction,
    ) -> Result<Transaction, RepositoryError>;

    async fn list_transactions(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> Result<Vec<Transaction>, RepositoryError>;

    async fn delete_transaction(
        &self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<(), RepositoryError>;

    // Investments
    async fn create_investment(
        &self,
        user_id: i64,
        new: NewInvestment,
    ) -> Result<Investment, RepositoryError>;

    async fn list_investments(
        &self,
        user_id: i64,
        asset_type: Option<&str>,
    ) -> Result<Vec<Investment>, RepositoryError>;

    // Deduction claims
    async fn create_deduction(
        &self,
        user_id: i64,
        new: NewDeduction,
    ) -> Result<DeductionRecord, RepositoryError>;

    async fn list_deductions(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> Result<Vec<DeductionRecord>, RepositoryError>;
}
