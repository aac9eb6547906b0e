use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub merchant: String,
    pub description: Option<String>,
    /// Signed amount: income is positive, spending is negative.
    pub amount: Decimal,
    pub category: String,
    pub source: Option<String>,
}

/// For creating new transactions (no id or owner yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: DateTime<Utc>,
    pub merchant: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub category: String,
    pub source: Option<String>,
}
