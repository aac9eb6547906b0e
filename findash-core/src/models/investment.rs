use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    pub user_id: i64,
    pub asset_type: String,
    pub name: String,
    pub units: Decimal,
    pub buy_price: Decimal,
    pub current_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Investment {
    /// Market value of the holding at the recorded current price.
    pub fn current_value(&self) -> Decimal {
        self.units * self.current_price
    }

    /// Unrealized profit or loss against the buy price.
    pub fn unrealized_pnl(&self) -> Decimal {
        (self.current_price - self.buy_price) * self.units
    }
}

/// For creating new investments (no id or timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInvestment {
    pub asset_type: String,
    pub name: String,
    pub units: Decimal,
    pub buy_price: Decimal,
    pub current_price: Decimal,
}
