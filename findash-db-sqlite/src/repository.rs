use async_trait::async_trait;
use chrono::{DateTime, Utc};
use findash_core::{
    DateRange, DeductionCategory, DeductionRecord, FinanceRepository, Investment, NewDeduction,
    NewInvestment, NewTransaction, RepositoryError, Transaction,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, sqlite::SqlitePool};

/// SQLite-backed [`FinanceRepository`].
///
/// Money columns are stored as TEXT and parsed back into `Decimal`, so no
/// precision is lost to a float round-trip.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parse_decimal(raw: &str) -> Result<Decimal, RepositoryError> {
    raw.parse::<Decimal>()
        .map_err(|e| RepositoryError::Database(format!("invalid decimal '{raw}': {e}")))
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

#[derive(FromRow)]
struct TransactionRow {
    id: i64,
    user_id: i64,
    date: DateTime<Utc>,
    merchant: String,
    description: Option<String>,
    amount: String,
    category: String,
    source: Option<String>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = RepositoryError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            merchant: row.merchant,
            description: row.description,
            amount: parse_decimal(&row.amount)?,
            category: row.category,
            source: row.source,
        })
    }
}

#[derive(FromRow)]
struct InvestmentRow {
    id: i64,
    user_id: i64,
    asset_type: String,
    name: String,
    units: String,
    buy_price: String,
    current_price: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<InvestmentRow> for Investment {
    type Error = RepositoryError;

    fn try_from(row: InvestmentRow) -> Result<Self, Self::Error> {
        Ok(Investment {
            id: row.id,
            user_id: row.user_id,
            asset_type: row.asset_type,
            name: row.name,
            units: parse_decimal(&row.units)?,
            buy_price: parse_decimal(&row.buy_price)?,
            current_price: parse_decimal(&row.current_price)?,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct DeductionRow {
    id: i64,
    user_id: i64,
    category: String,
    amount: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<DeductionRow> for DeductionRecord {
    type Error = RepositoryError;

    fn try_from(row: DeductionRow) -> Result<Self, Self::Error> {
        let category = DeductionCategory::parse(&row.category).ok_or_else(|| {
            RepositoryError::Database(format!("unknown deduction category '{}'", row.category))
        })?;
        Ok(DeductionRecord {
            id: row.id,
            user_id: row.user_id,
            category,
            amount: parse_decimal(&row.amount)?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl FinanceRepository for SqliteRepository {
    async fn create_transaction(
        &self,
        user_id: i64,
        new: NewTransaction,
    ) -> Result<Transaction, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO transactions (user_id, date, merchant, description, amount, category, source)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(new.date)
        .bind(&new.merchant)
        .bind(&new.description)
        .bind(new.amount.to_string())
        .bind(&new.category)
        .bind(&new.source)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(Transaction {
            id: result.last_insert_rowid(),
            user_id,
            date: new.date,
            merchant: new.merchant,
            description: new.description,
            amount: new.amount,
            category: new.category,
            source: new.source,
        })
    }

    async fn list_transactions(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let rows: Vec<TransactionRow> = match range {
            Some(range) => {
                sqlx::query_as(
                    "SELECT id, user_id, date, merchant, description, amount, category, source
                     FROM transactions
                     WHERE user_id = ? AND date >= ? AND date <= ?
                     ORDER BY date, id",
                )
                .bind(user_id)
                .bind(range.start)
                .bind(range.end)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    "SELECT id, user_id, date, merchant, description, amount, category, source
                     FROM transactions
                     WHERE user_id = ?
                     ORDER BY date, id",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_error)?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn delete_transaction(
        &self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM transactions WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(transaction_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn create_investment(
        &self,
        user_id: i64,
        new: NewInvestment,
    ) -> Result<Investment, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO investments (user_id, asset_type, name, units, buy_price, current_price, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&new.asset_type)
        .bind(&new.name)
        .bind(new.units.to_string())
        .bind(new.buy_price.to_string())
        .bind(new.current_price.to_string())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(Investment {
            id: result.last_insert_rowid(),
            user_id,
            asset_type: new.asset_type,
            name: new.name,
            units: new.units,
            buy_price: new.buy_price,
            current_price: new.current_price,
            created_at,
        })
    }

    async fn list_investments(
        &self,
        user_id: i64,
        asset_type: Option<&str>,
    ) -> Result<Vec<Investment>, RepositoryError> {
        let rows: Vec<InvestmentRow> = match asset_type {
            Some(asset_type) => {
                sqlx::query_as(
                    "SELECT id, user_id, asset_type, name, units, buy_price, current_price, created_at
                     FROM investments
                     WHERE user_id = ? AND asset_type = ?
                     ORDER BY id",
                )
                .bind(user_id)
                .bind(asset_type)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    "SELECT id, user_id, asset_type, name, units, buy_price, current_price, created_at
                     FROM investments
                     WHERE user_id = ?
                     ORDER BY id",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_error)?;

        rows.into_iter().map(Investment::try_from).collect()
    }

    async fn create_deduction(
        &self,
        user_id: i64,
        new: NewDeduction,
    ) -> Result<DeductionRecord, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tax_deductions (user_id, category, amount, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(new.category.as_str())
        .bind(new.amount.to_string())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(DeductionRecord {
            id: result.last_insert_rowid(),
            user_id,
            category: new.category,
            amount: new.amount,
            created_at,
        })
    }

    async fn list_deductions(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> Result<Vec<DeductionRecord>, RepositoryError> {
        let rows: Vec<DeductionRow> = match range {
            Some(range) => {
                sqlx::query_as(
                    "SELECT id, user_id, category, amount, created_at
                     FROM tax_deductions
                     WHERE user_id = ? AND created_at >= ? AND created_at <= ?
                     ORDER BY created_at, id",
                )
                .bind(user_id)
                .bind(range.start)
                .bind(range.end)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    "SELECT id, user_id, category, amount, created_at
                     FROM tax_deductions
                     WHERE user_id = ?
                     ORDER BY created_at, id",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_error)?;

        rows.into_iter().map(DeductionRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn test_repository() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        let repo = SqliteRepository::new_with_pool(pool);
        repo.run_migrations().await.expect("migrations");
        repo
    }

    fn new_transaction(amount: Decimal, year: i32, month: u32) -> NewTransaction {
        NewTransaction {
            date: Utc.with_ymd_and_hms(year, month, 10, 0, 0, 0).unwrap(),
            merchant: "Acme".to_string(),
            description: Some("test".to_string()),
            amount,
            category: "general".to_string(),
            source: None,
        }
    }

    #[tokio::test]
    async fn transactions_round_trip() {
        let repo = test_repository().await;

        let created = repo
            .create_transaction(1, new_transaction(dec!(-1234.56), 2024, 3))
            .await
            .unwrap();
        let listed = repo.list_transactions(1, None).await.unwrap();

        assert_eq!(listed, vec![created]);
        assert_eq!(listed[0].amount, dec!(-1234.56));
    }

    #[tokio::test]
    async fn transactions_are_scoped_to_their_user() {
        let repo = test_repository().await;
        repo.create_transaction(1, new_transaction(dec!(100), 2024, 1))
            .await
            .unwrap();

        let listed = repo.list_transactions(2, None).await.unwrap();

        assert_eq!(listed, Vec::new());
    }

    #[tokio::test]
    async fn transaction_listing_honours_the_date_range() {
        let repo = test_repository().await;
        repo.create_transaction(1, new_transaction(dec!(100), 2024, 1))
            .await
            .unwrap();
        let kept = repo
            .create_transaction(1, new_transaction(dec!(200), 2024, 2))
            .await
            .unwrap();
        repo.create_transaction(1, new_transaction(dec!(300), 2024, 3))
            .await
            .unwrap();

        let range = DateRange {
            start: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 2, 28, 23, 59, 59).unwrap(),
        };
        let listed = repo.list_transactions(1, Some(range)).await.unwrap();

        assert_eq!(listed, vec![kept]);
    }

    #[tokio::test]
    async fn deleting_a_missing_transaction_is_not_found() {
        let repo = test_repository().await;

        let result = repo.delete_transaction(1, 42).await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let repo = test_repository().await;
        let created = repo
            .create_transaction(1, new_transaction(dec!(100), 2024, 1))
            .await
            .unwrap();

        repo.delete_transaction(1, created.id).await.unwrap();

        assert_eq!(repo.list_transactions(1, None).await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn investments_round_trip_and_filter_by_type() {
        let repo = test_repository().await;
        let stock = repo
            .create_investment(
                1,
                NewInvestment {
                    asset_type: "stock".to_string(),
                    name: "INFY".to_string(),
                    units: dec!(12.5),
                    buy_price: dec!(1400),
                    current_price: dec!(1520.25),
                },
            )
            .await
            .unwrap();
        repo.create_investment(
            1,
            NewInvestment {
                asset_type: "bond".to_string(),
                name: "GSEC".to_string(),
                units: dec!(10),
                buy_price: dec!(100),
                current_price: dec!(101),
            },
        )
        .await
        .unwrap();

        let stocks = repo.list_investments(1, Some("stock")).await.unwrap();
        let all = repo.list_investments(1, None).await.unwrap();

        assert_eq!(stocks, vec![stock]);
        assert_eq!(all.len(), 2);
        assert_eq!(stocks[0].current_price, dec!(1520.25));
    }

    #[tokio::test]
    async fn deductions_round_trip_with_their_category() {
        let repo = test_repository().await;

        let created = repo
            .create_deduction(
                1,
                NewDeduction {
                    category: DeductionCategory::Nps,
                    amount: dec!(50000),
                },
            )
            .await
            .unwrap();
        let listed = repo.list_deductions(1, None).await.unwrap();

        assert_eq!(listed, vec![created]);
        assert_eq!(listed[0].category, DeductionCategory::Nps);
    }

    #[tokio::test]
    async fn unknown_stored_category_is_a_database_error() {
        let repo = test_repository().await;
        sqlx::query(
            "INSERT INTO tax_deductions (user_id, category, amount, created_at)
             VALUES (1, '80CC', '1000', ?)",
        )
        .bind(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        .execute(repo.pool())
        .await
        .unwrap();

        let result = repo.list_deductions(1, None).await;

        assert!(matches!(
            result,
            Err(RepositoryError::Database(message))
                if message.contains("unknown deduction category '80CC'")
        ));
    }
}
