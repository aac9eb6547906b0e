//! CSV importers for user records.
//!
//! Each loader splits parsing from loading: `parse` turns any reader into
//! typed records, `load` writes them through the repository trait so the
//! importers work with every backend.

use std::io::Read;

use chrono::{NaiveDate, NaiveTime};
use findash_core::{
    DeductionCategory, FinanceRepository, NewDeduction, NewTransaction, RepositoryError,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while importing CSV records.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown deduction category '{0}'")]
    UnknownCategory(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParse(err.to_string())
    }
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// A single row of the transactions CSV.
///
/// Columns:
/// - `date`: ISO date (`2024-03-15`); stored as midnight UTC
/// - `merchant`: payee or payer name
/// - `description`: free text, may be empty
/// - `amount`: signed decimal, income positive, spending negative
/// - `category`: free-text spending/income category
/// - `source`: where the row came from, may be empty
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionCsvRecord {
    pub date: NaiveDate,
    pub merchant: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    pub amount: Decimal,
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub source: Option<String>,
}

impl From<TransactionCsvRecord> for NewTransaction {
    fn from(record: TransactionCsvRecord) -> Self {
        NewTransaction {
            date: record.date.and_time(NaiveTime::MIN).and_utc(),
            merchant: record.merchant,
            description: record.description,
            amount: record.amount,
            category: record.category,
            source: record.source,
        }
    }
}

/// Importer for transaction history CSV files.
pub struct TransactionCsvLoader;

impl TransactionCsvLoader {
    /// Parses transaction records from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TransactionCsvRecord>, ImportError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TransactionCsvRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Writes parsed records to `user_id`'s transaction history and
    /// returns how many were inserted.
    pub async fn load<R: FinanceRepository + ?Sized>(
        repo: &R,
        user_id: i64,
        records: &[TransactionCsvRecord],
    ) -> Result<usize, ImportError> {
        for record in records {
            repo.create_transaction(user_id, record.clone().into())
                .await?;
        }
        Ok(records.len())
    }
}

/// A single row of the deductions CSV: a statutory `category` name
/// (`80C`, `80D`, `HRA`, `24B`, `80CCD1B`, `80G`, `Investment`) and the
/// claimed `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeductionCsvRecord {
    pub category: String,
    pub amount: Decimal,
}

impl TryFrom<DeductionCsvRecord> for NewDeduction {
    type Error = ImportError;

    fn try_from(record: DeductionCsvRecord) -> Result<Self, Self::Error> {
        let category = DeductionCategory::parse(&record.category)
            .ok_or_else(|| ImportError::UnknownCategory(record.category.clone()))?;
        Ok(NewDeduction {
            category,
            amount: record.amount,
        })
    }
}

/// Importer for deduction claim CSV files.
pub struct DeductionCsvLoader;

impl DeductionCsvLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<DeductionCsvRecord>, ImportError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: DeductionCsvRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Writes parsed claims for `user_id`. Unknown categories fail the
    /// import before anything else is inserted.
    pub async fn load<R: FinanceRepository + ?Sized>(
        repo: &R,
        user_id: i64,
        records: &[DeductionCsvRecord],
    ) -> Result<usize, ImportError> {
        let mut claims = Vec::with_capacity(records.len());
        for record in records {
            claims.push(NewDeduction::try_from(record.clone())?);
        }

        for claim in claims {
            repo.create_deduction(user_id, claim).await?;
        }
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_transactions_csv() {
        let csv = "date,merchant,description,amount,category,source\n\
                   2024-03-15,Acme Corp,March salary,500000,income,payroll\n\
                   2024-03-20,Landlord,,-20000,rent,\n";

        let records = TransactionCsvLoader::parse(csv.as_bytes()).expect("parse");

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            TransactionCsvRecord {
                date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                merchant: "Acme Corp".to_string(),
                description: Some("March salary".to_string()),
                amount: dec!(500000),
                category: "income".to_string(),
                source: Some("payroll".to_string()),
            }
        );
        // Empty optional columns become None.
        assert_eq!(records[1].description, None);
        assert_eq!(records[1].source, None);
        assert_eq!(records[1].amount, dec!(-20000));
    }

    #[test]
    fn parse_rejects_a_malformed_amount() {
        let csv = "date,merchant,description,amount,category,source\n\
                   2024-03-15,Acme,,not-a-number,income,\n";

        let result = TransactionCsvLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(ImportError::CsvParse(_))));
    }

    #[test]
    fn transaction_record_becomes_a_midnight_utc_row() {
        let record = TransactionCsvRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            merchant: "Acme".to_string(),
            description: None,
            amount: dec!(100),
            category: "income".to_string(),
            source: None,
        };

        let new: NewTransaction = record.into();

        assert_eq!(new.date.to_rfc3339(), "2024-03-15T00:00:00+00:00");
    }

    #[test]
    fn parse_deductions_csv() {
        let csv = "category,amount\n80C,80000\n80CCD1B,50000\n";

        let records = DeductionCsvLoader::parse(csv.as_bytes()).expect("parse");

        assert_eq!(
            records,
            vec![
                DeductionCsvRecord {
                    category: "80C".to_string(),
                    amount: dec!(80000),
                },
                DeductionCsvRecord {
                    category: "80CCD1B".to_string(),
                    amount: dec!(50000),
                },
            ]
        );
    }

    #[test]
    fn unknown_deduction_category_fails_conversion() {
        let record = DeductionCsvRecord {
            category: "80CCC".to_string(),
            amount: dec!(1000),
        };

        let result = NewDeduction::try_from(record);

        assert!(matches!(
            result,
            Err(ImportError::UnknownCategory(category)) if category == "80CCC"
        ));
    }
}
