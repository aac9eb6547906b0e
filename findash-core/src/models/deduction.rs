use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Statutory deduction categories recognised by the engine.
///
/// The set is closed on purpose: a claim in any other category is a
/// validation error at the edge (request parsing, CSV import, row read),
/// never something the calculator skips silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeductionCategory {
    /// Section 80C (PPF, ELSS, life insurance, ...).
    #[serde(rename = "80C")]
    Section80C,
    /// Section 80D (health insurance premiums).
    #[serde(rename = "80D")]
    Section80D,
    /// House rent allowance.
    #[serde(rename = "HRA")]
    HouseRent,
    /// Home loan interest under Section 24(b).
    #[serde(rename = "24B")]
    HomeLoanInterest,
    /// NPS contributions under Section 80CCD(1B).
    #[serde(rename = "80CCD1B")]
    Nps,
    /// Donations under Section 80G.
    #[serde(rename = "80G")]
    Donations,
    /// Other tax-saving investments tracked as a single bucket.
    Investment,
}

impl DeductionCategory {
    pub const ALL: [DeductionCategory; 7] = [
        Self::Section80C,
        Self::Section80D,
        Self::HouseRent,
        Self::HomeLoanInterest,
        Self::Nps,
        Self::Donations,
        Self::Investment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section80C => "80C",
            Self::Section80D => "80D",
            Self::HouseRent => "HRA",
            Self::HomeLoanInterest => "24B",
            Self::Nps => "80CCD1B",
            Self::Donations => "80G",
            Self::Investment => "Investment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "80C" => Some(Self::Section80C),
            "80D" => Some(Self::Section80D),
            "HRA" => Some(Self::HouseRent),
            "24B" => Some(Self::HomeLoanInterest),
            "80CCD1B" => Some(Self::Nps),
            "80G" => Some(Self::Donations),
            "Investment" => Some(Self::Investment),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeductionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRecord {
    pub id: i64,
    pub user_id: i64,
    pub category: DeductionCategory,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// For creating new deduction claims (no id or timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeduction {
    pub category: DeductionCategory,
    pub amount: Decimal,
}
