use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Incoming payment receipt, pre-joined to applicant and batch display names.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: BigDecimal,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub applicant_name: String,
    pub batch_name: Option<String>,
}

/// Outgoing disbursement voucher, pre-joined to batch and purpose display names.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VoucherRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: BigDecimal,
    pub voucher_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub batch_name: Option<String>,
    pub purpose_name: String,
}

/// Travel batch master row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: i64,
    pub name: String,
    pub year: i32,
    /// Base fare charged per applicant.
    pub amount: BigDecimal,
    pub is_completed: bool,
    pub applicant_count: i64,
}

/// Explicit opening-balance entry for a fiscal year, keyed by its start date.
///
/// Replaces an in-code literal: when a daybook window starts exactly on a
/// fiscal-year boundary the balance carried in comes from this row instead of
/// being recomputed from (possibly incomplete) prior history.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OpeningBalanceAdjustment {
    pub fiscal_year_start: NaiveDate,
    pub amount: BigDecimal,
    pub notes: Option<String>,
}
