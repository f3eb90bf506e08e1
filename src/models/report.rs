use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BatchRecord, Transaction, TransactionKind};

/// One row of the ordered daybook with its running balance attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub reference_number: Option<String>,
    pub batch: Option<String>,
    pub counterparty: String,
    pub credit: BigDecimal,
    pub debit: BigDecimal,
    pub notes: Option<String>,
    pub balance: BigDecimal,
}

impl LedgerEntry {
    pub fn from_transaction(txn: Transaction, balance: BigDecimal) -> Self {
        Self {
            date: txn.date,
            kind: txn.kind,
            reference_number: txn.reference_number,
            batch: txn.batch_label,
            counterparty: txn.counterparty_label,
            credit: txn.credit,
            debit: txn.debit,
            notes: txn.notes,
            balance,
        }
    }
}

/// Per-day totals; `closing` is the running balance after the day's last entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub credit: BigDecimal,
    pub debit: BigDecimal,
    pub closing: BigDecimal,
}

/// Per-month totals keyed by the first of the month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub month: NaiveDate,
    /// Display label, e.g. "April 2024".
    pub label: String,
    pub credit: BigDecimal,
    pub debit: BigDecimal,
    pub closing: BigDecimal,
}

/// Complete computed ledger for one report request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStatement {
    pub opening_balance: BigDecimal,
    pub closing_balance: BigDecimal,
    pub total_credit: BigDecimal,
    pub total_debit: BigDecimal,
    pub entries: Vec<LedgerEntry>,
    pub daily_summary: Vec<DailyBucket>,
    pub monthly_summary: Vec<MonthlyBucket>,
}

/// Cash daybook response: the resolved window plus the statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaybookReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub statement: LedgerStatement,
}

/// Batch header echoed on the batch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub base_fare: BigDecimal,
    pub is_completed: bool,
    pub applicant_count: i64,
    /// Expected income for the batch: base fare times applicant count.
    pub expected_subtotal: BigDecimal,
}

impl BatchSummary {
    pub fn from_record(record: BatchRecord) -> Self {
        let expected_subtotal = &record.amount * BigDecimal::from(record.applicant_count);
        Self {
            id: record.id,
            name: record.name,
            year: record.year,
            base_fare: record.amount,
            is_completed: record.is_completed,
            applicant_count: record.applicant_count,
            expected_subtotal,
        }
    }
}

/// Batch report response; `batch` is `null` when the id is unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch: Option<BatchSummary>,
    #[serde(flatten)]
    pub statement: LedgerStatement,
}
