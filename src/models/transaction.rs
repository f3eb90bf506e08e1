use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{PaymentRecord, VoucherRecord};

/// Side of the ledger a transaction lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Receipt,
    Voucher,
}

impl TransactionKind {
    /// Tie-break rank when date and creation time coincide: receipts first.
    pub fn priority(self) -> u8 {
        match self {
            TransactionKind::Receipt => 0,
            TransactionKind::Voucher => 1,
        }
    }

    /// Display label for exports.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Receipt => "Receipt",
            TransactionKind::Voucher => "Voucher",
        }
    }
}

/// Common shape over payments and vouchers fed to the merge engine.
///
/// Exactly one of `credit`/`debit` is nonzero: credit for a receipt, debit
/// for a voucher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub reference_number: Option<String>,
    pub batch_label: Option<String>,
    pub counterparty_label: String,
    pub credit: BigDecimal,
    pub debit: BigDecimal,
    pub notes: Option<String>,
    /// Creation timestamp, used only for ordering within the same date.
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    pub fn from_payment(payment: PaymentRecord) -> Self {
        Self {
            date: payment.date,
            kind: TransactionKind::Receipt,
            reference_number: payment.receipt_number,
            batch_label: payment.batch_name,
            counterparty_label: payment.applicant_name,
            credit: payment.amount,
            debit: BigDecimal::zero(),
            notes: payment.notes,
            recorded_at: payment.created_at,
        }
    }

    pub fn from_voucher(voucher: VoucherRecord) -> Self {
        Self {
            date: voucher.date,
            kind: TransactionKind::Voucher,
            reference_number: voucher.voucher_number,
            batch_label: voucher.batch_name,
            counterparty_label: voucher.purpose_name,
            credit: BigDecimal::zero(),
            debit: voucher.amount,
            notes: voucher.notes,
            recorded_at: voucher.created_at,
        }
    }

    /// Full ordering key for the chronological merge.
    pub fn sort_key(&self) -> (NaiveDate, DateTime<Utc>, u8) {
        (self.date, self.recorded_at, self.kind.priority())
    }
}
