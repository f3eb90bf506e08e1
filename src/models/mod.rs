pub mod records;
pub mod report;
pub mod transaction;

pub use records::{BatchRecord, OpeningBalanceAdjustment, PaymentRecord, VoucherRecord};
pub use report::{
    BatchReport, BatchSummary, DailyBucket, DaybookReport, LedgerEntry, LedgerStatement,
    MonthlyBucket,
};
pub use transaction::{Transaction, TransactionKind};
