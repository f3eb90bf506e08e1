use bigdecimal::{BigDecimal, Zero};
use sqlx::PgPool;

use crate::db::queries;
use crate::models::{BatchReport, BatchSummary, Transaction};
use crate::service::ledger::{self, GapPolicy};

/// Per-batch ledger report service
pub struct BatchReportService {
    pool: PgPool,
}

impl BatchReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ledger scoped to a single travel batch, all payment modes.
    ///
    /// Batch ledgers carry no opening balance: every credit and debit of the
    /// batch is in scope, so the statement starts at zero. An unknown batch
    /// id yields `batch: None` with an empty statement rather than an error.
    pub async fn batch_report(&self, batch_id: i64) -> Result<BatchReport, sqlx::Error> {
        let Some(batch) = queries::get_batch(&self.pool, batch_id).await? else {
            tracing::warn!("batch {} not found, returning empty report", batch_id);
            return Ok(BatchReport {
                batch: None,
                statement: ledger::build_statement(
                    BigDecimal::zero(),
                    Vec::new(),
                    Vec::new(),
                    GapPolicy::Skip,
                ),
            });
        };

        let (payments, vouchers) = futures::try_join!(
            queries::list_batch_payments(&self.pool, batch_id),
            queries::list_batch_vouchers(&self.pool, batch_id),
        )?;

        let receipts: Vec<Transaction> =
            payments.into_iter().map(Transaction::from_payment).collect();
        let disbursements: Vec<Transaction> =
            vouchers.into_iter().map(Transaction::from_voucher).collect();
        let statement = ledger::build_statement(
            BigDecimal::zero(),
            receipts,
            disbursements,
            GapPolicy::Skip,
        );

        tracing::info!(
            "batch report {}: {} entries, closing balance {}",
            batch_id,
            statement.entries.len(),
            statement.closing_balance
        );

        Ok(BatchReport {
            batch: Some(BatchSummary::from_record(batch)),
            statement,
        })
    }
}
