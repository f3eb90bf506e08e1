use bigdecimal::BigDecimal;
use chrono::{Datelike, Local, NaiveDate};
use sqlx::PgPool;

use crate::db::queries;
use crate::models::{DaybookReport, Transaction};
use crate::service::ledger::{self, GapPolicy};
use crate::service::window::ReportWindow;

/// Payment mode covered by the daybook.
pub const DAYBOOK_MODE: &str = "CASH";

/// Fiscal-year anchor: April 1.
pub const FISCAL_YEAR_START_MONTH: u32 = 4;
pub const FISCAL_YEAR_START_DAY: u32 = 1;

/// Raw daybook request parameters as received from the caller.
#[derive(Debug, Clone, Default)]
pub struct DaybookParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub fill_gaps: bool,
}

/// Cash daybook report service
pub struct DaybookService {
    pool: PgPool,
}

impl DaybookService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Compute the cash daybook for the requested window.
    pub async fn cash_daybook(&self, params: &DaybookParams) -> Result<DaybookReport, sqlx::Error> {
        let today = Local::now().date_naive();
        let window =
            ReportWindow::resolve(params.start_date.as_deref(), params.end_date.as_deref(), today);

        // 1. fetch both transaction streams for the window
        let (payments, vouchers) = futures::try_join!(
            queries::list_payments(&self.pool, DAYBOOK_MODE, window.start, window.end),
            queries::list_vouchers(&self.pool, DAYBOOK_MODE, window.start, window.end),
        )?;

        // 2. balance carried in from before the window
        let opening_balance = self.resolve_opening_balance(window.start).await?;

        // 3. merge, attach running balances, roll up
        let receipts: Vec<Transaction> =
            payments.into_iter().map(Transaction::from_payment).collect();
        let disbursements: Vec<Transaction> =
            vouchers.into_iter().map(Transaction::from_voucher).collect();
        let gap_policy = if params.fill_gaps {
            GapPolicy::ZeroFill(window)
        } else {
            GapPolicy::Skip
        };
        let statement =
            ledger::build_statement(opening_balance, receipts, disbursements, gap_policy);

        tracing::info!(
            "daybook {}..{}: {} entries, closing balance {}",
            window.start,
            window.end,
            statement.entries.len(),
            statement.closing_balance
        );

        Ok(DaybookReport {
            start_date: window.start,
            end_date: window.end,
            statement,
        })
    }

    /// Opening balance for the window start.
    ///
    /// A recorded opening-balance adjustment takes precedence on a
    /// fiscal-year anchor; otherwise the balance is the net of all eligible
    /// history before `start`.
    async fn resolve_opening_balance(&self, start: NaiveDate) -> Result<BigDecimal, sqlx::Error> {
        if is_fiscal_year_start(start) {
            if let Some(adjustment) = queries::get_opening_adjustment(&self.pool, start).await? {
                tracing::debug!(
                    "using recorded opening balance {} for {}",
                    adjustment.amount,
                    start
                );
                return Ok(adjustment.amount);
            }
        }

        let (payments_before, vouchers_before) = futures::try_join!(
            queries::sum_payments_before(&self.pool, DAYBOOK_MODE, start),
            queries::sum_vouchers_before(&self.pool, DAYBOOK_MODE, start),
        )?;
        Ok(payments_before - vouchers_before)
    }
}

pub fn is_fiscal_year_start(date: NaiveDate) -> bool {
    date.month() == FISCAL_YEAR_START_MONTH && date.day() == FISCAL_YEAR_START_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fiscal_year_starts_on_april_first() {
        assert!(is_fiscal_year_start(
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        ));
        assert!(!is_fiscal_year_start(
            NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
        ));
        assert!(!is_fiscal_year_start(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        ));
    }
}
