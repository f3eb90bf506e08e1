use crate::models::{BatchRecord, OpeningBalanceAdjustment, PaymentRecord, VoucherRecord};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use sqlx::PgPool;

/// Eligible payments for a window, ordered for the merge engine.
///
/// Archived and soft-deleted rows never reach a standard report.
pub async fn list_payments(
    pool: &PgPool,
    mode: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PaymentRecord>, sqlx::Error> {
    sqlx::query_as::<_, PaymentRecord>(
        r#"
        SELECT p.id,
               p.date,
               p.amount,
               p.receipt_number,
               p.notes,
               p.created_at,
               trim(a.first_name || ' ' || coalesce(a.last_name, '')) AS applicant_name,
               b.name AS batch_name
        FROM umrah_payment p
        INNER JOIN umrah_applicant a ON a.id = p.applicant_id
        LEFT JOIN umrah_batch b ON b.id = a.batch_id
        WHERE p.mode = $1
          AND p.is_active = TRUE
          AND p.is_archived = FALSE
          AND p.date BETWEEN $2 AND $3
        ORDER BY p.date, p.created_at
        "#,
    )
    .bind(mode)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// Eligible vouchers for a window, ordered for the merge engine.
pub async fn list_vouchers(
    pool: &PgPool,
    mode: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<VoucherRecord>, sqlx::Error> {
    sqlx::query_as::<_, VoucherRecord>(
        r#"
        SELECT v.id,
               v.date,
               v.amount,
               v.voucher_number,
               v.notes,
               v.created_at,
               b.name AS batch_name,
               pp.name AS purpose_name
        FROM umrah_voucher v
        INNER JOIN payment_purpose pp ON pp.id = v.purpose_id
        LEFT JOIN umrah_batch b ON b.id = v.batch_id
        WHERE v.mode = $1
          AND v.is_active = TRUE
          AND v.is_archived = FALSE
          AND v.date BETWEEN $2 AND $3
        ORDER BY v.date, v.created_at
        "#,
    )
    .bind(mode)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// Total of eligible payments dated strictly before `start`.
pub async fn sum_payments_before(
    pool: &PgPool,
    mode: &str,
    start: NaiveDate,
) -> Result<BigDecimal, sqlx::Error> {
    sqlx::query_scalar::<_, BigDecimal>(
        r#"
        SELECT coalesce(sum(p.amount), 0)
        FROM umrah_payment p
        WHERE p.mode = $1
          AND p.is_active = TRUE
          AND p.is_archived = FALSE
          AND p.date < $2
        "#,
    )
    .bind(mode)
    .bind(start)
    .fetch_one(pool)
    .await
}

/// Total of eligible vouchers dated strictly before `start`.
pub async fn sum_vouchers_before(
    pool: &PgPool,
    mode: &str,
    start: NaiveDate,
) -> Result<BigDecimal, sqlx::Error> {
    sqlx::query_scalar::<_, BigDecimal>(
        r#"
        SELECT coalesce(sum(v.amount), 0)
        FROM umrah_voucher v
        WHERE v.mode = $1
          AND v.is_active = TRUE
          AND v.is_archived = FALSE
          AND v.date < $2
        "#,
    )
    .bind(mode)
    .bind(start)
    .fetch_one(pool)
    .await
}

/// Recorded opening balance for a fiscal-year start date, if one exists.
pub async fn get_opening_adjustment(
    pool: &PgPool,
    fiscal_year_start: NaiveDate,
) -> Result<Option<OpeningBalanceAdjustment>, sqlx::Error> {
    sqlx::query_as::<_, OpeningBalanceAdjustment>(
        r#"
        SELECT fiscal_year_start, amount, notes
        FROM opening_balance_adjustment
        WHERE fiscal_year_start = $1
        "#,
    )
    .bind(fiscal_year_start)
    .fetch_optional(pool)
    .await
}

/// Batch master row with its active applicant head-count.
pub async fn get_batch(pool: &PgPool, batch_id: i64) -> Result<Option<BatchRecord>, sqlx::Error> {
    sqlx::query_as::<_, BatchRecord>(
        r#"
        SELECT b.id,
               b.name,
               b.year,
               b.amount,
               b.is_completed,
               (SELECT count(*)
                FROM umrah_applicant a
                WHERE a.batch_id = b.id
                  AND a.is_active = TRUE) AS applicant_count
        FROM umrah_batch b
        WHERE b.id = $1
        "#,
    )
    .bind(batch_id)
    .fetch_optional(pool)
    .await
}

/// All eligible payments for one batch (any mode), via its applicants.
pub async fn list_batch_payments(
    pool: &PgPool,
    batch_id: i64,
) -> Result<Vec<PaymentRecord>, sqlx::Error> {
    sqlx::query_as::<_, PaymentRecord>(
        r#"
        SELECT p.id,
               p.date,
               p.amount,
               p.receipt_number,
               p.notes,
               p.created_at,
               trim(a.first_name || ' ' || coalesce(a.last_name, '')) AS applicant_name,
               b.name AS batch_name
        FROM umrah_payment p
        INNER JOIN umrah_applicant a ON a.id = p.applicant_id
        INNER JOIN umrah_batch b ON b.id = a.batch_id
        WHERE b.id = $1
          AND p.is_active = TRUE
          AND p.is_archived = FALSE
        ORDER BY p.date, p.created_at
        "#,
    )
    .bind(batch_id)
    .fetch_all(pool)
    .await
}

/// All eligible vouchers charged to one batch (any mode).
pub async fn list_batch_vouchers(
    pool: &PgPool,
    batch_id: i64,
) -> Result<Vec<VoucherRecord>, sqlx::Error> {
    sqlx::query_as::<_, VoucherRecord>(
        r#"
        SELECT v.id,
               v.date,
               v.amount,
               v.voucher_number,
               v.notes,
               v.created_at,
               b.name AS batch_name,
               pp.name AS purpose_name
        FROM umrah_voucher v
        INNER JOIN payment_purpose pp ON pp.id = v.purpose_id
        INNER JOIN umrah_batch b ON b.id = v.batch_id
        WHERE b.id = $1
          AND v.is_active = TRUE
          AND v.is_archived = FALSE
        ORDER BY v.date, v.created_at
        "#,
    )
    .bind(batch_id)
    .fetch_all(pool)
    .await
}
