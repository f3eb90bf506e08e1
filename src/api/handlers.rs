use crate::models::DaybookReport;
use crate::service::{BatchReportService, DaybookParams, DaybookService};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Daybook query string; every field is optional with silent fallbacks.
#[derive(Debug, Default, Deserialize)]
pub struct DaybookQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub fill_gaps: bool,
}

impl DaybookQuery {
    fn into_params(self) -> DaybookParams {
        DaybookParams {
            start_date: self.start_date,
            end_date: self.end_date,
            fill_gaps: self.fill_gaps,
        }
    }
}

/// Error body for infrastructure failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Cash daybook report (JSON)
pub async fn cash_daybook(
    State(service): State<Arc<DaybookService>>,
    Query(query): Query<DaybookQuery>,
) -> Response {
    match service.cash_daybook(&query.into_params()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Cash daybook entries as a CSV download
pub async fn cash_daybook_csv(
    State(service): State<Arc<DaybookService>>,
    Query(query): Query<DaybookQuery>,
) -> Response {
    match service.cash_daybook(&query.into_params()).await {
        Ok(report) => match render_entries_csv(&report) {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => internal_error(e),
        },
        Err(e) => internal_error(e),
    }
}

/// Per-batch ledger report (JSON); unknown batch ids return `batch: null`
pub async fn batch_report(
    State(service): State<Arc<BatchReportService>>,
    Path(batch_id): Path<i64>,
) -> Response {
    match service.batch_report(batch_id).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => internal_error(e),
    }
}

fn internal_error(err: impl std::fmt::Display) -> Response {
    tracing::error!("report computation failed: {}", err);
    let body = ErrorResponse {
        success: false,
        message: format!("Error: {}", err),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Render the ordered entries into an in-memory CSV document.
fn render_entries_csv(
    report: &DaybookReport,
) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
    let mut buffer = Vec::new();
    let mut writer = csv::Writer::from_writer(&mut buffer);

    writer.write_record([
        "date",
        "type",
        "number",
        "batch",
        "head",
        "credit",
        "debit",
        "balance",
        "notes",
    ])?;

    for entry in &report.statement.entries {
        writer.write_record(&[
            entry.date.to_string(),
            entry.kind.label().to_string(),
            entry
                .reference_number
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            entry.batch.clone().unwrap_or_else(|| "-".to_string()),
            entry.counterparty.clone(),
            entry.credit.to_string(),
            entry.debit.to_string(),
            entry.balance.to_string(),
            entry.notes.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    drop(writer);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LedgerEntry, LedgerStatement, TransactionKind};
    use bigdecimal::{BigDecimal, Zero};
    use chrono::NaiveDate;

    fn dec(raw: &str) -> BigDecimal {
        raw.parse().unwrap()
    }

    #[test]
    fn csv_export_includes_header_and_placeholder_columns() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
        let report = DaybookReport {
            start_date: date,
            end_date: date,
            statement: LedgerStatement {
                opening_balance: dec("0.00"),
                closing_balance: dec("5000.00"),
                total_credit: dec("5000.00"),
                total_debit: BigDecimal::zero(),
                entries: vec![LedgerEntry {
                    date,
                    kind: TransactionKind::Receipt,
                    reference_number: None,
                    batch: None,
                    counterparty: "Abdul Rahman".to_string(),
                    credit: dec("5000.00"),
                    debit: BigDecimal::zero(),
                    notes: None,
                    balance: dec("5000.00"),
                }],
                daily_summary: Vec::new(),
                monthly_summary: Vec::new(),
            },
        };

        let body = render_entries_csv(&report).unwrap();
        let text = String::from_utf8(body).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("date,type,number,batch,head,credit,debit,balance,notes")
        );
        assert_eq!(
            lines.next(),
            Some("2024-04-05,Receipt,-,-,Abdul Rahman,5000.00,0,5000.00,")
        );
    }
}
