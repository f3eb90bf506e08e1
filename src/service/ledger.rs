use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;

use crate::models::{DailyBucket, LedgerEntry, LedgerStatement, MonthlyBucket, Transaction};
use crate::service::window::ReportWindow;

/// Whether zero-activity days and months appear in the summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// Only days/months with at least one transaction (default).
    #[default]
    Skip,
    /// Synthesize empty buckets across the window, carrying the balance.
    ZeroFill(ReportWindow),
}

/// Linear merge of two streams pre-sorted by (date, recorded_at).
///
/// Taking from `receipts` on equal keys keeps receipts ahead of vouchers,
/// which is exactly the kind-priority tie-break.
pub fn merge_transactions(
    receipts: Vec<Transaction>,
    vouchers: Vec<Transaction>,
) -> Vec<Transaction> {
    let mut merged = Vec::with_capacity(receipts.len() + vouchers.len());
    let mut receipts = receipts.into_iter().peekable();
    let mut vouchers = vouchers.into_iter().peekable();

    loop {
        let take_receipt = match (receipts.peek(), vouchers.peek()) {
            (Some(r), Some(v)) => r.sort_key() <= v.sort_key(),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_receipt {
            if let Some(txn) = receipts.next() {
                merged.push(txn);
            }
        } else if let Some(txn) = vouchers.next() {
            merged.push(txn);
        }
    }

    merged
}

/// Merge both streams, attach running balances and roll up the summaries.
///
/// Balance recurrence: `balance[i] = balance[i-1] + credit[i] - debit[i]`,
/// seeded with the opening balance. Empty input yields closing == opening.
pub fn build_statement(
    opening_balance: BigDecimal,
    receipts: Vec<Transaction>,
    vouchers: Vec<Transaction>,
    gap_policy: GapPolicy,
) -> LedgerStatement {
    let merged = merge_transactions(receipts, vouchers);

    let mut entries = Vec::with_capacity(merged.len());
    let mut running = opening_balance.clone();
    let mut total_credit = BigDecimal::zero();
    let mut total_debit = BigDecimal::zero();

    for txn in merged {
        total_credit += &txn.credit;
        total_debit += &txn.debit;
        running += &txn.credit;
        running -= &txn.debit;
        entries.push(LedgerEntry::from_transaction(txn, running.clone()));
    }

    let (daily_summary, monthly_summary) = summarize(&entries, &opening_balance, gap_policy);

    LedgerStatement {
        closing_balance: running,
        opening_balance,
        total_credit,
        total_debit,
        entries,
        daily_summary,
        monthly_summary,
    }
}

/// Bucket the ordered ledger by day and by month.
///
/// Entries arrive chronologically, so insertion order in the maps is already
/// the output order and each bucket's closing is simply the last balance
/// written into it.
fn summarize(
    entries: &[LedgerEntry],
    opening_balance: &BigDecimal,
    gap_policy: GapPolicy,
) -> (Vec<DailyBucket>, Vec<MonthlyBucket>) {
    let mut daily: IndexMap<NaiveDate, DailyBucket> = IndexMap::new();
    let mut monthly: IndexMap<NaiveDate, MonthlyBucket> = IndexMap::new();

    for entry in entries {
        let day = daily.entry(entry.date).or_insert_with(|| DailyBucket {
            date: entry.date,
            credit: BigDecimal::zero(),
            debit: BigDecimal::zero(),
            closing: BigDecimal::zero(),
        });
        day.credit += &entry.credit;
        day.debit += &entry.debit;
        day.closing = entry.balance.clone();

        let month_key = first_of_month(entry.date);
        let month = monthly.entry(month_key).or_insert_with(|| MonthlyBucket {
            month: month_key,
            label: month_label(month_key),
            credit: BigDecimal::zero(),
            debit: BigDecimal::zero(),
            closing: BigDecimal::zero(),
        });
        month.credit += &entry.credit;
        month.debit += &entry.debit;
        month.closing = entry.balance.clone();
    }

    match gap_policy {
        GapPolicy::Skip => (
            daily.into_values().collect(),
            monthly.into_values().collect(),
        ),
        GapPolicy::ZeroFill(window) => (
            zero_fill_daily(&daily, opening_balance, &window),
            zero_fill_monthly(&monthly, opening_balance, &window),
        ),
    }
}

fn zero_fill_daily(
    buckets: &IndexMap<NaiveDate, DailyBucket>,
    opening_balance: &BigDecimal,
    window: &ReportWindow,
) -> Vec<DailyBucket> {
    let mut filled = Vec::new();
    let mut carried = opening_balance.clone();
    let mut day = window.start;

    while day <= window.end {
        match buckets.get(&day) {
            Some(bucket) => {
                carried = bucket.closing.clone();
                filled.push(bucket.clone());
            }
            None => filled.push(DailyBucket {
                date: day,
                credit: BigDecimal::zero(),
                debit: BigDecimal::zero(),
                closing: carried.clone(),
            }),
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    filled
}

fn zero_fill_monthly(
    buckets: &IndexMap<NaiveDate, MonthlyBucket>,
    opening_balance: &BigDecimal,
    window: &ReportWindow,
) -> Vec<MonthlyBucket> {
    let mut filled = Vec::new();
    let mut carried = opening_balance.clone();
    let mut month = first_of_month(window.start);
    let last = first_of_month(window.end);

    while month <= last {
        match buckets.get(&month) {
            Some(bucket) => {
                carried = bucket.closing.clone();
                filled.push(bucket.clone());
            }
            None => filled.push(MonthlyBucket {
                month,
                label: month_label(month),
                credit: BigDecimal::zero(),
                debit: BigDecimal::zero(),
                closing: carried.clone(),
            }),
        }
        month = next_month(month);
    }

    filled
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month(month: NaiveDate) -> NaiveDate {
    let (year, month_no) = if month.month() == 12 {
        (month.year() + 1, 1)
    } else {
        (month.year(), month.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month_no, 1).unwrap_or(month)
}

fn month_label(month: NaiveDate) -> String {
    month.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::{DateTime, TimeZone, Utc};

    fn dec(raw: &str) -> BigDecimal {
        raw.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn receipt(day: NaiveDate, amount: &str, recorded_at: DateTime<Utc>) -> Transaction {
        Transaction {
            date: day,
            kind: TransactionKind::Receipt,
            reference_number: Some("R-001".to_string()),
            batch_label: Some("Ramadan Batch".to_string()),
            counterparty_label: "Abdul Rahman".to_string(),
            credit: dec(amount),
            debit: BigDecimal::zero(),
            notes: None,
            recorded_at,
        }
    }

    fn voucher(day: NaiveDate, amount: &str, recorded_at: DateTime<Utc>) -> Transaction {
        Transaction {
            date: day,
            kind: TransactionKind::Voucher,
            reference_number: Some("V-001".to_string()),
            batch_label: Some("Ramadan Batch".to_string()),
            counterparty_label: "Air Tickets".to_string(),
            credit: BigDecimal::zero(),
            debit: dec(amount),
            notes: None,
            recorded_at,
        }
    }

    fn window(start: NaiveDate, end: NaiveDate) -> ReportWindow {
        ReportWindow { start, end }
    }

    #[test]
    fn same_day_entries_keep_creation_order_and_balances() {
        let day = date(2024, 4, 5);
        let receipts = vec![receipt(day, "5000.00", ts(2024, 4, 5, 10))];
        let vouchers = vec![voucher(day, "1200.50", ts(2024, 4, 5, 14))];

        let statement = build_statement(dec("849255.00"), receipts, vouchers, GapPolicy::Skip);

        assert_eq!(statement.entries.len(), 2);
        assert_eq!(statement.entries[0].kind, TransactionKind::Receipt);
        assert_eq!(statement.entries[0].balance, dec("854255.00"));
        assert_eq!(statement.entries[1].kind, TransactionKind::Voucher);
        assert_eq!(statement.entries[1].balance, dec("853054.50"));
        assert_eq!(statement.closing_balance, dec("853054.50"));
        assert_eq!(statement.total_credit, dec("5000.00"));
        assert_eq!(statement.total_debit, dec("1200.50"));
    }

    #[test]
    fn receipts_sort_before_vouchers_on_exact_timestamp_tie() {
        let day = date(2024, 4, 5);
        let stamp = ts(2024, 4, 5, 9);
        let receipts = vec![receipt(day, "100.00", stamp)];
        let vouchers = vec![voucher(day, "40.00", stamp)];

        let merged = merge_transactions(receipts, vouchers);

        assert_eq!(merged[0].kind, TransactionKind::Receipt);
        assert_eq!(merged[1].kind, TransactionKind::Voucher);
    }

    #[test]
    fn merge_interleaves_across_dates() {
        let receipts = vec![
            receipt(date(2024, 4, 1), "100.00", ts(2024, 4, 1, 9)),
            receipt(date(2024, 4, 3), "200.00", ts(2024, 4, 3, 9)),
        ];
        let vouchers = vec![
            voucher(date(2024, 4, 2), "50.00", ts(2024, 4, 2, 9)),
            voucher(date(2024, 4, 4), "25.00", ts(2024, 4, 4, 9)),
        ];

        let merged = merge_transactions(receipts, vouchers);

        let dates: Vec<NaiveDate> = merged.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 4, 1),
                date(2024, 4, 2),
                date(2024, 4, 3),
                date(2024, 4, 4),
            ]
        );
        for pair in merged.windows(2) {
            assert!(pair[0].sort_key() <= pair[1].sort_key());
        }
    }

    #[test]
    fn balance_recurrence_and_conservation_hold() {
        let receipts = vec![
            receipt(date(2024, 4, 1), "1000.00", ts(2024, 4, 1, 9)),
            receipt(date(2024, 4, 2), "2500.00", ts(2024, 4, 2, 9)),
            receipt(date(2024, 4, 2), "300.00", ts(2024, 4, 2, 15)),
        ];
        let vouchers = vec![
            voucher(date(2024, 4, 1), "400.00", ts(2024, 4, 1, 12)),
            voucher(date(2024, 4, 3), "700.00", ts(2024, 4, 3, 9)),
        ];
        let opening = dec("500.00");

        let statement = build_statement(opening.clone(), receipts, vouchers, GapPolicy::Skip);

        let mut previous = opening.clone();
        for entry in &statement.entries {
            let expected = &previous + &entry.credit - &entry.debit;
            assert_eq!(entry.balance, expected);
            previous = entry.balance.clone();
        }
        assert_eq!(
            statement.closing_balance,
            &opening + &statement.total_credit - &statement.total_debit
        );
    }

    #[test]
    fn empty_window_closes_at_opening_balance() {
        let statement = build_statement(dec("7000.00"), Vec::new(), Vec::new(), GapPolicy::Skip);

        assert!(statement.entries.is_empty());
        assert!(statement.daily_summary.is_empty());
        assert!(statement.monthly_summary.is_empty());
        assert_eq!(statement.closing_balance, dec("7000.00"));
        assert_eq!(statement.total_credit, BigDecimal::zero());
        assert_eq!(statement.total_debit, BigDecimal::zero());
    }

    #[test]
    fn daily_and_monthly_buckets_roll_up_closing_balances() {
        let receipts = vec![
            receipt(date(2024, 4, 5), "1000.00", ts(2024, 4, 5, 9)),
            receipt(date(2024, 4, 5), "500.00", ts(2024, 4, 5, 11)),
            receipt(date(2024, 5, 2), "800.00", ts(2024, 5, 2, 9)),
        ];
        let vouchers = vec![voucher(date(2024, 4, 6), "300.00", ts(2024, 4, 6, 9))];

        let statement = build_statement(dec("0.00"), receipts, vouchers, GapPolicy::Skip);

        assert_eq!(statement.daily_summary.len(), 3);
        let first_day = &statement.daily_summary[0];
        assert_eq!(first_day.date, date(2024, 4, 5));
        assert_eq!(first_day.credit, dec("1500.00"));
        assert_eq!(first_day.closing, dec("1500.00"));
        let second_day = &statement.daily_summary[1];
        assert_eq!(second_day.debit, dec("300.00"));
        assert_eq!(second_day.closing, dec("1200.00"));

        assert_eq!(statement.monthly_summary.len(), 2);
        let april = &statement.monthly_summary[0];
        assert_eq!(april.month, date(2024, 4, 1));
        assert_eq!(april.label, "April 2024");
        assert_eq!(april.credit, dec("1500.00"));
        assert_eq!(april.debit, dec("300.00"));
        assert_eq!(april.closing, dec("1200.00"));
        let may = &statement.monthly_summary[1];
        assert_eq!(may.label, "May 2024");
        assert_eq!(may.closing, dec("2000.00"));
    }

    #[test]
    fn skip_policy_omits_zero_activity_days() {
        let receipts = vec![receipt(date(2024, 4, 2), "100.00", ts(2024, 4, 2, 9))];
        let statement = build_statement(dec("0.00"), receipts, Vec::new(), GapPolicy::Skip);

        assert_eq!(statement.daily_summary.len(), 1);
        assert_eq!(statement.daily_summary[0].date, date(2024, 4, 2));
    }

    #[test]
    fn zero_fill_policy_backfills_gap_days_carrying_the_balance() {
        let report_window = window(date(2024, 4, 1), date(2024, 4, 3));
        let receipts = vec![receipt(date(2024, 4, 2), "100.00", ts(2024, 4, 2, 9))];

        let statement = build_statement(
            dec("50.00"),
            receipts,
            Vec::new(),
            GapPolicy::ZeroFill(report_window),
        );

        assert_eq!(statement.daily_summary.len(), 3);
        let leading = &statement.daily_summary[0];
        assert_eq!(leading.date, date(2024, 4, 1));
        assert_eq!(leading.credit, BigDecimal::zero());
        assert_eq!(leading.closing, dec("50.00"));
        assert_eq!(statement.daily_summary[1].closing, dec("150.00"));
        let trailing = &statement.daily_summary[2];
        assert_eq!(trailing.date, date(2024, 4, 3));
        assert_eq!(trailing.closing, dec("150.00"));
    }

    #[test]
    fn zero_fill_policy_backfills_gap_months() {
        let report_window = window(date(2024, 3, 15), date(2024, 5, 10));
        let receipts = vec![receipt(date(2024, 4, 2), "100.00", ts(2024, 4, 2, 9))];

        let statement = build_statement(
            dec("0.00"),
            receipts,
            Vec::new(),
            GapPolicy::ZeroFill(report_window),
        );

        assert_eq!(statement.monthly_summary.len(), 3);
        assert_eq!(statement.monthly_summary[0].label, "March 2024");
        assert_eq!(statement.monthly_summary[0].closing, BigDecimal::zero());
        assert_eq!(statement.monthly_summary[1].closing, dec("100.00"));
        assert_eq!(statement.monthly_summary[2].label, "May 2024");
        assert_eq!(statement.monthly_summary[2].closing, dec("100.00"));
    }

    #[test]
    fn identical_inputs_produce_identical_statements() {
        let build = || {
            build_statement(
                dec("10.00"),
                vec![receipt(date(2024, 4, 1), "100.00", ts(2024, 4, 1, 9))],
                vec![voucher(date(2024, 4, 1), "30.00", ts(2024, 4, 1, 10))],
                GapPolicy::Skip,
            )
        };
        let first = serde_json::to_string(&build()).unwrap();
        let second = serde_json::to_string(&build()).unwrap();
        assert_eq!(first, second);
    }
}
