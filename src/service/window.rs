use chrono::{Datelike, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolved inclusive reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    /// Resolve raw query inputs against `today`.
    ///
    /// Missing, empty or malformed dates fall back to (first of current
    /// month, today); inverted bounds are swapped. Bad input never errors.
    pub fn resolve(start_raw: Option<&str>, end_raw: Option<&str>, today: NaiveDate) -> Self {
        let first_of_month = today.with_day(1).unwrap_or(today);
        let mut start = parse_date(start_raw).unwrap_or(first_of_month);
        let mut end = parse_date(end_raw).unwrap_or(today);

        if start > end {
            std::mem::swap(&mut start, &mut end);
        }

        Self { start, end }
    }
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn valid_bounds_pass_through() {
        let window = ReportWindow::resolve(Some("2024-04-01"), Some("2024-04-30"), date(2024, 6, 15));
        assert_eq!(window.start, date(2024, 4, 1));
        assert_eq!(window.end, date(2024, 4, 30));
    }

    #[test]
    fn malformed_and_empty_inputs_fall_back_to_month_to_date() {
        let today = date(2024, 6, 15);
        let window = ReportWindow::resolve(Some("not-a-date"), Some(""), today);
        assert_eq!(window.start, date(2024, 6, 1));
        assert_eq!(window.end, today);
    }

    #[test]
    fn missing_inputs_fall_back_to_month_to_date() {
        let today = date(2024, 2, 29);
        let window = ReportWindow::resolve(None, None, today);
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.end, today);
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let today = date(2024, 6, 15);
        let inverted = ReportWindow::resolve(Some("2024-04-15"), Some("2024-04-10"), today);
        let ordered = ReportWindow::resolve(Some("2024-04-10"), Some("2024-04-15"), today);
        assert_eq!(inverted, ordered);
    }
}
