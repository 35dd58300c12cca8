//! Default date windows for the forms

use chrono::{Local, Months, NaiveDate};

/// Wire format for every date parameter
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today.pred_opt().unwrap_or(today)
}

/// `end` moved back `months` calendar months, clamped to the month's last day
pub fn months_ago(end: NaiveDate, months: u32) -> NaiveDate {
    end.checked_sub_months(Months::new(months)).unwrap_or(end)
}

pub fn years_ago(end: NaiveDate, years: u32) -> NaiveDate {
    months_ago(end, years.saturating_mul(12))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_yesterday_crosses_year() {
        assert_eq!(yesterday(date(2024, 1, 1)), date(2023, 12, 31));
    }

    #[test]
    fn test_months_ago_clamps_month_end() {
        assert_eq!(months_ago(date(2024, 8, 31), 6), date(2024, 2, 29));
        assert_eq!(months_ago(date(2024, 10, 18), 6), date(2024, 4, 18));
    }

    #[test]
    fn test_years_ago_leap_day() {
        assert_eq!(years_ago(date(2024, 2, 29), 1), date(2023, 2, 28));
        assert_eq!(years_ago(date(2024, 10, 18), 10), date(2014, 10, 18));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_date(date(2024, 3, 5)), "2024-03-05");
    }
}
