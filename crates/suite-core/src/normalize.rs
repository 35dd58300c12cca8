//! Shaping of financial-data payloads into [`NormalizedTable`]s
//!
//! Every consumer (terminal or HTML rendering, CSV or spreadsheet export)
//! goes through these functions; none of them look at raw payloads.

use crate::model::{
    CompanyProfile, DataKind, DatasetEntry, DayEntry, FinancialDataset, HistoricalPriceTable,
    PriceBar, StatementTable, lookup_key,
};
use crate::table::{Cell, NoDataReason, Normalized, NormalizedTable, UNAVAILABLE};
use chrono::NaiveDate;
use std::cmp::Ordering;
use tracing::debug;

/// Fixed headers of the historical prices table
pub const PRICE_HEADERS: [&str; 8] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Dividends",
    "Stock Splits",
];

/// Turn a camelCase property key into a label: `marketCap` becomes `Market Cap`
pub fn humanize_key(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (index, ch) in key.chars().enumerate() {
        if index == 0 {
            label.extend(ch.to_uppercase());
        } else {
            if ch.is_uppercase() {
                label.push(' ');
            }
            label.push(ch);
        }
    }
    label
}

/// Normalize a financials response for one symbol
pub fn normalize_financials(
    dataset: &FinancialDataset,
    kind: DataKind,
    symbol: &str,
) -> Normalized {
    let key = lookup_key(symbol);
    match dataset.entry(&key) {
        None => Normalized::error(format!("No data returned for symbol {key}")),
        Some(DatasetEntry::Error { error }) => Normalized::error(error.clone()),
        Some(DatasetEntry::Profile(profile)) => {
            if kind != DataKind::CompanyProfile {
                debug!(%kind, "profile payload normalized as requested kind");
            }
            normalize_profile(profile)
        }
        Some(DatasetEntry::Statement(statement)) => normalize_statement(statement),
    }
}

/// Property/value table of a company profile
pub fn normalize_profile(profile: &CompanyProfile) -> Normalized {
    let Some(main_info) = profile.main_info.as_ref().filter(|info| !info.is_empty()) else {
        return Normalized::NoData(NoDataReason::NoProfileData);
    };

    let rows = main_info
        .iter()
        .map(|(key, value)| vec![Cell::Text(humanize_key(key)), Cell::from_json(value)])
        .collect();

    Normalized::Table(NormalizedTable::from_parts(
        vec!["Property".to_string(), "Value".to_string()],
        rows,
    ))
}

/// Metric by period table of a financial statement
pub fn normalize_statement(statement: &StatementTable) -> Normalized {
    if statement.dates.is_empty() || statement.data.is_empty() {
        return Normalized::NoData(NoDataReason::NoStatementData);
    }

    let headers = std::iter::once("Metric".to_string())
        .chain(statement.dates.iter().cloned())
        .collect();

    let rows = statement
        .data
        .iter()
        .map(|item| {
            std::iter::once(Cell::Text(item.metric.clone()))
                .chain(
                    statement
                        .dates
                        .iter()
                        .map(|date| item.values.get(date).map_or(Cell::Empty, Cell::from_json)),
                )
                .collect()
        })
        .collect();

    Normalized::Table(NormalizedTable::from_parts(headers, rows))
}

/// Officer table of a company profile response
pub fn normalize_officers(dataset: &FinancialDataset, symbol: &str) -> Normalized {
    let key = lookup_key(symbol);
    let profile = match dataset.entry(&key) {
        None => return Normalized::error(format!("No data returned for symbol {key}")),
        Some(DatasetEntry::Error { error }) => return Normalized::error(error.clone()),
        Some(DatasetEntry::Statement(_)) => {
            return Normalized::NoData(NoDataReason::NoProfileData);
        }
        Some(DatasetEntry::Profile(profile)) => profile,
    };

    if profile.officers.is_empty() {
        return Normalized::NoData(NoDataReason::NoProfileData);
    }

    let rows = profile
        .officers
        .iter()
        .map(|officer| {
            vec![
                Cell::from(officer.name.clone()),
                Cell::from(officer.title.clone()),
                Cell::from(officer.age),
                Cell::from(officer.year_born),
            ]
        })
        .collect();

    Normalized::Table(NormalizedTable::from_parts(
        ["Name", "Title", "Age", "Year Born"]
            .into_iter()
            .map(str::to_string)
            .collect(),
        rows,
    ))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Calendar order; keys that are not dates go last, in string order
fn compare_dates(a: &str, b: &str) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn price_row(date: &str, bar: &PriceBar) -> Vec<Cell> {
    vec![
        Cell::Text(date.to_string()),
        Cell::Number(bar.open),
        Cell::Number(bar.high),
        Cell::Number(bar.low),
        Cell::Number(bar.close),
        Cell::Number(bar.volume),
        Cell::Number(bar.dividends),
        Cell::Number(bar.stock_splits),
    ]
}

fn placeholder_row(date: &str) -> Vec<Cell> {
    let mut row = vec![Cell::Text(date.to_string()), Cell::from(UNAVAILABLE)];
    row.resize(PRICE_HEADERS.len(), Cell::Empty);
    row
}

/// Date by OHLCV table for one symbol
///
/// Dates where the symbol is missing, or that carry an error, become
/// placeholder rows. If no date has the symbol at all the result is
/// [`NoDataReason::NoDataForSymbol`].
pub fn normalize_prices(table: &HistoricalPriceTable, symbol: &str) -> Normalized {
    let dates = match table {
        HistoricalPriceTable::Error { error } => return Normalized::error(error.clone()),
        HistoricalPriceTable::Dates(dates) => dates,
    };

    let key = lookup_key(symbol);
    let mut ordered: Vec<&(String, DayEntry)> = dates.iter().collect();
    ordered.sort_by(|a, b| compare_dates(&a.0, &b.0));

    let mut found = false;
    let rows: Vec<Vec<Cell>> = ordered
        .into_iter()
        .map(|(date, day)| match day.bar(&key) {
            Some(bar) => {
                found = true;
                price_row(date, bar)
            }
            None => placeholder_row(date),
        })
        .collect();

    if !found {
        return Normalized::NoData(NoDataReason::NoDataForSymbol { symbol: key });
    }

    Normalized::Table(NormalizedTable::from_parts(
        PRICE_HEADERS.iter().map(|header| (*header).to_string()).collect(),
        rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bar(close: f64) -> serde_json::Value {
        json!({"Open": 1, "High": 2, "Low": 0.5, "Close": close, "Volume": 100, "Dividends": 0, "Stock Splits": 0})
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("marketCap"), "Market Cap");
        assert_eq!(humanize_key("sector"), "Sector");
        assert_eq!(humanize_key("fullTimeEmployees"), "Full Time Employees");
        assert_eq!(humanize_key("Symbol"), "Symbol");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn test_company_profile_scenario() {
        let dataset = FinancialDataset::from_value(
            DataKind::CompanyProfile,
            json!({"AAPL": {"main_info": {"marketCap": 3_000_000_000_u64, "sector": "Technology"}}}),
        )
        .unwrap();

        let normalized = normalize_financials(&dataset, DataKind::CompanyProfile, "AAPL");
        let table = normalized.table().unwrap();
        assert_eq!(table.headers(), ["Property", "Value"]);
        assert_eq!(
            table.rows(),
            [
                vec![Cell::from("Market Cap"), Cell::Number(3e9)],
                vec![Cell::from("Sector"), Cell::from("Technology")],
            ]
        );
    }

    #[test]
    fn test_empty_profile_is_no_data() {
        let dataset = FinancialDataset::from_value(
            DataKind::CompanyProfile,
            json!({"AAPL": {"main_info": {}}, "MSFT": {}}),
        )
        .unwrap();
        for symbol in ["AAPL", "MSFT"] {
            assert_eq!(
                normalize_financials(&dataset, DataKind::CompanyProfile, symbol),
                Normalized::NoData(NoDataReason::NoProfileData)
            );
        }
    }

    #[test]
    fn test_statement_scenario() {
        let dataset = FinancialDataset::from_value(
            DataKind::IncomeStatement,
            json!({"AAPL": {"dates": ["2023-12-31"], "data": [{"metric": "Revenue", "2023-12-31": 1000}]}}),
        )
        .unwrap();

        let normalized = normalize_financials(&dataset, DataKind::IncomeStatement, "AAPL");
        let table = normalized.table().unwrap();
        assert_eq!(table.headers(), ["Metric", "2023-12-31"]);
        assert_eq!(table.rows(), [vec![Cell::from("Revenue"), Cell::Number(1000.0)]]);
    }

    #[test]
    fn test_statement_missing_period_is_empty_cell() {
        let statement: StatementTable = serde_json::from_value(json!({
            "dates": ["2023", "2022"],
            "data": [{"metric": "EBIT", "2023": 5}]
        }))
        .unwrap();
        let normalized = normalize_statement(&statement);
        assert_eq!(
            normalized.table().unwrap().rows(),
            [vec![Cell::from("EBIT"), Cell::Number(5.0), Cell::Empty]]
        );
    }

    #[test]
    fn test_empty_statement_is_no_data() {
        for payload in [
            json!({"dates": [], "data": [{"metric": "Revenue"}]}),
            json!({"dates": ["2023-12-31"], "data": []}),
            json!({}),
        ] {
            let statement: StatementTable = serde_json::from_value(payload).unwrap();
            assert_eq!(
                normalize_statement(&statement),
                Normalized::NoData(NoDataReason::NoStatementData)
            );
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dataset = FinancialDataset::from_value(
            DataKind::BalanceSheet,
            json!({"AAPL": {"dates": ["2023"], "data": [{"metric": "Cash", "2023": 1}]}}),
        )
        .unwrap();
        assert!(normalize_financials(&dataset, DataKind::BalanceSheet, "aapl").is_table());
        assert!(normalize_financials(&dataset, DataKind::BalanceSheet, " Aapl ").is_table());
    }

    #[test]
    fn test_missing_and_error_entries_are_errors() {
        let dataset = FinancialDataset::from_value(
            DataKind::CashFlowStatement,
            json!({"BAD": {"error": "Symbol may be delisted"}}),
        )
        .unwrap();
        assert_eq!(
            normalize_financials(&dataset, DataKind::CashFlowStatement, "bad").error_message(),
            Some("Symbol may be delisted")
        );
        assert_eq!(
            normalize_financials(&dataset, DataKind::CashFlowStatement, "GOOD").error_message(),
            Some("No data returned for symbol GOOD")
        );
    }

    #[test]
    fn test_officers_table() {
        let dataset = FinancialDataset::from_value(
            DataKind::CompanyProfile,
            json!({"AAPL": {"officers": [{"name": "Tim", "title": "CEO", "age": 62}, {"name": "Luca"}]}}),
        )
        .unwrap();
        let normalized = normalize_officers(&dataset, "aapl");
        let table = normalized.table().unwrap();
        assert_eq!(table.headers(), ["Name", "Title", "Age", "Year Born"]);
        assert_eq!(
            table.rows()[1],
            vec![Cell::from("Luca"), Cell::Empty, Cell::Empty, Cell::Empty]
        );
    }

    #[test]
    fn test_prices_top_level_error_is_error_table() {
        let table = HistoricalPriceTable::from_value(json!({"error": "No data found"})).unwrap();
        let normalized = normalize_prices(&table, "AAPL");
        let Normalized::Error(error_table) = &normalized else {
            panic!("expected the error table");
        };
        assert_eq!(error_table.headers(), ["Error"]);
        assert_eq!(error_table.rows(), [vec![Cell::from("No data found")]]);
    }

    #[test]
    fn test_prices_sorted_by_calendar_date() {
        let table = HistoricalPriceTable::from_value(json!({
            "2023-1-10": {"AAPL": bar(3.0)},
            "2023-01-02": {"AAPL": bar(1.0)},
            "2023-01-09": {"AAPL": bar(2.0)},
        }))
        .unwrap();

        let normalized = normalize_prices(&table, "aapl");
        let table = normalized.table().unwrap();
        assert_eq!(table.headers(), PRICE_HEADERS);
        let dates: Vec<String> = table.column(0).map(Cell::raw).collect();
        assert_eq!(dates, vec!["2023-01-02", "2023-01-09", "2023-1-10"]);
        let closes: Vec<&Cell> = table.column(4).collect();
        assert_eq!(closes, vec![&Cell::Number(1.0), &Cell::Number(2.0), &Cell::Number(3.0)]);
    }

    #[test]
    fn test_prices_placeholder_rows() {
        let table = HistoricalPriceTable::from_value(json!({
            "2023-01-02": {"AAPL": bar(1.0)},
            "2023-01-03": {"error": "holiday"},
            "2023-01-04": {"MSFT": bar(9.0)},
        }))
        .unwrap();

        let normalized = normalize_prices(&table, "AAPL");
        let table = normalized.table().unwrap();
        assert_eq!(table.row_count(), 3);
        for row in &table.rows()[1..] {
            assert_eq!(row[1], Cell::from(UNAVAILABLE));
            assert!(row[2..].iter().all(Cell::is_empty));
            assert_eq!(row.len(), PRICE_HEADERS.len());
        }
    }

    #[test]
    fn test_prices_for_absent_symbol_is_no_data() {
        let table = HistoricalPriceTable::from_value(json!({
            "2023-01-02": {"AAPL": {"Open":1,"High":2,"Low":0.5,"Close":1.5,"Volume":100,"Dividends":0,"Stock Splits":0}}
        }))
        .unwrap();
        assert_eq!(
            normalize_prices(&table, "GOOG"),
            Normalized::NoData(NoDataReason::NoDataForSymbol {
                symbol: "GOOG".to_string()
            })
        );

        let empty = HistoricalPriceTable::Dates(Vec::new());
        assert!(matches!(normalize_prices(&empty, "GOOG"), Normalized::NoData(_)));
    }

    #[test]
    fn test_date_ordering_puts_unparseable_last() {
        assert_eq!(compare_dates("2023-01-02", "garbage"), Ordering::Less);
        assert_eq!(compare_dates("2023-02-01", "2023-1-31"), Ordering::Greater);
        assert_eq!(
            compare_dates("2023-01-02T00:00:00", "2023-01-03"),
            Ordering::Less
        );
    }
}
