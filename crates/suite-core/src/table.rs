//! The normalized table contract shared by renderers and exporters

use crate::error::{CoreError, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Text of the placeholder row emitted for dates without data
pub const UNAVAILABLE: &str = "Data not available";

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    /// Convert a JSON scalar into a cell
    ///
    /// Booleans become their text form; arrays and objects are kept as compact JSON.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Number(number) => number
                .as_f64()
                .map_or_else(|| Self::Text(number.to_string()), Self::Number),
            Value::String(text) => Self::Text(text.clone()),
            Value::Bool(flag) => Self::Text(flag.to_string()),
            other => Self::Text(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Unformatted text as written to export files
    pub fn raw(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
            Self::Empty => String::new(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// Headers plus same-length rows, with no knowledge of where the data came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl NormalizedTable {
    /// Build a table, rejecting rows whose length differs from the header count
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(CoreError::RaggedRow {
                row,
                expected: headers.len(),
                found: cells.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    /// Caller guarantees every row matches the header count
    pub(crate) fn from_parts(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == headers.len()));
        Self { headers, rows }
    }

    /// Single-column table whose only cell is the error message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            headers: vec!["Error".to_string()],
            rows: vec![vec![Cell::Text(message.into())]],
        }
    }

    /// Message of a table built by [`NormalizedTable::error`]
    pub fn error_message(&self) -> Option<&str> {
        match (self.headers.as_slice(), self.rows.as_slice()) {
            ([header], [row]) if header == "Error" => match row.as_slice() {
                [Cell::Text(message)] => Some(message),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// True when the column holds mostly numbers; placeholders are not counted
    pub fn is_numeric_column(&self, index: usize) -> bool {
        let (numbers, others) = self.column(index).fold((0usize, 0usize), |(n, o), cell| match cell {
            Cell::Number(_) => (n + 1, o),
            Cell::Text(text) if looks_numeric(text) => (n + 1, o),
            Cell::Text(text) if text == UNAVAILABLE => (n, o),
            Cell::Text(_) => (n, o + 1),
            Cell::Empty => (n, o),
        });
        numbers > 0 && numbers >= others
    }
}

fn looks_numeric(text: &str) -> bool {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    !cleaned.is_empty() && cleaned.parse::<f64>().is_ok()
}

/// Why a payload produced no table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoDataReason {
    NoProfileData,
    NoStatementData,
    NoDataForSymbol { symbol: String },
}

impl NoDataReason {
    /// User-facing empty-state notice
    pub fn notice(&self) -> String {
        match self {
            Self::NoProfileData => "No company profile information available.".to_string(),
            Self::NoStatementData => "No financial statement data available.".to_string(),
            Self::NoDataForSymbol { symbol } => {
                format!("No historical price data available for {symbol}.")
            }
        }
    }
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notice())
    }
}

/// Outcome of normalizing a payload
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Table(NormalizedTable),
    NoData(NoDataReason),
    /// Always a single-column error table
    Error(NormalizedTable),
}

impl Normalized {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(NormalizedTable::error(message))
    }

    /// Data table, if this is one
    pub fn table(&self) -> Option<&NormalizedTable> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(table) => table.error_message(),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = NormalizedTable::new(
            vec!["A".to_string(), "B".to_string()],
            vec![vec![Cell::from("x"), Cell::Empty], vec![Cell::from(1.0)]],
        );
        assert!(matches!(
            result,
            Err(CoreError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_error_table_shape() {
        let table = NormalizedTable::error("symbol not found");
        assert_eq!(table.headers(), ["Error"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.error_message(), Some("symbol not found"));

        let normalized = Normalized::error("boom");
        assert_eq!(normalized.error_message(), Some("boom"));
        assert!(normalized.table().is_none());
    }

    #[test]
    fn test_cells_from_json() {
        assert_eq!(Cell::from_json(&json!(null)), Cell::Empty);
        assert_eq!(Cell::from_json(&json!(3_000_000_000_u64)), Cell::Number(3e9));
        assert_eq!(Cell::from_json(&json!("Technology")), Cell::from("Technology"));
        assert_eq!(Cell::from_json(&json!(true)), Cell::from("true"));
        assert_eq!(Cell::from_json(&json!([1, 2])), Cell::from("[1,2]"));
    }

    #[test]
    fn test_raw_numbers_have_no_separators() {
        assert_eq!(Cell::Number(3e9).raw(), "3000000000");
        assert_eq!(Cell::Number(1.5).raw(), "1.5");
        assert_eq!(Cell::Empty.raw(), "");
    }

    #[test]
    fn test_numeric_column_detection() {
        let table = NormalizedTable::new(
            vec!["Date".to_string(), "Open".to_string()],
            vec![
                vec![Cell::from("2023-01-02"), Cell::from(1.0)],
                vec![Cell::from("2023-01-03"), Cell::from("Data not available")],
                vec![Cell::from("2023-01-04"), Cell::from("1,234.5")],
            ],
        )
        .unwrap();
        assert!(!table.is_numeric_column(0));
        assert!(table.is_numeric_column(1));
    }

    #[test]
    fn test_placeholders_do_not_outvote_prices() {
        let table = NormalizedTable::new(
            vec!["Date".to_string(), "Open".to_string(), "High".to_string()],
            vec![
                vec![Cell::from("2023-01-02"), Cell::from(UNAVAILABLE), Cell::Empty],
                vec![Cell::from("2023-01-03"), Cell::from(UNAVAILABLE), Cell::Empty],
                vec![Cell::from("2023-01-04"), Cell::from(130.28), Cell::from(130.9)],
            ],
        )
        .unwrap();
        assert!(table.is_numeric_column(1));
        assert!(table.is_numeric_column(2));
    }
}
