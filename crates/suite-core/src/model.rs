//! Typed payloads returned by the financial-data service
//!
//! The service answers with loosely shaped JSON: a ticker entry may be a
//! profile, a statement or an `{ "error": ... }` object, and the price history
//! may be a date map or a single top-level error. Each of those unions is a
//! tagged enum here so consumers have to match before touching fields.

use crate::error::{CoreError, Result};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Kind of data requested from the financial-data service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    CompanyProfile,
    IncomeStatement,
    BalanceSheet,
    QuarterlyIncomeStatement,
    CashFlowStatement,
    HistoricalPrices,
}

impl DataKind {
    /// Kinds served by the per-ticker financials endpoints
    pub const FINANCIALS: [DataKind; 5] = [
        DataKind::CompanyProfile,
        DataKind::IncomeStatement,
        DataKind::BalanceSheet,
        DataKind::QuarterlyIncomeStatement,
        DataKind::CashFlowStatement,
    ];

    /// Human readable label, also used for sheet and file names
    pub fn label(self) -> &'static str {
        match self {
            Self::CompanyProfile => "Company Profile",
            Self::IncomeStatement => "Income Statement",
            Self::BalanceSheet => "Balance Sheet",
            Self::QuarterlyIncomeStatement => "Quarterly Income Statement",
            Self::CashFlowStatement => "Cash Flow Statement",
            Self::HistoricalPrices => "Historical Prices",
        }
    }

    /// True for the four period-indexed statement kinds
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::IncomeStatement
                | Self::BalanceSheet
                | Self::QuarterlyIncomeStatement
                | Self::CashFlowStatement
        )
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Key used to look a user-entered symbol up in a payload
pub fn lookup_key(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn error_text(map: &Map<String, Value>) -> Option<&str> {
    match map.get("error") {
        Some(Value::String(error)) if !error.is_empty() => Some(error),
        _ => None,
    }
}

/// Company officer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default, rename = "yearBorn")]
    pub year_born: Option<f64>,
    /// Any fields the service adds beyond the ones above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Company profile payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Property name to scalar, in the order the service sent them
    #[serde(default)]
    pub main_info: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub officers: Vec<Officer>,
}

/// One metric row of a financial statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    #[serde(default)]
    pub metric: String,
    /// Period label to value
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

/// Period-indexed statement payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dates: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<MetricRow>,
}

/// A single ticker's entry in a financials response
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetEntry {
    /// The symbol could not be resolved upstream
    Error { error: String },
    Profile(CompanyProfile),
    Statement(StatementTable),
}

impl DatasetEntry {
    /// Parse an entry, using the requested kind to pick the data variant
    pub fn from_value(kind: DataKind, value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(CoreError::InvalidPayload(format!(
                "expected an object for a ticker entry, found {}",
                json_type(&value)
            )));
        };

        if let Some(error) = error_text(&map) {
            return Ok(Self::Error {
                error: error.to_string(),
            });
        }

        match kind {
            DataKind::CompanyProfile => Ok(Self::Profile(serde_json::from_value(Value::Object(
                map,
            ))?)),
            DataKind::HistoricalPrices => Err(CoreError::UnsupportedKind(
                "historical prices are not a per-ticker dataset".to_string(),
            )),
            _ => Ok(Self::Statement(serde_json::from_value(Value::Object(map))?)),
        }
    }
}

/// Financials response keyed by ticker symbol
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialDataset {
    entries: HashMap<String, DatasetEntry>,
}

impl FinancialDataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a response body for the given kind
    pub fn from_value(kind: DataKind, value: Value) -> Result<Self> {
        if kind == DataKind::HistoricalPrices {
            return Err(CoreError::UnsupportedKind(
                "use HistoricalPriceTable for historical prices".to_string(),
            ));
        }

        let Value::Object(map) = value else {
            return Err(CoreError::InvalidPayload(format!(
                "expected an object keyed by ticker, found {}",
                json_type(&value)
            )));
        };

        let mut entries = HashMap::with_capacity(map.len());
        for (symbol, entry) in map {
            let entry = DatasetEntry::from_value(kind, entry).unwrap_or_else(|err| {
                warn!(%symbol, error = %err, "treating malformed ticker entry as an error");
                DatasetEntry::Error {
                    error: err.to_string(),
                }
            });
            entries.insert(symbol, entry);
        }
        Ok(Self { entries })
    }

    /// Parse a JSON string for the given kind
    pub fn from_json(kind: DataKind, json: &str) -> Result<Self> {
        Self::from_value(kind, serde_json::from_str(json)?)
    }

    /// Entry for a user-entered symbol, compared in upper case
    pub fn entry(&self, symbol: &str) -> Option<&DatasetEntry> {
        self.entries.get(&lookup_key(symbol))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ticker keys as sent by the service
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// One day's prices for one symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
    #[serde(rename = "Dividends", default)]
    pub dividends: f64,
    #[serde(rename = "Stock Splits", alias = "StockSplits", default)]
    pub stock_splits: f64,
}

/// Prices for a single date
#[derive(Debug, Clone, PartialEq)]
pub enum DayEntry {
    Error { error: String },
    Symbols(HashMap<String, PriceBar>),
}

impl DayEntry {
    fn from_value(date: &str, value: Value) -> Self {
        let Value::Object(map) = value else {
            warn!(date, "price entry is {}, treating as unavailable", json_type(&value));
            return Self::Error {
                error: format!("malformed entry for {date}"),
            };
        };

        if let Some(error) = map.get("error") {
            return Self::Error {
                error: error
                    .as_str()
                    .map_or_else(|| "unknown error".to_string(), str::to_string),
            };
        }

        let mut bars = HashMap::with_capacity(map.len());
        for (symbol, bar) in map {
            match serde_json::from_value::<PriceBar>(bar) {
                Ok(bar) => {
                    bars.insert(symbol, bar);
                }
                Err(err) => warn!(date, %symbol, error = %err, "dropping malformed price bar"),
            }
        }
        Self::Symbols(bars)
    }

    /// Bar for an already upper-cased symbol key
    pub fn bar(&self, key: &str) -> Option<&PriceBar> {
        match self {
            Self::Error { .. } => None,
            Self::Symbols(bars) => bars.get(key),
        }
    }
}

/// Historical prices response
#[derive(Debug, Clone, PartialEq)]
pub enum HistoricalPriceTable {
    /// The symbol could not be resolved at all
    Error { error: String },
    /// Date to day entry, in the order the service sent them
    Dates(Vec<(String, DayEntry)>),
}

impl HistoricalPriceTable {
    /// Parse a response body
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(CoreError::InvalidPayload(format!(
                "expected an object keyed by date, found {}",
                json_type(&value)
            )));
        };

        if let Some(Value::String(error)) = map.get("error") {
            return Ok(Self::Error {
                error: error.clone(),
            });
        }

        Ok(Self::Dates(
            map.into_iter()
                .map(|(date, day)| {
                    let entry = DayEntry::from_value(&date, day);
                    (date, entry)
                })
                .collect(),
        ))
    }

    /// Parse a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// True when the table is an error or carries no dates
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Error { .. } => true,
            Self::Dates(dates) => dates.is_empty(),
        }
    }
}

impl<'de> Deserialize<'de> for HistoricalPriceTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}
