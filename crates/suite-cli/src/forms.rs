//! Form state for each tab and its validation rules
//!
//! A form owns the raw user input. Validation turns it into a gateway request
//! or a [`FormError`]; the same type decides how failures and unusable
//! responses are worded for its tab.

use crate::dates::{format_date, months_ago, years_ago, yesterday};
use chrono::NaiveDate;
use suite_api::{
    ApiError, DatasetQuery, MultiSecurityReport, MultiSecurityRequest, PortfolioReport,
    PortfolioRequest, PriceQuery, TechnicalReport, TechnicalRequest,
};
use suite_core::model::DatasetEntry;
use suite_core::{DataKind, FinancialDataset, HistoricalPriceTable};
use thiserror::Error;

pub const SYMBOL_CHECK_MESSAGE: &str = "Please double-check the Yahoo Finance symbol. Note that it might be different from your local stock exchange symbol (e.g., TCS (NSE) would be TCS.NS or TCS.BO in Yahoo Finance). If the error persists, please email amar@harolikar.com or DM on LinkedIn.";

pub const SYMBOLS_CHECK_MESSAGE: &str = "Please double-check the Yahoo Finance symbols. Note that they might be different from your local stock exchange symbols (e.g., TCS (NSE) would be TCS.NS or TCS.BO in Yahoo Finance). If the error persists, please email amar@harolikar.com or DM on LinkedIn.";

/// Inline validation failures, raised before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Symbol, Start Date, and End Date are required.")]
    SymbolAndDatesRequired,

    #[error("Symbols, Start Date, and End Date are required.")]
    SymbolsAndDatesRequired,

    #[error("Stock Symbol is required.")]
    SymbolRequired,

    #[error("All fields (Ticker, Daily and Weekly date ranges) are required.")]
    TechnicalFieldsRequired,

    #[error("Risk-free rate must be a number, got '{0}'.")]
    InvalidRate(String),
}

/// Input for one tab
pub trait Form {
    type Request: Send + Sync;
    type Response: Send;

    fn validate(&self) -> Result<Self::Request, FormError>;

    /// Message shown when the gateway call fails
    fn failure_message(&self, error: &ApiError) -> String;

    /// Reject a successful response that has nothing usable in it
    fn check_response(&self, request: &Self::Request, response: &Self::Response)
    -> Result<(), String>;
}

/// Upper-case ASCII letters, leaving every other character as typed
pub fn uppercase_symbol(symbol: &str) -> String {
    symbol.trim().chars().map(|c| c.to_ascii_uppercase()).collect()
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn parse_rate(rate: &str) -> Result<Option<f64>, FormError> {
    let rate = rate.trim();
    if rate.is_empty() {
        return Ok(None);
    }
    rate.parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .map(Some)
        .ok_or_else(|| FormError::InvalidRate(rate.to_string()))
}

/// Single security against a benchmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioForm {
    pub symbols: String,
    pub benchmark: String,
    pub start_date: String,
    pub end_date: String,
    pub risk_free_rate: String,
}

impl PortfolioForm {
    pub fn with_defaults(today: NaiveDate) -> Self {
        let end = yesterday(today);
        Self {
            symbols: "^NSEI".to_string(),
            benchmark: "^GSPC".to_string(),
            start_date: format_date(years_ago(end, 10)),
            end_date: format_date(end),
            risk_free_rate: "5".to_string(),
        }
    }
}

impl Form for PortfolioForm {
    type Request = PortfolioRequest;
    type Response = PortfolioReport;

    fn validate(&self) -> Result<PortfolioRequest, FormError> {
        if blank(&self.symbols) || blank(&self.start_date) || blank(&self.end_date) {
            return Err(FormError::SymbolAndDatesRequired);
        }
        Ok(PortfolioRequest {
            symbols: self.symbols.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
            benchmark: Some(self.benchmark.trim().to_string()).filter(|b| !b.is_empty()),
            risk_free_rate: parse_rate(&self.risk_free_rate)?,
        })
    }

    fn failure_message(&self, error: &ApiError) -> String {
        error.to_string()
    }

    fn check_response(&self, _: &PortfolioRequest, response: &PortfolioReport) -> Result<(), String> {
        response
            .report_url()
            .map(|_| ())
            .ok_or_else(|| SYMBOL_CHECK_MESSAGE.to_string())
    }
}

/// Several securities compared over one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSecurityForm {
    pub symbols: String,
    pub start_date: String,
    pub end_date: String,
    pub risk_free_rate: String,
}

impl MultiSecurityForm {
    pub fn with_defaults(today: NaiveDate) -> Self {
        let end = yesterday(today);
        Self {
            symbols: "^NSEI,^GSPC,GC=F".to_string(),
            start_date: format_date(years_ago(end, 10)),
            end_date: format_date(end),
            risk_free_rate: "5".to_string(),
        }
    }
}

impl Form for MultiSecurityForm {
    type Request = MultiSecurityRequest;
    type Response = MultiSecurityReport;

    fn validate(&self) -> Result<MultiSecurityRequest, FormError> {
        if blank(&self.symbols) || blank(&self.start_date) || blank(&self.end_date) {
            return Err(FormError::SymbolsAndDatesRequired);
        }
        Ok(MultiSecurityRequest::new(
            self.symbols.trim(),
            self.start_date.trim(),
            self.end_date.trim(),
            parse_rate(&self.risk_free_rate)?,
        ))
    }

    fn failure_message(&self, error: &ApiError) -> String {
        error.to_string()
    }

    fn check_response(
        &self,
        _: &MultiSecurityRequest,
        response: &MultiSecurityReport,
    ) -> Result<(), String> {
        response
            .report_url()
            .map(|_| ())
            .ok_or_else(|| SYMBOLS_CHECK_MESSAGE.to_string())
    }
}

/// Daily and weekly windows for the technical report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalForm {
    pub ticker: String,
    pub daily_start_date: String,
    pub daily_end_date: String,
    pub weekly_start_date: String,
    pub weekly_end_date: String,
}

impl TechnicalForm {
    pub fn with_defaults(today: NaiveDate) -> Self {
        let end = yesterday(today);
        Self {
            ticker: "^GSPC".to_string(),
            daily_start_date: format_date(months_ago(end, 6)),
            daily_end_date: format_date(end),
            weekly_start_date: format_date(years_ago(end, 3)),
            weekly_end_date: format_date(end),
        }
    }
}

impl Form for TechnicalForm {
    type Request = TechnicalRequest;
    type Response = TechnicalReport;

    fn validate(&self) -> Result<TechnicalRequest, FormError> {
        let fields = [
            &self.ticker,
            &self.daily_start_date,
            &self.daily_end_date,
            &self.weekly_start_date,
            &self.weekly_end_date,
        ];
        if fields.iter().any(|field| blank(field)) {
            return Err(FormError::TechnicalFieldsRequired);
        }
        Ok(TechnicalRequest {
            ticker: self.ticker.trim().to_string(),
            daily_start_date: self.daily_start_date.trim().to_string(),
            daily_end_date: self.daily_end_date.trim().to_string(),
            weekly_start_date: self.weekly_start_date.trim().to_string(),
            weekly_end_date: self.weekly_end_date.trim().to_string(),
        })
    }

    fn failure_message(&self, error: &ApiError) -> String {
        error.to_string()
    }

    fn check_response(&self, _: &TechnicalRequest, response: &TechnicalReport) -> Result<(), String> {
        match (response.report_url(), response.pdf_url()) {
            (Some(_), Some(_)) => Ok(()),
            _ => Err(SYMBOL_CHECK_MESSAGE.to_string()),
        }
    }
}

/// Profile or statement for one ticker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialsForm {
    pub symbol: String,
    pub kind: DataKind,
}

impl Default for FinancialsForm {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            kind: DataKind::CompanyProfile,
        }
    }
}

impl Form for FinancialsForm {
    type Request = DatasetQuery;
    type Response = FinancialDataset;

    fn validate(&self) -> Result<DatasetQuery, FormError> {
        if blank(&self.symbol) {
            return Err(FormError::SymbolRequired);
        }
        Ok(DatasetQuery {
            symbol: uppercase_symbol(&self.symbol),
            kind: self.kind,
        })
    }

    fn failure_message(&self, _: &ApiError) -> String {
        SYMBOL_CHECK_MESSAGE.to_string()
    }

    fn check_response(&self, request: &DatasetQuery, dataset: &FinancialDataset) -> Result<(), String> {
        match dataset.entry(&request.symbol) {
            Some(DatasetEntry::Profile(_) | DatasetEntry::Statement(_)) => Ok(()),
            Some(DatasetEntry::Error { .. }) | None => Err(SYMBOL_CHECK_MESSAGE.to_string()),
        }
    }
}

/// Daily prices for one ticker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceForm {
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
}

impl PriceForm {
    pub fn with_defaults(today: NaiveDate) -> Self {
        let end = yesterday(today);
        Self {
            symbol: "GOOG".to_string(),
            start_date: format_date(years_ago(end, 1)),
            end_date: format_date(end),
        }
    }
}

impl Form for PriceForm {
    type Request = PriceQuery;
    type Response = HistoricalPriceTable;

    fn validate(&self) -> Result<PriceQuery, FormError> {
        if blank(&self.symbol) || blank(&self.start_date) || blank(&self.end_date) {
            return Err(FormError::SymbolAndDatesRequired);
        }
        Ok(PriceQuery {
            symbol: uppercase_symbol(&self.symbol),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
        })
    }

    fn failure_message(&self, _: &ApiError) -> String {
        SYMBOL_CHECK_MESSAGE.to_string()
    }

    fn check_response(&self, _: &PriceQuery, table: &HistoricalPriceTable) -> Result<(), String> {
        match table {
            HistoricalPriceTable::Error { .. } => Err(SYMBOL_CHECK_MESSAGE.to_string()),
            HistoricalPriceTable::Dates(dates) if dates.is_empty() => {
                Err(SYMBOL_CHECK_MESSAGE.to_string())
            }
            HistoricalPriceTable::Dates(_) => Ok(()),
        }
    }
}
