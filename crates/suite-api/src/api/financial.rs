//! Company financials and historical prices
//!
//! One service answers both request shapes: per-ticker datasets (profile and
//! the four statements, each on its own path) and a date-keyed price history.

use super::client::{ErrorBody, build_http_client, endpoint, handle_response};
use crate::config::ServiceConfig;
use crate::error::{ApiError, Result};
use crate::gateway::Gateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use suite_core::{DataKind, FinancialDataset, HistoricalPriceTable};
use tracing::{debug, info, instrument};

const PRICES_PATH: &str = "/get-all-prices/";

/// Endpoint path for a per-ticker data kind
pub fn dataset_path(kind: DataKind) -> Option<&'static str> {
    match kind {
        DataKind::CompanyProfile => Some("/get-detailed-info/"),
        DataKind::IncomeStatement => Some("/excel/get-income-statement/"),
        DataKind::BalanceSheet => Some("/excel/get-balance-sheet/"),
        DataKind::QuarterlyIncomeStatement => Some("/excel/get-quarterly-income-statement/"),
        DataKind::CashFlowStatement => Some("/excel/get-cash-flow/"),
        DataKind::HistoricalPrices => None,
    }
}

/// Profile or statement request for one ticker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetQuery {
    pub symbol: String,
    pub kind: DataKind,
}

/// Daily price history request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuery {
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
}

fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidRequest(message.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct FinancialDataGateway {
    client: Client,
    base_url: String,
}

impl FinancialDataGateway {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.request_timeout)?,
            base_url: config.financial_url.clone(),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = endpoint(&self.base_url, path);
        debug!(%url, ?query, "requesting financial data");

        let response = self.client.get(&url).query(query).send().await?;
        handle_response(response, ErrorBody::ValidationOrError).await
    }

    /// Fetch a profile or statement dataset
    #[instrument(skip(self, query), fields(symbol = %query.symbol, kind = %query.kind))]
    pub async fn fetch_dataset(&self, query: &DatasetQuery) -> Result<FinancialDataset> {
        require(&query.symbol, "Ticker symbol is required.")?;
        let path = dataset_path(query.kind).ok_or_else(|| {
            ApiError::InvalidRequest("Use the price history query for historical prices.".to_string())
        })?;

        let body = self.get_json(path, &[("tickers", query.symbol.as_str())]).await?;
        let dataset = FinancialDataset::from_value(query.kind, body)?;

        info!(entries = dataset.len(), "dataset received");
        Ok(dataset)
    }

    /// Fetch the date-keyed price history
    #[instrument(skip(self, query), fields(symbol = %query.symbol))]
    pub async fn fetch_prices(&self, query: &PriceQuery) -> Result<HistoricalPriceTable> {
        require(&query.symbol, "Ticker symbol is required for historical prices.")?;
        require(&query.start_date, "Start date is required for historical prices.")?;
        require(&query.end_date, "End date is required for historical prices.")?;

        let body = self
            .get_json(
                PRICES_PATH,
                &[
                    ("tickers", query.symbol.as_str()),
                    ("start_date", query.start_date.as_str()),
                    ("end_date", query.end_date.as_str()),
                ],
            )
            .await?;
        let table = HistoricalPriceTable::from_value(body)?;

        if let HistoricalPriceTable::Dates(dates) = &table {
            info!(dates = dates.len(), "price history received");
        }
        Ok(table)
    }
}

#[async_trait]
impl Gateway<DatasetQuery> for FinancialDataGateway {
    type Response = FinancialDataset;

    fn name(&self) -> &'static str {
        "financial-data"
    }

    async fn call(&self, request: &DatasetQuery) -> Result<FinancialDataset> {
        self.fetch_dataset(request).await
    }
}

#[async_trait]
impl Gateway<PriceQuery> for FinancialDataGateway {
    type Response = HistoricalPriceTable;

    fn name(&self) -> &'static str {
        "price-history"
    }

    async fn call(&self, request: &PriceQuery) -> Result<HistoricalPriceTable> {
        self.fetch_prices(request).await
    }
}
