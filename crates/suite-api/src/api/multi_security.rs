//! Performance statistics across several securities

use super::client::{ErrorBody, build_http_client, endpoint, handle_response};
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::gateway::Gateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const ANALYZE_PATH: &str = "/analyze";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSecurityRequest {
    /// Comma separated symbols
    pub symbols: String,
    pub start_date: String,
    pub end_date: String,
    pub risk_free_rate: f64,
}

impl MultiSecurityRequest {
    /// A missing rate is sent as `0.0`
    pub fn new(
        symbols: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        risk_free_rate: Option<f64>,
    ) -> Self {
        Self {
            symbols: symbols.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            risk_free_rate: risk_free_rate.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSecurityReport {
    pub html_report_ffn_url: Option<String>,
    pub input_price_data_csv_url: Option<String>,
    pub cumulative_returns_csv_url: Option<String>,
}

impl MultiSecurityReport {
    pub fn report_url(&self) -> Option<&str> {
        self.html_report_ffn_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Downloadable CSV links as `(label, url)`
    pub fn csv_links(&self) -> Vec<(&'static str, &str)> {
        [
            ("Input price data", self.input_price_data_csv_url.as_deref()),
            ("Cumulative returns", self.cumulative_returns_csv_url.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, url)| url.filter(|u| !u.is_empty()).map(|u| (label, u)))
        .collect()
    }
}

/// POST `/analyze` on the multi-security statistics service
#[derive(Debug, Clone)]
pub struct MultiSecurityGateway {
    client: Client,
    base_url: String,
}

impl MultiSecurityGateway {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.request_timeout)?,
            base_url: config.multi_security_url.clone(),
        })
    }
}

#[async_trait]
impl Gateway<MultiSecurityRequest> for MultiSecurityGateway {
    type Response = MultiSecurityReport;

    fn name(&self) -> &'static str {
        "multi-security"
    }

    #[instrument(skip(self, request), fields(symbols = %request.symbols))]
    async fn call(&self, request: &MultiSecurityRequest) -> Result<MultiSecurityReport> {
        let url = endpoint(&self.base_url, ANALYZE_PATH);
        debug!(%url, "requesting multi-security report");

        let response = self.client.post(&url).json(request).send().await?;

        handle_response(response, ErrorBody::Validation).await
    }
}
