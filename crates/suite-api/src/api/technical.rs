//! AI-assisted technical analysis reports

use super::client::{ErrorBody, build_http_client, endpoint, handle_response};
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::gateway::Gateway;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const ANALYSIS_PATH: &str = "/api/technical-analysis";

/// Daily and weekly windows analysed for one ticker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalRequest {
    pub ticker: String,
    pub daily_start_date: String,
    pub daily_end_date: String,
    pub weekly_start_date: String,
    pub weekly_end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalReport {
    pub pdf_url: Option<String>,
    pub html_url: Option<String>,
}

impl TechnicalReport {
    pub fn report_url(&self) -> Option<&str> {
        self.html_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn pdf_url(&self) -> Option<&str> {
        self.pdf_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct TechnicalGateway {
    client: Client,
    base_url: String,
}

impl TechnicalGateway {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.request_timeout)?,
            base_url: config.technical_url.clone(),
        })
    }
}

#[async_trait]
impl Gateway<TechnicalRequest> for TechnicalGateway {
    type Response = TechnicalReport;

    fn name(&self) -> &'static str {
        "technical"
    }

    #[instrument(skip(self, request), fields(ticker = %request.ticker))]
    async fn call(&self, request: &TechnicalRequest) -> Result<TechnicalReport> {
        let url = endpoint(&self.base_url, ANALYSIS_PATH);
        debug!(%url, "requesting technical analysis");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        handle_response(response, ErrorBody::Validation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn request() -> TechnicalRequest {
        TechnicalRequest {
            ticker: "^GSPC".to_string(),
            daily_start_date: "2024-04-18".to_string(),
            daily_end_date: "2024-10-18".to_string(),
            weekly_start_date: "2021-10-18".to_string(),
            weekly_end_date: "2024-10-18".to_string(),
        }
    }

    #[tokio::test]
    async fn test_returns_both_links() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/technical-analysis")
                    .header("accept", "application/json")
                    .json_body(json!({
                        "ticker": "^GSPC",
                        "daily_start_date": "2024-04-18",
                        "daily_end_date": "2024-10-18",
                        "weekly_start_date": "2021-10-18",
                        "weekly_end_date": "2024-10-18"
                    }));
                then.status(200).json_body(json!({
                    "pdf_url": "https://reports.example/gspc.pdf",
                    "html_url": "https://reports.example/gspc.html"
                }));
            })
            .await;

        let config = ServiceConfig::builder()
            .technical_url(server.base_url())
            .build()
            .unwrap();
        let report = TechnicalGateway::new(&config)
            .unwrap()
            .call(&request())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(report.pdf_url(), Some("https://reports.example/gspc.pdf"));
        assert_eq!(report.report_url(), Some("https://reports.example/gspc.html"));
    }

    #[tokio::test]
    async fn test_json_error_without_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/technical-analysis");
                then.status(400).json_body(json!({"message": "bad ticker"}));
            })
            .await;

        let config = ServiceConfig::builder()
            .technical_url(server.base_url())
            .build()
            .unwrap();
        let err = TechnicalGateway::new(&config)
            .unwrap()
            .call(&request())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "API Error: 400 - Bad Request. The server returned an error, but it was not in the expected detailed JSON format."
        );
    }
}
