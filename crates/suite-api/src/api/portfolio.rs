//! Single security versus benchmark statistics

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
pub struct PortfolioRequest {
    pub symbols: String,
    pub start_date: String,
    pub end_date: String,
    /// Omitted from the query when blank
    pub benchmark: Option<String>,
    pub risk_free_rate: Option<f64>,
}

impl PortfolioRequest {
    /// Query pairs in wire order; blank optional parameters are left out
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("symbols", self.symbols.clone()),
            ("start_date", self.start_date.clone()),
            ("end_date", self.end_date.clone()),
        ];

        if let Some(benchmark) = self
            .benchmark
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
        {
            pairs.push(("benchmark", benchmark.to_string()));
        }
        if let Some(rate) = self.risk_free_rate {
            pairs.push(("risk_free_rate", rate.to_string()));
        }

        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioReport {
    #[serde(default)]
    pub html_url: Option<String>,
}

impl PortfolioReport {
    /// Report link, if the service supplied a non-empty one
    pub fn report_url(&self) -> Option<&str> {
        self.html_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// GET `/analyze` on the portfolio statistics service
#[derive(Debug, Clone)]
pub struct PortfolioGateway {
    client: Client,
    base_url: String,
}

impl PortfolioGateway {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.request_timeout)?,
            base_url: config.portfolio_url.clone(),
        })
    }
}

#[async_trait]
impl Gateway<PortfolioRequest> for PortfolioGateway {
    type Response = PortfolioReport;

    fn name(&self) -> &'static str {
        "portfolio"
    }

    #[instrument(skip(self, request), fields(symbols = %request.symbols))]
    async fn call(&self, request: &PortfolioRequest) -> Result<PortfolioReport> {
        let url = endpoint(&self.base_url, ANALYZE_PATH);
        debug!(%url, "requesting portfolio report");

        let response = self
            .client
            .get(&url)
            .query(&request.query_pairs())
            .send()
            .await?;

        handle_response(response, ErrorBody::Validation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use httpmock::prelude::*;
    use serde_json::json;

    fn request() -> PortfolioRequest {
        PortfolioRequest {
            symbols: "^NSEI".to_string(),
            start_date: "2015-01-01".to_string(),
            end_date: "2024-12-31".to_string(),
            benchmark: Some("^GSPC".to_string()),
            risk_free_rate: Some(5.0),
        }
    }

    fn gateway(server: &MockServer) -> PortfolioGateway {
        let config = ServiceConfig::builder()
            .portfolio_url(server.base_url())
            .build()
            .unwrap();
        PortfolioGateway::new(&config).unwrap()
    }

    #[test]
    fn test_query_omits_blank_optionals() {
        let mut request = request();
        request.benchmark = Some("  ".to_string());
        request.risk_free_rate = None;

        let keys: Vec<_> = request.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["symbols", "start_date", "end_date"]);
    }

    #[test]
    fn test_query_formats_rate() {
        let pairs = request().query_pairs();
        assert!(pairs.contains(&("benchmark", "^GSPC".to_string())));
        assert!(pairs.contains(&("risk_free_rate", "5".to_string())));
    }

    #[tokio::test]
    async fn test_report_url_returned() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/analyze")
                    .query_param("symbols", "^NSEI")
                    .query_param("benchmark", "^GSPC")
                    .query_param("risk_free_rate", "5");
                then.status(200)
                    .json_body(json!({"html_url": "https://reports.example/nsei.html"}));
            })
            .await;

        let report = gateway(&server).call(&request()).await.unwrap();
        mock.assert_async().await;
        assert_eq!(report.report_url(), Some("https://reports.example/nsei.html"));
    }

    #[tokio::test]
    async fn test_validation_error_is_joined() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/analyze");
                then.status(422).json_body(json!({
                    "detail": [{"loc": ["body", "symbols"], "msg": "field required", "type": "value_error"}]
                }));
            })
            .await;

        let err = gateway(&server).call(&request()).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "body -> symbols: field required");
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/analyze");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let err = gateway(&server).call(&request()).await.unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_url_is_not_an_error_here() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/analyze");
                then.status(200).json_body(json!({}));
            })
            .await;

        let report = gateway(&server).call(&request()).await.unwrap();
        assert_eq!(report.report_url(), None);
    }
}
