//! Response handling shared by all gateways

use crate::error::{ApiError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use suite_core::CoreError;
use tracing::{debug, warn};

/// Which ad-hoc error bodies an endpoint may send besides validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorBody {
    /// Only `{detail: [...]}`
    Validation,
    /// `{detail: [...]}` or `{error: "..."}`
    ValidationOrError,
}

/// One segment of a validation error location
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Name(String),
    Index(serde_json::Number),
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single entry of a validation error body
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationDetail {
    pub loc: Vec<LocSegment>,
    pub msg: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl fmt::Display for ValidationDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc = self
            .loc
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        write!(f, "{loc}: {}", self.msg)
    }
}

#[derive(Debug, Deserialize)]
struct ValidationBody {
    detail: Vec<ValidationDetail>,
}

/// Build the HTTP client used by a gateway
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("analysis-suite/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ApiError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Join a base URL and an absolute path without doubling slashes
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// User-facing message for a non-success response body
pub fn error_message(status: StatusCode, body: &str, accepts: ErrorBody) -> String {
    let reason = status.canonical_reason().unwrap_or("(No status text)");
    let base = format!("API Error: {} - {reason}.", status.as_u16());

    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return format!(
            "{base} Additionally, the error response body was not in the expected JSON format."
        );
    };

    if let Ok(validation) = ValidationBody::deserialize(&json) {
        if !validation.detail.is_empty() {
            return validation
                .detail
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
        }
    }

    if accepts == ErrorBody::ValidationOrError {
        if let Some(error) = json.get("error").and_then(Value::as_str) {
            return format!("API Error: {error}");
        }
    }

    format!(
        "{base} The server returned an error, but it was not in the expected detailed JSON format."
    )
}

/// Turn a response into a typed body or a gateway error
pub async fn handle_response<T: DeserializeOwned>(
    response: Response,
    accepts: ErrorBody,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_message(status, &body, accepts);
        warn!(status = status.as_u16(), %message, "service returned an error");
        return Err(ApiError::RequestFailed {
            status: status.as_u16(),
            message,
        });
    }

    debug!(status = status.as_u16(), bytes = body.len(), "service response received");
    parse_body(&body)
}

/// Decode a success body; text that is not JSON and JSON of the wrong shape fail differently
pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: Value = serde_json::from_str(body).map_err(ApiError::MalformedResponse)?;
    T::deserialize(value)
        .map_err(|err| ApiError::UnexpectedShape(CoreError::InvalidPayload(err.to_string())))
}
