//! Endpoint and timeout configuration for the service gateways

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_PORTFOLIO_URL: &str = "https://quantstats.hosting.tigzig.com";
pub const DEFAULT_MULTI_SECURITY_URL: &str = "https://ffn.hosting.tigzig.com";
pub const DEFAULT_TECHNICAL_URL: &str = "https://ta.hosting.tigzig.com";
pub const DEFAULT_FINANCIAL_URL: &str = "https://yfin.hosting.tigzig.com";

/// Report generation can take minutes upstream
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Base URLs of the four backing services plus the request timeout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Single security vs benchmark statistics
    pub portfolio_url: String,

    /// Multi-security performance statistics
    pub multi_security_url: String,

    /// Technical analysis reports
    pub technical_url: String,

    /// Company financials and price history
    pub financial_url: String,

    /// Applied to every request
    pub request_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            portfolio_url: DEFAULT_PORTFOLIO_URL.to_string(),
            multi_security_url: DEFAULT_MULTI_SECURITY_URL.to_string(),
            technical_url: DEFAULT_TECHNICAL_URL.to_string(),
            financial_url: DEFAULT_FINANCIAL_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Create a new configuration builder
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Apply `SUITE_*_URL` and `SUITE_TIMEOUT_SECS` from the environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = non_blank("SUITE_PORTFOLIO_URL") {
            self.portfolio_url = url;
        }
        if let Some(url) = non_blank("SUITE_MULTI_URL") {
            self.multi_security_url = url;
        }
        if let Some(url) = non_blank("SUITE_TECHNICAL_URL") {
            self.technical_url = url;
        }
        if let Some(url) = non_blank("SUITE_FINANCIAL_URL") {
            self.financial_url = url;
        }
        if let Some(secs) = non_blank("SUITE_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ApiError::Configuration(format!("SUITE_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            self.request_timeout = Duration::from_secs(secs);
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("portfolio_url", &self.portfolio_url),
            ("multi_security_url", &self.multi_security_url),
            ("technical_url", &self.technical_url),
            ("financial_url", &self.financial_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| ApiError::Configuration(format!("{name} is not a valid URL: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ApiError::Configuration(format!(
                    "{name} must use http or https, found {}",
                    url.scheme()
                )));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(ApiError::Configuration(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for ServiceConfig
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    portfolio_url: Option<String>,
    multi_security_url: Option<String>,
    technical_url: Option<String>,
    financial_url: Option<String>,
    request_timeout: Option<Duration>,
}

impl ServiceConfigBuilder {
    pub fn portfolio_url(mut self, url: impl Into<String>) -> Self {
        self.portfolio_url = Some(url.into());
        self
    }

    pub fn multi_security_url(mut self, url: impl Into<String>) -> Self {
        self.multi_security_url = Some(url.into());
        self
    }

    pub fn technical_url(mut self, url: impl Into<String>) -> Self {
        self.technical_url = Some(url.into());
        self
    }

    pub fn financial_url(mut self, url: impl Into<String>) -> Self {
        self.financial_url = Some(url.into());
        self
    }

    /// Point every service at the same host
    pub fn all_urls(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.portfolio_url(url.clone())
            .multi_security_url(url.clone())
            .technical_url(url.clone())
            .financial_url(url)
    }

    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServiceConfig> {
        let defaults = ServiceConfig::default();

        let config = ServiceConfig {
            portfolio_url: self.portfolio_url.unwrap_or(defaults.portfolio_url),
            multi_security_url: self.multi_security_url.unwrap_or(defaults.multi_security_url),
            technical_url: self.technical_url.unwrap_or(defaults.technical_url),
            financial_url: self.financial_url.unwrap_or(defaults.financial_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}
