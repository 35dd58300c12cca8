//! Application-level configuration

use serde::{Deserialize, Serialize};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse a format name, falling back to `Pretty` for anything unknown
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "analysis-suite".to_string(),
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Build a config from `SUITE_ENV` and `SUITE_LOG_FORMAT`, defaulting the rest
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(environment) = std::env::var("SUITE_ENV") {
            config.environment = environment;
        }
        if let Ok(format) = std::env::var("SUITE_LOG_FORMAT") {
            config.log_format = LogFormat::parse(&format);
        }
        config
    }

    /// Default tracing filter for this environment
    pub fn default_log_filter(&self) -> &'static str {
        if self.environment == "production" {
            "warn,suite_cli=info"
        } else {
            "info"
        }
    }
}
