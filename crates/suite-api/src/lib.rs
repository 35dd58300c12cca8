//! Gateways to the analysis services
//!
//! Each backend capability has its own gateway:
//!
//! - [`PortfolioGateway`]: single security vs benchmark statistics report
//! - [`MultiSecurityGateway`]: statistics across several securities
//! - [`TechnicalGateway`]: technical analysis report (PDF and HTML)
//! - [`FinancialDataGateway`]: company profile, statements and price history
//!
//! All of them implement [`Gateway`], make exactly one request per call and
//! turn non-success responses into an [`ApiError`] carrying a readable message.
//!
//! # Example
//!
//! ```rust,ignore
//! use suite_api::{DatasetQuery, FinancialDataGateway, Gateway, ServiceConfig};
//! use suite_core::DataKind;
//!
//! let config = ServiceConfig::default().with_env_overrides()?;
//! let gateway = FinancialDataGateway::new(&config)?;
//! let dataset = gateway
//!     .call(&DatasetQuery { symbol: "AAPL".into(), kind: DataKind::BalanceSheet })
//!     .await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;

pub use api::{
    DatasetQuery, FinancialDataGateway, MultiSecurityGateway, MultiSecurityReport,
    MultiSecurityRequest, PortfolioGateway, PortfolioReport, PortfolioRequest, PriceQuery,
    TechnicalGateway, TechnicalReport, TechnicalRequest,
};
pub use config::ServiceConfig;
pub use error::{ApiError, Result};
pub use gateway::Gateway;
