//! HTTP clients for the analysis services

pub mod client;
pub mod financial;
pub mod multi_security;
pub mod portfolio;
pub mod technical;

pub use client::{ErrorBody, LocSegment, ValidationDetail};
pub use financial::{DatasetQuery, FinancialDataGateway, PriceQuery};
pub use multi_security::{MultiSecurityGateway, MultiSecurityReport, MultiSecurityRequest};
pub use portfolio::{PortfolioGateway, PortfolioReport, PortfolioRequest};
pub use technical::{TechnicalGateway, TechnicalReport, TechnicalRequest};
