//! Core data shaping for the analysis suite
//!
//! Payloads returned by the analysis services are parsed into typed models,
//! normalized into [`NormalizedTable`]s, and from there either rendered for
//! display or encoded for export. Nothing in this crate touches the network.

pub mod error;
pub mod export;
pub mod model;
pub mod normalize;
pub mod render;
pub mod table;

pub use error::{CoreError, Result};
pub use export::{ExportFormat, Exporter};
pub use model::{DataKind, FinancialDataset, HistoricalPriceTable};
pub use normalize::{normalize_financials, normalize_officers, normalize_prices};
pub use render::{RenderFormat, RendererFactory, TableRenderer};
pub use table::{Cell, NoDataReason, Normalized, NormalizedTable};
