//! Results pane: rendered tables, report links and export files

use std::path::PathBuf;
use suite_api::{MultiSecurityReport, TechnicalReport};
use suite_core::{
    CoreError, DataKind, ExportFormat, Exporter, Normalized, RenderFormat, RendererFactory,
};
use tracing::warn;

/// How a data tab shows and saves its table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub format: RenderFormat,
    pub width: Option<u16>,
    pub exports: Vec<ExportFormat>,
    pub out_dir: PathBuf,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: RenderFormat::Terminal,
            width: None,
            exports: Vec::new(),
            out_dir: PathBuf::from("."),
        }
    }
}

/// Outcome of one export request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportNotice {
    Saved(PathBuf),
    /// Shown to the user as an alert; nothing was written
    Alert(String),
}

impl ExportNotice {
    pub fn message(&self) -> String {
        match self {
            Self::Saved(path) => format!("Saved {}", path.display()),
            Self::Alert(message) => format!("⚠ {message}"),
        }
    }
}

/// Render a normalized result in the chosen format
pub fn render(normalized: &Normalized, options: &OutputOptions) -> anyhow::Result<String> {
    let renderer = RendererFactory::create(options.format, options.width);
    Ok(renderer.render(normalized)?)
}

/// Run every requested export; aborted exports become alerts
pub fn export(
    normalized: &Normalized,
    kind: DataKind,
    symbol: &str,
    options: &OutputOptions,
) -> anyhow::Result<Vec<ExportNotice>> {
    let exporter = Exporter::new(&options.out_dir);
    let mut notices = Vec::with_capacity(options.exports.len());

    for &format in &options.exports {
        match exporter.export(normalized, format, kind, symbol) {
            Ok(path) => notices.push(ExportNotice::Saved(path)),
            Err(err @ (CoreError::ExportAborted(_) | CoreError::NothingToExport(_))) => {
                warn!(%format, error = %err, "export skipped");
                notices.push(ExportNotice::Alert(err.to_string()));
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(notices)
}

pub fn portfolio_links(symbols: &str, url: &str) -> String {
    format!("QuantStats Report for {}\n  {url}", symbols.to_uppercase())
}

pub fn multi_security_links(symbols: &str, report: &MultiSecurityReport) -> String {
    let mut out = format!("FFN Stats Report for {}", symbols.to_uppercase());
    if let Some(url) = report.report_url() {
        out.push_str(&format!("\n  Report: {url}"));
    }
    for (label, url) in report.csv_links() {
        out.push_str(&format!("\n  {label} (CSV): {url}"));
    }
    out
}

pub fn technical_links(ticker: &str, report: &TechnicalReport) -> String {
    let mut out = format!("Technical Analysis Report for {}", ticker.to_uppercase());
    if let Some(url) = report.report_url() {
        out.push_str(&format!("\n  HTML: {url}"));
    }
    if let Some(url) = report.pdf_url() {
        out.push_str(&format!("\n  PDF: {url}"));
    }
    out
}
