//! Rendering of normalized tables for display
//!
//! Renderers only ever see [`Normalized`] values. The three visual states
//! (data table, empty notice, error notice) map onto the three trait methods.

mod html;
mod terminal;

pub use html::HtmlRenderer;
pub use terminal::TerminalRenderer;

use crate::error::Result;
use crate::table::{Cell, NoDataReason, Normalized, NormalizedTable};
use serde::{Deserialize, Serialize};

/// Output format for rendered tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Terminal,
    Html,
}

pub trait TableRenderer: Send + Sync {
    fn format(&self) -> RenderFormat;
    fn render_table(&self, table: &NormalizedTable) -> Result<String>;
    fn render_empty(&self, reason: &NoDataReason) -> Result<String>;
    fn render_error(&self, message: &str) -> Result<String>;

    /// Render whichever state the normalizer produced
    fn render(&self, normalized: &Normalized) -> Result<String> {
        match normalized {
            Normalized::Table(table) => self.render_table(table),
            Normalized::NoData(reason) => self.render_empty(reason),
            Normalized::Error(table) => {
                self.render_error(table.error_message().unwrap_or("Unknown error"))
            }
        }
    }
}

pub struct RendererFactory;

impl RendererFactory {
    /// Create a renderer; `width` only affects terminal output
    pub fn create(format: RenderFormat, width: Option<u16>) -> Box<dyn TableRenderer> {
        match format {
            RenderFormat::Terminal => Box::new(TerminalRenderer::new(width)),
            RenderFormat::Html => Box::new(HtmlRenderer::new()),
        }
    }
}

/// Display text of a cell; numbers get thousand separators
pub fn display_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(number) => format_number(*number),
        other => other.raw(),
    }
}

/// Format with thousand separators and at most three fraction digits
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }

    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    if !frac_part.is_empty() {
        result.push('.');
        result.push_str(frac_part);
    }

    if n < 0.0 && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{result}")
    } else {
        result
    }
}
