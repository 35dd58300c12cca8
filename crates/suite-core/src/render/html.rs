//! HTML fragment renderer

use super::{RenderFormat, TableRenderer, display_cell};
use crate::error::Result;
use crate::table::{NoDataReason, NormalizedTable};
use minijinja::{AutoEscape, Environment, context};

const TABLE_TEMPLATE: &str = r#"<div class="data-table" style="overflow: auto; max-height: 340px;">
<table>
<thead>
<tr>{% for header in headers %}<th scope="col" style="{{ styles[loop.index0] }}">{{ header }}</th>{% endfor %}</tr>
</thead>
<tbody>
{% for row in rows %}<tr>{% for cell in row %}<td style="{{ styles[loop.index0] }}">{{ cell }}</td>{% endfor %}</tr>
{% endfor %}</tbody>
</table>
</div>"#;

const NOTICE_TEMPLATE: &str = r#"<div class="notice notice-{{ kind }}">{% if title %}<p class="notice-title">{{ title }}</p>{% endif %}<p>{{ message }}</p></div>"#;

const PINNED_STYLE: &str =
    "text-align: left; position: sticky; left: 0; z-index: 1; background: #fff; white-space: nowrap;";
const NUMERIC_STYLE: &str = "text-align: right; white-space: nowrap;";
const TEXT_STYLE: &str = "text-align: left; white-space: nowrap;";

/// Renders scrollable HTML tables with a sticky first column
///
/// Every interpolated value is HTML-escaped.
pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        Self { env }
    }

    fn notice(&self, kind: &str, title: Option<&str>, message: &str) -> Result<String> {
        Ok(self
            .env
            .render_str(NOTICE_TEMPLATE, context! { kind, title, message })?)
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer for HtmlRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Html
    }

    fn render_table(&self, table: &NormalizedTable) -> Result<String> {
        let styles: Vec<&str> = (0..table.column_count())
            .map(|index| {
                if index == 0 {
                    PINNED_STYLE
                } else if table.is_numeric_column(index) {
                    NUMERIC_STYLE
                } else {
                    TEXT_STYLE
                }
            })
            .collect();
        let rows: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| row.iter().map(display_cell).collect())
            .collect();

        Ok(self.env.render_str(
            TABLE_TEMPLATE,
            context! {
                headers => table.headers(),
                rows,
                styles,
            },
        )?)
    }

    fn render_empty(&self, reason: &NoDataReason) -> Result<String> {
        self.notice("empty", None, &reason.notice())
    }

    fn render_error(&self, message: &str) -> Result<String> {
        self.notice("error", Some("Error"), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, Normalized};

    #[test]
    fn test_table_has_sticky_first_column() {
        let table = NormalizedTable::new(
            vec!["Property".to_string(), "Value".to_string()],
            vec![vec![Cell::from("Market Cap"), Cell::Number(3e9)]],
        )
        .unwrap();

        let html = HtmlRenderer::new().render_table(&table).unwrap();
        assert!(html.contains("position: sticky"));
        assert!(html.contains("background: #fff"));
        assert!(html.contains("<th scope=\"col\" style=\"text-align: right;"));
        assert!(html.contains(">3,000,000,000</td>"));
        assert!(html.contains(">Market Cap</td>"));
    }

    #[test]
    fn test_error_text_is_escaped_verbatim() {
        let html = HtmlRenderer::new()
            .render(&Normalized::error("<b>bad</b> & worse"))
            .unwrap();
        assert!(html.contains("notice-error"));
        assert!(html.contains("&lt;b&gt;bad&lt;"));
        assert!(html.contains("&amp; worse"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_empty_notice() {
        let html = HtmlRenderer::new()
            .render_empty(&NoDataReason::NoProfileData)
            .unwrap();
        assert!(html.contains("notice-empty"));
        assert!(html.contains("No company profile information available."));
        assert!(!html.contains("notice-title"));
    }
}
