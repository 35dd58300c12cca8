//! Terminal grid renderer

use super::{RenderFormat, TableRenderer, display_cell};
use crate::error::Result;
use crate::table::{NoDataReason, NormalizedTable};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

/// Border and padding a column adds on top of its content
const COLUMN_OVERHEAD: usize = 3;

/// Renders tables with comfy-table
///
/// When a width is set and the grid does not fit, value columns are split
/// into pages and the first column is repeated on every page, so row labels
/// stay visible the way a pinned column does when scrolling sideways.
#[derive(Debug, Clone, Default)]
pub struct TerminalRenderer {
    width: Option<u16>,
}

impl TerminalRenderer {
    pub fn new(width: Option<u16>) -> Self {
        Self { width }
    }

    /// Group value column indices into pages that fit the configured width
    fn pages(&self, widths: &[usize]) -> Vec<Vec<usize>> {
        let value_columns: Vec<usize> = (1..widths.len()).collect();
        let Some(limit) = self.width.map(usize::from) else {
            return vec![value_columns];
        };
        if value_columns.is_empty() {
            return vec![value_columns];
        }

        let pinned = widths[0] + COLUMN_OVERHEAD;
        let mut pages = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut used = pinned;
        for index in value_columns {
            let needed = widths[index] + COLUMN_OVERHEAD;
            if !current.is_empty() && used + needed > limit {
                pages.push(std::mem::take(&mut current));
                used = pinned;
            }
            current.push(index);
            used += needed;
        }
        if !current.is_empty() {
            pages.push(current);
        }
        pages
    }

    fn render_page(
        &self,
        table: &NormalizedTable,
        cells: &[Vec<String>],
        numeric: &[bool],
        page: &[usize],
    ) -> String {
        let columns: Vec<usize> = std::iter::once(0).chain(page.iter().copied()).collect();
        let align = |index: usize| {
            if index > 0 && numeric[index] {
                CellAlignment::Right
            } else {
                CellAlignment::Left
            }
        };

        let mut grid = Table::new();
        grid.load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Disabled);

        grid.set_header(columns.iter().map(|&index| {
            Cell::new(&table.headers()[index])
                .add_attribute(Attribute::Bold)
                .set_alignment(align(index))
        }));

        for row in cells {
            grid.add_row(
                columns
                    .iter()
                    .map(|&index| Cell::new(&row[index]).set_alignment(align(index))),
            );
        }

        grid.to_string()
    }
}

impl TableRenderer for TerminalRenderer {
    fn format(&self) -> RenderFormat {
        RenderFormat::Terminal
    }

    fn render_table(&self, table: &NormalizedTable) -> Result<String> {
        let cells: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| row.iter().map(display_cell).collect())
            .collect();
        let numeric: Vec<bool> = (0..table.column_count())
            .map(|index| table.is_numeric_column(index))
            .collect();
        let widths: Vec<usize> = table
            .headers()
            .iter()
            .enumerate()
            .map(|(index, header)| {
                cells
                    .iter()
                    .map(|row| row[index].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        if widths.is_empty() {
            return Ok(String::new());
        }

        Ok(self
            .pages(&widths)
            .iter()
            .map(|page| self.render_page(table, &cells, &numeric, page))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    fn render_empty(&self, reason: &NoDataReason) -> Result<String> {
        Ok(format!("ℹ {}", reason.notice()))
    }

    fn render_error(&self, message: &str) -> Result<String> {
        Ok(format!("❌ Error: {message}"))
    }
}
