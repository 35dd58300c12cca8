//! CSV and spreadsheet export of normalized tables

use crate::error::{CoreError, Result};
use crate::model::DataKind;
use crate::table::{Cell, Normalized, NormalizedTable};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Narrowest spreadsheet column, in characters
pub const MIN_COLUMN_WIDTH: usize = 10;

/// Longest sheet name we emit
pub const MAX_SHEET_NAME: usize = 30;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "CSV",
            Self::Xlsx => "Excel",
        })
    }
}

/// Encode as comma separated text with every field quoted
pub fn encode_csv(table: &NormalizedTable) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(Cell::raw))?;
    }

    writer
        .into_inner()
        .map_err(|err| CoreError::Io(err.into_error()))
}

/// Sheet name for a data kind: whitespace runs become `_`, capped at 30 characters
pub fn sheet_name(kind: DataKind) -> String {
    kind.label()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect()
}

/// Width per column: longest raw cell text, never below [`MIN_COLUMN_WIDTH`]
pub fn column_widths(table: &NormalizedTable) -> Vec<usize> {
    table
        .headers()
        .iter()
        .enumerate()
        .map(|(index, header)| {
            table
                .column(index)
                .map(|cell| cell.raw().chars().count())
                .chain(std::iter::once(header.chars().count()))
                .fold(MIN_COLUMN_WIDTH, usize::max)
        })
        .collect()
}

fn column_index(index: usize) -> Result<u16> {
    u16::try_from(index)
        .map_err(|_| CoreError::InvalidPayload(format!("too many columns for a sheet: {index}")))
}

fn row_index(index: usize) -> Result<u32> {
    u32::try_from(index)
        .map_err(|_| CoreError::InvalidPayload(format!("too many rows for a sheet: {index}")))
}

/// Encode as a single-sheet xlsx workbook
pub fn encode_xlsx(table: &NormalizedTable, kind: DataKind) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(kind))?;

    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string(0, column_index(col)?, header)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let sheet_row = row_index(r + 1)?;
        for (col, cell) in row.iter().enumerate() {
            let sheet_col = column_index(col)?;
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(sheet_row, sheet_col, text)?;
                }
                Cell::Number(number) => {
                    worksheet.write_number(sheet_row, sheet_col, *number)?;
                }
                Cell::Empty => {}
            }
        }
    }

    for (col, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(column_index(col)?, width as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// File name used for an export: `<SYMBOL>_historical_prices.csv`, `<SYMBOL>_Balance_Sheet.xlsx`, ...
pub fn export_file_name(symbol: &str, kind: DataKind, format: ExportFormat) -> String {
    let symbol: String = symbol
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    let stem = match kind {
        DataKind::HistoricalPrices => "historical_prices".to_string(),
        other => other.label().split_whitespace().collect::<Vec<_>>().join("_"),
    };
    format!("{symbol}_{stem}.{}", format.extension())
}

/// Writes encoded tables into an output directory
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Encode and write a normalized outcome, returning the written path
    ///
    /// Error variants abort before anything is encoded.
    pub fn export(
        &self,
        normalized: &Normalized,
        format: ExportFormat,
        kind: DataKind,
        symbol: &str,
    ) -> Result<PathBuf> {
        let table = match normalized {
            Normalized::Table(table) => table,
            Normalized::Error(table) => {
                let message = table.error_message().unwrap_or("Unknown reason");
                warn!(%kind, symbol, message, "export aborted on error payload");
                return Err(CoreError::ExportAborted(format!(
                    "Cannot export {format}: API Error - {message}"
                )));
            }
            Normalized::NoData(reason) => {
                return Err(CoreError::NothingToExport(reason.notice()));
            }
        };

        let bytes = match format {
            ExportFormat::Csv => encode_csv(table)?,
            ExportFormat::Xlsx => encode_xlsx(table, kind)?,
        };

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self
            .output_dir
            .join(export_file_name(symbol, kind, format));
        std::fs::write(&path, &bytes)?;

        info!(path = %path.display(), bytes = bytes.len(), "exported {}", format);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::NoDataReason;
    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
    use proptest::prelude::*;
    use std::io::Cursor;

    fn sample() -> NormalizedTable {
        NormalizedTable::new(
            vec!["Property".to_string(), "Value".to_string()],
            vec![
                vec![Cell::from("Market Cap"), Cell::Number(3e9)],
                vec![Cell::from("Quote"), Cell::from(r#"He said, "hi""#)],
                vec![Cell::from("Beta"), Cell::Empty],
            ],
        )
        .unwrap()
    }

    fn read_back(bytes: &[u8]) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes)
            .records()
            .map(|record| record.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_csv_quotes_every_field() {
        let bytes = encode_csv(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "\"Property\",\"Value\"\n\
             \"Market Cap\",\"3000000000\"\n\
             \"Quote\",\"He said, \"\"hi\"\"\"\n\
             \"Beta\",\"\"\n"
        );
    }

    #[test]
    fn test_csv_round_trip_with_comma_and_quote() {
        let bytes = encode_csv(&sample()).unwrap();
        let records = read_back(&bytes);
        assert_eq!(records[0], vec!["Property", "Value"]);
        assert_eq!(records[2], vec!["Quote", r#"He said, "hi""#]);
    }

    fn cell_strategy() -> impl Strategy<Value = Cell> {
        prop_oneof![
            any::<String>().prop_map(Cell::Text),
            (-1e12f64..1e12).prop_map(Cell::Number),
            Just(Cell::Empty),
        ]
    }

    proptest! {
        #[test]
        fn prop_csv_round_trip(
            (headers, rows) in (1usize..5).prop_flat_map(|n| (
                proptest::collection::vec(any::<String>(), n),
                proptest::collection::vec(proptest::collection::vec(cell_strategy(), n), 0..6),
            ))
        ) {
            let table = NormalizedTable::new(headers.clone(), rows.clone()).unwrap();
            let records = read_back(&encode_csv(&table).unwrap());

            prop_assert_eq!(records.len(), rows.len() + 1);
            prop_assert_eq!(&records[0], &headers);
            for (record, row) in records[1..].iter().zip(&rows) {
                let expected: Vec<String> = row.iter().map(Cell::raw).collect();
                prop_assert_eq!(record, &expected);
            }
        }
    }

    #[test]
    fn test_sheet_names() {
        assert_eq!(sheet_name(DataKind::CompanyProfile), "Company_Profile");
        assert_eq!(
            sheet_name(DataKind::QuarterlyIncomeStatement),
            "Quarterly_Income_Statement"
        );
        for kind in DataKind::FINANCIALS {
            assert!(sheet_name(kind).chars().count() <= MAX_SHEET_NAME);
        }
    }

    #[test]
    fn test_column_widths_have_minimum() {
        assert_eq!(column_widths(&sample()), vec![10, 13]);
    }

    #[test]
    fn test_xlsx_contains_sheet_and_cells() {
        let bytes = encode_xlsx(&sample(), DataKind::CompanyProfile).unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Company_Profile".to_string()]);

        let range = workbook.worksheet_range("Company_Profile").unwrap();
        assert_eq!(range.get_size(), (4, 2));
        assert_eq!(
            range.get_value((0, 0)),
            Some(&Data::String("Property".to_string()))
        );
        assert_eq!(range.get_value((1, 1)), Some(&Data::Float(3e9)));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            export_file_name("GOOG", DataKind::HistoricalPrices, ExportFormat::Csv),
            "GOOG_historical_prices.csv"
        );
        assert_eq!(
            export_file_name("aapl", DataKind::CashFlowStatement, ExportFormat::Xlsx),
            "aapl_Cash_Flow_Statement.xlsx"
        );
        assert_eq!(
            export_file_name("A/B", DataKind::BalanceSheet, ExportFormat::Csv),
            "A_B_Balance_Sheet.csv"
        );
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path().join("exports"));
        let path = exporter
            .export(
                &Normalized::Table(sample()),
                ExportFormat::Csv,
                DataKind::CompanyProfile,
                "AAPL",
            )
            .unwrap();

        assert_eq!(path.file_name().unwrap(), "AAPL_Company_Profile.csv");
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("\"Property\",\"Value\"\n"));
    }

    #[test]
    fn test_export_aborts_on_error_payload() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        let result = exporter.export(
            &Normalized::error("No data found, symbol may be delisted"),
            ExportFormat::Xlsx,
            DataKind::HistoricalPrices,
            "XYZ",
        );

        match result {
            Err(CoreError::ExportAborted(message)) => assert_eq!(
                message,
                "Cannot export Excel: API Error - No data found, symbol may be delisted"
            ),
            other => panic!("expected an aborted export, got {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_refuses_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let result = Exporter::new(dir.path()).export(
            &Normalized::NoData(NoDataReason::NoStatementData),
            ExportFormat::Csv,
            DataKind::IncomeStatement,
            "AAPL",
        );
        assert!(matches!(result, Err(CoreError::NothingToExport(_))));
    }
}
