//! Command-line interface for the portfolio analysis suite
//!
//! # Usage
//!
//! ```bash
//! suite portfolio --symbols ^NSEI --benchmark ^GSPC
//! suite financials --symbol aapl --kind balance-sheet --xlsx --out-dir exports
//! suite prices --symbol GOOG --start 2024-01-01 --csv
//! ```

use anyhow::bail;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use suite_api::{
    FinancialDataGateway, MultiSecurityGateway, PortfolioGateway, ServiceConfig, TechnicalGateway,
};
use suite_cli::dates::today;
use suite_cli::docs::render_docs;
use suite_cli::forms::{
    FinancialsForm, MultiSecurityForm, PortfolioForm, PriceForm, TechnicalForm, uppercase_symbol,
};
use suite_cli::output::{self, OutputOptions};
use suite_cli::{Tab, TabState};
use suite_core::{
    DataKind, ExportFormat, RenderFormat, normalize_financials, normalize_officers,
    normalize_prices,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "suite")]
#[command(about = "Portfolio analysis suite: statistics reports, financials and price data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Security vs benchmark statistics report (QuantStats)
    Portfolio {
        #[arg(long)]
        symbols: Option<String>,
        /// Pass an empty value to omit the benchmark
        #[arg(long)]
        benchmark: Option<String>,
        #[command(flatten)]
        window: Window,
        /// Risk-free rate in percent; empty to omit
        #[arg(long)]
        rate: Option<String>,
    },
    /// Statistics across several securities (FFN)
    Multi {
        /// Comma separated symbols
        #[arg(long)]
        symbols: Option<String>,
        #[command(flatten)]
        window: Window,
        #[arg(long)]
        rate: Option<String>,
    },
    /// AI technical analysis report
    Technical {
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        daily_start: Option<String>,
        #[arg(long)]
        daily_end: Option<String>,
        #[arg(long)]
        weekly_start: Option<String>,
        #[arg(long)]
        weekly_end: Option<String>,
    },
    /// Company profile or financial statement
    Financials {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long, value_enum, default_value_t = KindArg::Profile)]
        kind: KindArg,
        /// Also show the company officers table
        #[arg(long)]
        officers: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Daily historical prices
    Prices {
        #[arg(long)]
        symbol: Option<String>,
        #[command(flatten)]
        window: Window,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Documentation and source links
    Docs,
}

#[derive(Args, Debug)]
struct Window {
    /// YYYY-MM-DD
    #[arg(long)]
    start: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    end: Option<String>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write a CSV export
    #[arg(long)]
    csv: bool,
    /// Write an Excel export
    #[arg(long)]
    xlsx: bool,
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    #[arg(long, value_enum, default_value_t = FormatArg::Terminal)]
    format: FormatArg,
    /// Terminal width used to page wide tables
    #[arg(long)]
    width: Option<u16>,
}

impl From<OutputArgs> for OutputOptions {
    fn from(args: OutputArgs) -> Self {
        let exports = [(args.csv, ExportFormat::Csv), (args.xlsx, ExportFormat::Xlsx)]
            .into_iter()
            .filter_map(|(wanted, format)| wanted.then_some(format))
            .collect();
        Self {
            format: match args.format {
                FormatArg::Terminal => RenderFormat::Terminal,
                FormatArg::Html => RenderFormat::Html,
            },
            width: args.width,
            exports,
            out_dir: args.out_dir,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Terminal,
    Html,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Profile,
    IncomeStatement,
    BalanceSheet,
    QuarterlyIncomeStatement,
    CashFlow,
}

impl From<KindArg> for DataKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Profile => DataKind::CompanyProfile,
            KindArg::IncomeStatement => DataKind::IncomeStatement,
            KindArg::BalanceSheet => DataKind::BalanceSheet,
            KindArg::QuarterlyIncomeStatement => DataKind::QuarterlyIncomeStatement,
            KindArg::CashFlow => DataKind::CashFlowStatement,
        }
    }
}

fn set(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Success value of a settled tab, or its failure message as the error
fn settled<T>(state: &TabState<T>) -> anyhow::Result<&T> {
    match state {
        TabState::Success(value) => Ok(value),
        TabState::Failure(message) => bail!("{message}"),
        TabState::Idle | TabState::Loading => bail!("request did not complete"),
    }
}

fn print_export_notices(notices: &[output::ExportNotice]) {
    for notice in notices {
        eprintln!("{}", notice.message());
    }
}

async fn run(command: Command, services: &ServiceConfig) -> anyhow::Result<()> {
    match command {
        Command::Portfolio {
            symbols,
            benchmark,
            window,
            rate,
        } => {
            let mut form = PortfolioForm::with_defaults(today());
            set(&mut form.symbols, symbols);
            set(&mut form.benchmark, benchmark);
            set(&mut form.start_date, window.start);
            set(&mut form.end_date, window.end);
            set(&mut form.risk_free_rate, rate);

            let mut tab = Tab::new("portfolio", PortfolioGateway::new(services)?, form);
            tab.submit().await;
            let report = settled(tab.state())?;
            if let Some(url) = report.report_url() {
                println!("{}", output::portfolio_links(&tab.form().symbols, url));
            }
        }
        Command::Multi {
            symbols,
            window,
            rate,
        } => {
            let mut form = MultiSecurityForm::with_defaults(today());
            set(&mut form.symbols, symbols);
            set(&mut form.start_date, window.start);
            set(&mut form.end_date, window.end);
            set(&mut form.risk_free_rate, rate);

            let mut tab = Tab::new("multi-security", MultiSecurityGateway::new(services)?, form);
            tab.submit().await;
            let report = settled(tab.state())?;
            println!("{}", output::multi_security_links(&tab.form().symbols, report));
        }
        Command::Technical {
            ticker,
            daily_start,
            daily_end,
            weekly_start,
            weekly_end,
        } => {
            let mut form = TechnicalForm::with_defaults(today());
            set(&mut form.ticker, ticker);
            set(&mut form.daily_start_date, daily_start);
            set(&mut form.daily_end_date, daily_end);
            set(&mut form.weekly_start_date, weekly_start);
            set(&mut form.weekly_end_date, weekly_end);

            let mut tab = Tab::new("technical", TechnicalGateway::new(services)?, form);
            tab.submit().await;
            let report = settled(tab.state())?;
            println!("{}", output::technical_links(&tab.form().ticker, report));
        }
        Command::Financials {
            symbol,
            kind,
            officers,
            output: output_args,
        } => {
            let kind = DataKind::from(kind);
            let mut form = FinancialsForm {
                kind,
                ..FinancialsForm::default()
            };
            set(&mut form.symbol, symbol);

            let mut tab = Tab::new("financials", FinancialDataGateway::new(services)?, form);
            tab.submit().await;
            let dataset = settled(tab.state())?;

            let symbol = uppercase_symbol(&tab.form().symbol);
            let options = OutputOptions::from(output_args);
            let normalized = normalize_financials(dataset, kind, &symbol);

            println!("Financials for {symbol} - {kind}\n");
            println!("{}", output::render(&normalized, &options)?);
            if officers && kind == DataKind::CompanyProfile {
                println!("\nCompany Officers\n");
                println!(
                    "{}",
                    output::render(&normalize_officers(dataset, &symbol), &options)?
                );
            }
            print_export_notices(&output::export(&normalized, kind, &symbol, &options)?);
        }
        Command::Prices {
            symbol,
            window,
            output: output_args,
        } => {
            let mut form = PriceForm::with_defaults(today());
            set(&mut form.symbol, symbol);
            set(&mut form.start_date, window.start);
            set(&mut form.end_date, window.end);

            let mut tab = Tab::new("prices", FinancialDataGateway::new(services)?, form);
            tab.submit().await;
            let table = settled(tab.state())?;

            let symbol = uppercase_symbol(&tab.form().symbol);
            let options = OutputOptions::from(output_args);
            let normalized = normalize_prices(table, &symbol);

            println!("Historical Prices for {symbol}\n");
            println!("{}", output::render(&normalized, &options)?);
            print_export_notices(&output::export(
                &normalized,
                DataKind::HistoricalPrices,
                &symbol,
                &options,
            )?);
        }
        Command::Docs => print!("{}", render_docs()),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = suite_utils::Config::from_env();
    suite_utils::init_tracing_with(config.log_format, config.default_log_filter());

    let cli = Cli::parse();
    let services = ServiceConfig::default().with_env_overrides()?;

    info!(app = %config.app_name, environment = %config.environment, "starting");

    run(cli.command, &services).await
}
