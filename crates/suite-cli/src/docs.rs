//! Documentation and source links panel

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocLink {
    pub section: &'static str,
    pub title: &'static str,
    pub url: &'static str,
}

pub const DOC_LINKS: [DocLink; 5] = [
    DocLink {
        section: "User Interface Repository",
        title: "Portfolio Analysis Suite UI",
        url: "https://github.com/amararun/shared-portfolio-analysis-googleui",
    },
    DocLink {
        section: "QuantStats Analysis",
        title: "FastAPI-MCP Server - Documentation & Repository",
        url: "https://rex.tigzig.com/mcp-server-quantstats",
    },
    DocLink {
        section: "FFN Stats Analysis",
        title: "FastAPI-MCP Server - Documentation & Repository",
        url: "https://rex.tigzig.com/mcp-server-ffn",
    },
    DocLink {
        section: "Technical Analysis",
        title: "FastAPI-MCP Server - Documentation & Repository",
        url: "https://rex.tigzig.com/mcp-server-technical-analysis",
    },
    DocLink {
        section: "Financial Data & Historical Prices",
        title: "FastAPI-MCP Server - Documentation & Repository",
        url: "https://rex.tigzig.com/mcp-server-yahoo-finance",
    },
];

pub const SYMBOL_NOTE: &str = "All commands accept Yahoo Finance symbols (case-insensitive). Example formats: AAPL (US stocks), TCS.NS (NSE India), TCS.BO (BSE India), BTC-USD (crypto), GC=F (Gold futures), ^GSPC (S&P 500 index).";

pub const DISCLAIMER: &str = "This is not investment advice. Always validate outputs independently.";

/// Plain-text docs panel
pub fn render_docs() -> String {
    let mut out = String::from("Documentation & Source Code\n\n");
    for link in DOC_LINKS {
        let _ = writeln!(out, "{}\n  {}\n  {}\n", link.section, link.title, link.url);
    }
    let _ = writeln!(out, "{SYMBOL_NOTE}\n\n{DISCLAIMER}");
    out
}
