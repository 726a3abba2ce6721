//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan reports.
//! Formatters return strings; the caller decides where they are written.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::render_csv;
pub use json_format::render_json;
pub use plain::{
    banner, print_error, print_warning, render_plain, render_summary, PlainOptions,
};

use crate::scanner::ScanReport;
use std::fmt;
use std::io;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl OutputFormat {
    /// Whether reports are printed as each address finishes rather than
    /// collected into a single document at the end.
    pub fn is_streaming(self) -> bool {
        matches!(self, Self::Plain)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Render a batch of reports as a single structured document.
pub fn render_document(reports: &[ScanReport], format: OutputFormat, opts: PlainOptions) -> io::Result<String> {
    match format {
        OutputFormat::Plain => Ok(reports.iter().map(|r| render_plain(r, opts)).collect()),
        OutputFormat::Json => render_json(reports).map_err(io::Error::other),
        OutputFormat::Csv => render_csv(reports),
    }
}
