//! Plain text output formatting.
//!
//! Produces human-readable output with colors. Rendering is pure: color is
//! an explicit option so callers decide whether the terminal gets styling.

use crate::scanner::{ProbeOutcome, ScanReport};
use console::{style, Style};
use std::fmt::Write;

/// Options for plain rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainOptions {
    /// Emit ANSI styling.
    pub color: bool,
    /// List closed ports too.
    pub show_closed: bool,
}

/// Render one address's results.
///
/// ```text
/// --- Scanning 127.0.0.1 (IPv4) ---
///    TCP 22 Open
///    UDP 53 Open|Filtered
/// ```
pub fn render_plain(report: &ScanReport, opts: PlainOptions) -> String {
    let mut out = String::new();

    let heading = format!("--- Scanning {} ({}) ---", report.address, report.family);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        style(heading).magenta().bold().force_styling(opts.color)
    );

    let rows: Vec<_> = report
        .results
        .iter()
        .filter(|r| opts.show_closed || r.outcome.is_reportable())
        .collect();

    for result in rows {
        let line = result.to_string();
        let _ = writeln!(
            out,
            "   {}",
            outcome_style(result.outcome).apply_to(line).force_styling(opts.color)
        );
    }

    // Goes after any closed rows.
    if report.reportable().next().is_none() {
        let _ = writeln!(
            out,
            "   {}",
            style("No open ports found").red().force_styling(opts.color)
        );
    }

    out
}

fn outcome_style(outcome: ProbeOutcome) -> Style {
    match outcome {
        ProbeOutcome::Open => Style::new().green(),
        ProbeOutcome::OpenOrFiltered => Style::new().yellow(),
        ProbeOutcome::ClosedOrUnreachable => Style::new().red().dim(),
    }
}

/// One-line summary printed after an address's results.
pub fn render_summary(report: &ScanReport, opts: PlainOptions) -> String {
    format!(
        "   {} {} ports in {:.2}s: {} open, {} open|filtered, {} closed",
        style("•").dim().force_styling(opts.color),
        report.ports_scanned,
        report.duration_ms as f64 / 1000.0,
        style(report.open).green().bold().force_styling(opts.color),
        style(report.open_filtered).yellow().force_styling(opts.color),
        style(report.closed).red().force_styling(opts.color),
    )
}

/// Program banner shown at the start of a session.
pub fn banner() -> String {
    format!(
        "{} {}",
        style("Luna Port Scanner").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}
