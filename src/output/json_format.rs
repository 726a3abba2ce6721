//! JSON output formatting.

use crate::scanner::ScanReport;

/// Render reports as a pretty-printed JSON array, one entry per address.
pub fn render_json(reports: &[ScanReport]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(reports)
}
