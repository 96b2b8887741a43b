//! Console summary of a finished crawl

use crate::crawler::{CrawlResult, DiagnosticKind};

/// Maximum diagnostics listed individually on the console
const MAX_LISTED_DIAGNOSTICS: usize = 20;

/// Formats the final summary for the console
pub fn format_summary(result: &CrawlResult) -> String {
    let mut out = String::new();

    out.push_str("=== Inventory Summary ===\n\n");
    out.push_str(&format!("Root: {}\n", result.root_url));
    out.push_str(&format!("Rows written: {}\n", result.rows_written));
    out.push_str(&format!("Listings visited: {}\n", result.folders_visited));
    if let Some(seconds) = result.duration_seconds() {
        out.push_str(&format!("Duration: {:.2}s\n", seconds));
    }
    if result.cancelled {
        out.push_str("Status: cancelled (output is partial)\n");
    }

    let counts = result.counts_by_kind();
    if !counts.is_empty() {
        out.push_str("\nDiagnostics:\n");
        for kind in DiagnosticKind::ALL {
            if let Some(count) = counts.get(&kind) {
                out.push_str(&format!("  {}: {}\n", kind, count));
            }
        }

        out.push('\n');
        for diagnostic in result.diagnostics.iter().take(MAX_LISTED_DIAGNOSTICS) {
            out.push_str(&format!("  - {}\n", diagnostic));
        }
        if result.diagnostics.len() > MAX_LISTED_DIAGNOSTICS {
            out.push_str(&format!(
                "  ... and {} more\n",
                result.diagnostics.len() - MAX_LISTED_DIAGNOSTICS
            ));
        }
    }

    out.push_str(&format!(
        "\nWrote {} rows; {} failures encountered\n",
        result.rows_written,
        result.diagnostics.len()
    ));

    out
}

/// Prints the final summary to stdout
pub fn print_summary(result: &CrawlResult) {
    print!("{}", format_summary(result));
}
