//! Markdown run report
//!
//! This module writes a human-readable markdown report of a crawl, including
//! run information, totals and every recorded diagnostic.

use crate::crawler::{CrawlResult, DiagnosticKind};
use crate::output::traits::SinkResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Run details that live outside the crawl result
#[derive(Debug, Clone, Default)]
pub struct ReportMeta {
    /// Path of the CSV inventory
    pub output_path: String,

    /// SHA-256 of the configuration file, if one was used
    pub config_hash: Option<String>,

    /// Depth limit in effect
    pub max_depth: u32,
}

/// Writes a markdown report to `output_path`
///
/// # Arguments
///
/// * `result` - The finished crawl
/// * `meta` - Run details to include
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown_report(
    result: &CrawlResult,
    meta: &ReportMeta,
    output_path: &Path,
) -> SinkResult<()> {
    let markdown = format_markdown_report(result, meta);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl result as markdown
pub fn format_markdown_report(result: &CrawlResult, meta: &ReportMeta) -> String {
    let mut md = String::new();

    md.push_str("# EAR Inventory Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root**: {}\n", result.root_url));
    md.push_str(&format!("- **Output**: {}\n", meta.output_path));
    md.push_str(&format!("- **Max Depth**: {}\n", meta.max_depth));
    md.push_str(&format!("- **Started**: {}\n", result.started_at.to_rfc3339()));
    if let Some(finished) = &result.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(seconds) = result.duration_seconds() {
        md.push_str(&format!("- **Duration**: {:.2} seconds\n", seconds));
    }
    let status = if result.cancelled {
        "cancelled"
    } else {
        "completed"
    };
    md.push_str(&format!("- **Status**: {}\n", status));
    if let Some(hash) = &meta.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Totals
    md.push_str("## Totals\n\n");
    md.push_str(&format!("- **Rows Written**: {}\n", result.rows_written));
    md.push_str(&format!(
        "- **Listings Visited**: {}\n",
        result.folders_visited
    ));
    md.push_str(&format!(
        "- **Diagnostics**: {}\n\n",
        result.diagnostics.len()
    ));

    md.push_str("## Diagnostics by Kind\n\n");
    md.push_str("| Kind | Count |\n");
    md.push_str("|------|-------|\n");
    for kind in DiagnosticKind::ALL {
        md.push_str(&format!("| {} | {} |\n", kind, result.count_of(kind)));
    }
    md.push('\n');

    if !result.diagnostics.is_empty() {
        md.push_str("## Diagnostic Details\n\n");
        for diagnostic in &result.diagnostics {
            md.push_str(&format!("- **{}**: {}\n", diagnostic.kind(), diagnostic));
        }
        md.push('\n');
    }

    md
}
