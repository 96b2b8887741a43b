//! Crawler module for walking Artifactory folder trees
//!
//! This module contains the core traversal logic, including:
//! - Depth-first walking with an explicit stack
//! - Cycle and depth guards
//! - Cancellation between listing fetches
//! - Collecting recoverable diagnostics into a crawl result

mod cancel;
mod coordinator;
mod result;

pub use cancel::CancelFlag;
pub use coordinator::Crawler;
pub use result::{CrawlResult, Diagnostic, DiagnosticKind};

use crate::config::Config;
use crate::output::RowSink;
use crate::InventoryError;

/// Runs a complete crawl operation
///
/// This is the one-shot entry point: it builds the HTTP client from
/// `config`, walks the tree below `root_url` sending `api_key` with every
/// request, and appends one row per leaf artifact to `sink`. The sink's
/// header must already be written.
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Crawl ran to completion; check its diagnostics
/// * `Err(InventoryError)` - Invalid root URL, client setup or sink failure
///
/// # Example
///
/// ```no_run
/// use ear_inventory::config::Config;
/// use ear_inventory::crawler::crawl;
/// use ear_inventory::output::CsvSink;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let mut sink = CsvSink::create(Path::new("ears.csv"), &config.output.header)?;
/// let result = crawl(
///     &config,
///     "https://artifactory.example.com/api/storage/tci-releases/",
///     "api-key",
///     &mut sink,
/// )
/// .await?;
/// println!("{} rows", result.rows_written);
/// # Ok(())
/// # }
/// ```
pub async fn crawl<S: RowSink + ?Sized>(
    config: &Config,
    root_url: &str,
    api_key: &str,
    sink: &mut S,
) -> Result<CrawlResult, InventoryError> {
    Crawler::new(config, api_key)?.crawl(root_url, sink).await
}
