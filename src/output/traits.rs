//! Row sink trait and types
//!
//! This module defines the interface the crawler writes artifact rows
//! through, along with the row type and sink errors.

use thiserror::Error;

/// Errors that can occur while appending rows
///
/// Any of these aborts the crawl: a row that cannot be written breaks the
/// one-row-per-artifact contract of the output.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write row: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// One discovered leaf artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    /// Listing URL the artifact was found under
    pub source_url: String,

    /// Final path segment of the artifact URI
    pub artifact_name: String,

    /// Size in bytes
    pub artifact_size: u64,
}

impl OutputRow {
    pub fn new(
        source_url: impl Into<String>,
        artifact_name: impl Into<String>,
        artifact_size: u64,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            artifact_name: artifact_name.into(),
            artifact_size,
        }
    }
}

/// Append-only destination for artifact rows
///
/// The header is the sink's own business and is written when the sink is
/// created; the crawler only ever appends data rows.
pub trait RowSink {
    /// Appends a single row
    ///
    /// # Arguments
    ///
    /// * `row` - The artifact row to append
    fn write_row(&mut self, row: &OutputRow) -> SinkResult<()>;

    /// Flushes any buffered rows to the underlying destination
    fn flush(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn write_row(&mut self, row: &OutputRow) -> SinkResult<()> {
        (**self).write_row(row)
    }

    fn flush(&mut self) -> SinkResult<()> {
        (**self).flush()
    }
}
