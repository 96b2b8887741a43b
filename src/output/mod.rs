//! Output module for artifact rows and crawl reports
//!
//! This module handles:
//! - The append-only row sink interface and its CSV and in-memory sinks
//! - The console summary printed after a crawl
//! - The optional markdown run report

mod csv_sink;
mod markdown;
mod memory;
mod summary;
mod traits;

pub use csv_sink::CsvSink;
pub use markdown::{format_markdown_report, write_markdown_report, ReportMeta};
pub use memory::MemorySink;
pub use summary::{format_summary, print_summary};
pub use traits::{OutputRow, RowSink, SinkError, SinkResult};
