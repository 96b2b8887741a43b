//! EAR inventory: an Artifactory tree crawler
//!
//! This crate walks the folder listings exposed by a JFrog Artifactory storage
//! API and writes one CSV row per leaf artifact it finds, guarding the walk
//! against cycles and runaway depth.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod output;

use thiserror::Error;

/// Main error type for fatal inventory failures
///
/// Problems with individual listings are not errors; they are collected as
/// [`crawler::Diagnostic`] values in the [`crawler::CrawlResult`].
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid root URL '{url}': {reason}")]
    InvalidRootUrl { url: String, reason: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CancelFlag, CrawlResult, Crawler, Diagnostic, DiagnosticKind};
pub use listing::{ChildEntry, ListingNode};
pub use output::{CsvSink, MemorySink, OutputRow, RowSink};
