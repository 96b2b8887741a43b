//! Configuration module
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so the crawler runs without
//! any file at all.
//!
//! # Example
//!
//! ```no_run
//! use ear_inventory::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("inventory.toml")).unwrap();
//! println!("Crawler will descend at most {} levels", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClientConfig, Config, CrawlerConfig, OutputConfig, DEFAULT_API_KEY_HEADER,
    DEFAULT_FOLDER_SUFFIX, DEFAULT_MAX_DEPTH,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
