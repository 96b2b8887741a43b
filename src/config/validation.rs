use crate::config::types::{ClientConfig, Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use reqwest::header::HeaderName;

/// Upper bound accepted for `max-depth`
const MAX_DEPTH_CEILING: u32 = 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_client_config(&config.client)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 || config.max_depth > MAX_DEPTH_CEILING {
        return Err(ConfigError::Validation(format!(
            "max_depth must be between 1 and {}, got {}",
            MAX_DEPTH_CEILING, config.max_depth
        )));
    }

    if config.folder_suffix.is_empty() {
        return Err(ConfigError::Validation(
            "folder_suffix cannot be empty".to_string(),
        ));
    }

    if !config.folder_suffix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "folder_suffix must start with '/', got '{}'",
            config.folder_suffix
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    HeaderName::from_bytes(config.api_key_header.as_bytes()).map_err(|_| {
        ConfigError::Validation(format!(
            "api_key_header '{}' is not a valid HTTP header name",
            config.api_key_header
        ))
    })?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.header.len() != 3 {
        return Err(ConfigError::Validation(format!(
            "output header must have exactly 3 columns, got {}",
            config.header.len()
        )));
    }

    if config.header.iter().any(|column| column.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "output header columns cannot be empty".to_string(),
        ));
    }

    Ok(())
}
