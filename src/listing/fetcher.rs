//! HTTP listing fetcher
//!
//! This module handles all HTTP requests issued by the crawler:
//! - Building the HTTP client with timeouts and user agent
//! - Attaching the API key header to every request
//! - Classifying network, status and decoding failures

use crate::config::ClientConfig;
use crate::listing::types::ListingNode;
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Longest body excerpt kept in a decoding error
const BODY_EXCERPT_LEN: usize = 200;

/// Why a single listing could not be obtained
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("unable to parse listing JSON: {message} (body: {excerpt})")]
    Decode { message: String, excerpt: String },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches folder listings with the API key attached
#[derive(Debug, Clone)]
pub struct ListingClient {
    client: Client,
    api_key_header: HeaderName,
    api_key: HeaderValue,
}

impl ListingClient {
    /// Creates a listing client from configuration and the API key
    ///
    /// Fails when the header name or key cannot be sent as an HTTP header.
    pub fn new(config: &ClientConfig, api_key: &str) -> Result<Self, crate::InventoryError> {
        let client = build_http_client(config)?;
        Self::with_client(client, &config.api_key_header, api_key)
    }

    /// Wraps an existing `reqwest::Client`
    pub fn with_client(
        client: Client,
        api_key_header: &str,
        api_key: &str,
    ) -> Result<Self, crate::InventoryError> {
        let api_key_header = HeaderName::from_bytes(api_key_header.as_bytes()).map_err(|_| {
            ConfigError::Validation(format!(
                "'{}' is not a valid HTTP header name",
                api_key_header
            ))
        })?;

        let mut api_key = HeaderValue::from_str(api_key).map_err(|_| {
            ConfigError::Validation(
                "API key contains characters that cannot be sent in an HTTP header".to_string(),
            )
        })?;
        api_key.set_sensitive(true);

        Ok(Self {
            client,
            api_key_header,
            api_key,
        })
    }

    /// Fetches and decodes the listing at `url`
    ///
    /// # Failure Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | `FetchError::Timeout` |
    /// | Connection refused / DNS / TLS | `FetchError::Connect` |
    /// | Non-2xx status | `FetchError::Status` |
    /// | Body not matching the listing schema | `FetchError::Decode` |
    pub async fn fetch(&self, url: &str) -> Result<ListingNode, FetchError> {
        let response = self
            .client
            .get(url)
            .header(self.api_key_header.clone(), self.api_key.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        ListingNode::from_json(&body).map_err(|e| FetchError::Decode {
            message: e.to_string(),
            excerpt: excerpt(&body),
        })
    }
}

fn classify_request_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Network(error.to_string())
    }
}

/// Truncates a body on a char boundary for inclusion in diagnostics
fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
