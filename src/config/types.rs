use serde::Deserialize;

/// Default recursion limit for folder descent
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Path appended to every folder URI to reach its development listing
pub const DEFAULT_FOLDER_SUFFIX: &str = "/Development/Dev-1/";

/// Header carrying the Artifactory API key
pub const DEFAULT_API_KEY_HEADER: &str = "X-JFrog-Art-Api";

/// Main configuration structure
///
/// Every section is optional; a missing section or key falls back to the
/// defaults that match the stock Artifactory layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Deepest folder level that will still be fetched (the root is level 0)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Appended to `parent_url + child.uri` to form a folder's listing URL
    #[serde(rename = "folder-suffix")]
    pub folder_suffix: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            folder_suffix: DEFAULT_FOLDER_SUFFIX.to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Name of the header the API key is sent in
    #[serde(rename = "api-key-header")]
    pub api_key_header: String,

    /// User agent sent with every listing request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Column names of the CSV header row
    pub header: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            header: vec![
                "Interface".to_string(),
                "Ear Name".to_string(),
                "Size".to_string(),
            ],
        }
    }
}
