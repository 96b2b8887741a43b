use crate::InventoryError;
use url::Url;

/// Builds the listing URL of a folder child
///
/// The result is plain concatenation of `parent_url`, the child's `uri` and
/// the configured suffix. Artifactory answers these exact strings, so no
/// slash cleanup is applied.
///
/// # Examples
///
/// ```
/// use ear_inventory::listing::folder_listing_url;
///
/// let url = folder_listing_url("https://repo/api/storage/ears/", "sub", "/Development/Dev-1/");
/// assert_eq!(url, "https://repo/api/storage/ears/sub/Development/Dev-1/");
/// ```
pub fn folder_listing_url(parent_url: &str, child_uri: &str, suffix: &str) -> String {
    format!("{}{}{}", parent_url, child_uri, suffix)
}

/// Returns the final `/`-delimited segment of an artifact URI
pub fn artifact_name(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Computes the key used to detect already visited listings
///
/// Parsing through `Url` lowercases scheme and host, drops default ports and
/// resolves `.` and `..` segments, so two spellings of the same listing
/// collapse to one key. Strings that do not parse are used verbatim.
pub fn visit_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Validates the root listing URL given by the caller
pub fn validate_root_url(url: &str) -> Result<Url, InventoryError> {
    let invalid = |reason: String| InventoryError::InvalidRootUrl {
        url: url.to_string(),
        reason,
    };

    if url.trim().is_empty() {
        return Err(invalid("URL cannot be empty".to_string()));
    }

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(invalid(format!(
            "only http and https are supported, got {}",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }

    Ok(parsed)
}
