use serde::Deserialize;
use serde_json::Value;

/// One folder listing as returned by the Artifactory storage API
///
/// Only `children` is consumed; the other fields the API sends (`repo`,
/// `path`, `created`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingNode {
    pub children: Vec<ChildEntry>,
}

/// A single entry of a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChildEntry {
    /// Path segment relative to the parent listing, usually `/name`
    pub uri: String,

    /// True for sub-folders, false for leaf artifacts
    #[serde(rename = "folder")]
    pub is_folder: bool,

    /// Byte size as sent; only meaningful on leaves and not always present
    ///
    /// Kept as raw JSON so one odd value (a string, a negative or an
    /// out-of-range number) only invalidates its own entry.
    #[serde(default)]
    pub size: Option<Value>,
}

impl ListingNode {
    /// Decodes a listing from a JSON body
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

impl ChildEntry {
    /// Returns the size as an unsigned byte count, or `None` when it is
    /// missing or not a non-negative integer that fits in `u64`
    pub fn valid_size(&self) -> Option<u64> {
        self.size.as_ref().and_then(Value::as_u64)
    }

    /// The size as it appeared in the listing, for diagnostics
    pub fn raw_size(&self) -> Option<String> {
        self.size.as_ref().map(Value::to_string)
    }
}
