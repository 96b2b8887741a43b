//! Artifactory folder listings
//!
//! This module covers everything on the remote side of the crawl:
//! - The JSON shape of a folder listing
//! - Deriving child listing URLs and artifact names
//! - Fetching listings over HTTP with the API key attached

mod fetcher;
mod types;
mod uri;

pub use fetcher::{build_http_client, FetchError, ListingClient};
pub use types::{ChildEntry, ListingNode};
pub use uri::{artifact_name, folder_listing_url, validate_root_url, visit_key};
