//! Crawl coordinator - depth-first traversal of the listing tree
//!
//! The walk keeps an explicit stack of open listings instead of recursing, so
//! depth is an ordinary counter and no boxed async recursion is needed. Each
//! stack frame remembers which of its children are still to be processed,
//! which gives the same row order as a recursive pre-order walk:
//! - a leaf child is written to the sink as soon as it is reached
//! - a folder child is fetched and pushed, and its subtree finishes before
//!   the next sibling is looked at

use crate::config::{Config, CrawlerConfig};
use crate::crawler::cancel::CancelFlag;
use crate::crawler::result::{CrawlResult, Diagnostic};
use crate::listing::{
    artifact_name, folder_listing_url, validate_root_url, visit_key, ChildEntry, FetchError,
    ListingClient, ListingNode,
};
use crate::output::{OutputRow, RowSink};
use crate::InventoryError;
use std::collections::HashSet;

/// Log a progress line every this many listings
const PROGRESS_INTERVAL: u64 = 25;

/// An open listing whose children are being processed
struct Frame {
    url: String,
    depth: u32,
    children: std::vec::IntoIter<ChildEntry>,
}

/// Walks an Artifactory folder tree and streams leaf artifacts to a sink
pub struct Crawler {
    config: CrawlerConfig,
    client: ListingClient,
    cancel: CancelFlag,
}

impl Crawler {
    /// Creates a crawler from configuration and the API key
    ///
    /// # Arguments
    ///
    /// * `config` - The full configuration
    /// * `api_key` - Credential sent with every listing request
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(InventoryError)` - The HTTP client could not be built
    pub fn new(config: &Config, api_key: &str) -> Result<Self, InventoryError> {
        let client = ListingClient::new(&config.client, api_key)?;
        Ok(Self::with_client(config.crawler.clone(), client))
    }

    /// Creates a crawler around an already configured listing client
    pub fn with_client(config: CrawlerConfig, client: ListingClient) -> Self {
        Self {
            config,
            client,
            cancel: CancelFlag::new(),
        }
    }

    /// Replaces the cancellation flag with one shared by the caller
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a handle that stops the crawl when cancelled
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Crawls the tree below `root_url`, writing one row per leaf artifact
    ///
    /// Per-listing problems are collected as diagnostics in the returned
    /// [`CrawlResult`]. Only an unusable root URL or a sink write failure
    /// ends the crawl with an error; rows written before a sink failure stay
    /// in the sink.
    pub async fn crawl<S: RowSink + ?Sized>(
        &self,
        root_url: &str,
        sink: &mut S,
    ) -> Result<CrawlResult, InventoryError> {
        validate_root_url(root_url)?;

        tracing::info!(
            "Starting crawl at {} (max depth {})",
            root_url,
            self.config.max_depth
        );

        let mut result = CrawlResult::new(root_url);
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(visit_key(root_url));

        let mut stack: Vec<Frame> = Vec::new();
        let mut pending: Option<(String, u32)> = Some((root_url.to_string(), 0));

        loop {
            if let Some((url, depth)) = pending.take() {
                tracing::debug!("Fetching listing {} (depth {})", url, depth);

                let fetched = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => None,
                    fetched = self.client.fetch(&url) => Some(fetched),
                };

                let Some(fetched) = fetched else {
                    tracing::warn!("Crawl cancelled while fetching {}", url);
                    result.cancelled = true;
                    break;
                };

                if let Some(frame) = self.open_listing(url, depth, fetched, &mut result) {
                    stack.push(frame);
                }
                continue;
            }

            let Some(frame) = stack.last_mut() else {
                break;
            };

            let Some(child) = frame.children.next() else {
                stack.pop();
                continue;
            };

            if child.uri.is_empty() {
                result.record(Diagnostic::InvalidEntry {
                    url: frame.url.clone(),
                    reason: "entry has an empty uri".to_string(),
                });
                continue;
            }

            if child.is_folder {
                let child_url =
                    folder_listing_url(&frame.url, &child.uri, &self.config.folder_suffix);
                let depth = frame.depth + 1;
                let key = visit_key(&child_url);

                if visited.contains(&key) {
                    result.record(Diagnostic::CycleDetected { url: child_url });
                } else if depth > self.config.max_depth {
                    result.record(Diagnostic::DepthLimitExceeded {
                        url: child_url,
                        depth,
                    });
                } else {
                    visited.insert(key);
                    pending = Some((child_url, depth));
                }
            } else {
                let artifact = artifact_name(&child.uri);
                let size = match child.valid_size() {
                    Some(size) => size,
                    None => {
                        result.record(Diagnostic::InvalidSize {
                            url: frame.url.clone(),
                            artifact: artifact.to_string(),
                            raw: child.raw_size(),
                        });
                        0
                    }
                };

                sink.write_row(&OutputRow::new(frame.url.as_str(), artifact, size))?;
                result.rows_written += 1;
            }
        }

        sink.flush()?;
        result.finish();

        tracing::info!(
            "Crawl finished: {} rows from {} listings, {} diagnostics",
            result.rows_written,
            result.folders_visited,
            result.diagnostics.len()
        );

        Ok(result)
    }

    /// Turns a fetched listing into a stack frame
    ///
    /// A failed fetch is recorded and yields no frame, which abandons that
    /// branch only.
    fn open_listing(
        &self,
        url: String,
        depth: u32,
        fetched: Result<ListingNode, FetchError>,
        result: &mut CrawlResult,
    ) -> Option<Frame> {
        match fetched {
            Ok(listing) => {
                result.folders_visited += 1;
                if result.folders_visited % PROGRESS_INTERVAL == 0 {
                    tracing::info!(
                        "Progress: {} listings visited, {} rows written",
                        result.folders_visited,
                        result.rows_written
                    );
                }

                tracing::debug!("{} has {} children", url, listing.children.len());
                Some(Frame {
                    url,
                    depth,
                    children: listing.children.into_iter(),
                })
            }
            Err(cause) => {
                result.record(Diagnostic::ListingFetchFailure { url, cause });
                None
            }
        }
    }
}
