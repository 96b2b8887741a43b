//! Crawl outcome and recoverable diagnostics

use crate::listing::FetchError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Category of a recoverable crawl problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    ListingFetchFailure,
    CycleDetected,
    DepthLimitExceeded,
    InvalidSize,
    InvalidEntry,
}

impl DiagnosticKind {
    /// All kinds, in report order
    pub const ALL: [DiagnosticKind; 5] = [
        Self::ListingFetchFailure,
        Self::CycleDetected,
        Self::DepthLimitExceeded,
        Self::InvalidSize,
        Self::InvalidEntry,
    ];

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::ListingFetchFailure => "Listing fetch failure",
            Self::CycleDetected => "Cycle detected",
            Self::DepthLimitExceeded => "Depth limit exceeded",
            Self::InvalidSize => "Invalid size",
            Self::InvalidEntry => "Invalid entry",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A problem with one node of the tree that did not stop the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The listing could not be fetched or decoded; its branch is skipped
    ListingFetchFailure { url: String, cause: FetchError },

    /// A folder resolved to a listing that was already visited
    CycleDetected { url: String },

    /// A folder lies deeper than the configured limit
    DepthLimitExceeded { url: String, depth: u32 },

    /// A leaf size was missing or not a non-negative integer; 0 was written
    /// instead. `raw` holds the value as it appeared in the listing.
    InvalidSize {
        url: String,
        artifact: String,
        raw: Option<String>,
    },

    /// A child entry was unusable (for example an empty `uri`) and was skipped
    InvalidEntry { url: String, reason: String },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::ListingFetchFailure { .. } => DiagnosticKind::ListingFetchFailure,
            Self::CycleDetected { .. } => DiagnosticKind::CycleDetected,
            Self::DepthLimitExceeded { .. } => DiagnosticKind::DepthLimitExceeded,
            Self::InvalidSize { .. } => DiagnosticKind::InvalidSize,
            Self::InvalidEntry { .. } => DiagnosticKind::InvalidEntry,
        }
    }

    /// URL of the listing the diagnostic refers to
    pub fn url(&self) -> &str {
        match self {
            Self::ListingFetchFailure { url, .. }
            | Self::CycleDetected { url }
            | Self::DepthLimitExceeded { url, .. }
            | Self::InvalidSize { url, .. }
            | Self::InvalidEntry { url, .. } => url,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListingFetchFailure { url, cause } => {
                write!(f, "failed to fetch listing {}: {}", url, cause)
            }
            Self::CycleDetected { url } => write!(f, "listing {} already visited", url),
            Self::DepthLimitExceeded { url, depth } => {
                write!(f, "listing {} at depth {} exceeds the limit", url, depth)
            }
            Self::InvalidSize { url, artifact, raw } => match raw {
                Some(size) => write!(f, "{} under {} has invalid size {}", artifact, url, size),
                None => write!(f, "{} under {} has no size", artifact, url),
            },
            Self::InvalidEntry { url, reason } => {
                write!(f, "skipped entry under {}: {}", url, reason)
            }
        }
    }
}

/// Summary of one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlResult {
    pub root_url: String,
    pub rows_written: u64,
    /// Listings fetched and decoded successfully, root included
    pub folders_visited: u64,
    pub diagnostics: Vec<Diagnostic>,
    /// True when the crawl stopped early on a cancellation request
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlResult {
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            rows_written: 0,
            folders_visited: 0,
            diagnostics: Vec::new(),
            cancelled: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Records a diagnostic and logs it
    pub fn record(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of diagnostics of one kind
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind() == kind).count()
    }

    /// Diagnostic counts per kind, omitting kinds that never occurred
    pub fn counts_by_kind(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Listings whose branch was lost entirely
    pub fn failure_count(&self) -> usize {
        self.count_of(DiagnosticKind::ListingFetchFailure)
    }

    /// True when the crawl ran to the end without any diagnostic
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && !self.cancelled
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}
