//! Error types for release-insights.
//!
//! Only failures of the upstream release source are real errors. Malformed
//! version tags and empty filter results degrade in place and never surface
//! here.

use thiserror::Error;

/// Failure while fetching raw releases from a [`ReleaseSource`](crate::data_sources::ReleaseSource).
#[derive(Debug, Error)]
pub enum SourceError {
    /// The HTTP request itself failed (connect, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream API answered with a non-success status.
    #[error("{repository} responded with status {status}")]
    Status { repository: String, status: u16 },

    /// A local snapshot could not be read.
    #[error("failed to read release snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// A local snapshot is not valid JSON for the expected shape.
    #[error("failed to decode release snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// A local snapshot decoded but its contents are unusable.
    #[error("invalid release snapshot: {0}")]
    InvalidSnapshot(String),

    /// Every tracked repository failed to load.
    #[error("all {attempted} tracked repositories failed to load")]
    AllRepositoriesFailed { attempted: usize },
}

/// Error surfaced by the dashboard assembler.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The release source failed; no partial result is produced.
    #[error("release source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),
}

/// A label string that does not name a known variant
/// (work-day type, time period or release type).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised {kind}: {value:?}")]
pub struct LabelError {
    pub kind: &'static str,
    pub value: String,
}

impl LabelError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
