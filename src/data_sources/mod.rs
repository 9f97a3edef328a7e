//! Release sources feeding the dashboard.
//!
//! The dashboard never performs I/O itself; it is handed a [`ReleaseSource`]
//! that supplies the raw release batch for every tracked repository.
//!
//! # Sources
//!
//! - [`github`]: live GitHub REST API, fetched concurrently per repository
//! - [`file`]: a local JSON snapshot of previously fetched releases
//! - [`StaticReleaseSource`]: a fixed in-memory batch

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::model::RawRelease;

pub mod file;
pub mod github;

pub use file::FileReleaseSource;
pub use github::GithubClient;

/// Supplies the raw release batch across all tracked repositories.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetch every release of every tracked repository.
    ///
    /// Sources tolerate partial failure where they can; an error means no
    /// usable batch could be produced.
    async fn fetch_release_batch(&self) -> Result<Vec<RawRelease>, SourceError>;
}

/// A repository whose releases are tracked, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackedRepository {
    pub owner: String,
    pub name: String,
}

impl TrackedRepository {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for TrackedRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for TrackedRepository {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(format!("expected owner/name, got {s:?}")),
        }
    }
}

/// A fixed batch of releases.
#[derive(Debug, Clone, Default)]
pub struct StaticReleaseSource {
    releases: Vec<RawRelease>,
}

impl StaticReleaseSource {
    pub fn new(releases: Vec<RawRelease>) -> Self {
        Self { releases }
    }
}

#[async_trait]
impl ReleaseSource for StaticReleaseSource {
    async fn fetch_release_batch(&self) -> Result<Vec<RawRelease>, SourceError> {
        Ok(self.releases.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tracked_repository() {
        let repo: TrackedRepository = "daangn/stackflow".parse().unwrap();
        assert_eq!(repo, TrackedRepository::new("daangn", "stackflow"));
        assert_eq!(repo.to_string(), "daangn/stackflow");

        let repo: TrackedRepository = " daangn/seed-design ".parse().unwrap();
        assert_eq!(repo.name, "seed-design");
    }

    #[test]
    fn test_reject_malformed_repository() {
        for input in ["stackflow", "/stackflow", "daangn/", "a/b/c", ""] {
            assert!(input.parse::<TrackedRepository>().is_err(), "{input:?}");
        }
    }

    #[tokio::test]
    async fn test_static_source_returns_batch() {
        let release = RawRelease {
            repo_owner: "daangn".to_string(),
            repo_name: "stackflow".to_string(),
            tag_name: "v1.0.0".to_string(),
            release_name: String::new(),
            body: String::new(),
            published_at: "2024-01-15T10:00:00Z".parse().unwrap(),
            draft: false,
            prerelease: false,
        };
        let source = StaticReleaseSource::new(vec![release.clone()]);

        assert_eq!(source.fetch_release_batch().await.unwrap(), vec![release]);
    }
}
