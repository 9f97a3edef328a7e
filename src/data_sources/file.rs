//! Local JSON snapshot of GitHub releases.
//!
//! Lets the service run without network access. The snapshot holds one entry
//! per repository with the release objects exactly as the GitHub API returned
//! them:
//!
//! ```json
//! {
//!   "repositories": [
//!     { "owner": "daangn", "name": "stackflow", "releases": [ ... ] }
//!   ],
//!   "metadata": { "last_updated": "2024-01-20T00:00:00Z", "data_version": "1" }
//! }
//! ```
//!
//! The file is re-read on every fetch.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::github::GithubRelease;
use super::{ReleaseSource, TrackedRepository};
use crate::error::SourceError;
use crate::model::RawRelease;

/// Top-level snapshot document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSnapshot {
    pub repositories: Vec<SnapshotRepository>,
    #[serde(default)]
    pub metadata: SnapshotMetadata,
}

/// Releases of one repository in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRepository {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub name: String,
    pub releases: Vec<GithubRelease>,
}

/// Informational snapshot metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data_version: Option<String>,
    #[serde(default)]
    pub total_repositories: Option<usize>,
    #[serde(default)]
    pub total_releases: Option<usize>,
}

impl ReleaseSnapshot {
    /// Check that every repository entry is addressable.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.repositories.is_empty() {
            warn!("Release snapshot contains no repositories");
        }
        for (index, repository) in self.repositories.iter().enumerate() {
            if repository.owner.trim().is_empty() || repository.name.trim().is_empty() {
                return Err(SourceError::InvalidSnapshot(format!(
                    "repository #{index} is missing owner or name"
                )));
            }
        }
        Ok(())
    }

    /// Flatten into raw releases, in snapshot order.
    pub fn into_releases(self) -> Vec<RawRelease> {
        self.repositories
            .into_iter()
            .flat_map(|entry| {
                let repository = TrackedRepository::new(&entry.owner, &entry.name);
                entry
                    .releases
                    .into_iter()
                    .map(move |release| release.into_raw(&repository))
            })
            .collect()
    }
}

/// Reads releases from a snapshot file.
#[derive(Debug, Clone)]
pub struct FileReleaseSource {
    path: PathBuf,
}

impl FileReleaseSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read, decode and validate the snapshot.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load_snapshot(&self) -> Result<ReleaseSnapshot, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let snapshot: ReleaseSnapshot = serde_json::from_str(&content)?;
        snapshot.validate()?;

        info!(
            repositories = snapshot.repositories.len(),
            last_updated = ?snapshot.metadata.last_updated,
            "Release snapshot loaded"
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl ReleaseSource for FileReleaseSource {
    async fn fetch_release_batch(&self) -> Result<Vec<RawRelease>, SourceError> {
        Ok(self.load_snapshot().await?.into_releases())
    }
}
