//! GitHub REST API release client.
//!
//! Lists the releases of every tracked repository through
//! `GET /repos/{owner}/{repo}/releases`, one task per repository.
//!
//! # Partial failure
//!
//! A repository that cannot be fetched is logged and left out of the batch.
//! Only when every repository fails does the fetch itself fail.
//!
//! # API Reference
//!
//! See: <https://docs.github.com/en/rest/releases/releases#list-releases>

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::{ReleaseSource, TrackedRepository};
use crate::error::SourceError;
use crate::model::RawRelease;

/// Base URL for the GitHub REST API.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = concat!("release-insights/", env!("CARGO_PKG_VERSION"));

/// Releases requested per page (the API maximum).
const PER_PAGE: usize = 100;

/// Upper bound on pages fetched per repository.
const MAX_PAGES: usize = 10;

/// A release object as returned by the GitHub API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    pub created_at: DateTime<Utc>,
    /// Unset for drafts.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl GithubRelease {
    /// Convert to a [`RawRelease`] of `repository`.
    ///
    /// Drafts have no publish time; their creation time stands in.
    pub fn into_raw(self, repository: &TrackedRepository) -> RawRelease {
        RawRelease {
            repo_owner: repository.owner.clone(),
            repo_name: repository.name.clone(),
            tag_name: self.tag_name,
            release_name: self.name.unwrap_or_default(),
            body: self.body.unwrap_or_default(),
            published_at: self.published_at.unwrap_or(self.created_at),
            draft: self.draft,
            prerelease: self.prerelease,
        }
    }
}

/// Client for listing releases of the tracked repositories.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    repositories: Vec<TrackedRepository>,
}

impl GithubClient {
    /// Create a client against `base_url`, usually [`GITHUB_API_BASE`].
    ///
    /// # Arguments
    ///
    /// * `repositories` - Repositories whose releases are listed
    /// * `token` - Optional token; anonymous requests are heavily rate limited
    /// * `timeout` - Per-request timeout
    pub fn with_base_url(
        base_url: &str,
        repositories: Vec<TrackedRepository>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            repositories,
        })
    }

    /// Build a request with the GitHub headers and optional authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let req = self
            .client
            .get(url)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_USER_AGENT);
        match &self.token {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => req,
        }
    }

    fn releases_url(&self, repository: &TrackedRepository, page: usize) -> String {
        format!(
            "{}/repos/{}/{}/releases?per_page={}&page={}",
            self.base_url,
            urlencoding::encode(&repository.owner),
            urlencoding::encode(&repository.name),
            PER_PAGE,
            page
        )
    }

    /// List every release of one repository, following pagination.
    #[instrument(skip(self), fields(repository = %repository))]
    pub async fn fetch_repository_releases(
        &self,
        repository: &TrackedRepository,
    ) -> Result<Vec<RawRelease>, SourceError> {
        let mut releases = Vec::new();

        for page in 1..=MAX_PAGES {
            let response = self
                .build_request(&self.releases_url(repository, page))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Status {
                    repository: repository.to_string(),
                    status: status.as_u16(),
                });
            }

            let batch: Vec<GithubRelease> = response.json().await?;
            let last_page = batch.len() < PER_PAGE;
            debug!(page, count = batch.len(), "Fetched release page");

            releases.extend(batch.into_iter().map(|r| r.into_raw(repository)));
            if last_page {
                break;
            }
        }

        Ok(releases)
    }
}

#[async_trait]
impl ReleaseSource for GithubClient {
    async fn fetch_release_batch(&self) -> Result<Vec<RawRelease>, SourceError> {
        if self.repositories.is_empty() {
            return Ok(Vec::new());
        }

        let mut tasks = JoinSet::new();
        for (index, repository) in self.repositories.iter().cloned().enumerate() {
            let client = self.clone();
            tasks.spawn(async move {
                let result = client.fetch_repository_releases(&repository).await;
                (index, repository, result)
            });
        }

        let mut fetched = Vec::with_capacity(self.repositories.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, repository, Ok(releases))) => {
                    info!(repository = %repository, count = releases.len(), "Releases fetched");
                    fetched.push((index, releases));
                }
                Ok((_, repository, Err(e))) => {
                    warn!(repository = %repository, error = %e, "Failed to fetch releases");
                }
                Err(e) => {
                    warn!(error = %e, "Release fetch task failed");
                }
            }
        }

        if fetched.is_empty() {
            return Err(SourceError::AllRepositoriesFailed {
                attempted: self.repositories.len(),
            });
        }

        // Keep configuration order regardless of completion order.
        fetched.sort_by_key(|(index, _)| *index);
        Ok(fetched.into_iter().flat_map(|(_, releases)| releases).collect())
    }
}
