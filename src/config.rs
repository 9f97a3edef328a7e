//! Service configuration from environment variables.
//!
//! | Variable                             | Default                               |
//! |--------------------------------------|---------------------------------------|
//! | `RELEASE_INSIGHTS_PORT`              | `3000`                                |
//! | `RELEASE_INSIGHTS_REPOSITORIES`      | `daangn/stackflow,daangn/seed-design` |
//! | `RELEASE_INSIGHTS_DATA_PATH`         | unset, releases come from GitHub      |
//! | `GITHUB_API_BASE_URL`                | `https://api.github.com`              |
//! | `GITHUB_TOKEN`                       | unset                                 |
//! | `RELEASE_INSIGHTS_HTTP_TIMEOUT_SECS` | `10`                                  |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::data_sources::TrackedRepository;
use crate::data_sources::github::GITHUB_API_BASE;

/// Default port if not specified via environment variable.
pub const DEFAULT_PORT: u16 = 3000;

/// Repositories tracked when none are configured.
pub const DEFAULT_REPOSITORIES: &str = "daangn/stackflow,daangn/seed-design";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub repositories: Vec<TrackedRepository>,
    /// Snapshot file to serve instead of querying GitHub.
    pub data_path: Option<PathBuf>,
    pub github_api_base_url: String,
    pub github_token: Option<String>,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to their defaults. Blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = var("RELEASE_INSIGHTS_PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let repositories = parse_repositories(
            &var("RELEASE_INSIGHTS_REPOSITORIES").unwrap_or_else(|| DEFAULT_REPOSITORIES.to_string()),
        );

        let http_timeout = var("RELEASE_INSIGHTS_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));

        Self {
            port,
            repositories,
            data_path: var("RELEASE_INSIGHTS_DATA_PATH").map(PathBuf::from),
            github_api_base_url: var("GITHUB_API_BASE_URL")
                .unwrap_or_else(|| GITHUB_API_BASE.to_string()),
            github_token: var("GITHUB_TOKEN"),
            http_timeout,
        }
    }
}

/// Parse a comma-separated `owner/name` list, skipping malformed entries.
pub fn parse_repositories(list: &str) -> Vec<TrackedRepository> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse() {
            Ok(repository) => Some(repository),
            Err(e) => {
                warn!(entry, error = %e, "Skipping malformed repository entry");
                None
            }
        })
        .collect()
}
