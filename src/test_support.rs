//! Shared fixtures for unit tests.

use crate::enrichment::enrich_releases;
use crate::model::{EnrichedRelease, RawRelease};

/// A published, non-draft release of `daangn/{repo}`.
pub fn raw_release(repo: &str, tag: &str, published_at: &str) -> RawRelease {
    RawRelease {
        repo_owner: "daangn".to_string(),
        repo_name: repo.to_string(),
        tag_name: tag.to_string(),
        release_name: String::new(),
        body: String::new(),
        published_at: published_at.parse().unwrap(),
        draft: false,
        prerelease: false,
    }
}

/// Enrich `(repo, tag, published_at)` triples as one batch.
pub fn enriched(releases: &[(&str, &str, &str)]) -> Vec<EnrichedRelease> {
    let raw: Vec<RawRelease> = releases
        .iter()
        .map(|(repo, tag, at)| raw_release(repo, tag, at))
        .collect();
    enrich_releases(&raw)
}
