//! Release statistics report.
//!
//! Count maps by year, ISO week, day and repository, a latest-releases list
//! and per-repository summaries. The count maps only include weekday
//! releases; `total_releases` counts everything.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{EnrichedRelease, WorkDayType};

/// How many releases `latest_releases` lists.
const LATEST_RELEASES_LIMIT: usize = 15;

/// Window for `recent_releases_last_30_days`.
const RECENT_WINDOW_DAYS: i64 = 30;

/// A release in the latest-releases list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestRelease {
    pub repo: String,
    pub tag: String,
    pub published_at: DateTime<Utc>,
}

/// Summary of one repository's release history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub repo_name: String,
    pub total_releases: usize,
    pub first_release_date: String,
    pub last_release_date: String,
    /// Span between first and last release divided by the gaps, rounded.
    /// 0 for a single release.
    pub avg_days_between_releases: i64,
    /// `YYYY-MM` with the most releases; the earliest such month on ties.
    pub most_active_month: String,
}

/// Report-level metadata, present when there is at least one release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsMetadata {
    pub first_release_date: String,
    pub last_release_date: String,
    pub recent_releases_last_30_days: usize,
    pub data_fetched_at: DateTime<Utc>,
}

/// Flattened release statistics for reporting and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseStats {
    pub total_releases: usize,
    pub yearly_stats: BTreeMap<String, usize>,
    pub weekly_stats: BTreeMap<String, usize>,
    pub daily_stats: BTreeMap<String, usize>,
    pub repo_stats: BTreeMap<String, usize>,
    pub latest_releases: Vec<LatestRelease>,
    pub repositories: Vec<RepositorySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StatsMetadata>,
    pub message: String,
}

impl ReleaseStats {
    /// Build the report from enriched releases.
    pub fn from_releases(releases: &[EnrichedRelease], now: DateTime<Utc>) -> Self {
        if releases.is_empty() {
            return Self {
                total_releases: 0,
                yearly_stats: BTreeMap::new(),
                weekly_stats: BTreeMap::new(),
                daily_stats: BTreeMap::new(),
                repo_stats: BTreeMap::new(),
                latest_releases: Vec::new(),
                repositories: Vec::new(),
                metadata: None,
                message: "No releases found for the tracked repositories".to_string(),
            };
        }

        let mut yearly_stats = BTreeMap::new();
        let mut weekly_stats = BTreeMap::new();
        let mut daily_stats = BTreeMap::new();
        let mut repo_stats = BTreeMap::new();

        for release in releases
            .iter()
            .filter(|r| r.work_day_type == WorkDayType::Weekday)
        {
            *yearly_stats.entry(release.year_key.clone()).or_insert(0) += 1;
            *weekly_stats.entry(release.week_key.clone()).or_insert(0) += 1;
            *daily_stats.entry(release.published_date.clone()).or_insert(0) += 1;
            *repo_stats.entry(release.repo_name.clone()).or_insert(0) += 1;
        }

        let mut by_time: Vec<&EnrichedRelease> = releases.iter().collect();
        by_time.sort_by_key(|r| r.published_at);

        let latest_releases = by_time
            .iter()
            .rev()
            .take(LATEST_RELEASES_LIMIT)
            .map(|r| LatestRelease {
                repo: r.repo_name.clone(),
                tag: r.tag_name.clone(),
                published_at: r.published_at,
            })
            .collect();

        let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
        let metadata = StatsMetadata {
            first_release_date: by_time[0].published_date.clone(),
            last_release_date: by_time[by_time.len() - 1].published_date.clone(),
            recent_releases_last_30_days: releases
                .iter()
                .filter(|r| r.published_at >= recent_cutoff)
                .count(),
            data_fetched_at: now,
        };

        Self {
            total_releases: releases.len(),
            yearly_stats,
            weekly_stats,
            daily_stats,
            repo_stats,
            latest_releases,
            repositories: summarize_repositories(&by_time),
            metadata: Some(metadata),
            message: "Release stats calculated successfully".to_string(),
        }
    }
}

/// Per-repository summaries from releases sorted by publish time.
fn summarize_repositories(by_time: &[&EnrichedRelease]) -> Vec<RepositorySummary> {
    let mut by_repo: BTreeMap<&str, Vec<&EnrichedRelease>> = BTreeMap::new();
    for &release in by_time {
        by_repo.entry(&release.repo_name).or_default().push(release);
    }

    by_repo
        .into_iter()
        .filter_map(|(repo_name, releases)| {
            let first = releases.first()?;
            let last = releases.last()?;

            let avg_days_between_releases = if releases.len() > 1 {
                let span_days = (last.published_at - first.published_at).num_milliseconds() as f64
                    / 86_400_000.0;
                (span_days / (releases.len() - 1) as f64).round() as i64
            } else {
                0
            };

            let mut months: BTreeMap<&str, usize> = BTreeMap::new();
            for release in &releases {
                *months.entry(&release.month_key).or_insert(0) += 1;
            }
            let mut most_active_month = "";
            let mut most_active_count = 0;
            for (month, count) in months {
                if count > most_active_count {
                    most_active_month = month;
                    most_active_count = count;
                }
            }

            Some(RepositorySummary {
                repo_name: repo_name.to_string(),
                total_releases: releases.len(),
                first_release_date: first.published_date.clone(),
                last_release_date: last.published_date.clone(),
                avg_days_between_releases,
                most_active_month: most_active_month.to_string(),
            })
        })
        .collect()
}
