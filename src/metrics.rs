//! Headline scalar metrics over a filtered release set.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::percentage;
use crate::model::{EnrichedRelease, WorkDayType};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// How a metric value should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFormat {
    Number,
    Percentage,
    Duration,
}

/// A named scalar shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetric {
    pub name: String,
    pub description: String,
    pub value: f64,
    pub unit: String,
    pub format: MetricFormat,
}

impl DashboardMetric {
    fn new(name: &str, description: &str, value: f64, unit: &str, format: MetricFormat) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            value,
            unit: unit.to_string(),
            format,
        }
    }
}

/// Compute the dashboard's headline metrics.
///
/// Rates are 0 for an empty set. "Days Since Latest Release" has no
/// meaningful value without releases and is left out in that case.
pub fn calculate_metrics(releases: &[EnrichedRelease], now: DateTime<Utc>) -> Vec<DashboardMetric> {
    let total = releases.len();
    let repositories: HashSet<&str> = releases.iter().map(|r| r.repo_name.as_str()).collect();
    let weekday = releases
        .iter()
        .filter(|r| r.work_day_type == WorkDayType::Weekday)
        .count();
    let prerelease = releases.iter().filter(|r| r.is_prerelease).count();

    let intervals: Vec<i64> = releases
        .iter()
        .filter_map(|r| r.days_since_last_release)
        .collect();
    let average_interval = if intervals.is_empty() {
        0.0
    } else {
        intervals.iter().sum::<i64>() as f64 / intervals.len() as f64
    };

    let mut metrics = vec![
        DashboardMetric::new(
            "Total Releases",
            "Number of releases",
            total as f64,
            "releases",
            MetricFormat::Number,
        ),
        DashboardMetric::new(
            "Active Repositories",
            "Repositories with at least one release",
            repositories.len() as f64,
            "repositories",
            MetricFormat::Number,
        ),
        DashboardMetric::new(
            "Weekday Release Rate",
            "Share of releases published on a weekday",
            percentage(weekday, total),
            "%",
            MetricFormat::Percentage,
        ),
        DashboardMetric::new(
            "Pre-release Rate",
            "Share of releases flagged as pre-release",
            percentage(prerelease, total),
            "%",
            MetricFormat::Percentage,
        ),
        DashboardMetric::new(
            "Average Release Interval",
            "Average days between consecutive releases of a repository",
            average_interval.round(),
            "days",
            MetricFormat::Duration,
        ),
    ];

    if let Some(latest) = releases.iter().map(|r| r.published_at).max() {
        let days = (now - latest).num_milliseconds().div_euclid(MILLIS_PER_DAY);
        metrics.push(DashboardMetric::new(
            "Days Since Latest Release",
            "Whole days elapsed since the most recent release",
            days as f64,
            "days",
            MetricFormat::Duration,
        ));
    }

    metrics
}
