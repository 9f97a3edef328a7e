//! Data models for release-insights.
//!
//! [`RawRelease`] is what a release source hands us. [`EnrichedRelease`] is the
//! core unit every downstream stage consumes: the raw fields plus version,
//! calendar, sequencing and cross-repository context. Both are immutable once
//! built; every request derives a fresh set.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// A single release as supplied by a release source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRelease {
    /// Repository owner (e.g. "daangn").
    pub repo_owner: String,

    /// Repository name (e.g. "stackflow").
    pub repo_name: String,

    /// Release tag (e.g. "v1.2.3").
    pub tag_name: String,

    /// Release title. May be empty.
    #[serde(default)]
    pub release_name: String,

    /// Release notes. May be empty.
    #[serde(default)]
    pub body: String,

    /// When the release was published.
    pub published_at: DateTime<Utc>,

    #[serde(default)]
    pub draft: bool,

    #[serde(default)]
    pub prerelease: bool,
}

/// Release type derived from the version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseType {
    /// Tag has only a major component (`v1`).
    Major,
    /// Tag has major and minor components (`v1.2`).
    Minor,
    /// Tag has major, minor and patch components (`v1.2.3`).
    Patch,
    /// Tag carries a `-suffix` (`v1.2.3-rc.1`).
    PreRelease,
    /// Tag does not look like a version at all.
    Unknown,
}

impl ReleaseType {
    /// Get the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Major => "major",
            ReleaseType::Minor => "minor",
            ReleaseType::Patch => "patch",
            ReleaseType::PreRelease => "pre-release",
            ReleaseType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseType {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(ReleaseType::Major),
            "minor" => Ok(ReleaseType::Minor),
            "patch" => Ok(ReleaseType::Patch),
            "pre-release" => Ok(ReleaseType::PreRelease),
            "unknown" => Ok(ReleaseType::Unknown),
            other => Err(LabelError::new("release type", other)),
        }
    }
}

/// Working-day classification of the publish date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkDayType {
    Weekday,
    Weekend,
    /// Reserved for a holiday calendar. Never assigned by the enricher.
    Holiday,
}

impl WorkDayType {
    /// Get the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkDayType::Weekday => "WEEKDAY",
            WorkDayType::Weekend => "WEEKEND",
            WorkDayType::Holiday => "HOLIDAY",
        }
    }
}

impl fmt::Display for WorkDayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkDayType {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WEEKDAY" => Ok(WorkDayType::Weekday),
            "WEEKEND" => Ok(WorkDayType::Weekend),
            "HOLIDAY" => Ok(WorkDayType::Holiday),
            other => Err(LabelError::new("work day type", other)),
        }
    }
}

/// Coarse time-of-day bucket of the publish time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimePeriod {
    /// 06:00 to 11:59.
    Morning,
    /// 12:00 to 17:59.
    Afternoon,
    /// 18:00 to 21:59.
    Evening,
    /// 22:00 to 05:59.
    Night,
}

impl TimePeriod {
    /// Bucket an hour of the day (0-23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimePeriod::Morning,
            12..=17 => TimePeriod::Afternoon,
            18..=21 => TimePeriod::Evening,
            _ => TimePeriod::Night,
        }
    }

    /// Get the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Morning => "MORNING",
            TimePeriod::Afternoon => "AFTERNOON",
            TimePeriod::Evening => "EVENING",
            TimePeriod::Night => "NIGHT",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimePeriod {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MORNING" => Ok(TimePeriod::Morning),
            "AFTERNOON" => Ok(TimePeriod::Afternoon),
            "EVENING" => Ok(TimePeriod::Evening),
            "NIGHT" => Ok(TimePeriod::Night),
            other => Err(LabelError::new("time period", other)),
        }
    }
}

/// A release with every derived field the dashboard needs.
///
/// Field names follow the wire format the dashboard client reads.
/// Calendar fields are derived in UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRelease {
    // Identity
    /// Synthetic identifier: `{repo}_{tag}_{timestamp_ms}`.
    pub id: String,
    pub repo_name: String,
    pub repo_owner: String,
    pub tag_name: String,
    /// Release title, falling back to the tag when the title is empty.
    pub release_name: String,

    // Calendar
    pub published_at: DateTime<Utc>,
    /// Unix timestamp in milliseconds.
    pub published_timestamp: i64,
    /// `YYYY-MM-DD`.
    pub published_date: String,
    /// `HH:MM:SS`.
    pub published_time: String,
    pub published_year: i32,
    /// 1-12.
    pub published_month: u32,
    /// 1-31.
    pub published_day: u32,
    /// 1-4.
    pub published_quarter: u32,
    /// Week of the month, `ceil(day / 7)`.
    pub published_week_number: u32,
    /// ISO-8601 week, `YYYY-Www`.
    pub published_iso_week: String,
    /// 0 = Sunday, 6 = Saturday.
    pub published_day_of_week: u32,
    pub published_day_name: String,
    pub published_month_name: String,

    // Working-day classification
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub work_day_type: WorkDayType,

    // Release metadata
    pub release_body: String,
    /// Length of the release notes in characters.
    pub release_body_length: usize,
    pub has_release_notes: bool,
    pub release_type: ReleaseType,
    pub version_major: Option<u64>,
    pub version_minor: Option<u64>,
    pub version_patch: Option<u64>,
    pub is_prerelease: bool,
    pub is_draft: bool,

    // Sequencing within the repository, over its complete history
    pub days_since_last_release: Option<i64>,
    pub days_since_first_release: i64,
    pub days_until_next_release: Option<i64>,
    /// 1-based position in ascending publish order.
    pub release_sequence_number: usize,
    pub total_releases_in_repo: usize,

    // Cross-repository context, excluding this release
    pub same_day_releases: usize,
    pub same_week_releases: usize,
    pub same_month_releases: usize,

    // Pattern analysis
    /// 0-23.
    pub hour_of_day: u32,
    pub time_period: TimePeriod,
    /// Day 1 to 7.
    pub is_month_start: bool,
    /// Day 24 onwards.
    pub is_month_end: bool,
    pub is_year_start: bool,
    pub is_year_end: bool,

    // Aggregation keys
    /// `YYYYMMDD`.
    pub date_key: String,
    /// Same as `published_iso_week`.
    pub week_key: String,
    /// `YYYY-MM`.
    pub month_key: String,
    /// `YYYY-Qn`.
    pub quarter_key: String,
    /// `YYYY`.
    pub year_key: String,
}

/// Declarative filter over enriched releases.
///
/// Every set predicate must pass. Empty lists and `None` values are unset and
/// always pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Repository allow-list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repo_names: Vec<String>,

    /// Inclusive lower bound, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,

    /// Inclusive upper bound, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work_day_types: Vec<WorkDayType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub release_types: Vec<ReleaseType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_periods: Vec<TimePeriod>,

    /// Only `Some(false)` excludes pre-releases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_prereleases: Option<bool>,

    /// Only `Some(false)` excludes drafts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_drafts: Option<bool>,

    /// Minimum `days_since_last_release`; first releases are never dropped by it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_days_between_releases: Option<i64>,

    /// Maximum `days_since_last_release`; first releases are never dropped by it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_days_between_releases: Option<i64>,
}
