//! Filter application over enriched releases.
//!
//! Filters run strictly after enrichment so sequence numbers and intervals
//! always reflect a repository's full history.

use crate::model::{EnrichedRelease, FilterSpec};

impl FilterSpec {
    /// Whether this filter sets no predicate at all.
    pub fn is_empty(&self) -> bool {
        *self == FilterSpec::default()
    }

    /// Check a single release against every set predicate.
    pub fn matches(&self, release: &EnrichedRelease) -> bool {
        if !self.repo_names.is_empty() && !self.repo_names.contains(&release.repo_name) {
            return false;
        }

        // Zero-padded YYYY-MM-DD compares correctly as a string.
        if let Some(from) = &self.date_from {
            if release.published_date.as_str() < from.as_str() {
                return false;
            }
        }
        if let Some(to) = &self.date_to {
            if release.published_date.as_str() > to.as_str() {
                return false;
            }
        }

        if !self.work_day_types.is_empty() && !self.work_day_types.contains(&release.work_day_type)
        {
            return false;
        }
        if !self.release_types.is_empty() && !self.release_types.contains(&release.release_type) {
            return false;
        }
        if !self.time_periods.is_empty() && !self.time_periods.contains(&release.time_period) {
            return false;
        }

        if self.include_prereleases == Some(false) && release.is_prerelease {
            return false;
        }
        if self.include_drafts == Some(false) && release.is_draft {
            return false;
        }

        if let Some(days) = release.days_since_last_release {
            if self.min_days_between_releases.is_some_and(|min| days < min) {
                return false;
            }
            if self.max_days_between_releases.is_some_and(|max| days > max) {
                return false;
            }
        }

        true
    }
}

/// Keep the releases matching `filters`, preserving order.
pub fn apply_filters(releases: Vec<EnrichedRelease>, filters: &FilterSpec) -> Vec<EnrichedRelease> {
    if filters.is_empty() {
        return releases;
    }
    releases.into_iter().filter(|r| filters.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::enrich_releases;
    use crate::model::{ReleaseType, TimePeriod, WorkDayType};
    use crate::test_support::{enriched, raw_release};

    fn batch() -> Vec<EnrichedRelease> {
        enriched(&[
            ("stackflow", "v1.0.0", "2024-01-01T09:00:00Z"),
            ("stackflow", "v1.1.0", "2024-01-13T15:00:00Z"),
            ("stackflow", "v1.2.0-beta.1", "2024-01-20T20:00:00Z"),
            ("seed-design", "v2.0.0", "2024-01-15T10:00:00Z"),
            ("seed-design", "v2.0.1", "2024-01-16T23:00:00Z"),
        ])
    }

    fn tags(releases: &[EnrichedRelease]) -> Vec<&str> {
        releases.iter().map(|r| r.tag_name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let all = batch();
        assert_eq!(apply_filters(all.clone(), &FilterSpec::default()), all);
    }

    #[test]
    fn test_weekday_filter_drops_only_saturday() {
        let releases = enriched(&[
            ("stackflow", "v1.0.0", "2024-01-13T10:00:00Z"),
            ("stackflow", "v1.1.0", "2024-01-15T10:00:00Z"),
            ("stackflow", "v1.2.0", "2024-01-16T10:00:00Z"),
        ]);
        let filters = FilterSpec {
            work_day_types: vec![WorkDayType::Weekday],
            ..Default::default()
        };

        let kept = apply_filters(releases, &filters);

        assert_eq!(tags(&kept), ["v1.1.0", "v1.2.0"]);
    }

    #[test]
    fn test_repo_and_date_range() {
        let filters = FilterSpec {
            repo_names: vec!["stackflow".to_string()],
            date_from: Some("2024-01-13".to_string()),
            date_to: Some("2024-01-20".to_string()),
            ..Default::default()
        };

        let kept = apply_filters(batch(), &filters);

        assert_eq!(tags(&kept), ["v1.1.0", "v1.2.0-beta.1"]);
    }

    #[test]
    fn test_release_type_and_time_period() {
        let filters = FilterSpec {
            release_types: vec![ReleaseType::Minor, ReleaseType::Patch],
            time_periods: vec![TimePeriod::Morning, TimePeriod::Night],
            ..Default::default()
        };

        let kept = apply_filters(batch(), &filters);

        assert_eq!(tags(&kept), ["v1.0.0", "v2.0.0", "v2.0.1"]);
    }

    #[test]
    fn test_prerelease_and_draft_exclusion() {
        let mut pre = raw_release("stackflow", "v1.0.0-rc.1", "2024-01-01T09:00:00Z");
        pre.prerelease = true;
        let mut draft = raw_release("stackflow", "v1.0.0", "2024-01-02T09:00:00Z");
        draft.draft = true;
        let plain = raw_release("stackflow", "v1.0.1", "2024-01-03T09:00:00Z");
        let releases = enrich_releases(&[pre, draft, plain]);

        let include_all = FilterSpec {
            include_prereleases: Some(true),
            include_drafts: Some(true),
            ..Default::default()
        };
        assert_eq!(apply_filters(releases.clone(), &include_all).len(), 3);

        let exclude = FilterSpec {
            include_prereleases: Some(false),
            include_drafts: Some(false),
            ..Default::default()
        };
        assert_eq!(tags(&apply_filters(releases, &exclude)), ["v1.0.1"]);
    }

    #[test]
    fn test_interval_bounds_skip_first_release() {
        // stackflow intervals: none, 13, 8. seed-design: none, 2.
        let filters = FilterSpec {
            min_days_between_releases: Some(3),
            max_days_between_releases: Some(10),
            ..Default::default()
        };

        let kept = apply_filters(batch(), &filters);

        assert_eq!(tags(&kept), ["v1.0.0", "v1.2.0-beta.1", "v2.0.0"]);
    }

    #[test]
    fn test_zero_max_interval_keeps_only_first_releases() {
        // Zero is a real bound, not "unset"; every later release is at least a day apart.
        let filters = FilterSpec {
            max_days_between_releases: Some(0),
            ..Default::default()
        };

        let kept = apply_filters(batch(), &filters);

        assert_eq!(tags(&kept), ["v1.0.0", "v2.0.0"]);
    }

    #[test]
    fn test_holiday_filter_keeps_nothing() {
        let filters = FilterSpec {
            work_day_types: vec![WorkDayType::Holiday],
            ..Default::default()
        };

        let kept = apply_filters(batch(), &filters);

        assert!(kept.is_empty());
        assert!(batch().iter().all(|r| !r.is_holiday));
    }

    #[test]
    fn test_intervals_come_from_unfiltered_history() {
        let filters = FilterSpec {
            date_from: Some("2024-01-20".to_string()),
            ..Default::default()
        };

        let kept = apply_filters(batch(), &filters);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].release_sequence_number, 3);
        assert_eq!(kept[0].days_since_last_release, Some(8));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let filters = FilterSpec {
            work_day_types: vec![WorkDayType::Weekday],
            include_prereleases: Some(false),
            ..Default::default()
        };

        let once = apply_filters(batch(), &filters);
        let twice = apply_filters(once.clone(), &filters);

        assert_eq!(once, twice);
    }
}
