//! Turns a raw release batch into enriched releases.
//!
//! Version classification and calendar derivation are per release, sequencing
//! is per repository and context counting spans the whole batch. All of it
//! runs over the complete, unfiltered batch.

use std::collections::HashMap;

use tracing::debug;

use crate::context::count_context;
use crate::model::{EnrichedRelease, RawRelease, ReleaseType};
use crate::sequence::{SequenceInfo, analyze_repository};
use crate::temporal::TemporalFields;
use crate::version::classify;

/// Enrich every release in a batch.
///
/// The output preserves the input order.
pub fn enrich_releases(raw: &[RawRelease]) -> Vec<EnrichedRelease> {
    let temporal: Vec<TemporalFields> = raw
        .iter()
        .map(|r| TemporalFields::derive(r.published_at))
        .collect();
    let sequence = sequence_by_repository(raw);
    let context = count_context(&temporal);

    let enriched: Vec<EnrichedRelease> = raw
        .iter()
        .zip(temporal)
        .zip(sequence)
        .zip(context)
        .map(|(((release, t), s), c)| {
            let version = classify(&release.tag_name);
            if version.release_type == ReleaseType::Unknown {
                debug!(
                    repo = %release.repo_name,
                    tag = %release.tag_name,
                    "Tag is not a version; classified as unknown"
                );
            }

            let release_name = if release.release_name.is_empty() {
                release.tag_name.clone()
            } else {
                release.release_name.clone()
            };

            EnrichedRelease {
                id: format!(
                    "{}_{}_{}",
                    release.repo_name, release.tag_name, t.timestamp_millis
                ),
                repo_name: release.repo_name.clone(),
                repo_owner: release.repo_owner.clone(),
                tag_name: release.tag_name.clone(),
                release_name,

                published_at: release.published_at,
                published_timestamp: t.timestamp_millis,
                published_date: t.date,
                published_time: t.time,
                published_year: t.year,
                published_month: t.month,
                published_day: t.day,
                published_quarter: t.quarter,
                published_week_number: t.week_of_month,
                published_iso_week: t.iso_week.clone(),
                published_day_of_week: t.day_of_week,
                published_day_name: t.day_name,
                published_month_name: t.month_name,

                is_weekend: t.is_weekend,
                is_holiday: false,
                work_day_type: t.work_day_type,

                release_body: release.body.clone(),
                release_body_length: release.body.chars().count(),
                has_release_notes: !release.body.trim().is_empty(),
                release_type: version.release_type,
                version_major: version.major,
                version_minor: version.minor,
                version_patch: version.patch,
                is_prerelease: release.prerelease,
                is_draft: release.draft,

                days_since_last_release: s.days_since_last_release,
                days_since_first_release: s.days_since_first_release,
                days_until_next_release: s.days_until_next_release,
                release_sequence_number: s.sequence_number,
                total_releases_in_repo: s.total_releases_in_repo,

                same_day_releases: c.same_day,
                same_week_releases: c.same_week,
                same_month_releases: c.same_month,

                hour_of_day: t.hour,
                time_period: t.time_period,
                is_month_start: t.is_month_start,
                is_month_end: t.is_month_end,
                is_year_start: t.is_year_start,
                is_year_end: t.is_year_end,

                date_key: t.date_key,
                week_key: t.iso_week,
                month_key: t.month_key,
                quarter_key: t.quarter_key,
                year_key: t.year_key,
            }
        })
        .collect();

    debug!(releases = enriched.len(), "Enriched release batch");
    enriched
}

/// Sequence info for every release, index-aligned with `raw`.
fn sequence_by_repository(raw: &[RawRelease]) -> Vec<SequenceInfo> {
    let mut by_repo: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
    for (i, release) in raw.iter().enumerate() {
        by_repo
            .entry((release.repo_owner.as_str(), release.repo_name.as_str()))
            .or_default()
            .push(i);
    }

    let mut result: Vec<Option<SequenceInfo>> = vec![None; raw.len()];
    for indices in by_repo.values() {
        let published: Vec<_> = indices.iter().map(|&i| raw[i].published_at).collect();
        for (&i, info) in indices.iter().zip(analyze_repository(&published)) {
            result[i] = Some(info);
        }
    }

    // Every index belongs to exactly one repository group.
    result.into_iter().flatten().collect()
}
