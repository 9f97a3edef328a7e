//! Daily release counts with a running total.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::EnrichedRelease;

/// Releases published on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Midnight UTC of `date`, Unix milliseconds.
    pub timestamp: i64,
    pub count: usize,
    /// Releases up to and including `date`.
    pub cumulative_count: usize,
}

/// Build the daily series in ascending date order.
///
/// Days without releases are omitted. The last cumulative count equals the
/// number of releases.
pub fn build_time_series(releases: &[EnrichedRelease]) -> Vec<TimeSeriesPoint> {
    let mut daily: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for release in releases {
        *daily.entry(release.published_at.date_naive()).or_insert(0) += 1;
    }

    let mut cumulative = 0;
    daily
        .into_iter()
        .map(|(date, count)| {
            cumulative += count;
            TimeSeriesPoint {
                date: date.format("%Y-%m-%d").to_string(),
                timestamp: date.and_time(NaiveTime::MIN).and_utc().timestamp_millis(),
                count,
                cumulative_count: cumulative,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::enriched;

    #[test]
    fn test_cumulative_series() {
        let releases = enriched(&[
            ("stackflow", "v1.2.0", "2024-01-20T10:00:00Z"),
            ("stackflow", "v1.0.0", "2024-01-15T10:00:00Z"),
            ("seed-design", "v2.0.0", "2024-01-15T18:00:00Z"),
            ("stackflow", "v1.1.0", "2024-01-16T10:00:00Z"),
        ]);

        let series = build_time_series(&releases);

        assert_eq!(
            series,
            vec![
                TimeSeriesPoint {
                    date: "2024-01-15".to_string(),
                    timestamp: 1_705_276_800_000,
                    count: 2,
                    cumulative_count: 2,
                },
                TimeSeriesPoint {
                    date: "2024-01-16".to_string(),
                    timestamp: 1_705_363_200_000,
                    count: 1,
                    cumulative_count: 3,
                },
                TimeSeriesPoint {
                    date: "2024-01-20".to_string(),
                    timestamp: 1_705_708_800_000,
                    count: 1,
                    cumulative_count: 4,
                },
            ]
        );
    }

    #[test]
    fn test_series_is_non_decreasing_and_ends_at_total() {
        let releases = enriched(&[
            ("stackflow", "v1.0.0", "2023-12-31T23:59:59Z"),
            ("stackflow", "v1.0.1", "2024-01-01T00:00:00Z"),
            ("seed-design", "v1.0.0", "2024-03-01T12:00:00Z"),
            ("seed-design", "v1.0.1", "2024-03-01T13:00:00Z"),
            ("seed-design", "v1.0.2", "2024-02-29T13:00:00Z"),
        ]);

        let series = build_time_series(&releases);

        assert!(
            series
                .windows(2)
                .all(|w| w[1].cumulative_count == w[0].cumulative_count + w[1].count)
        );
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(series.last().unwrap().cumulative_count, releases.len());
    }

    #[test]
    fn test_empty_series() {
        assert!(build_time_series(&[]).is_empty());
    }
}
