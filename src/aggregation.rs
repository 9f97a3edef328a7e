//! Grouping of filtered releases into count/percentage summaries.
//!
//! Each supported grouping is a [`Dimension`] with a typed key extractor, so
//! there is no lookup of fields by name.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::EnrichedRelease;

/// One group in an aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationRow {
    pub key: String,
    pub count: usize,
    /// `100 * count / total`, or 0 when there are no releases.
    pub percentage: f64,
}

/// A field releases can be grouped by.
///
/// Serialized as the matching [`Aggregations`] field name (`by_repo`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "by_repo")]
    Repository,
    #[serde(rename = "by_date")]
    Date,
    #[serde(rename = "by_day_of_week")]
    DayOfWeek,
    #[serde(rename = "by_month")]
    Month,
    #[serde(rename = "by_quarter")]
    Quarter,
    #[serde(rename = "by_time_period")]
    TimePeriod,
    #[serde(rename = "by_release_type")]
    ReleaseType,
}

impl Dimension {
    /// Every dimension the dashboard reports.
    pub const ALL: [Dimension; 7] = [
        Dimension::Repository,
        Dimension::Date,
        Dimension::DayOfWeek,
        Dimension::Month,
        Dimension::Quarter,
        Dimension::TimePeriod,
        Dimension::ReleaseType,
    ];

    /// Group key of a release along this dimension.
    pub fn key_of<'a>(&self, release: &'a EnrichedRelease) -> &'a str {
        match self {
            Dimension::Repository => &release.repo_name,
            Dimension::Date => &release.published_date,
            Dimension::DayOfWeek => &release.published_day_name,
            Dimension::Month => &release.month_key,
            Dimension::Quarter => &release.quarter_key,
            Dimension::TimePeriod => release.time_period.as_str(),
            Dimension::ReleaseType => release.release_type.as_str(),
        }
    }
}

/// Percentage of `part` in `total`, 0 when `total` is 0.
pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Group releases along `dimension`, largest groups first.
///
/// Groups with equal counts are ordered by key.
pub fn aggregate_by(releases: &[EnrichedRelease], dimension: Dimension) -> Vec<AggregationRow> {
    let total = releases.len();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for release in releases {
        *counts.entry(dimension.key_of(release)).or_insert(0) += 1;
    }

    let mut rows: Vec<AggregationRow> = counts
        .into_iter()
        .map(|(key, count)| AggregationRow {
            key: key.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    rows
}

/// Aggregations along every dashboard dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregations {
    pub by_repo: Vec<AggregationRow>,
    pub by_date: Vec<AggregationRow>,
    pub by_day_of_week: Vec<AggregationRow>,
    pub by_month: Vec<AggregationRow>,
    pub by_quarter: Vec<AggregationRow>,
    pub by_time_period: Vec<AggregationRow>,
    pub by_release_type: Vec<AggregationRow>,
}

impl Aggregations {
    /// Compute all seven aggregations over a release set.
    pub fn from_releases(releases: &[EnrichedRelease]) -> Self {
        let mut aggregations = Aggregations::default();
        for dimension in Dimension::ALL {
            *aggregations.rows_mut(dimension) = aggregate_by(releases, dimension);
        }
        aggregations
    }

    fn rows_mut(&mut self, dimension: Dimension) -> &mut Vec<AggregationRow> {
        match dimension {
            Dimension::Repository => &mut self.by_repo,
            Dimension::Date => &mut self.by_date,
            Dimension::DayOfWeek => &mut self.by_day_of_week,
            Dimension::Month => &mut self.by_month,
            Dimension::Quarter => &mut self.by_quarter,
            Dimension::TimePeriod => &mut self.by_time_period,
            Dimension::ReleaseType => &mut self.by_release_type,
        }
    }

    /// Keyed by dimension, restricted to `only` when given.
    ///
    /// Serializes with the same keys as the struct itself.
    pub fn into_map(mut self, only: Option<Dimension>) -> BTreeMap<Dimension, Vec<AggregationRow>> {
        Dimension::ALL
            .into_iter()
            .filter(|d| only.is_none_or(|o| o == *d))
            .map(|d| (d, std::mem::take(self.rows_mut(d))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::enriched;

    fn batch() -> Vec<EnrichedRelease> {
        enriched(&[
            ("stackflow", "v1.0.0", "2024-01-15T09:00:00Z"),
            ("stackflow", "v1.1", "2024-01-16T13:00:00Z"),
            ("stackflow", "v2", "2024-04-02T13:00:00Z"),
            ("seed-design", "v0.1.0-alpha.1", "2024-01-15T20:00:00Z"),
        ])
    }

    #[test]
    fn test_aggregate_by_repository() {
        let rows = aggregate_by(&batch(), Dimension::Repository);

        assert_eq!(
            rows,
            vec![
                AggregationRow {
                    key: "stackflow".to_string(),
                    count: 3,
                    percentage: 75.0,
                },
                AggregationRow {
                    key: "seed-design".to_string(),
                    count: 1,
                    percentage: 25.0,
                },
            ]
        );
    }

    #[test]
    fn test_typed_keys() {
        let releases = batch();

        let types: Vec<_> = aggregate_by(&releases, Dimension::ReleaseType)
            .into_iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(types, ["major", "minor", "patch", "pre-release"]);

        let periods = aggregate_by(&releases, Dimension::TimePeriod);
        assert_eq!(periods[0].key, "AFTERNOON");
        assert_eq!(periods[0].count, 2);

        let quarters = aggregate_by(&releases, Dimension::Quarter);
        assert_eq!(quarters[0].key, "2024-Q1");
        assert_eq!(quarters[1].key, "2024-Q2");

        let days = aggregate_by(&releases, Dimension::DayOfWeek);
        assert_eq!(days[0].key, "Monday");
        assert_eq!(days[0].count, 2);
    }

    #[test]
    fn test_sorted_descending_by_count() {
        let rows = aggregate_by(&batch(), Dimension::Date);

        assert!(rows.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(rows[0].key, "2024-01-15");
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let releases = batch();
        for dimension in Dimension::ALL {
            let sum: f64 = aggregate_by(&releases, dimension)
                .iter()
                .map(|r| r.percentage)
                .sum();
            assert!((sum - 100.0).abs() < 1e-9, "{dimension:?} summed to {sum}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_by(&[], Dimension::Repository).is_empty());
        assert_eq!(Aggregations::from_releases(&[]), Aggregations::default());
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn test_map_view_matches_struct_keys() {
        let aggregations = Aggregations::from_releases(&batch());

        let all = serde_json::to_value(aggregations.clone().into_map(None)).unwrap();
        assert_eq!(all, serde_json::to_value(&aggregations).unwrap());

        let only = aggregations.clone().into_map(Some(Dimension::Repository));
        assert_eq!(only.len(), 1);
        assert_eq!(only[&Dimension::Repository], aggregations.by_repo);
    }

    #[test]
    fn test_dimension_names() {
        let dimension: Dimension = serde_json::from_str("\"by_day_of_week\"").unwrap();
        assert_eq!(dimension, Dimension::DayOfWeek);
        assert!(serde_json::from_str::<Dimension>("\"repository\"").is_err());
    }

    #[test]
    fn test_all_dimensions_populated() {
        let aggregations = Aggregations::from_releases(&batch());

        assert_eq!(aggregations.by_repo.len(), 2);
        assert_eq!(aggregations.by_date.len(), 3);
        assert_eq!(aggregations.by_day_of_week.len(), 2);
        assert_eq!(aggregations.by_month.len(), 2);
        assert_eq!(aggregations.by_quarter.len(), 2);
        assert_eq!(aggregations.by_time_period.len(), 3);
        assert_eq!(aggregations.by_release_type.len(), 4);
    }
}
