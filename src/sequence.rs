//! Per-repository release sequencing.
//!
//! Sequencing must run on a repository's complete history. Filtering first
//! would renumber releases and stretch the intervals between them.

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: u64 = 86_400_000;

/// Position of a release within its repository's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceInfo {
    /// 1-based rank in ascending publish order.
    pub sequence_number: usize,
    /// `None` for the first release.
    pub days_since_last_release: Option<i64>,
    /// 0 for the first release.
    pub days_since_first_release: i64,
    /// `None` for the last release.
    pub days_until_next_release: Option<i64>,
    pub total_releases_in_repo: usize,
}

/// Whole calendar days between two instants, rounded up.
///
/// Any non-zero gap counts as at least one day.
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let millis = (b - a).num_milliseconds().unsigned_abs();
    i64::try_from(millis.div_ceil(MILLIS_PER_DAY)).unwrap_or(i64::MAX)
}

/// Sequence one repository's releases.
///
/// `published` may be in any order; the result is index-aligned with it.
/// Ties keep their input order.
pub fn analyze_repository(published: &[DateTime<Utc>]) -> Vec<SequenceInfo> {
    let total = published.len();
    let mut order: Vec<usize> = (0..total).collect();
    order.sort_by_key(|&i| published[i]);

    let mut result = vec![
        SequenceInfo {
            sequence_number: 0,
            days_since_last_release: None,
            days_since_first_release: 0,
            days_until_next_release: None,
            total_releases_in_repo: total,
        };
        total
    ];

    let Some(&first) = order.first() else {
        return result;
    };
    let first_at = published[first];

    for (rank, &index) in order.iter().enumerate() {
        let at = published[index];
        let previous = rank.checked_sub(1).map(|p| published[order[p]]);
        let next = order.get(rank + 1).map(|&n| published[n]);

        result[index] = SequenceInfo {
            sequence_number: rank + 1,
            days_since_last_release: previous.map(|prev| days_between(prev, at)),
            days_since_first_release: days_between(first_at, at),
            days_until_next_release: next.map(|next| days_between(at, next)),
            total_releases_in_repo: total,
        };
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_days_between_rounds_up() {
        assert_eq!(days_between(at("2024-01-01T00:00:00Z"), at("2024-01-01T00:00:00Z")), 0);
        assert_eq!(days_between(at("2024-01-01T00:00:00Z"), at("2024-01-01T00:00:01Z")), 1);
        assert_eq!(days_between(at("2024-01-01T00:00:00Z"), at("2024-01-02T00:00:00Z")), 1);
        assert_eq!(days_between(at("2024-01-01T00:00:00Z"), at("2024-01-02T12:00:00Z")), 2);
        // Order does not matter.
        assert_eq!(days_between(at("2024-01-10T00:00:00Z"), at("2024-01-01T00:00:00Z")), 9);
    }

    #[test]
    fn test_sequence_is_contiguous_and_index_aligned() {
        let published = [
            at("2024-03-01T00:00:00Z"),
            at("2024-01-01T00:00:00Z"),
            at("2024-01-11T00:00:00Z"),
        ];

        let info = analyze_repository(&published);

        assert_eq!(info[1].sequence_number, 1);
        assert_eq!(info[2].sequence_number, 2);
        assert_eq!(info[0].sequence_number, 3);
        assert!(info.iter().all(|i| i.total_releases_in_repo == 3));

        assert_eq!(info[1].days_since_last_release, None);
        assert_eq!(info[1].days_since_first_release, 0);
        assert_eq!(info[1].days_until_next_release, Some(10));

        assert_eq!(info[2].days_since_last_release, Some(10));
        assert_eq!(info[2].days_until_next_release, Some(50));

        assert_eq!(info[0].days_since_last_release, Some(50));
        assert_eq!(info[0].days_since_first_release, 60);
        assert_eq!(info[0].days_until_next_release, None);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let same = at("2024-05-05T05:05:05Z");
        let info = analyze_repository(&[same, same]);

        assert_eq!(info[0].sequence_number, 1);
        assert_eq!(info[1].sequence_number, 2);
        assert_eq!(info[1].days_since_last_release, Some(0));
    }

    #[test]
    fn test_single_and_empty() {
        let info = analyze_repository(&[at("2024-01-01T00:00:00Z")]);
        assert_eq!(
            info,
            vec![SequenceInfo {
                sequence_number: 1,
                days_since_last_release: None,
                days_since_first_release: 0,
                days_until_next_release: None,
                total_releases_in_repo: 1,
            }]
        );

        assert!(analyze_repository(&[]).is_empty());
    }
}
