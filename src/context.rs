//! Cross-repository release context.
//!
//! Counts how many other releases, in any tracked repository, share a
//! release's day, ISO week and month.

use std::collections::HashMap;

use crate::temporal::TemporalFields;

/// Releases sharing a bucket with a given release, excluding itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextCounts {
    pub same_day: usize,
    pub same_week: usize,
    pub same_month: usize,
}

/// Count context for every release in a batch.
///
/// The result is index-aligned with `fields`.
pub fn count_context(fields: &[TemporalFields]) -> Vec<ContextCounts> {
    let mut by_day: HashMap<&str, usize> = HashMap::new();
    let mut by_week: HashMap<&str, usize> = HashMap::new();
    let mut by_month: HashMap<&str, usize> = HashMap::new();

    for f in fields {
        *by_day.entry(f.date.as_str()).or_insert(0) += 1;
        *by_week.entry(f.iso_week.as_str()).or_insert(0) += 1;
        *by_month.entry(f.month_key.as_str()).or_insert(0) += 1;
    }

    fields
        .iter()
        .map(|f| ContextCounts {
            same_day: others(&by_day, &f.date),
            same_week: others(&by_week, &f.iso_week),
            same_month: others(&by_month, &f.month_key),
        })
        .collect()
}

// Every key was counted above, so each count is at least one.
fn others(counts: &HashMap<&str, usize>, key: &str) -> usize {
    counts.get(key).copied().unwrap_or(1).saturating_sub(1)
}
