//! Dashboard assembly.
//!
//! Every request runs the full pipeline once: fetch the raw batch, enrich it,
//! apply the filter spec, then compute metrics, aggregations and the time
//! series independently over the filtered set.
//!
//! # Usage
//!
//! ```ignore
//! let dashboard = Dashboard::new(Arc::new(source));
//! let result = dashboard.compute_dashboard(FilterSpec::default()).await?;
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::aggregation::Aggregations;
use crate::data_sources::ReleaseSource;
use crate::enrichment::enrich_releases;
use crate::error::DashboardError;
use crate::filter::apply_filters;
use crate::metrics::{DashboardMetric, calculate_metrics};
use crate::model::{EnrichedRelease, FilterSpec};
use crate::stats::ReleaseStats;
use crate::timeseries::{TimeSeriesPoint, build_time_series};

/// Earliest and latest release date (`YYYY-MM-DD`) in the filtered set.
///
/// Both are empty strings when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRange {
    pub earliest_release: String,
    pub latest_release: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFreshness {
    /// When this result was generated.
    pub last_updated: DateTime<Utc>,
    pub data_range: DataRange,
}

/// Everything the dashboard shows for one filter spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResult {
    pub summary_metrics: Vec<DashboardMetric>,
    /// Enriched releases that passed the filters, in source order.
    pub raw_data: Vec<EnrichedRelease>,
    pub time_series: Vec<TimeSeriesPoint>,
    pub aggregations: Aggregations,
    pub filters_applied: FilterSpec,
    pub data_freshness: DataFreshness,
}

/// Dashboard over an injected release source.
#[derive(Clone)]
pub struct Dashboard {
    source: Arc<dyn ReleaseSource>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn ReleaseSource>) -> Self {
        Self { source }
    }

    /// Fetch the raw batch and enrich it.
    async fn fetch_enriched(&self) -> Result<Vec<EnrichedRelease>, DashboardError> {
        let raw = self.source.fetch_release_batch().await.map_err(|e| {
            warn!(error = %e, "Release source unavailable");
            DashboardError::SourceUnavailable(e)
        })?;
        Ok(enrich_releases(&raw))
    }

    /// Compute the dashboard for `filters`.
    ///
    /// A source failure yields an error and no partial result.
    #[instrument(skip(self))]
    pub async fn compute_dashboard(
        &self,
        filters: FilterSpec,
    ) -> Result<DashboardResult, DashboardError> {
        let enriched = self.fetch_enriched().await?;
        let fetched = enriched.len();
        let result = assemble_dashboard(enriched, filters, Utc::now());

        info!(
            fetched,
            matched = result.raw_data.len(),
            "Dashboard computed"
        );
        Ok(result)
    }

    /// Build the release statistics report over every release.
    #[instrument(skip(self))]
    pub async fn release_stats(&self) -> Result<ReleaseStats, DashboardError> {
        let enriched = self.fetch_enriched().await?;
        let stats = ReleaseStats::from_releases(&enriched, Utc::now());

        info!(total_releases = stats.total_releases, "Release stats computed");
        Ok(stats)
    }
}

/// Filter already-enriched releases and package the dashboard.
pub fn assemble_dashboard(
    enriched: Vec<EnrichedRelease>,
    filters: FilterSpec,
    now: DateTime<Utc>,
) -> DashboardResult {
    let filtered = apply_filters(enriched, &filters);

    let data_range = DataRange {
        earliest_release: filtered
            .iter()
            .map(|r| r.published_date.as_str())
            .min()
            .unwrap_or_default()
            .to_string(),
        latest_release: filtered
            .iter()
            .map(|r| r.published_date.as_str())
            .max()
            .unwrap_or_default()
            .to_string(),
    };

    DashboardResult {
        summary_metrics: calculate_metrics(&filtered, now),
        time_series: build_time_series(&filtered),
        aggregations: Aggregations::from_releases(&filtered),
        raw_data: filtered,
        filters_applied: filters,
        data_freshness: DataFreshness {
            last_updated: now,
            data_range,
        },
    }
}
