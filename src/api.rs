//! HTTP API handlers for release-insights.
//!
//! A thin transport over [`Dashboard`]: query parameters become a
//! [`FilterSpec`], the dashboard does the work, the result goes out as JSON.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /dashboard` - Full dashboard for the given filters
//! - `GET /dashboard/raw` - Filtered releases, paginated
//! - `GET /dashboard/metrics` - Headline metrics only
//! - `GET /dashboard/aggregations` - Aggregations, all or one `type`
//! - `GET /dashboard/timeseries` - Daily series with its date range
//! - `GET /releases/stats` - Release statistics report
//!
//! # Filter parameters
//!
//! List parameters (`repos`, `work_day_types`, `release_types`,
//! `time_periods`) are comma-separated. `include_prereleases` and
//! `include_drafts` are true only for the literal `true`. Non-numeric
//! interval bounds are ignored; unknown enum labels are rejected with `400`
//! rather than degrading to an empty result.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::aggregation::{AggregationRow, Dimension};
use crate::dashboard::{DataRange, Dashboard, DashboardResult};
use crate::error::{DashboardError, LabelError};
use crate::metrics::DashboardMetric;
use crate::model::{EnrichedRelease, FilterSpec};
use crate::stats::ReleaseStats;
use crate::timeseries::TimeSeriesPoint;

const DEFAULT_PAGE: usize = 1;
const DEFAULT_PAGE_LIMIT: usize = 50;
const MAX_PAGE_LIMIT: usize = 1000;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/raw", get(get_raw_data))
        .route("/dashboard/metrics", get(get_metrics))
        .route("/dashboard/aggregations", get(get_aggregations))
        .route("/dashboard/timeseries", get(get_time_series))
        .route("/releases/stats", get(get_release_stats))
        .with_state(state)
}

/// Filter query parameters shared by the dashboard endpoints.
///
/// Everything arrives as text and is interpreted by [`Self::into_filter_spec`].
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub repos: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub work_day_types: Option<String>,
    pub release_types: Option<String>,
    pub time_periods: Option<String>,
    pub include_prereleases: Option<String>,
    pub include_drafts: Option<String>,
    pub min_days_between_releases: Option<String>,
    pub max_days_between_releases: Option<String>,
}

impl DashboardQuery {
    /// Interpret the raw parameters as a filter spec.
    pub fn into_filter_spec(self) -> Result<FilterSpec, LabelError> {
        Ok(FilterSpec {
            repo_names: split_list(self.repos.as_deref()),
            date_from: non_blank(self.date_from),
            date_to: non_blank(self.date_to),
            work_day_types: parse_list(self.work_day_types.as_deref())?,
            release_types: parse_list(self.release_types.as_deref())?,
            time_periods: parse_list(self.time_periods.as_deref())?,
            include_prereleases: self.include_prereleases.map(|v| v == "true"),
            include_drafts: self.include_drafts.map(|v| v == "true"),
            min_days_between_releases: parse_bound(self.min_days_between_releases.as_deref()),
            max_days_between_releases: parse_bound(self.max_days_between_releases.as_deref()),
        })
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_list<T>(value: Option<&str>) -> Result<Vec<T>, LabelError>
where
    T: std::str::FromStr<Err = LabelError>,
{
    split_list(value).iter().map(|s| s.parse()).collect()
}

fn parse_bound(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Query parameters for `GET /dashboard/raw`.
#[derive(Debug, Default, Deserialize)]
pub struct RawDataQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(flatten)]
    pub filters: DashboardQuery,
}

/// Page position within the filtered releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// `page` is 1-based. Zero page or limit is raised to 1.
    pub fn new(total: usize, page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);
        Self {
            total,
            page,
            limit,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Response of `GET /dashboard/raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataPage {
    pub data: Vec<EnrichedRelease>,
    pub pagination: Pagination,
    pub filters_applied: FilterSpec,
}

fn filter_spec(query: DashboardQuery) -> Result<FilterSpec, StatusCode> {
    query.into_filter_spec().map_err(|e| {
        warn!(error = %e, "Invalid dashboard filter");
        StatusCode::BAD_REQUEST
    })
}

fn dashboard_failure(e: DashboardError) -> StatusCode {
    warn!(error = %e, "Failed to compute dashboard");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// GET /dashboard - Full dashboard for the given filters.
///
/// # Response
///
/// ```json
/// {
///     "summary_metrics": [{"name": "Total Releases", "value": 42.0, ...}],
///     "raw_data": [...],
///     "time_series": [{"date": "2024-01-15", "count": 2, "cumulative_count": 2, ...}],
///     "aggregations": {"by_repo": [...], "by_date": [...], ...},
///     "filters_applied": {"work_day_types": ["WEEKDAY"]},
///     "data_freshness": {"last_updated": "...", "data_range": {...}}
/// }
/// ```
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResult>, StatusCode> {
    let filters = filter_spec(query)?;
    let result = state
        .dashboard
        .compute_dashboard(filters)
        .await
        .map_err(dashboard_failure)?;

    info!(
        release_count = result.raw_data.len(),
        earliest = %result.data_freshness.data_range.earliest_release,
        latest = %result.data_freshness.data_range.latest_release,
        "Dashboard queried"
    );
    Ok(Json(result))
}

/// GET /dashboard/raw - Filtered releases, one page at a time.
///
/// # Query Parameters
///
/// - `page` (optional): 1-based page number (default: 1)
/// - `limit` (optional): Releases per page (default: 50)
/// - any filter parameter
#[instrument(skip(state))]
pub async fn get_raw_data(
    State(state): State<AppState>,
    Query(query): Query<RawDataQuery>,
) -> Result<Json<RawDataPage>, StatusCode> {
    let page = parse_count(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
    let limit = parse_count(query.limit.as_deref())
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .min(MAX_PAGE_LIMIT);
    let filters = filter_spec(query.filters)?;

    let result = state
        .dashboard
        .compute_dashboard(filters)
        .await
        .map_err(dashboard_failure)?;

    let pagination = Pagination::new(result.raw_data.len(), page, limit);
    let data: Vec<EnrichedRelease> = result
        .raw_data
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.limit)
        .collect();

    info!(
        total = pagination.total,
        page = pagination.page,
        returned = data.len(),
        "Raw releases queried"
    );
    Ok(Json(RawDataPage {
        data,
        pagination,
        filters_applied: result.filters_applied,
    }))
}

fn parse_count(value: Option<&str>) -> Option<usize> {
    value.and_then(|v| v.trim().parse().ok())
}

/// GET /dashboard/metrics - Headline metrics for the given filters.
#[instrument(skip(state))]
pub async fn get_metrics(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<DashboardMetric>>, StatusCode> {
    let filters = filter_spec(query)?;
    let result = state
        .dashboard
        .compute_dashboard(filters)
        .await
        .map_err(dashboard_failure)?;

    info!(metric_count = result.summary_metrics.len(), "Metrics queried");
    Ok(Json(result.summary_metrics))
}

/// Query parameters for `GET /dashboard/aggregations`.
#[derive(Debug, Default, Deserialize)]
pub struct AggregationsQuery {
    /// Single dimension to return (`by_repo`, `by_date`, ...).
    #[serde(rename = "type")]
    pub dimension: Option<Dimension>,
    #[serde(flatten)]
    pub filters: DashboardQuery,
}

/// GET /dashboard/aggregations - Aggregations for the given filters.
///
/// # Query Parameters
///
/// - `type` (optional): Return only this dimension, e.g. `by_repo`
/// - any filter parameter
///
/// # Response
///
/// ```json
/// {
///     "by_repo": [{"key": "stackflow", "count": 3, "percentage": 75.0}]
/// }
/// ```
#[instrument(skip(state))]
pub async fn get_aggregations(
    State(state): State<AppState>,
    Query(query): Query<AggregationsQuery>,
) -> Result<Json<BTreeMap<Dimension, Vec<AggregationRow>>>, StatusCode> {
    let filters = filter_spec(query.filters)?;
    let result = state
        .dashboard
        .compute_dashboard(filters)
        .await
        .map_err(dashboard_failure)?;

    let aggregations = result.aggregations.into_map(query.dimension);
    info!(
        dimension = ?query.dimension,
        dimensions = aggregations.len(),
        "Aggregations queried"
    );
    Ok(Json(aggregations))
}

/// Response of `GET /dashboard/timeseries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesResponse {
    pub time_series: Vec<TimeSeriesPoint>,
    pub data_range: DataRange,
    pub filters_applied: FilterSpec,
}

/// GET /dashboard/timeseries - Daily release series for the given filters.
#[instrument(skip(state))]
pub async fn get_time_series(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<TimeSeriesResponse>, StatusCode> {
    let filters = filter_spec(query)?;
    let result = state
        .dashboard
        .compute_dashboard(filters)
        .await
        .map_err(dashboard_failure)?;

    info!(points = result.time_series.len(), "Time series queried");
    Ok(Json(TimeSeriesResponse {
        time_series: result.time_series,
        data_range: result.data_freshness.data_range,
        filters_applied: result.filters_applied,
    }))
}

/// GET /releases/stats - Release statistics over every tracked release.
///
/// Count maps cover weekday releases only; `total_releases` counts all.
#[instrument(skip(state))]
pub async fn get_release_stats(
    State(state): State<AppState>,
) -> Result<Json<ReleaseStats>, StatusCode> {
    match state.dashboard.release_stats().await {
        Ok(stats) => {
            info!(
                total_releases = stats.total_releases,
                repositories = stats.repositories.len(),
                "Release stats queried"
            );
            Ok(Json(stats))
        }
        Err(e) => {
            warn!(error = %e, "Failed to compute release stats");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReleaseType, TimePeriod, WorkDayType};

    #[test]
    fn test_empty_query_is_unfiltered() {
        let spec = DashboardQuery::default().into_filter_spec().unwrap();
        assert_eq!(spec, FilterSpec::default());
        assert!(spec.is_empty());
    }

    #[test]
    fn test_query_lists_are_trimmed() {
        let query = DashboardQuery {
            repos: Some(" stackflow , seed-design,".to_string()),
            work_day_types: Some("WEEKDAY, WEEKEND".to_string()),
            release_types: Some("major,pre-release".to_string()),
            time_periods: Some("MORNING".to_string()),
            ..DashboardQuery::default()
        };

        let spec = query.into_filter_spec().unwrap();

        assert_eq!(spec.repo_names, ["stackflow", "seed-design"]);
        assert_eq!(spec.work_day_types, [WorkDayType::Weekday, WorkDayType::Weekend]);
        assert_eq!(spec.release_types, [ReleaseType::Major, ReleaseType::PreRelease]);
        assert_eq!(spec.time_periods, [TimePeriod::Morning]);
    }

    #[test]
    fn test_query_booleans_and_bounds() {
        let query = DashboardQuery {
            include_prereleases: Some("true".to_string()),
            include_drafts: Some("yes".to_string()),
            min_days_between_releases: Some("3".to_string()),
            max_days_between_releases: Some("soon".to_string()),
            date_from: Some("  ".to_string()),
            date_to: Some("2024-12-31".to_string()),
            ..DashboardQuery::default()
        };

        let spec = query.into_filter_spec().unwrap();

        assert_eq!(spec.include_prereleases, Some(true));
        assert_eq!(spec.include_drafts, Some(false));
        assert_eq!(spec.min_days_between_releases, Some(3));
        assert_eq!(spec.max_days_between_releases, None);
        assert_eq!(spec.date_from, None);
        assert_eq!(spec.date_to.as_deref(), Some("2024-12-31"));
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let query = DashboardQuery {
            time_periods: Some("MORNING,LUNCH".to_string()),
            ..DashboardQuery::default()
        };

        let err = query.into_filter_spec().unwrap_err();
        assert_eq!(err.value, "LUNCH");
    }

    #[test]
    fn test_pagination() {
        let p = Pagination::new(120, 2, 50);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset(), 50);
        assert!(p.has_next);
        assert!(p.has_prev);

        let last = Pagination::new(120, 3, 50);
        assert!(!last.has_next);

        let empty = Pagination::new(0, 0, 0);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.limit, 1);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }
}
