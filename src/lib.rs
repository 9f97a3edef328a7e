//! Release Insights - GitHub release analytics.
//!
//! # Overview
//!
//! Release Insights turns the release history of a set of GitHub repositories
//! into dashboard data: every release is enriched with version, calendar,
//! sequencing and cross-repository context, filtered, then summarised as
//! headline metrics, per-dimension aggregations and a cumulative time series.
//!
//! # Pipeline
//!
//! 1. A [`data_sources::ReleaseSource`] supplies the raw batch
//! 2. [`enrichment`] derives every [`model::EnrichedRelease`] field
//! 3. [`filter`] applies a [`model::FilterSpec`]
//! 4. [`metrics`], [`aggregation`] and [`timeseries`] summarise the result
//! 5. [`dashboard`] packages it; [`api`] serves it over HTTP
//!
//! # Modules
//!
//! - [`model`]: Raw and enriched release types, filter spec
//! - [`version`]: Version tag classification
//! - [`temporal`]: Calendar fields of a publish time
//! - [`sequence`]: Per-repository ordering and intervals
//! - [`context`]: Same-day/week/month release counts
//! - [`stats`]: Release statistics report
//! - [`data_sources`]: GitHub API and snapshot file sources
//! - [`config`]: Environment configuration
//! - [`error`]: Error types

pub mod aggregation;
pub mod api;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod data_sources;
pub mod enrichment;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod model;
pub mod sequence;
pub mod stats;
pub mod temporal;
pub mod timeseries;
pub mod version;

#[cfg(test)]
mod test_support;
