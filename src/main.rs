//! Release Insights server.
//!
//! # API Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /dashboard` - Full dashboard for the given filters
//! - `GET /dashboard/raw` - Filtered releases, paginated
//! - `GET /dashboard/metrics` - Headline metrics
//! - `GET /dashboard/aggregations` - Aggregations by dimension
//! - `GET /releases/stats` - Release statistics report
//!
//! Configuration is read from the environment, see [`release_insights::config`].

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use release_insights::api::{AppState, router};
use release_insights::config::AppConfig;
use release_insights::dashboard::Dashboard;
use release_insights::data_sources::{FileReleaseSource, GithubClient, ReleaseSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("release_insights=info".parse()?))
        .init();

    let config = AppConfig::from_env();

    let source: Arc<dyn ReleaseSource> = match &config.data_path {
        Some(path) => {
            info!(path = %path.display(), "Serving releases from snapshot file");
            Arc::new(FileReleaseSource::new(path))
        }
        None => {
            info!(
                base_url = %config.github_api_base_url,
                repositories = config.repositories.len(),
                authenticated = config.github_token.is_some(),
                "Serving releases from GitHub"
            );
            Arc::new(GithubClient::with_base_url(
                &config.github_api_base_url,
                config.repositories.clone(),
                config.github_token.clone(),
                config.http_timeout,
            )?)
        }
    };

    let state = AppState {
        dashboard: Dashboard::new(source),
    };
    let app = router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Release Insights is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
