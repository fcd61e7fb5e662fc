use anyhow::{Context, Result};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tower_http::services::ServeDir;
use tracing::info;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::admin_routes::admin_routes;
use super::catalog_routes::{catalog_routes, get_daily};
use super::metrics::metrics_handler;
use super::user_routes::user_routes;
use super::{http_cache, log_requests, state::*, ServerConfig};
use crate::refresh::ErrorInfo;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
    pub hash: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    problems_cached: usize,
    details_cached: usize,
    cache_age_seconds: Option<i64>,
    sequence: u64,
    last_success: Option<DateTime<Utc>>,
    last_error: Option<ErrorInfo>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hash: state.hash.clone(),
    };
    Json(stats)
}

/// Cold catalog answers 503; a failed last refresh keeps serving but reports "stale".
async fn health(State(state): State<ServerState>) -> Response {
    let now = Utc::now();
    let status = state.coordinator.status();
    let snapshot = state.coordinator.store().current();

    let (label, code) = match (&snapshot, &status.last_error) {
        (None, _) => ("unavailable", StatusCode::SERVICE_UNAVAILABLE),
        (Some(_), Some(_)) => ("stale", StatusCode::OK),
        (Some(_), None) => ("ok", StatusCode::OK),
    };

    let body = HealthResponse {
        status: label,
        timestamp: now,
        problems_cached: snapshot.as_ref().map(|s| s.len()).unwrap_or(0),
        details_cached: state.detail_cache.len(),
        cache_age_seconds: snapshot
            .as_ref()
            .map(|s| (now - s.fetched_at()).num_seconds().max(0)),
        sequence: status.sequence,
        last_success: status.last_success,
        last_error: status.last_error,
    };
    (code, Json(body)).into_response()
}

pub fn make_app(config: ServerConfig, state: ServerState) -> Result<Router> {
    let catalog_routes: Router = catalog_routes()
        .layer(middleware::from_fn_with_state(
            config.content_cache_age_sec,
            http_cache,
        ))
        .with_state(state.clone());

    let user_routes: Router = user_routes().with_state(state.clone());
    let admin_routes: Router = admin_routes().with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let app: Router = home_router
        .route("/health", get(health).with_state(state.clone()))
        .route("/v1/daily", get(get_daily).with_state(state.clone()))
        .nest("/v1/catalog", catalog_routes)
        .nest("/v1/user", user_routes)
        .nest("/v1/admin", admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

async fn run_metrics_server(port: u16) -> Result<()> {
    let app = Router::new().route("/metrics", get(metrics_handler));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", port))?;
    info!("Metrics server listening on port {}", port);
    Ok(axum::serve(listener, app).await?)
}

pub async fn run_server(
    config: ServerConfig,
    coordinator: GuardedCoordinator,
    upstream: GuardedUpstream,
    detail_cache: GuardedDetailCache,
    scheduler_handle: OptionalSchedulerHandle,
) -> Result<()> {
    let state = ServerState::new(
        config.clone(),
        coordinator,
        upstream,
        detail_cache,
        scheduler_handle,
    );
    let port = config.port;
    let metrics_port = config.metrics_port;
    let app = make_app(config, state)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    tokio::select! {
        result = axum::serve(listener, app) => Ok(result?),
        result = run_metrics_server(metrics_port) => result,
    }
}
