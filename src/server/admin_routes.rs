//! Admin HTTP routes: refresh control and background job inspection.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::info;

use crate::background_jobs::JobError;
use crate::refresh::TriggerOutcome;
use crate::server::state::{GuardedCoordinator, OptionalSchedulerHandle, ServerState};

/// GET /refresh - Refresh state machine status
async fn get_refresh_status(State(coordinator): State<GuardedCoordinator>) -> impl IntoResponse {
    Json(coordinator.status())
}

/// POST /refresh - Start a refresh in the background
async fn post_refresh(State(coordinator): State<GuardedCoordinator>) -> impl IntoResponse {
    let outcome = coordinator.trigger_refresh();
    let status = match outcome {
        TriggerOutcome::Started => {
            info!("Catalog refresh triggered via admin API");
            StatusCode::ACCEPTED
        }
        TriggerOutcome::AlreadyInProgress => StatusCode::CONFLICT,
    };
    (status, Json(json!({ "outcome": outcome })))
}

/// GET /jobs - Registered background jobs
async fn list_jobs(State(scheduler): State<OptionalSchedulerHandle>) -> impl IntoResponse {
    match scheduler {
        Some(handle) => Json(handle.list_jobs().await).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Job scheduler not running").into_response(),
    }
}

/// POST /jobs/{id}/trigger - Run a job now
async fn trigger_job(
    State(scheduler): State<OptionalSchedulerHandle>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let Some(handle) = scheduler else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Job scheduler not running").into_response();
    };
    match handle.trigger_job(&job_id).await {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(json!({ "job_id": job_id, "outcome": "started" })),
        )
            .into_response(),
        Err(JobError::NotFound) => (StatusCode::NOT_FOUND, "Job not found").into_response(),
        Err(JobError::AlreadyRunning) => {
            (StatusCode::CONFLICT, "Job is already running").into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

pub fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/refresh", get(get_refresh_status))
        .route("/refresh", post(post_refresh))
        .route("/jobs", get(list_jobs))
        .route("/jobs/{id}/trigger", post(trigger_job))
}
