//! Per-user statistics, proxied live to upstream without caching.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::server::error::ApiError;
use crate::server::metrics;
use crate::server::state::{GuardedUpstream, ServerState};
use crate::upstream::UpstreamError;

const MAX_USERNAME_LENGTH: usize = 64;

fn default_submissions_limit() -> u32 {
    20
}

#[derive(Debug, Deserialize)]
pub struct SubmissionsQuery {
    #[serde(default = "default_submissions_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    let valid = !username.is_empty()
        && username.len() <= MAX_USERNAME_LENGTH
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ApiError::InvalidRequest(format!(
            "invalid username: {:?}",
            username
        )))
    }
}

fn respond(
    operation: &str,
    username: &str,
    result: Result<Value, UpstreamError>,
) -> Result<Json<Value>, ApiError> {
    match result {
        Ok(value) => {
            metrics::record_upstream_request(operation, "ok");
            Ok(Json(value))
        }
        Err(UpstreamError::InvalidRequest(reason)) => Err(ApiError::InvalidRequest(reason)),
        Err(e) => {
            metrics::record_upstream_request(operation, "error");
            Err(ApiError::from_upstream(e, &format!("User {}", username)))
        }
    }
}

/// GET /{username} - Public profile
async fn get_profile(
    State(upstream): State<GuardedUpstream>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    validate_username(&username)?;
    let result = upstream.user_profile(&username).await;
    respond("user_profile", &username, result)
}

/// GET /{username}/contests - Contest ranking and history
async fn get_contests(
    State(upstream): State<GuardedUpstream>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    validate_username(&username)?;
    let result = upstream.user_contests(&username).await;
    respond("user_contests", &username, result)
}

/// GET /{username}/submissions?limit= - Recent submissions
async fn get_submissions(
    State(upstream): State<GuardedUpstream>,
    Path(username): Path<String>,
    Query(params): Query<SubmissionsQuery>,
) -> Result<Json<Value>, ApiError> {
    validate_username(&username)?;
    let result = upstream.user_submissions(&username, params.limit).await;
    respond("user_submissions", &username, result)
}

/// GET /{username}/calendar?year= - Submission calendar
async fn get_calendar(
    State(upstream): State<GuardedUpstream>,
    Path(username): Path<String>,
    Query(params): Query<CalendarQuery>,
) -> Result<Json<Value>, ApiError> {
    validate_username(&username)?;
    let result = upstream.user_calendar(&username, params.year).await;
    respond("user_calendar", &username, result)
}

/// GET /{username}/skills - Solved counts per tag
async fn get_skills(
    State(upstream): State<GuardedUpstream>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    validate_username(&username)?;
    let result = upstream.user_skills(&username).await;
    respond("user_skills", &username, result)
}

/// GET /{username}/badges - Earned and upcoming badges
async fn get_badges(
    State(upstream): State<GuardedUpstream>,
    Path(username): Path<String>,
) -> Result<Json<Value>, ApiError> {
    validate_username(&username)?;
    let result = upstream.user_badges(&username).await;
    respond("user_badges", &username, result)
}

pub fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/{username}", get(get_profile))
        .route("/{username}/contests", get(get_contests))
        .route("/{username}/submissions", get(get_submissions))
        .route("/{username}/calendar", get(get_calendar))
        .route("/{username}/skills", get(get_skills))
        .route("/{username}/badges", get(get_badges))
}
