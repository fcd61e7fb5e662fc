//! Catalog HTTP routes.
//!
//! Everything here is answered from the published snapshot, except the
//! problem detail which goes through the detail cache and then upstream.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::catalog::ProblemView;
use crate::query::{ProblemFilter, ProblemSet, QueryEngine, TagSummary};
use crate::server::error::ApiError;
use crate::server::metrics;
use crate::server::state::ServerState;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub difficulty: Option<String>,
    pub tag: Option<String>,
    pub topic: Option<String>,
}

impl FilterQuery {
    fn parse(&self) -> Result<ProblemFilter, ApiError> {
        Ok(ProblemFilter::parse(
            self.difficulty.as_deref(),
            self.tag.as_deref(),
            self.topic.as_deref(),
        )?)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct ProblemListResponse<'a> {
    sequence: u64,
    total: usize,
    problems: Vec<ProblemView<'a>>,
}

impl<'a> From<&'a ProblemSet> for ProblemListResponse<'a> {
    fn from(set: &'a ProblemSet) -> Self {
        ProblemListResponse {
            sequence: set.sequence(),
            total: set.len(),
            problems: set.iter().map(ProblemView::from).collect(),
        }
    }
}

#[derive(Serialize)]
struct TagListResponse {
    total: usize,
    tags: Vec<TagSummary>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /problems - List problems, optionally filtered by difficulty/tag/topic
async fn list_problems(
    State(query): State<QueryEngine>,
    Query(params): Query<FilterQuery>,
) -> Result<Response, ApiError> {
    let filter = params.parse()?;
    let set = if filter.is_empty() {
        query.list()?
    } else {
        query.filter(&filter)?
    };
    Ok(Json(ProblemListResponse::from(&set)).into_response())
}

/// GET /problem/{id_or_slug} - Problem summary
async fn get_problem(
    State(query): State<QueryEngine>,
    Path(identifier): Path<String>,
) -> Result<Response, ApiError> {
    let problem = query
        .resolve(&identifier)?
        .ok_or_else(|| ApiError::NotFound(format!("Problem {}", identifier)))?;
    Ok(Json(ProblemView::from(&*problem)).into_response())
}

/// GET /problem/{id_or_slug}/detail - Full problem content
async fn get_problem_detail(
    State(state): State<ServerState>,
    Path(identifier): Path<String>,
) -> Result<Response, ApiError> {
    let problem = state
        .query
        .resolve(&identifier)?
        .ok_or_else(|| ApiError::NotFound(format!("Problem {}", identifier)))?;

    if let Some(detail) = state.detail_cache.get(&problem.slug) {
        metrics::record_detail_cache_lookup(true);
        return Ok(Json(detail.as_ref()).into_response());
    }
    metrics::record_detail_cache_lookup(false);

    debug!("Fetching detail for {} from upstream", problem.slug);
    let mut detail = state
        .upstream
        .question_detail(&problem.slug)
        .await
        .map_err(|e| {
            metrics::record_upstream_request("question_detail", "error");
            ApiError::from_upstream(e, &format!("Problem {}", problem.slug))
        })?;
    metrics::record_upstream_request("question_detail", "ok");

    if let Some(object) = detail.as_object_mut() {
        object.insert("url".to_string(), json!(problem.url()));
    }
    let detail = state.detail_cache.insert(problem.slug.clone(), detail);
    Ok(Json(detail.as_ref()).into_response())
}

/// GET /search?query=&limit= - Substring search over titles and slugs
async fn search_problems(
    State(query): State<QueryEngine>,
    Query(params): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let text = params
        .query
        .ok_or_else(|| ApiError::InvalidRequest("query parameter is required".to_string()))?;
    if params.limit == Some(0) {
        return Err(ApiError::InvalidRequest(
            "limit must be greater than 0".to_string(),
        ));
    }
    let set = query.search(&text, params.limit)?;
    Ok(Json(ProblemListResponse::from(&set)).into_response())
}

/// GET /random - One random problem matching the filter
async fn random_problem(
    State(query): State<QueryEngine>,
    Query(params): Query<FilterQuery>,
) -> Result<Response, ApiError> {
    let filter = params.parse()?;
    let problem = query
        .random(&filter)?
        .ok_or_else(|| ApiError::NotFound("Problem matching the filter".to_string()))?;
    Ok(Json(ProblemView::from(&*problem)).into_response())
}

/// GET /tags - Tags with problem counts
async fn list_tags(State(query): State<QueryEngine>) -> Result<Response, ApiError> {
    let tags = query.tags()?;
    Ok(Json(TagListResponse {
        total: tags.len(),
        tags,
    })
    .into_response())
}

/// GET /v1/daily - Today's daily challenge, live from upstream
pub async fn get_daily(State(state): State<ServerState>) -> Result<Json<Value>, ApiError> {
    match state.upstream.daily_challenge().await {
        Ok(daily) => {
            metrics::record_upstream_request("daily_challenge", "ok");
            Ok(Json(daily))
        }
        Err(e) => {
            metrics::record_upstream_request("daily_challenge", "error");
            Err(ApiError::from_upstream(e, "Daily challenge"))
        }
    }
}

pub fn catalog_routes() -> Router<ServerState> {
    Router::new()
        .route("/problems", get(list_problems))
        .route("/problem/{id_or_slug}", get(get_problem))
        .route("/problem/{id_or_slug}/detail", get(get_problem_detail))
        .route("/search", get(search_problems))
        .route("/random", get(random_problem))
        .route("/tags", get(list_tags))
}
