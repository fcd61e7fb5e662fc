//! In-process stand-in for the LeetCode GraphQL endpoint.
//!
//! Dispatches on `operationName` and answers from fixtures.rs. Switches on
//! the shared state let tests make the catalog or every operation fail.

use super::constants::*;
use super::fixtures;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Default)]
struct MockState {
    fail_catalog: AtomicBool,
    fail_everything: AtomicBool,
    problem_list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

/// Handle to a running mock upstream. The server stops when dropped.
pub struct MockUpstream {
    pub graphql_url: String,
    state: Arc<MockState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockUpstream {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/graphql", post(graphql))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock upstream");
        let port = listener
            .local_addr()
            .expect("Failed to get mock upstream address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Mock upstream failed");
        });

        Self {
            graphql_url: format!("http://127.0.0.1:{}/graphql", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Makes the problem list answer 403, a permanent failure.
    pub fn set_catalog_failing(&self, failing: bool) {
        self.state.fail_catalog.store(failing, Ordering::SeqCst);
    }

    /// Makes every operation answer 503, a transient failure.
    pub fn set_all_failing(&self, failing: bool) {
        self.state.fail_everything.store(failing, Ordering::SeqCst);
    }

    pub fn problem_list_calls(&self) -> usize {
        self.state.problem_list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.state.detail_calls.load(Ordering::SeqCst)
    }
}

fn data(value: Value) -> Response {
    Json(json!({ "data": value })).into_response()
}

fn username_of(variables: &Value) -> &str {
    variables["username"].as_str().unwrap_or_default()
}

async fn graphql(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if state.fail_everything.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "upstream is down").into_response();
    }

    let operation = body["operationName"].as_str().unwrap_or_default();
    let variables = &body["variables"];
    let known_user = username_of(variables) == KNOWN_USER;

    match operation {
        "problemsetQuestionList" => {
            state.problem_list_calls.fetch_add(1, Ordering::SeqCst);
            if state.fail_catalog.load(Ordering::SeqCst) {
                return (StatusCode::FORBIDDEN, "blocked").into_response();
            }
            let records = fixtures::problem_records();
            let skip = variables["skip"].as_u64().unwrap_or(0) as usize;
            let limit = variables["limit"].as_u64().unwrap_or(50) as usize;
            let page: Vec<Value> = records.iter().skip(skip).take(limit).cloned().collect();
            data(json!({
                "problemsetQuestionList": { "total": records.len(), "questions": page }
            }))
        }
        "questionData" => {
            state.detail_calls.fetch_add(1, Ordering::SeqCst);
            let slug = variables["titleSlug"].as_str().unwrap_or_default();
            data(json!({ "question": fixtures::question_detail(slug) }))
        }
        "questionOfToday" => data(json!({
            "activeDailyCodingChallengeQuestion": fixtures::daily_challenge()
        })),
        "userPublicProfile" if known_user => data(json!({
            "matchedUser": fixtures::user_profile(KNOWN_USER)
        })),
        "userPublicProfile" => Json(json!({
            "errors": [{ "message": "That user does not exist." }],
            "data": { "matchedUser": null }
        }))
        .into_response(),
        "userContestRankingInfo" if known_user => data(fixtures::user_contests()),
        "userContestRankingInfo" => data(json!({
            "userContestRanking": null,
            "userContestRankingHistory": null
        })),
        "recentSubmissions" => {
            let limit = variables["limit"].as_u64().unwrap_or(20) as usize;
            let list = known_user.then(|| fixtures::user_submissions(limit));
            data(json!({ "recentSubmissionList": list }))
        }
        "userProfileCalendar" => {
            let user = known_user.then(|| {
                json!({ "userCalendar": fixtures::user_calendar(variables["year"].as_i64()) })
            });
            data(json!({ "matchedUser": user }))
        }
        "skillStats" => {
            let user = known_user.then(|| json!({ "tagProblemCounts": fixtures::user_skills() }));
            data(json!({ "matchedUser": user }))
        }
        "userBadges" => {
            let user = known_user.then(fixtures::user_badges);
            data(json!({ "matchedUser": user }))
        }
        other => (
            StatusCode::BAD_REQUEST,
            format!("unknown operation {}", other),
        )
            .into_response(),
    }
}
