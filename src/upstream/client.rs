//! HTTP client for the LeetCode GraphQL endpoint.

use super::queries;
use super::{FetchError, UpstreamError, UpstreamFetcher};
use crate::catalog::RawRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_GRAPHQL_URL: &str = "https://leetcode.com/graphql";
const MAX_SUBMISSIONS_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct LeetCodeClientConfig {
    pub graphql_url: String,
    pub timeout: Duration,
    pub page_size: u32,
    pub page_delay: Duration,
}

impl Default for LeetCodeClientConfig {
    fn default() -> Self {
        Self {
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            timeout: Duration::from_secs(30),
            page_size: 100,
            page_delay: Duration::from_millis(300),
        }
    }
}

pub struct LeetCodeClient {
    client: reqwest::Client,
    graphql_url: String,
    page_size: u32,
    page_delay: Duration,
}

impl LeetCodeClient {
    pub fn new(config: LeetCodeClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("leetcode-catalog-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        // Ensure graphql_url doesn't have trailing slash
        let graphql_url = config.graphql_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            graphql_url,
            page_size: config.page_size.max(1),
            page_delay: config.page_delay,
        })
    }

    /// Posts one GraphQL operation and returns the whole response body.
    async fn post(&self, operation: &str, query: &str, variables: Value) -> Result<Value, FetchError> {
        let payload = json!({
            "operationName": operation,
            "query": query,
            "variables": variables,
        });
        let response = self
            .client
            .post(&self.graphql_url)
            .header(reqwest::header::REFERER, "https://leetcode.com")
            .json(&payload)
            .send()
            .await
            .map_err(|e| classify_transport_error(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("{} returned HTTP {}", operation, status);
            return Err(if is_transient_status(status) {
                FetchError::transient(message)
            } else {
                FetchError::permanent(message)
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| classify_transport_error(operation, e))
    }

    /// Runs a pass-through query and extracts the value at `pointer`. A
    /// missing or null value means the requested entity does not exist.
    async fn query_value(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
        pointer: &str,
    ) -> Result<Value, UpstreamError> {
        let mut body = self.post(operation, query, variables).await?;
        if let Some(errors) = graphql_errors(&body) {
            debug!("{} answered with errors: {}", operation, errors);
        }
        match body.pointer_mut(pointer).map(Value::take) {
            Some(Value::Null) | None => Err(UpstreamError::NotFound),
            Some(value) => Ok(value),
        }
    }

    pub async fn question_detail(&self, slug: &str) -> Result<Value, UpstreamError> {
        self.query_value(
            queries::QUESTION_DETAIL_OPERATION,
            queries::QUESTION_DETAIL,
            json!({ "titleSlug": slug }),
            "/data/question",
        )
        .await
    }

    pub async fn daily_challenge(&self) -> Result<Value, UpstreamError> {
        self.query_value(
            queries::DAILY_CHALLENGE_OPERATION,
            queries::DAILY_CHALLENGE,
            json!({}),
            "/data/activeDailyCodingChallengeQuestion",
        )
        .await
    }

    pub async fn user_profile(&self, username: &str) -> Result<Value, UpstreamError> {
        self.query_value(
            queries::USER_PROFILE_OPERATION,
            queries::USER_PROFILE,
            json!({ "username": username }),
            "/data/matchedUser",
        )
        .await
    }

    pub async fn user_contests(&self, username: &str) -> Result<Value, UpstreamError> {
        let data = self
            .query_value(
                queries::USER_CONTESTS_OPERATION,
                queries::USER_CONTESTS,
                json!({ "username": username }),
                "/data",
            )
            .await?;
        let has_ranking = ["userContestRanking", "userContestRankingHistory"]
            .iter()
            .any(|key| data.get(key).map(|v| !v.is_null()).unwrap_or(false));
        if !has_ranking {
            return Err(UpstreamError::NotFound);
        }
        Ok(data)
    }

    pub async fn user_submissions(&self, username: &str, limit: u32) -> Result<Value, UpstreamError> {
        if !(1..=MAX_SUBMISSIONS_LIMIT).contains(&limit) {
            return Err(UpstreamError::InvalidRequest(format!(
                "limit must be between 1 and {}, got {}",
                MAX_SUBMISSIONS_LIMIT, limit
            )));
        }
        self.query_value(
            queries::USER_SUBMISSIONS_OPERATION,
            queries::USER_SUBMISSIONS,
            json!({ "username": username, "limit": limit }),
            "/data/recentSubmissionList",
        )
        .await
    }

    pub async fn user_calendar(&self, username: &str, year: Option<i32>) -> Result<Value, UpstreamError> {
        self.query_value(
            queries::USER_CALENDAR_OPERATION,
            queries::USER_CALENDAR,
            json!({ "username": username, "year": year }),
            "/data/matchedUser/userCalendar",
        )
        .await
    }

    pub async fn user_skills(&self, username: &str) -> Result<Value, UpstreamError> {
        self.query_value(
            queries::USER_SKILLS_OPERATION,
            queries::USER_SKILLS,
            json!({ "username": username }),
            "/data/matchedUser/tagProblemCounts",
        )
        .await
    }

    pub async fn user_badges(&self, username: &str) -> Result<Value, UpstreamError> {
        self.query_value(
            queries::USER_BADGES_OPERATION,
            queries::USER_BADGES,
            json!({ "username": username }),
            "/data/matchedUser",
        )
        .await
    }
}

#[async_trait]
impl UpstreamFetcher for LeetCodeClient {
    /// Pages through the problem list until `total` records were seen or a
    /// page comes back empty.
    async fn fetch_all(&self) -> Result<Vec<RawRecord>, FetchError> {
        let mut records: Vec<RawRecord> = Vec::new();
        let mut skip: u64 = 0;

        loop {
            let variables = json!({
                "categorySlug": "",
                "limit": self.page_size,
                "skip": skip,
                "filters": {},
            });
            let mut body = self
                .post(
                    queries::PROBLEM_LIST_OPERATION,
                    queries::PROBLEM_LIST,
                    variables,
                )
                .await?;
            if let Some(errors) = graphql_errors(&body) {
                return Err(FetchError::permanent(format!(
                    "problem list query failed: {}",
                    errors
                )));
            }
            let (total, page) = parse_problem_page(&mut body)?;
            if page.is_empty() {
                break;
            }

            for item in page {
                records.push(serde_json::from_value(item).unwrap_or_else(|err| {
                    // Left for the index builder to drop and count.
                    warn!("Unreadable problem record at skip {}: {}", skip, err);
                    RawRecord::default()
                }));
            }
            debug!("Fetched problems: {} / {:?}", records.len(), total);

            skip += u64::from(self.page_size);
            if total.map(|t| records.len() as u64 >= t).unwrap_or(false) {
                break;
            }
            tokio::time::sleep(self.page_delay).await;
        }

        info!("Fetched {} problem records from upstream", records.len());
        Ok(records)
    }
}

fn parse_problem_page(body: &mut Value) -> Result<(Option<u64>, Vec<Value>), FetchError> {
    let list = body
        .pointer_mut("/data/problemsetQuestionList")
        .filter(|v| v.is_object())
        .ok_or_else(|| FetchError::permanent("problem list response has no problemsetQuestionList"))?;
    let total = list.get("total").and_then(Value::as_u64);
    match list.get_mut("questions").map(Value::take) {
        Some(Value::Array(items)) => Ok((total, items)),
        Some(Value::Null) | None => Ok((total, Vec::new())),
        Some(other) => Err(FetchError::permanent(format!(
            "problem list questions is not an array: {}",
            other
        ))),
    }
}

fn graphql_errors(body: &Value) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let messages: Vec<&str> = errors
        .iter()
        .map(|e| e.get("message").and_then(Value::as_str).unwrap_or("unknown error"))
        .collect();
    Some(messages.join("; "))
}

fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn classify_transport_error(operation: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::timeout(format!("{} timed out: {}", operation, err))
    } else if err.is_decode() {
        FetchError::permanent(format!("{} returned an unreadable body: {}", operation, err))
    } else {
        FetchError::transient(format!("{} failed: {}", operation, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(is_transient_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_transient_status(StatusCode::BAD_REQUEST));
        assert!(!is_transient_status(StatusCode::FORBIDDEN));
        assert!(!is_transient_status(StatusCode::NOT_FOUND));
    }

    #[test]
    fn extracts_graphql_errors() {
        let body = json!({"errors": [{"message": "That user does not exist."}], "data": null});
        assert_eq!(
            graphql_errors(&body).as_deref(),
            Some("That user does not exist.")
        );
        assert!(graphql_errors(&json!({"errors": [], "data": {}})).is_none());
        assert!(graphql_errors(&json!({"data": {}})).is_none());
    }

    #[test]
    fn parses_problem_page() {
        let mut body = json!({
            "data": {"problemsetQuestionList": {
                "total": 2,
                "questions": [{"questionFrontendId": "1"}, {"questionFrontendId": "2"}]
            }}
        });
        let (total, items) = parse_problem_page(&mut body).unwrap();
        assert_eq!(total, Some(2));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn rejects_unexpected_page_shape() {
        let mut body = json!({"data": {"somethingElse": {}}});
        let err = parse_problem_page(&mut body).unwrap_err();
        assert!(!err.is_retryable());

        let mut body = json!({"data": {"problemsetQuestionList": {"questions": 5}}});
        assert!(parse_problem_page(&mut body).is_err());
    }

    #[test]
    fn trims_trailing_slash_from_url() {
        let client = LeetCodeClient::new(LeetCodeClientConfig {
            graphql_url: "http://localhost:1234/graphql/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.graphql_url, "http://localhost:1234/graphql");
    }

    #[tokio::test]
    async fn rejects_out_of_range_submission_limit() {
        let client = LeetCodeClient::new(LeetCodeClientConfig::default()).unwrap();
        assert!(matches!(
            client.user_submissions("someone", 0).await,
            Err(UpstreamError::InvalidRequest(_))
        ));
        assert!(matches!(
            client.user_submissions("someone", 101).await,
            Err(UpstreamError::InvalidRequest(_))
        ));
    }
}
