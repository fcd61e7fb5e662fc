//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all catalog-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap_or_else(|e| panic!("GET {} failed: {}", path, e))
    }

    async fn post(&self, path: &str) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap_or_else(|e| panic!("POST {} failed: {}", path, e))
    }

    // ========================================================================
    // Server Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.get("/").await
    }

    /// GET /health
    pub async fn get_health(&self) -> Response {
        self.get("/health").await
    }

    // ========================================================================
    // Catalog Endpoints
    // ========================================================================

    /// GET /v1/catalog/problems?{query}
    pub async fn list_problems(&self, query: &str) -> Response {
        if query.is_empty() {
            self.get("/v1/catalog/problems").await
        } else {
            self.get(&format!("/v1/catalog/problems?{}", query)).await
        }
    }

    /// GET /v1/catalog/problem/{id_or_slug}
    pub async fn get_problem(&self, id_or_slug: &str) -> Response {
        self.get(&format!("/v1/catalog/problem/{}", id_or_slug)).await
    }

    /// GET /v1/catalog/problem/{id_or_slug}/detail
    pub async fn get_problem_detail(&self, id_or_slug: &str) -> Response {
        self.get(&format!("/v1/catalog/problem/{}/detail", id_or_slug))
            .await
    }

    /// GET /v1/catalog/search?{query}
    pub async fn search(&self, query: &str) -> Response {
        self.get(&format!("/v1/catalog/search?{}", query)).await
    }

    /// GET /v1/catalog/random?{query}
    pub async fn random(&self, query: &str) -> Response {
        self.get(&format!("/v1/catalog/random?{}", query)).await
    }

    /// GET /v1/catalog/tags
    pub async fn list_tags(&self) -> Response {
        self.get("/v1/catalog/tags").await
    }

    /// GET /v1/daily
    pub async fn get_daily(&self) -> Response {
        self.get("/v1/daily").await
    }

    // ========================================================================
    // User Endpoints
    // ========================================================================

    /// GET /v1/user/{username}
    pub async fn get_user_profile(&self, username: &str) -> Response {
        self.get(&format!("/v1/user/{}", username)).await
    }

    /// GET /v1/user/{username}/contests
    pub async fn get_user_contests(&self, username: &str) -> Response {
        self.get(&format!("/v1/user/{}/contests", username)).await
    }

    /// GET /v1/user/{username}/submissions
    pub async fn get_user_submissions(&self, username: &str, limit: Option<u32>) -> Response {
        match limit {
            Some(limit) => {
                self.get(&format!("/v1/user/{}/submissions?limit={}", username, limit))
                    .await
            }
            None => self.get(&format!("/v1/user/{}/submissions", username)).await,
        }
    }

    /// GET /v1/user/{username}/calendar
    pub async fn get_user_calendar(&self, username: &str, year: Option<i32>) -> Response {
        match year {
            Some(year) => {
                self.get(&format!("/v1/user/{}/calendar?year={}", username, year))
                    .await
            }
            None => self.get(&format!("/v1/user/{}/calendar", username)).await,
        }
    }

    /// GET /v1/user/{username}/skills
    pub async fn get_user_skills(&self, username: &str) -> Response {
        self.get(&format!("/v1/user/{}/skills", username)).await
    }

    /// GET /v1/user/{username}/badges
    pub async fn get_user_badges(&self, username: &str) -> Response {
        self.get(&format!("/v1/user/{}/badges", username)).await
    }

    // ========================================================================
    // Admin Endpoints
    // ========================================================================

    /// GET /v1/admin/refresh
    pub async fn get_refresh_status(&self) -> Response {
        self.get("/v1/admin/refresh").await
    }

    /// POST /v1/admin/refresh
    pub async fn trigger_refresh(&self) -> Response {
        self.post("/v1/admin/refresh").await
    }

    /// GET /v1/admin/jobs
    pub async fn list_jobs(&self) -> Response {
        self.get("/v1/admin/jobs").await
    }

    /// POST /v1/admin/jobs/{id}/trigger
    pub async fn trigger_job(&self, job_id: &str) -> Response {
        self.post(&format!("/v1/admin/jobs/{}/trigger", job_id))
            .await
    }
}
