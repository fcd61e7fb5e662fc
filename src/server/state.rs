use axum::extract::FromRef;

use crate::background_jobs::SchedulerHandle;
use crate::catalog::DetailCache;
use crate::query::QueryEngine;
use crate::refresh::RefreshCoordinator;
use crate::upstream::LeetCodeClient;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCoordinator = Arc<RefreshCoordinator>;
pub type GuardedUpstream = Arc<LeetCodeClient>;
pub type GuardedDetailCache = Arc<DetailCache>;
pub type OptionalSchedulerHandle = Option<SchedulerHandle>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub query: QueryEngine,
    pub coordinator: GuardedCoordinator,
    pub upstream: GuardedUpstream,
    pub detail_cache: GuardedDetailCache,
    pub scheduler_handle: OptionalSchedulerHandle,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        coordinator: GuardedCoordinator,
        upstream: GuardedUpstream,
        detail_cache: GuardedDetailCache,
        scheduler_handle: OptionalSchedulerHandle,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            hash: env!("GIT_HASH").to_owned(),
            query: QueryEngine::new(Arc::clone(coordinator.store())),
            coordinator,
            upstream,
            detail_cache,
            scheduler_handle,
        }
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for QueryEngine {
    fn from_ref(input: &ServerState) -> Self {
        input.query.clone()
    }
}

impl FromRef<ServerState> for GuardedCoordinator {
    fn from_ref(input: &ServerState) -> Self {
        input.coordinator.clone()
    }
}

impl FromRef<ServerState> for GuardedUpstream {
    fn from_ref(input: &ServerState) -> Self {
        input.upstream.clone()
    }
}

impl FromRef<ServerState> for GuardedDetailCache {
    fn from_ref(input: &ServerState) -> Self {
        input.detail_cache.clone()
    }
}

impl FromRef<ServerState> for OptionalSchedulerHandle {
    fn from_ref(input: &ServerState) -> Self {
        input.scheduler_handle.clone()
    }
}
