use crate::catalog::Snapshot;
use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all catalog server metrics
const PREFIX: &str = "catalog";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Catalog Metrics
    pub static ref CATALOG_PROBLEMS_TOTAL: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_problems_total"), "Problems in the published snapshot"),
        &["difficulty"]
    ).expect("Failed to create problems_total metric");

    pub static ref CATALOG_TAGS_TOTAL: Gauge = Gauge::new(
        format!("{PREFIX}_tags_total"),
        "Distinct tags in the published snapshot"
    ).expect("Failed to create tags_total metric");

    pub static ref CATALOG_SEQUENCE: Gauge = Gauge::new(
        format!("{PREFIX}_snapshot_sequence"),
        "Sequence number of the published snapshot"
    ).expect("Failed to create snapshot_sequence metric");

    pub static ref CATALOG_DROPPED_RECORDS: Gauge = Gauge::new(
        format!("{PREFIX}_snapshot_dropped_records"),
        "Records dropped while building the published snapshot"
    ).expect("Failed to create snapshot_dropped_records metric");

    // Refresh Metrics
    pub static ref REFRESH_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_refresh_total"), "Refresh cycles by outcome"),
        &["outcome"]
    ).expect("Failed to create refresh_total metric");

    pub static ref REFRESH_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            format!("{PREFIX}_refresh_duration_seconds"),
            "Refresh cycle duration in seconds"
        )
        .buckets(vec![0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0])
    ).expect("Failed to create refresh_duration_seconds metric");

    // Upstream pass-through Metrics
    pub static ref UPSTREAM_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_upstream_requests_total"), "Live upstream queries by result"),
        &["operation", "result"]
    ).expect("Failed to create upstream_requests_total metric");

    pub static ref DETAIL_CACHE_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_detail_cache_lookups_total"), "Problem detail cache lookups"),
        &["result"]
    ).expect("Failed to create detail_cache_lookups_total metric");

    // Background Job Metrics
    pub static ref BACKGROUND_JOB_EXECUTIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_background_job_executions_total"), "Background job executions"),
        &["job_id", "status"]
    ).expect("Failed to create background_job_executions_total metric");

    pub static ref BACKGROUND_JOB_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_background_job_duration_seconds"),
            "Background job duration in seconds"
        )
        .buckets(vec![0.1, 1.0, 10.0, 60.0, 300.0, 900.0]),
        &["job_id"]
    ).expect("Failed to create background_job_duration_seconds metric");

    pub static ref BACKGROUND_JOB_RUNNING: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_background_job_running"), "Whether a background job is running"),
        &["job_id"]
    ).expect("Failed to create background_job_running metric");

    // Process Metrics
    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_PROBLEMS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_TAGS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_SEQUENCE.clone()));
    let _ = REGISTRY.register(Box::new(CATALOG_DROPPED_RECORDS.clone()));
    let _ = REGISTRY.register(Box::new(REFRESH_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(REFRESH_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(DETAIL_CACHE_LOOKUPS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(BACKGROUND_JOB_EXECUTIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(BACKGROUND_JOB_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(BACKGROUND_JOB_RUNNING.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Publish counts for a freshly published snapshot
pub fn update_catalog_metrics(snapshot: &Snapshot) {
    CATALOG_PROBLEMS_TOTAL
        .with_label_values(&["all"])
        .set(snapshot.len() as f64);
    for (difficulty, count) in snapshot.difficulty_counts() {
        CATALOG_PROBLEMS_TOTAL
            .with_label_values(&[&difficulty.as_str().to_lowercase()])
            .set(count as f64);
    }
    CATALOG_TAGS_TOTAL.set(snapshot.tag_counts().len() as f64);
    CATALOG_SEQUENCE.set(snapshot.sequence() as f64);
    CATALOG_DROPPED_RECORDS.set(snapshot.stats().dropped as f64);
}

/// Record the outcome of a refresh cycle
pub fn record_refresh(outcome: &str, duration: Duration) {
    REFRESH_TOTAL.with_label_values(&[outcome]).inc();
    REFRESH_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record a live upstream query
pub fn record_upstream_request(operation: &str, result: &str) {
    UPSTREAM_REQUESTS_TOTAL
        .with_label_values(&[operation, result])
        .inc();
}

pub fn record_detail_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    DETAIL_CACHE_LOOKUPS_TOTAL.with_label_values(&[result]).inc();
}

/// Record a finished background job execution
pub fn record_background_job_execution(job_id: &str, status: &str, duration: Duration) {
    BACKGROUND_JOB_EXECUTIONS_TOTAL
        .with_label_values(&[job_id, status])
        .inc();
    BACKGROUND_JOB_DURATION_SECONDS
        .with_label_values(&[job_id])
        .observe(duration.as_secs_f64());
}

pub fn set_background_job_running(job_id: &str, running: bool) {
    BACKGROUND_JOB_RUNNING
        .with_label_values(&[job_id])
        .set(if running { 1.0 } else { 0.0 });
}

/// Update process memory usage
pub fn update_memory_usage() {
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            for line in status.lines() {
                if line.starts_with("VmRSS:") {
                    // Parse the RSS (Resident Set Size) in kB
                    if let Some(kb_str) = line.split_whitespace().nth(1) {
                        if let Ok(kb) = kb_str.parse::<f64>() {
                            PROCESS_MEMORY_BYTES.set(kb * 1024.0);
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
