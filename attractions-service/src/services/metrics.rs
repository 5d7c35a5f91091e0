//! Prometheus recorder for the service plus the attraction counters.
//!
//! The text exposition is served by `handlers::health::metrics_endpoint`.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the process-wide recorder. Call once, before anything records;
/// a second call panics.
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }
}

/// Prometheus text, or a placeholder comment when no recorder is installed.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

pub fn record_attraction_created() {
    counter!("attractions_created_total").increment(1);
}

/// `outcome` is `ok` or `error`; result counts are only observed on success.
pub fn record_search(outcome: &'static str, results: Option<usize>) {
    counter!("attraction_searches_total", "outcome" => outcome).increment(1);
    if let Some(count) = results {
        histogram!("attraction_search_results").record(count as f64);
    }
}
