use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::bias::KnowledgeBase;

pub const REQUESTS_TOTAL: &str = "bias_requests_total";
pub const VALIDATION_FAILURES_TOTAL: &str = "bias_validation_failures_total";
pub const UNKNOWN_LABELS_TOTAL: &str = "bias_unknown_labels_total";
pub const KNOWLEDGE_ENTRIES: &str = "bias_knowledge_entries";

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and publish the table size.
    /// The recorder is process-wide; later calls reuse the first handle.
    pub fn install(kb: &KnowledgeBase) -> anyhow::Result<Self> {
        let handle = HANDLE
            .get_or_try_init(|| {
                PrometheusBuilder::new()
                    .install_recorder()
                    .context("prometheus: install recorder")
            })?
            .clone();

        gauge!(KNOWLEDGE_ENTRIES).set(kb.len() as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

// Without an installed recorder these are no-ops (tests, CLI).

pub fn record_request(endpoint: &'static str) {
    counter!(REQUESTS_TOTAL, "endpoint" => endpoint).increment(1);
}

pub fn record_validation_failure(endpoint: &'static str) {
    counter!(VALIDATION_FAILURES_TOTAL, "endpoint" => endpoint).increment(1);
}

pub fn record_unknown_labels(n: usize) {
    if n > 0 {
        counter!(UNKNOWN_LABELS_TOTAL).increment(n as u64);
    }
}
