// src/lib.rs
// Public library surface for the service binary, the derivation tool, and integration tests.

pub mod api;
pub mod bias;
pub mod config;
pub mod metrics;
pub mod validation;

use axum::Router;
use tracing::{info, warn};

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::bias::{
    derive_heuristics, evaluate_bias_impact, generate_bias_report, BiasAdjustmentOutput,
    BiasKnowledgeEntry, BiasReport, KnowledgeBase, Severity,
};
pub use crate::config::EngineConfig;

/// Full service router: state from config, bias routes, and `/metrics` when
/// the Prometheus recorder could be installed.
pub async fn app() -> anyhow::Result<Router> {
    let state = AppState::from_env()?;
    info!(
        entries = state.kb.len(),
        fingerprint = %state.kb.fingerprint(),
        score_min = state.config.validation.score_min,
        score_max = state.config.validation.score_max,
        "bias knowledge base ready"
    );

    let mut router = api::router(state.clone());
    match metrics::Metrics::install(&state.kb) {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = ?e, "metrics disabled"),
    }
    Ok(router)
}
