//! HTTP surface: thin handlers over the bias engine.
//!
//! Every JSON response uses the envelope `{ success, data?, error? }`.
//! - 400: validation failure (including malformed JSON bodies)
//! - 500: unexpected internal failure (a panic inside a handler)

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use tracing::{error, info, warn};

use crate::bias::{
    evaluate_bias_impact, generate_bias_report, BiasAdjustmentOutput, BiasKnowledgeEntry,
    BiasReport, KnowledgeBase,
};
use crate::config::EngineConfig;
use crate::metrics;
use crate::validation::{validate_request, ValidationError};

#[derive(Clone)]
pub struct AppState {
    pub kb: Arc<KnowledgeBase>,
    pub config: Arc<EngineConfig>,
}

impl AppState {
    pub fn new(kb: Arc<KnowledgeBase>, config: EngineConfig) -> Self {
        Self {
            kb,
            config: Arc::new(config),
        }
    }

    /// Default config + compiled-in tables.
    pub fn builtin() -> Self {
        Self::new(KnowledgeBase::builtin(), EngineConfig::default())
    }

    /// Config from `$SCORELYTIC_CONFIG_PATH` / `config/engine.toml`, knowledge base per config.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = EngineConfig::load_default()?;
        let kb = KnowledgeBase::from_config(&config.heuristics)?;
        Ok(Self::new(kb, config))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/bias/evaluate", post(evaluate))
        .route("/api/bias/report", post(report))
        .route("/api/bias/heuristics", get(heuristics))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Request body shared by `/evaluate` and `/report`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasRequest {
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub bias_indicators: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(Envelope::err(self.to_string())),
        )
            .into_response()
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown internal error".to_string()
    };
    error!(%detail, "bias engine request panicked");

    let body = serde_json::to_string(&Envelope::err(format!("internal error: {detail}")))
        .unwrap_or_else(|_| r#"{"success":false,"error":"internal error"}"#.to_string());
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// Decode + validate; counts failures per endpoint.
fn accept(
    state: &AppState,
    endpoint: &'static str,
    payload: Result<Json<BiasRequest>, JsonRejection>,
) -> Result<(f64, Vec<String>), ValidationError> {
    metrics::record_request(endpoint);

    let result = payload
        .map_err(|rej| ValidationError::MalformedBody(rej.body_text()))
        .and_then(|Json(req)| {
            validate_request(
                &state.config.validation,
                req.sentiment_score,
                req.bias_indicators,
            )
        });

    match &result {
        Ok((_, labels)) => {
            let unknown = labels.iter().filter(|b| state.kb.get(b).is_none()).count();
            metrics::record_unknown_labels(unknown);
        }
        Err(e) => {
            metrics::record_validation_failure(endpoint);
            warn!(endpoint, error = %e, "rejected bias request");
        }
    }
    result
}

async fn evaluate(
    State(state): State<AppState>,
    payload: Result<Json<BiasRequest>, JsonRejection>,
) -> Result<Json<Envelope<BiasAdjustmentOutput>>, ValidationError> {
    let (score, labels) = accept(&state, "evaluate", payload)?;
    let out = evaluate_bias_impact(&state.kb, score, &labels);
    info!(
        biases = labels.len(),
        input = score,
        adjusted = out.bias_adjusted_score,
        "evaluated bias impact"
    );
    Ok(Json(Envelope::ok(out)))
}

async fn report(
    State(state): State<AppState>,
    payload: Result<Json<BiasRequest>, JsonRejection>,
) -> Result<Json<Envelope<BiasReport>>, ValidationError> {
    let (score, labels) = accept(&state, "report", payload)?;
    let out = generate_bias_report(&state.kb, score, &labels);
    info!(
        biases = labels.len(),
        input = score,
        adjusted = out.summary.adjusted_score,
        verdict = ?out.summary.verdict,
        "generated bias report"
    );
    Ok(Json(Envelope::ok(out)))
}

#[derive(Debug, Serialize)]
pub struct HeuristicsOut {
    pub fingerprint: String,
    pub entries: std::collections::BTreeMap<String, BiasKnowledgeEntry>,
}

async fn heuristics(State(state): State<AppState>) -> Json<Envelope<HeuristicsOut>> {
    metrics::record_request("heuristics");
    Json(Envelope::ok(HeuristicsOut {
        fingerprint: state.kb.fingerprint(),
        entries: state.kb.entries().clone(),
    }))
}
