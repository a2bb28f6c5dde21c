// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET  /health
// - POST /api/bias/evaluate  (success + validation failures)
// - POST /api/bias/report
// - GET  /api/bias/heuristics

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use scorelytic_bias::{api, AppState};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses (built-in tables, default config).
fn test_router() -> Router {
    api::router(AppState::builtin())
}

async fn post_json(uri: &str, body: String) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("build POST");

    let resp = test_router().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("json body");
    (status, v)
}

#[tokio::test]
async fn health_returns_200_and_ok_body() {
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = test_router().oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.expect("read body");
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap().trim(), "OK");
}

#[tokio::test]
async fn evaluate_wraps_output_in_success_envelope() {
    let payload = json!({ "sentimentScore": 7.0, "biasIndicators": ["nostalgia bias"] });
    let (status, v) = post_json("/api/bias/evaluate", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["success"], json!(true));
    assert!(v.get("error").is_none());

    let data = &v["data"];
    assert_eq!(data["biasAdjustedScore"], json!(7.4));
    assert_eq!(data["biasImpact"][0]["name"], json!("nostalgia bias"));
    assert_eq!(data["biasImpact"][0]["severity"], json!("moderate"));
}

#[tokio::test]
async fn report_returns_all_layers() {
    let payload = json!({
        "sentimentScore": 8.0,
        "biasIndicators": ["nostalgia bias", "franchise bias"]
    });
    let (status, v) = post_json("/api/bias/report", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    let data = &v["data"];
    assert_eq!(data["summary"]["adjustedScore"], json!(8.6));
    assert_eq!(data["summary"]["verdict"], json!("generally positive"));
    assert_eq!(data["summary"]["confidence"], json!("high"));
    assert_eq!(
        data["summary"]["biasSummary"],
        json!("Includes nostalgia, franchise biases.")
    );
    assert_eq!(data["details"].as_array().unwrap().len(), 2);
    assert_eq!(data["culturalContext"]["originalScore"], json!(8.0));
    assert_eq!(
        data["fullReport"]["score_analysis_engine"]["bias_adjusted_score"],
        json!(8.6)
    );
}

#[tokio::test]
async fn empty_indicator_list_is_rejected_with_400() {
    let payload = json!({ "sentimentScore": 7.0, "biasIndicators": [] });
    let (status, v) = post_json("/api/bias/evaluate", payload.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["success"], json!(false));
    assert!(v.get("data").is_none());
    assert!(v["error"].as_str().unwrap().contains("biasIndicators"));
}

#[tokio::test]
async fn out_of_range_score_is_rejected_with_400() {
    let payload = json!({ "sentimentScore": 42.0, "biasIndicators": ["hype bias"] });
    let (status, v) = post_json("/api/bias/report", payload.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"].as_str().unwrap().contains("sentimentScore"));
}

#[tokio::test]
async fn non_numeric_score_and_broken_json_are_400() {
    let payload = json!({ "sentimentScore": "seven", "biasIndicators": ["hype bias"] });
    let (status, v) = post_json("/api/bias/evaluate", payload.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["success"], json!(false));

    let (status, v) = post_json("/api/bias/evaluate", "{ not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(v["error"].as_str().unwrap().starts_with("invalid request body"));
}

#[tokio::test]
async fn unknown_labels_pass_validation_with_zero_influence() {
    let payload = json!({ "sentimentScore": 5.0, "biasIndicators": ["made-up bias"] });
    let (status, v) = post_json("/api/bias/evaluate", payload.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["data"]["biasImpact"][0]["scoreInfluence"], json!(0.0));
    assert_eq!(v["data"]["biasAdjustedScore"], json!(5.0));
}

#[tokio::test]
async fn heuristics_lists_entries_with_fingerprint() {
    let req = Request::builder()
        .method("GET")
        .uri("/api/bias/heuristics")
        .body(Body::empty())
        .expect("build GET /api/bias/heuristics");

    let resp = test_router().oneshot(req).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("json");

    let data = &v["data"];
    assert_eq!(data["fingerprint"].as_str().unwrap().len(), 16);
    let n = &data["entries"]["nostalgia bias"];
    assert_eq!(n["baseScoreInfluence"], json!(0.4));
    assert!(n.get("maxScoreInfluence").is_some());
}
