//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use questboard_core::clock::Clock;
use questboard_core::rng::DeterministicRng;
use questboard_test_support::{FixedClock, SequenceRng};
use tower::ServiceExt;

use questboard_api::config::AppConfig;
use questboard_api::routes;
use questboard_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Configuration for tests: default quests, no simulated latency.
pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|name| match name {
        "QUEST_BOARD_QUESTS" => Some("A,BB,CCC".to_owned()),
        "QUEST_BOARD_HANDLER_LATENCY_MS" => Some("0".to_owned()),
        _ => None,
    })
    .unwrap()
}

/// Build application state with the reward handler and a scripted RNG.
pub fn build_test_state(rng: SequenceRng) -> AppState {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    AppState::with_rewards(&test_config(), fixed_clock(), rng)
}

/// Build the full app router around `state`. Uses the same route structure
/// as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    routes::app_router().with_state(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// A widget event in wire shape.
pub fn click(id: &str, quest: &str) -> serde_json::Value {
    serde_json::json!({ "event": "quest-clicked", "detail": quest, "uniqueID": id })
}
