#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use films_api::db::repositories::LocalRepository;
use films_api::db::repository::FullRepository;
use films_api::http::{create_router, AppState};

/// Build a router backed by a fresh in-memory repository.
pub fn test_app() -> Router {
    let repo = Arc::new(LocalRepository::new()) as Arc<dyn FullRepository>;
    create_router(AppState::new(repo))
}

/// Send one request through the router and decode the response.
///
/// Returns the status, response headers, and the JSON body (`Value::Null`
/// for empty bodies such as 204 responses).
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("failed to build request"),
        None => builder.body(Body::empty()).expect("failed to build request"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };

    (status, headers, json)
}

/// Create a film and return its id.
pub async fn create_film(app: &Router, title: &str, body: &str) -> i64 {
    let (status, _, json) = request(
        app,
        "POST",
        "/films",
        Some(serde_json::json!({"title": title, "body": body})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["FilmID"].as_i64().expect("FilmID should be numeric")
}

/// Create a review under a film and return its id.
pub async fn create_review(app: &Router, film_id: i64, title: &str, body: &str) -> i64 {
    let (status, _, json) = request(
        app,
        "POST",
        &format!("/films/{}/reviews", film_id),
        Some(serde_json::json!({"title": title, "body": body})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["ReviewID"]
        .as_i64()
        .expect("ReviewID should be numeric")
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes
/// access to process-global env vars to avoid flaky tests when Rust runs
/// tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
