//! End-to-end checks of the HTTP surface through the real router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    middleware,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use obsdemo_server::{
    app_state::AppState, config::ServiceConfig, obs::middleware::track_requests,
    router::build_router,
};

struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: String,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

fn state() -> AppState {
    AppState::new(ServiceConfig::default()).unwrap()
}

async fn send(router: &Router, method: Method, uri: &str) -> Reply {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();

    let status = resp.status();
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();

    Reply {
        status,
        content_type,
        body: String::from_utf8(body.to_vec()).unwrap(),
    }
}

async fn get_path(router: &Router, uri: &str) -> Reply {
    send(router, Method::GET, uri).await
}

#[tokio::test]
async fn health_returns_ok() {
    let router = build_router(state());

    let r = get_path(&router, "/health").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.content_type.as_deref(), Some("application/json"));
    assert_eq!(r.json(), json!({"status": "ok"}));
}

#[tokio::test]
async fn hello_defaults_to_world() {
    let router = build_router(state());

    let r = get_path(&router, "/hello").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!({"message": "Hello, world!"}));
}

#[tokio::test]
async fn hello_greets_given_name() {
    let router = build_router(state());

    let r = get_path(&router, "/hello?name=Ada").await;
    assert_eq!(r.json(), json!({"message": "Hello, Ada!"}));

    let r = get_path(&router, "/hello?name=Ada%20Lovelace").await;
    assert_eq!(r.json(), json!({"message": "Hello, Ada Lovelace!"}));
}

#[tokio::test]
async fn hello_with_repeated_name_uses_last_value() {
    let state = state();
    let router = build_router(state.clone());

    let r = get_path(&router, "/hello?name=a&name=b").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!({"message": "Hello, b!"}));
    assert_eq!(state.metrics().requests_total("GET", "/hello", 200), 1);
}

#[tokio::test]
async fn hello_with_bare_name_greets_empty_string() {
    let router = build_router(state());

    let r = get_path(&router, "/hello?name").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!({"message": "Hello, !"}));
}

#[tokio::test]
async fn root_lists_endpoints_regardless_of_history() {
    let router = build_router(state());
    let expected = json!(["/health", "/hello", "/metrics"]);

    let before = get_path(&router, "/").await;
    assert_eq!(before.status, StatusCode::OK);
    assert_eq!(before.json()["endpoints"], expected);
    assert_eq!(
        before.json()["message"],
        json!("DevOps Observability Demo is running")
    );

    get_path(&router, "/health").await;
    get_path(&router, "/hello?name=x").await;
    get_path(&router, "/metrics").await;

    let after = get_path(&router, "/").await;
    assert_eq!(after.json()["endpoints"], expected);
}

#[tokio::test]
async fn metrics_exposes_health_counter() {
    let router = build_router(state());

    get_path(&router, "/health").await;
    get_path(&router, "/health").await;

    let r = get_path(&router, "/metrics").await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(
        r.content_type.as_deref(),
        Some("text/plain; version=0.0.4; charset=utf-8")
    );
    let health_line = r#"http_requests_total{method="GET",endpoint="/health",http_status="200"} 2"#;
    assert!(r.body.lines().any(|l| l == health_line));
    assert!(r
        .body
        .lines()
        .any(|l| l == r#"http_request_latency_seconds_count{endpoint="/health"} 2"#));

    // the scrape itself is recorded once its response is complete
    let again = get_path(&router, "/metrics").await;
    assert!(again
        .body
        .contains(r#"http_requests_total{method="GET",endpoint="/metrics",http_status="200"} 1"#));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_health_requests_are_counted_exactly() {
    const N: u64 = 200;
    let state = state();
    let router = build_router(state.clone());

    let mut tasks = Vec::new();
    for _ in 0..N {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            get_path(&router, "/health").await.status
        }));
    }
    for t in tasks {
        assert_eq!(t.await.unwrap(), StatusCode::OK);
    }

    let metrics = state.metrics();
    assert_eq!(metrics.requests_total("GET", "/health", 200), N);
    assert_eq!(metrics.latency("/health").unwrap().count, N);
}

#[tokio::test]
async fn latency_sum_is_non_decreasing() {
    let state = state();
    let router = build_router(state.clone());

    let mut prev = 0.0_f64;
    for i in 1..=5u64 {
        get_path(&router, "/hello").await;
        let snap = state.metrics().latency("/hello").unwrap();
        assert_eq!(snap.count, i);
        assert!(snap.sum >= 0.0);
        assert!(snap.sum >= prev);
        prev = snap.sum;
    }
}

#[tokio::test]
async fn independent_states_do_not_share_counts() {
    let a = state();
    let b = state();
    let router_a = build_router(a.clone());
    let router_b = build_router(b.clone());

    get_path(&router_a, "/health").await;
    get_path(&router_a, "/health").await;

    assert_eq!(a.metrics().requests_total("GET", "/health", 200), 2);
    assert_eq!(b.metrics().requests_total("GET", "/health", 200), 0);

    let r = get_path(&router_b, "/metrics").await;
    assert!(!r.body.contains(r#"endpoint="/health""#));
}

#[tokio::test]
async fn unknown_path_is_404_and_counted() {
    let state = state();
    let router = build_router(state.clone());

    let r = get_path(&router, "/nope").await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    assert_eq!(r.json(), json!({"detail": "not found", "code": "NOT_FOUND"}));
    assert_eq!(state.metrics().requests_total("GET", "/nope", 404), 1);
}

#[tokio::test]
async fn wrong_method_is_counted_with_final_status() {
    let state = state();
    let router = build_router(state.clone());

    let r = send(&router, Method::POST, "/health").await;
    assert_eq!(r.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(state.metrics().requests_total("POST", "/health", 405), 1);
    assert_eq!(state.metrics().requests_total("GET", "/health", 200), 0);
}

async fn boom() -> &'static str {
    panic!("boom")
}

#[tokio::test]
async fn panicking_handler_is_recorded_as_500() {
    let state = state();
    let router = Router::new()
        .route("/boom", get(boom))
        .layer(middleware::from_fn_with_state(state.clone(), track_requests));

    let r = get_path(&router, "/boom").await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.json()["code"], json!("INTERNAL"));

    assert_eq!(state.metrics().requests_total("GET", "/boom", 500), 1);
    assert_eq!(state.metrics().latency("/boom").unwrap().count, 1);
}
