use super::*;
use crate::upstream::{ReqwestUpstream, UpstreamResponse};
use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

// =========================================================
// Helpers
// =========================================================

const INDEX_HTML: &str = r#"<!DOCTYPE html><html><body><div id="app"></div></body></html>"#;

/// Records every forwarded request and answers with a fixed JSON body.
#[derive(Default)]
struct RecordingUpstream {
    seen: Mutex<Vec<UpstreamRequest>>,
}

impl RecordingUpstream {
    fn take(&self) -> Vec<UpstreamRequest> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }
}

#[async_trait]
impl Upstream for RecordingUpstream {
    async fn send(&self, req: UpstreamRequest) -> Result<UpstreamResponse, ProxyError> {
        self.seen.lock().unwrap().push(req);

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
        Ok(UpstreamResponse {
            status: StatusCode::OK,
            headers,
            body: Bytes::from_static(br#"{"balance":42}"#),
        })
    }
}

fn dist_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
    dir
}

fn create_app(upstream: Arc<dyn Upstream>, dist: &TempDir, backend: &str, change_origin: bool) -> Router {
    let rule = ProxyRule::new("/api", backend, change_origin).unwrap();
    app(AppState::new(rule, upstream, dist.path()))
}

fn get(uri: &str) -> Request {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "localhost:8081")
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// =========================================================
// Forwarding
// =========================================================

#[tokio::test]
async fn test_api_request_is_forwarded_without_prefix() {
    let dist = dist_dir();
    let upstream = Arc::new(RecordingUpstream::default());
    let app = create_app(upstream.clone(), &dist, "http://localhost:8080", true);

    let request = Request::builder()
        .uri("/api/balance?month=5")
        .header(header::HOST, "localhost:8081")
        .header(header::ORIGIN, "http://localhost:8081")
        .header(header::AUTHORIZATION, "Bearer abc123")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert!(!response.headers().contains_key(header::CONNECTION));
    assert_eq!(body_text(response).await, r#"{"balance":42}"#);

    let seen = upstream.take();
    assert_eq!(seen.len(), 1);
    let forwarded = &seen[0];
    assert_eq!(forwarded.method, Method::GET);
    assert_eq!(forwarded.url.as_str(), "http://localhost:8080/balance?month=5");
    assert_eq!(forwarded.headers[header::HOST], "localhost:8080");
    assert_eq!(forwarded.headers[header::ORIGIN], "http://localhost:8080");
    assert_eq!(forwarded.headers[header::AUTHORIZATION], "Bearer abc123");
    assert!(!forwarded.headers.contains_key(header::CONNECTION));
}

#[tokio::test]
async fn test_keep_origin_forwards_browser_host() {
    let dist = dist_dir();
    let upstream = Arc::new(RecordingUpstream::default());
    let app = create_app(upstream.clone(), &dist, "http://localhost:8080", false);

    let request = Request::builder()
        .uri("/api/balance")
        .header(header::HOST, "localhost:8081")
        .header(header::ORIGIN, "http://localhost:8081")
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap();

    let seen = upstream.take();
    assert_eq!(seen[0].headers[header::HOST], "localhost:8081");
    assert_eq!(seen[0].headers[header::ORIGIN], "http://localhost:8081");
}

#[tokio::test]
async fn test_request_body_and_method_are_forwarded() {
    let dist = dist_dir();
    let upstream = Arc::new(RecordingUpstream::default());
    let app = create_app(upstream.clone(), &dist, "http://localhost:8080", true);

    let payload = r#"{"monthly_income":3500}"#;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/onboarding/income")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-trace", "1")
        .header(header::CONNECTION, "x-trace")
        .body(Body::from(payload))
        .unwrap();
    app.oneshot(request).await.unwrap();

    let seen = upstream.take();
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].url.path(), "/onboarding/income");
    assert_eq!(seen[0].body, Bytes::from(payload));
    // named in Connection, so it is hop-by-hop too
    assert!(!seen[0].headers.contains_key("x-trace"));
}

#[tokio::test]
async fn test_oversized_body_is_rejected_before_forwarding() {
    let dist = dist_dir();
    let upstream = Arc::new(RecordingUpstream::default());
    let app = create_app(upstream.clone(), &dist, "http://localhost:8080", true);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/import")
        .body(Body::from(vec![b'x'; MAX_BODY_BYTES + 1]))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(upstream.take().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    let dist = dist_dir();
    let upstream = Arc::new(ReqwestUpstream::new().unwrap());
    let app = create_app(upstream, &dist, "http://127.0.0.1:1", true);

    let response = app.oneshot(get("/api/balance")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// =========================================================
// Static assets
// =========================================================

#[tokio::test]
async fn test_history_routes_fall_back_to_index() {
    let dist = dist_dir();
    let upstream = Arc::new(RecordingUpstream::default());

    for path in ["/", "/dashboard", "/onboarding/income"] {
        let app = create_app(upstream.clone(), &dist, "http://localhost:8080", true);
        let response = app.oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert!(body_text(response).await.contains(r#"<div id="app">"#), "{path}");
    }
    assert!(upstream.take().is_empty());
}

#[tokio::test]
async fn test_static_files_are_served() {
    let dist = dist_dir();
    let upstream = Arc::new(RecordingUpstream::default());
    let app = create_app(upstream, &dist, "http://localhost:8080", true);

    let response = app.oneshot(get("/app.js")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "console.log(1)");
}

#[tokio::test]
async fn test_prefix_lookalike_is_not_proxied() {
    let dist = dist_dir();
    let upstream = Arc::new(RecordingUpstream::default());
    let app = create_app(upstream.clone(), &dist, "http://localhost:8080", true);

    let response = app.oneshot(get("/apiary")).await.unwrap();

    assert!(body_text(response).await.contains(r#"<div id="app">"#));
    assert!(upstream.take().is_empty());
}
