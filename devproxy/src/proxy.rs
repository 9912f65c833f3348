//! Request dispatch.
//!
//! Paths under the API prefix go to the backend; everything else is served
//! from the frontend build, with `index.html` answering history-mode routes.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::{self, Body};
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use url::Url;

use crate::error::ProxyError;
use crate::rewrite::ProxyRule;
use crate::upstream::{Upstream, UpstreamRequest};

const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Headers that describe a single connection and are never forwarded.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Clone)]
pub struct AppState {
    rule: Arc<ProxyRule>,
    upstream: Arc<dyn Upstream>,
    assets: ServeDir<ServeFile>,
}

impl AppState {
    pub fn new(rule: ProxyRule, upstream: Arc<dyn Upstream>, dist: &Path) -> Self {
        let assets = ServeDir::new(dist).fallback(ServeFile::new(dist.join("index.html")));
        Self {
            rule: Arc::new(rule),
            upstream,
            assets,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    let upstream_url = state.rule.upstream_url(req.uri().path(), req.uri().query());
    match upstream_url {
        Some(url) => forward(&state, url, req).await.into_response(),
        None => serve_asset(state.assets.clone(), req).await,
    }
}

async fn serve_asset(assets: ServeDir<ServeFile>, req: Request) -> Response {
    match assets.oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

async fn forward(state: &AppState, url: Url, req: Request) -> Result<Response, ProxyError> {
    let (parts, body) = req.into_parts();
    let body = body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| ProxyError::request_body(err, MAX_BODY_BYTES))?;

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    if state.rule.change_origin() {
        rewrite_origin(&state.rule, &mut headers);
    }

    let method = parts.method.clone();
    let upstream = state
        .upstream
        .send(UpstreamRequest {
            method: parts.method,
            url: url.clone(),
            headers,
            body,
        })
        .await?;

    tracing::info!(
        %method,
        path = parts.uri.path(),
        upstream = %url,
        status = %upstream.status,
        "proxied"
    );

    let mut headers = upstream.headers;
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Removes the fixed hop-by-hop set plus anything named in `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in &listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

fn rewrite_origin(rule: &ProxyRule, headers: &mut HeaderMap) {
    if let Ok(host) = HeaderValue::from_str(&rule.authority()) {
        headers.insert(header::HOST, host);
    }
    if headers.contains_key(header::ORIGIN) {
        if let Ok(origin) = HeaderValue::from_str(&rule.origin()) {
            headers.insert(header::ORIGIN, origin);
        }
    }
}

#[cfg(test)]
mod tests;
