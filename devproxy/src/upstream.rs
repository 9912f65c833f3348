use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use reqwest::redirect::Policy;
use url::Url;

use crate::error::{ConfigError, ProxyError};

// =========================================================
// HTTP abstraction
// =========================================================

/// A request on its way to the backend, already rewritten.
#[derive(Debug)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// The backend's answer, fully buffered.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Sends rewritten requests to the backend. Tests substitute a recording mock.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn send(&self, req: UpstreamRequest) -> Result<UpstreamResponse, ProxyError>;
}

// =========================================================
// reqwest implementation
// =========================================================

#[derive(Clone)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    pub fn new() -> Result<Self, ConfigError> {
        // Redirects belong to the browser, not to the proxy.
        let client = reqwest::Client::builder().redirect(Policy::none()).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Upstream for ReqwestUpstream {
    async fn send(&self, req: UpstreamRequest) -> Result<UpstreamResponse, ProxyError> {
        let response = self
            .client
            .request(req.method, req.url)
            .headers(req.headers)
            .body(req.body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
