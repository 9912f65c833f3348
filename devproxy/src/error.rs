use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use thiserror::Error;

/// Invalid command line / environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("api prefix must name at least one path segment")]
    EmptyPrefix,
    #[error("invalid backend url {url}: {source}")]
    InvalidBackend {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("backend url {0} must be an absolute http(s) url")]
    UnsupportedBackend(String),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failure while forwarding one request.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    RequestBody(axum::Error),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl ProxyError {
    /// Classifies a failed `to_bytes(body, limit)` read.
    pub fn request_body(err: axum::Error, limit: usize) -> Self {
        match err.into_inner().downcast::<LengthLimitError>() {
            Ok(_) => ProxyError::PayloadTooLarge { limit },
            Err(other) => ProxyError::RequestBody(axum::Error::new(other)),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::RequestBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(error = %self, %status, "proxy request failed");
        (status, self.to_string()).into_response()
    }
}
