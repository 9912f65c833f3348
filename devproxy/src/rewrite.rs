//! Mapping of dev-server paths onto the backend.
//!
//! `/api/balance?month=5` becomes `<backend>/balance?month=5`. Matching is per
//! path segment, so `/apiary` stays with the static file server.

use url::Url;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct ProxyRule {
    prefix: String,
    target: Url,
    change_origin: bool,
}

impl ProxyRule {
    pub fn new(prefix: &str, target: &str, change_origin: bool) -> Result<Self, ConfigError> {
        let trimmed = prefix.trim_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }

        let url = Url::parse(target).map_err(|source| ConfigError::InvalidBackend {
            url: target.to_string(),
            source,
        })?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedBackend(target.to_string()));
        }

        Ok(Self {
            prefix: format!("/{trimmed}"),
            target: url,
            change_origin,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Whether `Host`/`Origin` are rewritten to the backend.
    pub fn change_origin(&self) -> bool {
        self.change_origin
    }

    fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        match path.strip_prefix(self.prefix.as_str())? {
            "" => Some("/"),
            rest if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }

    /// Backend URL for a request path, or `None` if the path is not proxied.
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> Option<Url> {
        let rest = self.strip(path)?;
        let mut url = self.target.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base}{rest}"));
        url.set_query(query);
        Some(url)
    }

    /// `host[:port]` of the backend, as sent in the `Host` header.
    pub fn authority(&self) -> String {
        let host = self.target.host_str().unwrap_or_default();
        match self.target.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Serialized origin of the backend, as sent in the `Origin` header.
    pub fn origin(&self) -> String {
        self.target.origin().ascii_serialization()
    }
}
