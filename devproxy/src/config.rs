use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;
use crate::rewrite::ProxyRule;

/// Serves the frontend build and forwards API calls to the backend.
#[derive(Debug, Parser)]
#[command(name = "devproxy", version, about)]
pub struct Args {
    /// Address the dev server listens on
    #[arg(long, env = "DEVPROXY_LISTEN", default_value = "127.0.0.1:8081")]
    pub listen: SocketAddr,

    /// Directory produced by `trunk build`
    #[arg(long, env = "DEVPROXY_DIST", default_value = "frontend/dist")]
    pub dist: PathBuf,

    /// Backend origin that receives proxied requests
    #[arg(long, env = "DEVPROXY_BACKEND", default_value = "http://localhost:8080")]
    pub backend: String,

    /// Path prefix that is forwarded (and stripped)
    #[arg(long, env = "DEVPROXY_API_PREFIX", default_value = "/api")]
    pub api_prefix: String,

    /// Forward the browser's Host/Origin headers unchanged
    #[arg(long, env = "DEVPROXY_KEEP_ORIGIN")]
    pub keep_origin: bool,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub listen: SocketAddr,
    pub dist: PathBuf,
    pub rule: ProxyRule,
}

impl ProxyConfig {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let rule = ProxyRule::new(&args.api_prefix, &args.backend, !args.keep_origin)?;

        // Not fatal: `trunk watch` may still be producing the first build.
        if !args.dist.join("index.html").is_file() {
            tracing::warn!(dist = %args.dist.display(), "index.html not found in dist directory");
        }

        Ok(Self {
            listen: args.listen,
            dist: args.dist,
            rule,
        })
    }
}
