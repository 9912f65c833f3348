mod config;
mod error;
mod proxy;
mod rewrite;
mod upstream;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use config::{Args, ProxyConfig};
use proxy::AppState;
use upstream::ReqwestUpstream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ProxyConfig::from_args(Args::parse())?;
    let upstream = Arc::new(ReqwestUpstream::new()?);
    let state = AppState::new(config.rule.clone(), upstream, &config.dist);

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;

    tracing::info!(
        listen = %config.listen,
        backend = %config.rule.target(),
        prefix = config.rule.prefix(),
        dist = %config.dist.display(),
        "dev proxy listening"
    );

    axum::serve(listener, proxy::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
