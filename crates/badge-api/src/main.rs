//! # badge-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the badge issuer.
//! Configuration comes from `BADGE_*` environment variables; binds to
//! `PORT` (default 8080).

use anyhow::Context;
use badge_api::state::AppState;
use badge_core::IssuerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = IssuerConfig::from_env().context("invalid issuer configuration")?;
    let port = config.port;
    tracing::info!(
        app_root = %config.app_root.display(),
        root_prefix = %config.root_prefix,
        debug = config.debug,
        "issuer configured"
    );
    if config.public_origin.is_none() {
        tracing::warn!("BADGE_PUBLIC_ORIGIN not set; assertion URLs follow the request Host header");
    }

    let app = badge_api::app(AppState::new(config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("badge issuer listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
