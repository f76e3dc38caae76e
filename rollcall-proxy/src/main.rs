mod config;
mod error;
mod relay;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::ProxyConfig;
use crate::relay::RelayState;

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ProxyConfig::load();

    let app = relay::router()
        .with_state(RelayState::new(config.upstream))
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!("rollcall-proxy running on http://{}", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
