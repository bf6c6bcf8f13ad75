//! # Krishi Advisor API
//!
//! Binary entry point: configuration, shared state, HTTP server.
//!
//! ```text
//! AdvisorConfig::load ──► AppState::from_config ──► create_router ──► axum::serve
//!                          (Redis?  LLM key?)                          until SIGINT/SIGTERM
//! ```

use std::sync::Arc;

use advisor_api::{create_router, AdvisorConfig, AppState};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "krishi=info,advisor_api=info,tower_http=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!("Starting Krishi Advisor API server...");

    // Load configuration
    let config = AdvisorConfig::load()?;
    info!(
        addr = %config.socket_addr(),
        redis = config.redis_url.is_some(),
        llm = config.llm_api_key.is_some(),
        model = %config.llm_model,
        max_concurrency = config.llm_max_concurrency,
        "Configuration loaded"
    );

    // Create shared state (Redis and the LLM client are optional)
    let state = Arc::new(AppState::from_config(config).await);
    if state.config.redis_url.is_some() && !state.cache.is_enabled() {
        warn!("Redis configured but unreachable, continuing without caching");
    }

    let addr = state.config.socket_addr();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
