//! Pulse Aggregator server entry point

use anyhow::Result;
use pulse_aggregator::{
    aggregator::{Aggregator, AggregatorConfig},
    config,
    sources::SourceLoader,
    summary::SimpleSummarizer,
    web::{create_router, serve_with_grace, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting Pulse Aggregator v{}", pulse_aggregator::VERSION);

    // Load configuration
    let settings = config::load()?;

    // Load sources
    let registry = Arc::new(SourceLoader::load(&settings)?);
    info!("Sources available: {:?}", registry.names());

    let aggregator = Aggregator::new(
        registry,
        Arc::new(SimpleSummarizer::new()),
        AggregatorConfig::from(&settings.aggregator),
    );

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    let grace = Duration::from_secs(settings.server.shutdown_grace_secs);
    let app = create_router(AppState::new(settings, aggregator));

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_with_grace(listener, app, shutdown_signal(), grace).await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
