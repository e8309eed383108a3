//! Folio Server entry point.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use folio_server::AppState;
use folio_server::config::Config;
use folio_service::ServiceState;
use folio_service::sweeper::spawn_sweeper;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = Config::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let service = ServiceState::new(&config.service_config());
    let state = AppState::new(service.clone(), config.cors_origins.clone());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        sweep_interval_secs = config.sweep_interval,
        cors_origins = config.cors_origins.len(),
        "Folio Server starting",
    );

    let host = config.host.parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid host '{}': {e}", config.host),
        )
    })?;
    let addr = SocketAddr::new(host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Background eviction of idle rate-limit records
    let sweeper = spawn_sweeper(service.clone(), service.sweep_interval());

    tracing::info!(%addr, "Folio Server ready");

    folio_server::serve(listener, folio_server::router(state), shutdown_signal()).await?;

    sweeper.abort();
    tracing::info!("Folio Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install signal handler: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
