//! Back-office console server.
//!
//! # Usage
//!
//! ```bash
//! BACKOFFICE_API_URL=https://api.example.com cargo run --bin backoffice-server
//! ```

use backoffice_client::ApiClient;
use backoffice_runtime::metrics::MetricsServer;
use backoffice_server::{ServerConfig, app, metrics_router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backoffice=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        bind = %config.bind_addr(),
        api = %config.client.base_url,
        timeout_secs = config.client.timeout.as_secs(),
        metrics = ?config.metrics_addr,
        "Configuration loaded"
    );

    let client = ApiClient::new(config.client.clone())?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let metrics_task = match config.metrics_addr {
        Some(addr) => {
            let mut metrics = MetricsServer::new(addr);
            metrics.start()?;
            let listener = TcpListener::bind(metrics.addr()).await?;
            info!(%addr, "Prometheus metrics available at /metrics");

            let mut rx = shutdown_rx.clone();
            Some(tokio::spawn(async move {
                let served = axum::serve(listener, metrics_router(Arc::new(metrics)))
                    .with_graceful_shutdown(async move {
                        let _ = rx.changed().await;
                    })
                    .await;
                if let Err(e) = served {
                    error!(error = %e, "Metrics server error");
                }
            }))
        }
        None => None,
    };

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "HTTP server listening");

    let router = app(client, config.auth.clone());
    let mut rx = shutdown_rx;
    let server_task = tokio::spawn(async move {
        let served = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = rx.changed().await;
            })
            .await;
        if let Err(e) = served {
            error!(error = %e, "HTTP server error");
        }
    });

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!(error = %e, "Unable to listen for shutdown signal"),
    }
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(config.shutdown_timeout, server_task).await {
        Ok(Ok(())) => info!("HTTP server stopped"),
        Ok(Err(e)) => warn!(error = %e, "HTTP server task failed during shutdown"),
        Err(_) => warn!(
            timeout_secs = config.shutdown_timeout.as_secs(),
            "Shutdown timed out with requests still in flight"
        ),
    }
    if let Some(task) = metrics_task {
        if let Err(e) = task.await {
            warn!(error = %e, "Metrics server task failed during shutdown");
        }
    }

    Ok(())
}
