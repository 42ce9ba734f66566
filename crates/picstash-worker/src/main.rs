use std::sync::Arc;

use anyhow::{Context, Result};
use picstash_core::Config;
use picstash_queue::{BrokerJobQueue, JobQueue};
use picstash_storage::LocalBlobStore;
use picstash_worker::{CompressionConsumer, ImageCompressor};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        storage_path = %config.storage_path.display(),
        broker_url = %config.broker_url,
        "Compression worker starting"
    );

    let storage = Arc::new(
        LocalBlobStore::new(&config.storage_path)
            .await
            .context("Failed to initialize blob store")?,
    );

    let queue = BrokerJobQueue::connect(&config.broker_url)
        .await
        .context("Failed to connect to job broker")?;

    let consumer = Arc::new(CompressionConsumer::new(storage, Arc::new(ImageCompressor)));

    tokio::select! {
        result = queue.consume(consumer) => {
            result.context("Consumer terminated with a broker error")?;
        }
        _ = shutdown_signal() => {}
    }

    tracing::info!("Compression worker stopped");
    Ok(())
}

/// Listens for Ctrl+C (SIGINT) and SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
