//! Application wiring: storage, staging, queue, routes, server.

pub mod routes;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use picstash_core::Config;
use picstash_queue::BrokerJobQueue;
use picstash_storage::LocalBlobStore;

use crate::services::IngestService;
use crate::staging::StagingArea;
use crate::state::AppState;

/// Build the application state and router from configuration.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    crate::error::set_production(config.is_production());

    let storage = Arc::new(
        LocalBlobStore::new(&config.storage_path)
            .await
            .context("Failed to initialize blob store")?,
    );

    let staging = StagingArea::new(&config.staging_dir)
        .await
        .context("Failed to initialize staging area")?;

    let queue = Arc::new(
        BrokerJobQueue::connect(&config.broker_url)
            .await
            .context("Failed to connect to job broker")?,
    );

    let ingest = IngestService::new(
        storage.clone(),
        queue.clone(),
        staging,
        config.max_upload_bytes,
        Duration::from_secs(config.commit_timeout_secs),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        queue,
        ingest,
    });

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
