//! Application state shared across handlers.

use std::sync::Arc;

use picstash_core::Config;
use picstash_queue::JobQueue;
use picstash_storage::BlobStore;

use crate::services::IngestService;

pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn BlobStore>,
    pub queue: Arc<dyn JobQueue>,
    pub ingest: IngestService,
}
