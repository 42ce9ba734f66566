//! Compression job consumer.

use std::sync::Arc;

use async_trait::async_trait;
use picstash_core::CompressionJob;
use picstash_queue::{JobHandler, QueueError};
use picstash_storage::BlobStore;

use crate::compressor::{CompressError, Compressor};

/// Variant label the compressed rendition is stored under.
pub const COMPRESSED_VARIANT: &str = "compressed";

/// Handles compression jobs: load the original payload, re-encode it, and
/// store the result as the `compressed` variant.
///
/// The handler is idempotent: redelivered jobs overwrite the variant with the
/// same bytes, so at-least-once delivery is safe.
pub struct CompressionConsumer {
    storage: Arc<dyn BlobStore>,
    compressor: Arc<dyn Compressor>,
}

impl CompressionConsumer {
    pub fn new(storage: Arc<dyn BlobStore>, compressor: Arc<dyn Compressor>) -> Self {
        Self {
            storage,
            compressor,
        }
    }
}

#[async_trait]
impl JobHandler for CompressionConsumer {
    async fn handle(&self, job: CompressionJob) -> Result<(), QueueError> {
        let photo_id = job.photo_id;
        tracing::info!(photo_id = %photo_id, "Processing compression job");

        let record = self
            .storage
            .get_record(photo_id)
            .await
            .map_err(|e| QueueError::Job(format!("Failed to load record: {}", e)))?;

        let payload = self
            .storage
            .read_payload(photo_id)
            .await
            .map_err(|e| QueueError::Job(format!("Failed to read payload: {}", e)))?;

        let original_size = payload.len();

        // Image decode/encode is CPU-bound; keep it off the async runtime.
        let compressor = self.compressor.clone();
        let content_type = record.content_type.clone();
        let compressed = tokio::task::spawn_blocking(move || {
            compressor.compress(&content_type, &payload)
        })
        .await
        .map_err(|e| QueueError::Job(format!("Compression task panicked: {}", e)))?
        .map_err(|e: CompressError| QueueError::Job(format!("Compression failed: {}", e)))?;

        let compressed_size = compressed.len();

        self.storage
            .put_variant(photo_id, COMPRESSED_VARIANT, compressed.to_vec())
            .await
            .map_err(|e| QueueError::Job(format!("Failed to store variant: {}", e)))?;

        tracing::info!(
            photo_id = %photo_id,
            original_size,
            compressed_size,
            "Compression job completed"
        );

        Ok(())
    }
}
