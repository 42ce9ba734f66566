//! Queue abstraction: publish and consume with explicit acknowledgment.

use async_trait::async_trait;
use picstash_core::CompressionJob;
use thiserror::Error;

/// Name of the durable compression work queue.
pub const COMPRESSION_QUEUE: &str = "imageCompression";

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Consume failed: {0}")]
    Consume(String),

    #[error("Job failed: {0}")]
    Job(String),
}

/// Handles one delivered compression job.
///
/// Returning `Ok` acknowledges the message; returning `Err` leaves it
/// unacknowledged for redelivery. Handlers must tolerate redundant deliveries.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: CompressionJob) -> Result<(), QueueError>;
}

/// Client for the durable compression queue.
///
/// The connection is long-lived process state: established at startup, torn
/// down on shutdown or fatal error.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Publish a job. Connection or channel failures surface to the caller;
    /// the broker owns the message once this returns `Ok`.
    async fn publish(&self, job: &CompressionJob) -> Result<(), QueueError>;

    /// Consume jobs with `handler` until shutdown or a fatal broker error.
    async fn consume(&self, handler: std::sync::Arc<dyn JobHandler>) -> Result<(), QueueError>;
}
