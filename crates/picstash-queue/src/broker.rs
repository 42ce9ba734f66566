//! Redis-backed queue over `broccoli_queue`.
//!
//! The broker keeps delivered-but-unacknowledged messages in a processing
//! list; a handler error fails the message so the broker redelivers it.

use std::sync::Arc;

use async_trait::async_trait;
use broccoli_queue::brokers::broker::BrokerMessage;
use broccoli_queue::error::BroccoliError;
use broccoli_queue::queue::BroccoliQueue;
use picstash_core::CompressionJob;

use crate::traits::{JobHandler, JobQueue, QueueError, COMPRESSION_QUEUE};

const POOL_CONNECTIONS: u8 = 4;

/// Durable compression queue backed by a Redis broker.
pub struct BrokerJobQueue {
    queue: BroccoliQueue,
}

impl BrokerJobQueue {
    /// Connect to the broker at `broker_url`. The connection pool is held for
    /// the lifetime of the process.
    pub async fn connect(broker_url: &str) -> Result<Self, QueueError> {
        let queue = BroccoliQueue::builder(broker_url)
            .pool_connections(POOL_CONNECTIONS)
            .build()
            .await
            .map_err(|e| QueueError::Connection(e.to_string()))?;

        tracing::info!(queue = COMPRESSION_QUEUE, "Connected to job broker");
        Ok(Self { queue })
    }
}

#[async_trait]
impl JobQueue for BrokerJobQueue {
    async fn publish(&self, job: &CompressionJob) -> Result<(), QueueError> {
        self.queue
            .publish(COMPRESSION_QUEUE, None, job, None)
            .await
            .map_err(|e| QueueError::Publish(e.to_string()))?;

        tracing::debug!(photo_id = %job.photo_id, queue = COMPRESSION_QUEUE, "Job published");
        Ok(())
    }

    async fn consume(&self, handler: Arc<dyn JobHandler>) -> Result<(), QueueError> {
        tracing::info!(queue = COMPRESSION_QUEUE, "Consumer started");

        self.queue
            .process_messages(
                COMPRESSION_QUEUE,
                None,
                None,
                move |message: BrokerMessage<CompressionJob>| {
                    let handler = handler.clone();
                    async move {
                        let job = message.payload;
                        let photo_id = job.photo_id;

                        handler.handle(job).await.map_err(|e| {
                            tracing::warn!(
                                photo_id = %photo_id,
                                error = %e,
                                "Job handler failed, leaving message for redelivery"
                            );
                            BroccoliError::Job(e.to_string())
                        })
                    }
                },
            )
            .await
            .map_err(|e| QueueError::Consume(e.to_string()))
    }
}
