//! In-process job queue with at-least-once semantics.
//!
//! Used by tests and single-process deployments. A handler error puts the job
//! back at the end of the queue, so it is redelivered rather than lost.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use picstash_core::CompressionJob;
use tokio::sync::{Mutex, Notify};
use tokio::time::sleep;

use crate::traits::{JobHandler, JobQueue, QueueError, COMPRESSION_QUEUE};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

struct Inner {
    jobs: Mutex<VecDeque<CompressionJob>>,
    wakeup: Notify,
    closed: AtomicBool,
    unavailable: AtomicBool,
}

/// In-memory compression queue.
#[derive(Clone)]
pub struct MemoryJobQueue {
    inner: Arc<Inner>,
}

impl Default for MemoryJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryJobQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                jobs: Mutex::new(VecDeque::new()),
                wakeup: Notify::new(),
                closed: AtomicBool::new(false),
                unavailable: AtomicBool::new(false),
            }),
        }
    }

    /// Simulate broker unavailability: while set, `publish` fails with a
    /// connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Stop the consume loop once the backlog drains.
    pub fn shutdown(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.wakeup.notify_waiters();
    }

    /// Number of jobs currently waiting for delivery.
    pub async fn pending(&self) -> usize {
        self.inner.jobs.lock().await.len()
    }
}

#[async_trait]
impl JobQueue for MemoryJobQueue {
    async fn publish(&self, job: &CompressionJob) -> Result<(), QueueError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(QueueError::Connection(
                "broker unavailable".to_string(),
            ));
        }

        self.inner.jobs.lock().await.push_back(job.clone());
        self.inner.wakeup.notify_waiters();

        tracing::debug!(photo_id = %job.photo_id, queue = COMPRESSION_QUEUE, "Job published");
        Ok(())
    }

    async fn consume(&self, handler: Arc<dyn JobHandler>) -> Result<(), QueueError> {
        tracing::info!(queue = COMPRESSION_QUEUE, "Consumer started");

        loop {
            let job = self.inner.jobs.lock().await.pop_front();

            match job {
                Some(job) => {
                    let photo_id = job.photo_id;
                    if let Err(e) = handler.handle(job.clone()).await {
                        // Not acknowledged: requeue for redelivery.
                        tracing::warn!(
                            photo_id = %photo_id,
                            error = %e,
                            "Job handler failed, leaving message for redelivery"
                        );
                        self.inner.jobs.lock().await.push_back(job);
                        sleep(POLL_INTERVAL).await;
                    } else {
                        tracing::debug!(photo_id = %photo_id, "Job acknowledged");
                    }
                }
                None => {
                    if self.inner.closed.load(Ordering::SeqCst) {
                        tracing::info!(queue = COMPRESSION_QUEUE, "Consumer stopped");
                        return Ok(());
                    }
                    tokio::select! {
                        _ = self.inner.wakeup.notified() => {}
                        _ = sleep(POLL_INTERVAL) => {}
                    }
                }
            }
        }
    }
}
