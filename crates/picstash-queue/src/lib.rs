//! Picstash Queue Library
//!
//! Client for the durable compression work queue: publish on the API side,
//! consume with explicit acknowledgment on the worker side. Delivery is
//! at-least-once; a handler error leaves the message unacknowledged so the
//! broker redelivers it.
//!
//! Two implementations: [`MemoryJobQueue`] for tests and single-process
//! deployments, and [`BrokerJobQueue`] over a Redis broker (feature
//! `queue-redis`).

#[cfg(feature = "queue-redis")]
pub mod broker;
pub mod memory;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "queue-redis")]
pub use broker::BrokerJobQueue;
pub use memory::MemoryJobQueue;
pub use traits::{JobHandler, JobQueue, QueueError, COMPRESSION_QUEUE};
