//! Picstash Storage Library
//!
//! This crate provides the blob store abstraction the ingestion pipeline
//! commits photos into, plus a local filesystem backend.
//!
//! # Commit atomicity
//!
//! A commit either produces a fully visible [`picstash_core::PhotoRecord`]
//! (payload flushed, metadata attached, store-assigned id returned) or fails
//! with no record created. Backends achieve this by writing payload and
//! metadata to temporary paths and renaming them into place, metadata last;
//! readers resolve records through the metadata, so a partially written
//! payload is never observable.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalBlobStore;
pub use traits::{BlobStore, PayloadStream, StorageError, StorageResult};
