//! Blob store abstraction trait
//!
//! This module defines the BlobStore trait the ingestion pipeline and the
//! compression worker talk to.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use picstash_core::{PhotoMetadata, PhotoRecord};
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use uuid::Uuid;

/// Storage operation errors
///
/// `NotFound` is a normal, expected outcome for lookups of absent records;
/// every other variant is an infrastructure failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Photo not found: {0}")]
    NotFound(Uuid),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StorageError {
    /// Whether this error means "record does not exist" rather than an
    /// infrastructure failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked payload stream returned by [`BlobStore::open_payload`].
pub type PayloadStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Blob store abstraction
///
/// Payloads are committed under a generated filename with attached metadata;
/// the store assigns the unique [`PhotoRecord`] id. Committed payloads are
/// immutable; compressed derivatives are stored separately per variant label
/// and may be overwritten (redelivered compression jobs are safe to redo).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stream `reader` into the store under `filename`, attaching `metadata`.
    ///
    /// Atomic from the caller's perspective: either all bytes are flushed and
    /// acknowledged and the new record is returned, or an error surfaces and
    /// no record is visible to readers. An interrupted stream propagates as a
    /// single terminal [`StorageError::WriteFailed`].
    async fn commit(
        &self,
        filename: &str,
        metadata: PhotoMetadata,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<PhotoRecord>;

    /// Fetch the record for `id`, or [`StorageError::NotFound`].
    async fn get_record(&self, id: Uuid) -> StorageResult<PhotoRecord>;

    /// Stream the original payload for `id`.
    async fn open_payload(&self, id: Uuid) -> StorageResult<PayloadStream>;

    /// Read the original payload for `id` into memory.
    async fn read_payload(&self, id: Uuid) -> StorageResult<Vec<u8>>;

    /// Store a derivative of the photo (e.g. the compressed variant) under
    /// `label`. Overwrites any previous derivative with the same label.
    async fn put_variant(&self, id: Uuid, label: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Whether a record exists for `id`.
    async fn exists(&self, id: Uuid) -> StorageResult<bool>;

    /// Delete the record, payload, and derivatives for `id`. Deleting an
    /// absent record is not an error.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;
}
