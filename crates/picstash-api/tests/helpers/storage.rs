//! Blob store test doubles.

#![allow(dead_code)]

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use picstash_core::{PhotoMetadata, PhotoRecord};
use picstash_storage::{BlobStore, PayloadStream, StorageError, StorageResult};
use tokio::io::AsyncRead;
use uuid::Uuid;

/// Store whose commit never completes, simulating a hung backend write.
pub struct HangingCommitStore;

#[async_trait]
impl BlobStore for HangingCommitStore {
    async fn commit(
        &self,
        _filename: &str,
        _metadata: PhotoMetadata,
        _reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<PhotoRecord> {
        std::future::pending().await
    }

    async fn get_record(&self, id: Uuid) -> StorageResult<PhotoRecord> {
        Err(StorageError::NotFound(id))
    }

    async fn open_payload(&self, id: Uuid) -> StorageResult<PayloadStream> {
        Err(StorageError::NotFound(id))
    }

    async fn read_payload(&self, id: Uuid) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(id))
    }

    async fn put_variant(&self, id: Uuid, _label: &str, _data: Vec<u8>) -> StorageResult<()> {
        Err(StorageError::NotFound(id))
    }

    async fn exists(&self, _id: Uuid) -> StorageResult<bool> {
        Ok(false)
    }

    async fn delete(&self, _id: Uuid) -> StorageResult<()> {
        Ok(())
    }
}

/// Wraps a real store but fails every commit, simulating a write stream that
/// is interrupted before completion.
pub struct FailingCommitStore {
    inner: Arc<dyn BlobStore>,
}

impl FailingCommitStore {
    pub fn new(inner: Arc<dyn BlobStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl BlobStore for FailingCommitStore {
    async fn commit(
        &self,
        _filename: &str,
        _metadata: PhotoMetadata,
        _reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<PhotoRecord> {
        Err(StorageError::WriteFailed(
            "Stream interrupted mid-transfer".to_string(),
        ))
    }

    async fn get_record(&self, id: Uuid) -> StorageResult<PhotoRecord> {
        self.inner.get_record(id).await
    }

    async fn open_payload(&self, id: Uuid) -> StorageResult<PayloadStream> {
        self.inner.open_payload(id).await
    }

    async fn read_payload(&self, id: Uuid) -> StorageResult<Vec<u8>> {
        self.inner.read_payload(id).await
    }

    async fn put_variant(&self, id: Uuid, label: &str, data: Vec<u8>) -> StorageResult<()> {
        self.inner.put_variant(id, label, data).await
    }

    async fn exists(&self, id: Uuid) -> StorageResult<bool> {
        self.inner.exists(id).await
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        self.inner.delete(id).await
    }
}
