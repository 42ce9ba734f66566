use crate::traits::{BlobStore, PayloadStream, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use picstash_core::{PhotoMetadata, PhotoRecord};
use std::path::PathBuf;
use std::pin::Pin;
use tokio::fs;
use tokio::io::AsyncRead;
use uuid::Uuid;

/// Local filesystem blob store.
///
/// Layout under `base_path`:
/// - `objects/{id}` — immutable payload
/// - `objects/{id}.json` — record metadata (the visibility marker)
/// - `variants/{id}/{label}` — derivatives written by the worker
/// - `tmp/` — in-progress writes, renamed into place on success
///
/// The record sidecar is written last, so readers never observe a partially
/// committed photo.
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore rooted at `base_path`, creating the
    /// directory layout if needed.
    ///
    /// Sweeps `tmp/` on startup: a commit abandoned mid-write (timeout, crash)
    /// leaves its temp file behind, and nothing references tmp/ across runs.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        for dir in ["objects", "variants", "tmp"] {
            fs::create_dir_all(base_path.join(dir)).await.map_err(|e| {
                StorageError::Config(format!(
                    "Failed to create storage directory {}: {}",
                    base_path.join(dir).display(),
                    e
                ))
            })?;
        }

        let store = LocalBlobStore { base_path };
        store.sweep_tmp().await?;
        Ok(store)
    }

    /// Remove orphaned temp files left by interrupted commits.
    async fn sweep_tmp(&self) -> StorageResult<()> {
        let tmp_dir = self.base_path.join("tmp");
        let mut entries = fs::read_dir(&tmp_dir).await.map_err(|e| {
            StorageError::Config(format!(
                "Failed to read temp directory {}: {}",
                tmp_dir.display(),
                e
            ))
        })?;

        let mut swept = 0usize;
        while let Some(entry) = entries.next_entry().await.map_err(StorageError::Io)? {
            if let Err(e) = fs::remove_file(entry.path()).await {
                tracing::warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "Failed to remove orphaned temp file"
                );
            } else {
                swept += 1;
            }
        }

        if swept > 0 {
            tracing::warn!(count = swept, "Swept orphaned temp files from interrupted commits");
        }
        Ok(())
    }

    fn payload_path(&self, id: Uuid) -> PathBuf {
        self.base_path.join("objects").join(id.to_string())
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.base_path.join("objects").join(format!("{}.json", id))
    }

    fn variant_dir(&self, id: Uuid) -> PathBuf {
        self.base_path.join("variants").join(id.to_string())
    }

    fn tmp_path(&self, name: &str) -> PathBuf {
        self.base_path.join("tmp").join(name)
    }

    /// Write `data` to a temp file, fsync, and rename it to `dest`.
    async fn write_atomic(&self, tmp_name: &str, dest: &PathBuf, data: &[u8]) -> StorageResult<()> {
        let tmp = self.tmp_path(tmp_name);

        let result = async {
            fs::write(&tmp, data).await?;
            let file = fs::File::open(&tmp).await?;
            file.sync_all().await?;
            fs::rename(&tmp, dest).await
        }
        .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&tmp).await;
            return Err(StorageError::WriteFailed(format!(
                "Failed to write {}: {}",
                dest.display(),
                e
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn commit(
        &self,
        filename: &str,
        metadata: PhotoMetadata,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<PhotoRecord> {
        let id = Uuid::new_v4();
        let tmp = self.tmp_path(&format!("{}.payload", id));
        let start = std::time::Instant::now();

        // Stream the payload to a temp file first; any failure here leaves no
        // trace in objects/.
        let copied = async {
            let mut file = fs::File::create(&tmp).await?;
            let copied = tokio::io::copy(&mut reader, &mut file).await?;
            file.sync_all().await?;
            Ok::<u64, std::io::Error>(copied)
        }
        .await;

        let file_size = match copied {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&tmp).await;
                return Err(StorageError::WriteFailed(format!(
                    "Stream interrupted while committing {}: {}",
                    filename, e
                )));
            }
        };

        if let Err(e) = fs::rename(&tmp, self.payload_path(id)).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(StorageError::WriteFailed(format!(
                "Failed to place payload for {}: {}",
                filename, e
            )));
        }

        let record = PhotoRecord {
            id,
            filename: filename.to_string(),
            content_type: metadata.content_type,
            business_id: metadata.business_id,
            caption: metadata.caption,
            file_size: file_size as i64,
            uploaded_at: Utc::now(),
        };

        let encoded = serde_json::to_vec(&record)
            .map_err(|e| StorageError::Backend(format!("Failed to encode record: {}", e)))?;

        // Metadata rename is the commit point; roll the payload back if it
        // cannot be placed.
        if let Err(e) = self
            .write_atomic(&format!("{}.json", id), &self.record_path(id), &encoded)
            .await
        {
            let _ = fs::remove_file(self.payload_path(id)).await;
            return Err(e);
        }

        tracing::info!(
            photo_id = %id,
            filename = %filename,
            size_bytes = file_size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Photo committed to blob store"
        );

        Ok(record)
    }

    async fn get_record(&self, id: Uuid) -> StorageResult<PhotoRecord> {
        let data = match fs::read(self.record_path(id)).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(id));
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read record {}: {}",
                    id, e
                )));
            }
        };

        serde_json::from_slice(&data)
            .map_err(|e| StorageError::Backend(format!("Corrupt record {}: {}", id, e)))
    }

    async fn open_payload(&self, id: Uuid) -> StorageResult<PayloadStream> {
        // Resolve through the record so an uncommitted payload is never served.
        self.get_record(id).await?;

        let file = fs::File::open(self.payload_path(id)).await.map_err(|e| {
            StorageError::Backend(format!("Payload missing for committed photo {}: {}", id, e))
        })?;

        let stream = tokio_util::io::ReaderStream::new(file).map(move |chunk| {
            chunk.map_err(|e| StorageError::ReadFailed(format!("Failed to read chunk: {}", e)))
        });

        Ok(Box::pin(stream))
    }

    async fn read_payload(&self, id: Uuid) -> StorageResult<Vec<u8>> {
        self.get_record(id).await?;

        fs::read(self.payload_path(id)).await.map_err(|e| {
            StorageError::Backend(format!("Payload missing for committed photo {}: {}", id, e))
        })
    }

    async fn put_variant(&self, id: Uuid, label: &str, data: Vec<u8>) -> StorageResult<()> {
        self.get_record(id).await?;

        let dir = self.variant_dir(id);
        fs::create_dir_all(&dir).await?;

        self.write_atomic(&format!("{}.{}", id, label), &dir.join(label), &data)
            .await?;

        tracing::info!(
            photo_id = %id,
            variant = %label,
            size_bytes = data.len(),
            "Variant stored"
        );

        Ok(())
    }

    async fn exists(&self, id: Uuid) -> StorageResult<bool> {
        Ok(fs::try_exists(self.record_path(id)).await.unwrap_or(false))
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        // Remove the record first so the photo becomes invisible before the
        // payload goes away.
        match fs::remove_file(self.record_path(id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete record {}: {}",
                    id, e
                )));
            }
        }

        if let Err(e) = fs::remove_file(self.payload_path(id)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete payload {}: {}",
                    id, e
                )));
            }
        }

        if let Err(e) = fs::remove_dir_all(self.variant_dir(id)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete variants for {}: {}",
                    id, e
                )));
            }
        }

        tracing::info!(photo_id = %id, "Photo deleted");
        Ok(())
    }
}
