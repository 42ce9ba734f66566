//! Ingestion orchestrator.
//!
//! Drives a single upload through its states: received (bytes staged),
//! validated, committed to the blob store, compression job queued, response
//! acknowledged. Failure from any state purges the staged file; the staged
//! file is purged exactly once per request no matter where the request
//! terminates.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Multipart;
use picstash_core::{
    extension_for, validate_file_size, validate_upload_fields, AppError, CompressionJob,
    PhotoMetadata, PhotoRecord, ValidationError,
};
use picstash_queue::JobQueue;
use picstash_storage::BlobStore;
use tokio::fs;
use tokio::time::timeout;

use crate::staging::{StagedUpload, StagingArea};

/// Multipart part name carrying the photo bytes.
const FILE_FIELD: &str = "file";

struct ReceivedUpload {
    staged: StagedUpload,
    content_type: String,
    fields: HashMap<String, String>,
}

/// Orchestrates photo ingestion: staging, validation, durable commit, and
/// compression job publishing.
pub struct IngestService {
    storage: Arc<dyn BlobStore>,
    queue: Arc<dyn JobQueue>,
    staging: StagingArea,
    max_upload_bytes: usize,
    commit_timeout: Duration,
}

impl IngestService {
    pub fn new(
        storage: Arc<dyn BlobStore>,
        queue: Arc<dyn JobQueue>,
        staging: StagingArea,
        max_upload_bytes: usize,
        commit_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            queue,
            staging,
            max_upload_bytes,
            commit_timeout,
        }
    }

    /// Run one upload through the full pipeline, returning the committed
    /// record.
    pub async fn ingest(&self, multipart: Multipart) -> Result<PhotoRecord, AppError> {
        let ReceivedUpload {
            staged,
            content_type,
            fields,
        } = self.receive(multipart).await?;

        // Validated: metadata schema check. The staged file is purged on
        // rejection too.
        let upload_fields = match validate_upload_fields(&fields) {
            Ok(fields) => fields,
            Err(e) => {
                self.staging.purge(staged).await;
                return Err(e.into());
            }
        };

        let metadata = PhotoMetadata {
            content_type,
            business_id: upload_fields.business_id,
            caption: upload_fields.caption,
        };

        // Committed: after this point the bytes are either durable or
        // discardable, so staging is purged on both outcomes.
        let committed = self.commit_staged(&staged, metadata).await;
        self.staging.purge(staged).await;
        let record = committed?;

        // Queued: a publish failure never rolls back the commit. The photo is
        // durably stored; the failure is logged for reconciliation.
        if let Err(e) = self.queue.publish(&CompressionJob::new(record.id)).await {
            tracing::error!(
                photo_id = %record.id,
                error = %e,
                "Failed to publish compression job; photo remains stored"
            );
        }

        Ok(record)
    }

    /// Purge any staged bytes and classify the failure.
    async fn abort(&self, staged: Option<StagedUpload>, err: impl Into<AppError>) -> AppError {
        if let Some(staged) = staged {
            self.staging.purge(staged).await;
        }
        err.into()
    }

    /// Received: drain the multipart body, staging the file part and
    /// collecting metadata fields. An aborted client connection surfaces here
    /// as a multipart error, and the partial staged file is purged.
    async fn receive(&self, mut multipart: Multipart) -> Result<ReceivedUpload, AppError> {
        let mut staged: Option<(StagedUpload, String)> = None;
        let mut fields = HashMap::new();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    let staged = staged.take().map(|(s, _)| s);
                    return Err(self
                        .abort(
                            staged,
                            AppError::InvalidInput(format!(
                                "Invalid multipart body: {}",
                                e.body_text()
                            )),
                        )
                        .await);
                }
            };

            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                if let Some((previous, _)) = staged.take() {
                    self.staging.purge(previous).await;
                    return Err(AppError::InvalidInput(
                        "Duplicate file part in upload".to_string(),
                    ));
                }

                let content_type = field.content_type().unwrap_or_default().to_string();
                let extension = match extension_for(&content_type) {
                    Some(ext) => ext,
                    None => {
                        return Err(ValidationError::UnsupportedContentType(content_type).into());
                    }
                };

                let upload = self.stage_file(field, extension).await?;
                staged = Some((upload, content_type));
            } else {
                match field.text().await {
                    Ok(value) => {
                        fields.insert(name, value);
                    }
                    Err(e) => {
                        let staged = staged.take().map(|(s, _)| s);
                        return Err(self
                            .abort(
                                staged,
                                AppError::InvalidInput(format!(
                                    "Invalid multipart body: {}",
                                    e.body_text()
                                )),
                            )
                            .await);
                    }
                }
            }
        }

        let (mut staged, content_type) = match staged {
            Some(found) => found,
            None => return Err(ValidationError::MissingFile.into()),
        };

        if let Err(e) = staged.flush().await {
            return Err(self
                .abort(
                    Some(staged),
                    AppError::Internal(format!("Failed to flush staged file: {}", e)),
                )
                .await);
        }

        if let Err(e) = validate_file_size(staged.size, self.max_upload_bytes) {
            return Err(self.abort(Some(staged), e).await);
        }

        Ok(ReceivedUpload {
            staged,
            content_type,
            fields,
        })
    }

    /// Stream one multipart field into a freshly staged file, enforcing the
    /// size cap chunk by chunk.
    async fn stage_file(
        &self,
        mut field: axum::extract::multipart::Field<'_>,
        extension: &str,
    ) -> Result<StagedUpload, AppError> {
        let mut staged = self.staging.create(extension).await?;

        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if staged.size + chunk.len() > self.max_upload_bytes {
                        let size = staged.size + chunk.len();
                        return Err(self
                            .abort(
                                Some(staged),
                                ValidationError::FileTooLarge {
                                    size,
                                    max: self.max_upload_bytes,
                                },
                            )
                            .await);
                    }
                    if let Err(e) = staged.write_chunk(&chunk).await {
                        return Err(self
                            .abort(
                                Some(staged),
                                AppError::Internal(format!(
                                    "Failed to write staged file: {}",
                                    e
                                )),
                            )
                            .await);
                    }
                }
                Ok(None) => return Ok(staged),
                Err(e) => {
                    // Client went away mid-upload; nothing must be committed
                    // from the truncated stream.
                    return Err(self
                        .abort(
                            Some(staged),
                            AppError::InvalidInput(format!(
                                "Upload stream interrupted: {}",
                                e.body_text()
                            )),
                        )
                        .await);
                }
            }
        }
    }

    /// Committed: stream the staged bytes into the blob store. A hung write
    /// times out and surfaces as a server error instead of blocking the
    /// request indefinitely.
    async fn commit_staged(
        &self,
        staged: &StagedUpload,
        metadata: PhotoMetadata,
    ) -> Result<PhotoRecord, AppError> {
        let reader = fs::File::open(&staged.path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read staged file: {}", e)))?;

        match timeout(
            self.commit_timeout,
            self.storage
                .commit(&staged.filename, metadata, Box::pin(reader)),
        )
        .await
        {
            Ok(Ok(record)) => Ok(record),
            Ok(Err(e)) => Err(AppError::Storage(e.to_string())),
            Err(_) => Err(AppError::Storage(format!(
                "Blob store commit timed out after {}s",
                self.commit_timeout.as_secs()
            ))),
        }
    }
}
