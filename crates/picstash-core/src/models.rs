//! Domain models: photo records, upload metadata, and compression jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to a photo at commit time.
///
/// `business_id` references an external business entity; the reference is not
/// enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub content_type: String,
    pub business_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Durable photo record owned by the blob store.
///
/// The payload behind a record is immutable once committed; a record is either
/// fully visible or does not exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: Uuid,
    /// Staged filename the payload was committed under (random hex + extension).
    pub filename: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "businessId")]
    pub business_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(rename = "fileSize")]
    pub file_size: i64,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

/// Queued reference to a photo awaiting asynchronous compression.
///
/// Delivery is at-least-once: a job is never lost but may arrive more than
/// once, so processing must be idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionJob {
    pub photo_id: Uuid,
}

impl CompressionJob {
    pub fn new(photo_id: Uuid) -> Self {
        Self { photo_id }
    }
}

/// Response body for a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: Uuid,
}
