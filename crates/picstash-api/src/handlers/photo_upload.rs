use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use picstash_core::UploadResponse;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Upload photo handler
///
/// Delegates to the ingestion orchestrator: validate, stage, commit to the
/// blob store, publish a compression job, and respond with the new photo id.
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_photo"))]
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let record = state.ingest.ingest(multipart).await?;

    tracing::info!(
        photo_id = %record.id,
        business_id = %record.business_id,
        content_type = %record.content_type,
        size_bytes = record.file_size,
        "Photo upload acknowledged"
    );

    Ok(Json(UploadResponse { id: record.id }))
}
