use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use picstash_core::PhotoRecord;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Get photo metadata
///
/// Reads the record straight from the blob store. An absent id maps to 404; a
/// store failure maps to 500.
#[tracing::instrument(skip(state), fields(photo_id = %id, operation = "get_photo"))]
pub async fn get_photo(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<PhotoRecord>, HttpAppError> {
    let record = state.storage.get_record(id).await?;
    Ok(Json(record))
}

/// Stream the original photo payload.
#[tracing::instrument(skip(state), fields(photo_id = %id, operation = "get_photo_content"))]
pub async fn get_photo_content(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let record = state.storage.get_record(id).await?;
    let stream = state.storage.open_payload(id).await?;

    let response = (
        [
            (header::CONTENT_TYPE, record.content_type),
            (
                header::CONTENT_LENGTH,
                record.file_size.to_string(),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response();

    Ok(response)
}
