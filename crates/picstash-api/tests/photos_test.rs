mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::fixtures::{photo_form, photo_form_without_business_id, test_png};
use helpers::storage::{FailingCommitStore, HangingCommitStore};
use helpers::{
    setup_test_app, setup_test_app_with_commit_timeout, setup_test_app_with_storage,
    TEST_MAX_UPLOAD_BYTES,
};
use picstash_storage::{BlobStore, LocalBlobStore};
use tempfile::TempDir;
use uuid::Uuid;

#[tokio::test]
async fn upload_then_get_returns_matching_metadata() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/photos")
        .multipart(photo_form(test_png(), "image/png", "biz-42"))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    let id = body
        .get("id")
        .and_then(|v| v.as_str())
        .expect("Expected 'id' in upload response");
    let id = Uuid::parse_str(id).expect("Invalid UUID in upload response");

    let get_response = app.client().get(&format!("/photos/{}", id)).await;
    assert_eq!(get_response.status_code(), 200);

    let record: serde_json::Value = get_response.json();
    assert_eq!(record["contentType"], "image/png");
    assert_eq!(record["businessId"], "biz-42");
    assert!(record["fileSize"].as_i64().unwrap() > 0);

    // The compression job was queued and the staged copy is gone.
    assert_eq!(app.queue.pending().await, 1);
    assert!(app.staging_is_empty());
}

#[tokio::test]
async fn upload_with_caption_roundtrips() {
    let app = setup_test_app().await;

    let form = photo_form(test_png(), "image/png", "biz-7").add_text("caption", "sunset");
    let response = app.client().post("/photos").multipart(form).await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap();

    let record: serde_json::Value = app.client().get(&format!("/photos/{}", id)).await.json();
    assert_eq!(record["caption"], "sunset");
}

#[tokio::test]
async fn disallowed_mime_type_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/photos")
        .multipart(photo_form(b"hello world".to_vec(), "text/plain", "biz-1"))
        .await;
    assert_eq!(response.status_code(), 400);

    let body: serde_json::Value = response.json();
    assert!(body.get("error").is_some());

    // Nothing committed, nothing staged.
    assert!(app.store_is_empty());
    assert!(app.staging_is_empty());
    assert_eq!(app.queue.pending().await, 0);
}

#[tokio::test]
async fn missing_business_id_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/photos")
        .multipart(photo_form_without_business_id(test_png(), "image/png"))
        .await;
    assert_eq!(response.status_code(), 400);

    assert!(app.store_is_empty());
    assert!(app.staging_is_empty());
}

#[tokio::test]
async fn unknown_metadata_field_rejected() {
    let app = setup_test_app().await;

    let form = photo_form(test_png(), "image/png", "biz-1").add_text("userId", "u-9");
    let response = app.client().post("/photos").multipart(form).await;
    assert_eq!(response.status_code(), 400);

    assert!(app.store_is_empty());
    assert!(app.staging_is_empty());
}

#[tokio::test]
async fn missing_file_rejected() {
    let app = setup_test_app().await;

    let form = axum_test::multipart::MultipartForm::new().add_text("businessId", "biz-1");
    let response = app.client().post("/photos").multipart(form).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn oversized_upload_rejected_with_413() {
    let app = setup_test_app().await;

    let oversized = vec![0u8; TEST_MAX_UPLOAD_BYTES + 1024];
    let response = app
        .client()
        .post("/photos")
        .multipart(photo_form(oversized, "image/png", "biz-1"))
        .await;
    assert_eq!(response.status_code(), 413);

    assert!(app.store_is_empty());
    assert!(app.staging_is_empty());
}

#[tokio::test]
async fn interrupted_commit_leaves_no_record() {
    let storage_dir = TempDir::new().unwrap();
    let inner: Arc<dyn BlobStore> =
        Arc::new(LocalBlobStore::new(storage_dir.path()).await.unwrap());
    let failing: Arc<dyn BlobStore> = Arc::new(FailingCommitStore::new(inner));
    let app = setup_test_app_with_storage(failing, storage_dir).await;

    let response = app
        .client()
        .post("/photos")
        .multipart(photo_form(test_png(), "image/png", "biz-1"))
        .await;
    assert_eq!(response.status_code(), 500);

    // No record is visible for any id, no job was queued, and the staged
    // file was purged despite the failure.
    let probe = app.client().get(&format!("/photos/{}", Uuid::new_v4())).await;
    assert_eq!(probe.status_code(), 404);
    assert!(app.store_is_empty());
    assert!(app.staging_is_empty());
    assert_eq!(app.queue.pending().await, 0);
}

#[tokio::test]
async fn hung_commit_times_out_with_server_error() {
    let storage_dir = TempDir::new().unwrap();
    let hanging: Arc<dyn BlobStore> = Arc::new(HangingCommitStore);
    let app =
        setup_test_app_with_commit_timeout(hanging, storage_dir, Duration::from_millis(100)).await;

    let response = app
        .client()
        .post("/photos")
        .multipart(photo_form(test_png(), "image/png", "biz-1"))
        .await;
    assert_eq!(response.status_code(), 500);

    let body: serde_json::Value = response.json();
    assert!(body.get("error").is_some());

    // The hung write surfaced as a server error without leaking the staged
    // file or queueing a job.
    assert!(app.staging_is_empty());
    assert_eq!(app.queue.pending().await, 0);
}

#[tokio::test]
async fn broker_outage_does_not_invalidate_committed_photo() {
    let app = setup_test_app().await;
    app.queue.set_unavailable(true);

    let response = app
        .client()
        .post("/photos")
        .multipart(photo_form(test_png(), "image/png", "biz-9"))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap();

    // The photo stayed durable even though the publish failed.
    let get_response = app.client().get(&format!("/photos/{}", id)).await;
    assert_eq!(get_response.status_code(), 200);
    assert_eq!(app.queue.pending().await, 0);
    assert!(app.staging_is_empty());
}

#[tokio::test]
async fn get_unknown_photo_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get(&format!("/photos/{}", Uuid::new_v4())).await;
    assert_eq!(response.status_code(), 404);

    let body: serde_json::Value = response.json();
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn photo_content_served_with_original_bytes() {
    let app = setup_test_app().await;
    let png = test_png();

    let response = app
        .client()
        .post("/photos")
        .multipart(photo_form(png.clone(), "image/png", "biz-1"))
        .await;
    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap();

    let content = app
        .client()
        .get(&format!("/photos/{}/content", id))
        .await;
    assert_eq!(content.status_code(), 200);
    let content_type = content
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_eq!(content_type, "image/png");
    assert_eq!(content.as_bytes().as_ref(), png.as_slice());
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}
