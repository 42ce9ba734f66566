pub mod fixtures;
pub mod storage;

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use picstash_api::services::IngestService;
use picstash_api::setup::routes::setup_routes;
use picstash_api::staging::StagingArea;
use picstash_api::state::AppState;
use picstash_core::Config;
use picstash_queue::MemoryJobQueue;
use picstash_storage::{BlobStore, LocalBlobStore};
use tempfile::TempDir;

/// Upload cap used by tests; small so the too-large path is cheap to hit.
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

/// Test application state
pub struct TestApp {
    pub server: TestServer,
    pub queue: MemoryJobQueue,
    pub storage_dir: TempDir,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Whether any staged files are left behind.
    pub fn staging_is_empty(&self) -> bool {
        std::fs::read_dir(self.staging_dir.path())
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true)
    }

    /// Whether any committed objects exist in the blob store.
    pub fn store_is_empty(&self) -> bool {
        std::fs::read_dir(self.storage_dir.path().join("objects"))
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true)
    }
}

/// Setup a test application over a local blob store in a temp directory.
pub async fn setup_test_app() -> TestApp {
    let storage_dir = TempDir::new().expect("Failed to create temp storage dir");
    let storage: Arc<dyn BlobStore> = Arc::new(
        LocalBlobStore::new(storage_dir.path())
            .await
            .expect("Failed to create blob store"),
    );
    setup_test_app_with_storage(storage, storage_dir).await
}

/// Setup a test application with a caller-provided blob store (e.g. one that
/// simulates write failures).
pub async fn setup_test_app_with_storage(
    storage: Arc<dyn BlobStore>,
    storage_dir: TempDir,
) -> TestApp {
    setup_test_app_with_commit_timeout(storage, storage_dir, Duration::from_secs(5)).await
}

/// Setup a test application with a caller-provided blob store and commit
/// timeout (e.g. a hanging store plus a short timeout).
pub async fn setup_test_app_with_commit_timeout(
    storage: Arc<dyn BlobStore>,
    storage_dir: TempDir,
    commit_timeout: Duration,
) -> TestApp {
    let staging_dir = TempDir::new().expect("Failed to create temp staging dir");
    let queue = MemoryJobQueue::new();

    let config = Config {
        server_port: 0,
        environment: "test".to_string(),
        staging_dir: staging_dir.path().to_path_buf(),
        storage_path: storage_dir.path().to_path_buf(),
        broker_url: "redis://localhost:6379".to_string(),
        max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
        commit_timeout_secs: commit_timeout.as_secs(),
    };

    let staging = StagingArea::new(staging_dir.path())
        .await
        .expect("Failed to create staging area");

    let ingest = IngestService::new(
        storage.clone(),
        Arc::new(queue.clone()),
        staging,
        config.max_upload_bytes,
        commit_timeout,
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        queue: Arc::new(queue.clone()),
        ingest,
    });

    let router = setup_routes(&config, state);
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        queue,
        storage_dir,
        staging_dir,
    }
}
