//! Temp staging area for in-flight uploads.
//!
//! Uploaded bytes land here under a random hex filename before they are
//! committed to the blob store. The extension comes from the validated content
//! type, never from the client-supplied filename. Every staged file is purged
//! exactly once, whether the upload commits or fails.

use std::path::{Path, PathBuf};

use picstash_core::AppError;
use rand::Rng;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Collisions on a 16-byte random name are practically impossible; the retry
/// bound exists to tolerate a duplicate-name OS error rather than loop forever.
const CREATE_ATTEMPTS: u32 = 3;

/// A staged upload: bytes on transient local disk, not yet durable.
pub struct StagedUpload {
    file: fs::File,
    pub filename: String,
    pub path: PathBuf,
    pub size: usize,
}

impl StagedUpload {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.file.write_all(chunk).await?;
        self.size += chunk.len();
        Ok(())
    }

    pub async fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush().await
    }
}

/// Directory owning transient staged uploads.
#[derive(Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create staging directory: {}", e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn random_filename(extension: &str) -> String {
        let bytes: [u8; 16] = rand::rng().random();
        format!("{}.{}", hex::encode(bytes), extension)
    }

    /// Open a new uniquely named staged file with the given extension.
    pub async fn create(&self, extension: &str) -> Result<StagedUpload, AppError> {
        for _ in 0..CREATE_ATTEMPTS {
            let filename = Self::random_filename(extension);
            let path = self.dir.join(&filename);

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => {
                    return Ok(StagedUpload {
                        file,
                        filename,
                        path,
                        size: 0,
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    tracing::warn!(filename = %filename, "Staging filename collision, regenerating");
                }
                Err(e) => {
                    return Err(AppError::Internal(format!(
                        "Failed to create staged file: {}",
                        e
                    )));
                }
            }
        }

        Err(AppError::Internal(
            "Failed to stage upload after repeated filename collisions".to_string(),
        ))
    }

    /// Unlink a staged file. Cleanup failures are logged, never fatal, and must
    /// not mask the primary outcome of the request.
    pub async fn purge(&self, staged: StagedUpload) {
        let path = staged.path.clone();
        drop(staged);

        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to purge staged file");
            }
        } else {
            tracing::debug!(path = %path.display(), "Staged file purged");
        }
    }
}
