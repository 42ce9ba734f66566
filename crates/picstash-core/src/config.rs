//! Configuration module
//!
//! Environment-based configuration shared by the API server and the
//! compression worker. Binaries load a `.env` file (if present) before calling
//! [`Config::from_env`].

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_SERVER_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_COMMIT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Port the API server binds to.
    pub server_port: u16,
    /// Deployment environment name ("development", "production", ...).
    pub environment: String,
    /// Directory for transient staged uploads.
    pub staging_dir: PathBuf,
    /// Root directory of the local blob store.
    pub storage_path: PathBuf,
    /// Message broker endpoint for the compression queue.
    pub broker_url: String,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
    /// Timeout for a single blob store commit; a hung write surfaces as a
    /// server error instead of leaking the staged file.
    pub commit_timeout_secs: u64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let server_port = env_or("PORT", &DEFAULT_SERVER_PORT.to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let max_upload_bytes = env_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse::<usize>()
            .context("MAX_UPLOAD_BYTES must be a positive integer")?;

        let commit_timeout_secs = env_or(
            "COMMIT_TIMEOUT_SECS",
            &DEFAULT_COMMIT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .context("COMMIT_TIMEOUT_SECS must be a positive integer")?;

        Ok(Self {
            server_port,
            environment: env_or("ENVIRONMENT", "development"),
            staging_dir: PathBuf::from(env_or("STAGING_DIR", "uploads")),
            storage_path: PathBuf::from(env_or("STORAGE_PATH", "data/photos")),
            broker_url: env_or("BROKER_URL", "redis://localhost:6379"),
            max_upload_bytes,
            commit_timeout_secs,
        })
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
