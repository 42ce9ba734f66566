//! Picstash Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and
//! upload validation shared across all Picstash components.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, LogLevel};
pub use models::{CompressionJob, PhotoMetadata, PhotoRecord, UploadResponse};
pub use validation::{
    extension_for, is_accepted_type, validate_file_size, validate_upload_fields, UploadFields,
    ValidationError,
};
