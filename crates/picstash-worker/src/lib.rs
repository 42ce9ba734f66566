//! Picstash Worker Library
//!
//! Consumes the compression queue and produces compressed variants of stored
//! photos. Jobs are acknowledged only after the variant is written back, so a
//! crash mid-job leads to redelivery rather than a lost job.

pub mod compressor;
pub mod consumer;

// Re-export commonly used types
pub use compressor::{CompressError, Compressor, ImageCompressor};
pub use consumer::{CompressionConsumer, COMPRESSED_VARIANT};
