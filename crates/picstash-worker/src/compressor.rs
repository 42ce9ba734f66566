//! Image re-encoding.

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// JPEG quality for compressed variants (0-100). Balanced size and quality.
const JPEG_QUALITY: u8 = 75;

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Produces a compressed rendition of an image payload.
pub trait Compressor: Send + Sync {
    /// Compress `data`, which was stored with `content_type`. The output
    /// keeps the input format.
    fn compress(&self, content_type: &str, data: &[u8]) -> Result<Bytes, CompressError>;
}

/// Compressor backed by the `image` crate: decode, then re-encode with lossy
/// settings (JPEG) or default lossless compression (PNG).
pub struct ImageCompressor;

impl ImageCompressor {
    fn format_for(content_type: &str) -> Result<ImageFormat, CompressError> {
        match content_type {
            "image/jpeg" => Ok(ImageFormat::Jpeg),
            "image/png" => Ok(ImageFormat::Png),
            other => Err(CompressError::UnsupportedContentType(other.to_string())),
        }
    }

    fn encode_jpeg(img: &DynamicImage) -> Result<Bytes, CompressError> {
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
        img.write_with_encoder(encoder)
            .map_err(CompressError::Encode)?;
        Ok(Bytes::from(buffer))
    }

    fn encode_png(img: &DynamicImage) -> Result<Bytes, CompressError> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(CompressError::Encode)?;
        Ok(Bytes::from(buffer))
    }
}

impl Compressor for ImageCompressor {
    fn compress(&self, content_type: &str, data: &[u8]) -> Result<Bytes, CompressError> {
        let format = Self::format_for(content_type)?;

        let img =
            image::load_from_memory_with_format(data, format).map_err(CompressError::Decode)?;

        match format {
            ImageFormat::Jpeg => Self::encode_jpeg(&img),
            _ => Self::encode_png(&img),
        }
    }
}
