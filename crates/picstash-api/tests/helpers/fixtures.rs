//! Test payloads and multipart form builders.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};

/// A valid 1x1 PNG.
pub fn test_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 dimensions
        0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49,
        0x44, 0x41, 0x54, // IDAT chunk
        0x08, 0xD7, 0x63, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD,
        0x8D, 0x89, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60,
        0x82, // IEND chunk
    ]
}

/// Multipart form with a file part and a `businessId` field.
pub fn photo_form(data: Vec<u8>, mime_type: &str, business_id: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name("photo.png")
        .mime_type(mime_type);
    MultipartForm::new()
        .add_part("file", part)
        .add_text("businessId", business_id)
}

/// Multipart form with a file part and no metadata fields.
pub fn photo_form_without_business_id(data: Vec<u8>, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name("photo.png")
        .mime_type(mime_type);
    MultipartForm::new().add_part("file", part)
}
