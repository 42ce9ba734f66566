//! Upload validation: MIME allowlist and metadata schema checks.
//!
//! Both checks are pure predicates. Any rejection aborts the ingestion pipeline
//! before the blob store is touched.

use std::collections::HashMap;

use thiserror::Error;

/// Accepted image formats, mapping MIME type to the staging file extension.
const IMAGE_TYPES: &[(&str, &str)] = &[("image/jpeg", "jpg"), ("image/png", "png")];

/// Multipart field names recognized by the photo upload schema.
const KNOWN_FIELDS: &[&str] = &["businessId", "caption"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Unsupported content type '{0}'; allowed: image/jpeg, image/png")]
    UnsupportedContentType(String),

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("Unknown field '{0}' in upload metadata")]
    UnknownField(String),

    #[error("No file provided")]
    MissingFile,

    #[error("File is empty")]
    EmptyFile,

    #[error("File size {size} bytes exceeds maximum of {max} bytes")]
    FileTooLarge { size: usize, max: usize },
}

/// Normalize a MIME type by stripping parameters
/// (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Return the staging extension for an accepted content type, or `None` if the
/// type is not on the allowlist. Comparison ignores case and MIME parameters.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == normalized)
        .map(|(_, ext)| *ext)
}

/// The `accept(mimeType)` predicate: true only for the explicit allowlist.
pub fn is_accepted_type(content_type: &str) -> bool {
    extension_for(content_type).is_some()
}

/// Validated metadata fields from the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFields {
    pub business_id: String,
    pub caption: Option<String>,
}

/// Validate the declared metadata object against the photo schema.
///
/// `businessId` is required and non-empty, `caption` is optional, and unknown
/// fields fail validation.
pub fn validate_upload_fields(
    fields: &HashMap<String, String>,
) -> Result<UploadFields, ValidationError> {
    for key in fields.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            return Err(ValidationError::UnknownField(key.clone()));
        }
    }

    let business_id = fields
        .get("businessId")
        .ok_or(ValidationError::MissingField("businessId"))?;
    if business_id.trim().is_empty() {
        return Err(ValidationError::EmptyField("businessId"));
    }

    Ok(UploadFields {
        business_id: business_id.clone(),
        caption: fields.get("caption").cloned(),
    })
}

/// Validate the upload size against the configured maximum.
pub fn validate_file_size(size: usize, max: usize) -> Result<(), ValidationError> {
    if size == 0 {
        return Err(ValidationError::EmptyFile);
    }
    if size > max {
        return Err(ValidationError::FileTooLarge { size, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn jpeg_and_png_accepted() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("IMAGE/PNG"), Some("png"));
        assert_eq!(extension_for("image/jpeg; charset=utf-8"), Some("jpg"));
    }

    #[test]
    fn other_types_rejected() {
        assert!(!is_accepted_type("text/plain"));
        assert!(!is_accepted_type("image/gif"));
        assert!(!is_accepted_type("application/octet-stream"));
        assert!(!is_accepted_type(""));
    }

    #[test]
    fn business_id_required() {
        let err = validate_upload_fields(&fields(&[("caption", "hi")])).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField("businessId")));

        let err = validate_upload_fields(&fields(&[("businessId", "  ")])).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyField("businessId")));
    }

    #[test]
    fn caption_optional() {
        let ok = validate_upload_fields(&fields(&[("businessId", "biz-1")])).unwrap();
        assert_eq!(ok.business_id, "biz-1");
        assert_eq!(ok.caption, None);

        let ok =
            validate_upload_fields(&fields(&[("businessId", "biz-1"), ("caption", "sunset")]))
                .unwrap();
        assert_eq!(ok.caption.as_deref(), Some("sunset"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let err =
            validate_upload_fields(&fields(&[("businessId", "biz-1"), ("userId", "u-9")]))
                .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownField(f) if f == "userId"));
    }

    #[test]
    fn file_size_limits() {
        assert!(validate_file_size(1, 10).is_ok());
        assert!(matches!(
            validate_file_size(0, 10),
            Err(ValidationError::EmptyFile)
        ));
        assert!(matches!(
            validate_file_size(11, 10),
            Err(ValidationError::FileTooLarge { size: 11, max: 10 })
        ));
    }
}
