//! Client-side checks run before any request is sent.
//!
//! Checks run in a fixed order and stop at the first violation.

use crate::errors::KycError;
use crate::models::{DocumentType, ImageType};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Fields every create-check payload must carry.
pub const REQUIRED_CHECK_FIELDS: [&str; 5] = [
    "first_name",
    "last_name",
    "date_of_birth",
    "document_type",
    "document_number",
];

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Content types accepted for uploads.
pub const ALLOWED_IMAGE_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Bytes read from the file head for content sniffing.
const SNIFF_LEN: u64 = 8192;

/// Validates a create-check payload.
///
/// A required field counts as missing when absent, null, `false`, `0`, an
/// empty string, the string `"0"`, or an empty array/object.
pub fn validate_check_creation(payload: &Map<String, Value>) -> Result<(), KycError> {
    for field in REQUIRED_CHECK_FIELDS {
        if payload.get(field).map_or(true, is_blank) {
            return Err(KycError::Validation(format!(
                "Missing required field: {}",
                field
            )));
        }
    }

    let document_type = payload.get("document_type").and_then(Value::as_str);
    if document_type
        .and_then(|s| s.parse::<DocumentType>().ok())
        .is_none()
    {
        return Err(KycError::Validation(format!(
            "Invalid document_type. Must be one of: {}",
            DocumentType::allowed_values()
        )));
    }

    let date_of_birth = match payload.get("date_of_birth") {
        Some(Value::String(s)) => s,
        _ => {
            return Err(KycError::Validation(
                "date_of_birth must be a string".to_string(),
            ))
        }
    };
    if !is_exact_iso_date(date_of_birth) {
        return Err(KycError::Validation(
            "Invalid date_of_birth format. Must be YYYY-MM-DD".to_string(),
        ));
    }

    Ok(())
}

/// True when `input` parses as a calendar date and formats back to exactly
/// the same `YYYY-MM-DD` text.
pub fn is_exact_iso_date(input: &str) -> bool {
    match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string() == input,
        Err(_) => false,
    }
}

/// Validates a local image before upload and returns its sniffed content type.
pub fn validate_document_upload(path: &Path, image_type: &str) -> Result<String, KycError> {
    let shown = path.display();

    let metadata = match std::fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        Ok(_) => {
            return Err(KycError::NotFound(format!(
                "Image file not found: {}",
                shown
            )))
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(KycError::PermissionDenied(format!(
                "Image file is not readable: {}",
                shown
            )))
        }
        Err(_) => {
            return Err(KycError::NotFound(format!(
                "Image file not found: {}",
                shown
            )))
        }
    };

    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => KycError::NotFound(format!("Image file not found: {}", shown)),
        _ => KycError::PermissionDenied(format!("Image file is not readable: {}", shown)),
    })?;

    if image_type.parse::<ImageType>().is_err() {
        return Err(KycError::Validation(format!(
            "Invalid image_type. Must be one of: {}",
            ImageType::allowed_values()
        )));
    }

    if metadata.len() > MAX_UPLOAD_BYTES {
        return Err(KycError::Validation(
            "Image file size must not exceed 10MB".to_string(),
        ));
    }

    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN)
        .read_to_end(&mut head)
        .map_err(|_| KycError::Validation("Failed to detect image file type".to_string()))?;

    let mime = infer::get(&head).map(|kind| kind.mime_type());
    match mime {
        Some(mime) if ALLOWED_IMAGE_MIME_TYPES.contains(&mime) => Ok(mime.to_string()),
        _ => {
            tracing::debug!("Rejected upload {} with sniffed type {:?}", shown, mime);
            Err(KycError::Validation(
                "Invalid image format. Must be JPEG, PNG, or WebP".to_string(),
            ))
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
