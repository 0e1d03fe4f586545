/// Local checks performed before a document upload
use datafabric_kyc::validation::{validate_document_upload, MAX_UPLOAD_BYTES};
use datafabric_kyc::KycError;
use std::io::Write;
use tempfile::NamedTempFile;

const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];
const GIF_HEADER: &[u8] = b"GIF89a";

fn fixture(head: &[u8], padding: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(head).unwrap();
    file.write_all(&vec![0u8; padding]).unwrap();
    file.flush().unwrap();
    file
}

fn webp_header() -> Vec<u8> {
    let mut head = b"RIFF".to_vec();
    head.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
    head.extend_from_slice(b"WEBPVP8 ");
    head
}

#[test]
fn test_accepts_supported_images() {
    let png = fixture(&PNG_HEADER, 64);
    assert_eq!(validate_document_upload(png.path(), "front").unwrap(), "image/png");

    let jpeg = fixture(&JPEG_HEADER, 64);
    assert_eq!(validate_document_upload(jpeg.path(), "back").unwrap(), "image/jpeg");

    let webp = fixture(&webp_header(), 64);
    assert_eq!(
        validate_document_upload(webp.path(), "proof_of_address").unwrap(),
        "image/webp"
    );
}

#[test]
fn test_sniffs_content_not_extension() {
    let mut disguised = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    disguised.write_all(GIF_HEADER).unwrap();
    disguised.write_all(&[0u8; 64]).unwrap();

    let err = validate_document_upload(disguised.path(), "selfie").unwrap_err();
    assert_eq!(err.to_string(), "Invalid image format. Must be JPEG, PNG, or WebP");

    let jpeg_named_txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let mut bytes = JPEG_HEADER.to_vec();
    bytes.extend_from_slice(&[0u8; 32]);
    std::fs::write(jpeg_named_txt.path(), bytes).unwrap();
    assert!(validate_document_upload(jpeg_named_txt.path(), "selfie").is_ok());
}

#[test]
fn test_empty_file_has_no_detectable_type() {
    let empty = NamedTempFile::new().unwrap();
    let err = validate_document_upload(empty.path(), "front").unwrap_err();
    assert!(matches!(err, KycError::Validation(_)));
}

#[test]
fn test_rejects_unknown_image_type() {
    let png = fixture(&PNG_HEADER, 16);
    let err = validate_document_upload(png.path(), "passport_scan").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid image_type. Must be one of: front, back, selfie, proof_of_address"
    );
}

#[test]
fn test_size_limit() {
    let at_limit = fixture(&PNG_HEADER, MAX_UPLOAD_BYTES as usize - PNG_HEADER.len());
    assert!(validate_document_upload(at_limit.path(), "front").is_ok());

    let over_limit = fixture(&PNG_HEADER, MAX_UPLOAD_BYTES as usize - PNG_HEADER.len() + 1);
    let err = validate_document_upload(over_limit.path(), "front").unwrap_err();
    assert_eq!(err.to_string(), "Image file size must not exceed 10MB");
}

#[test]
fn test_image_type_checked_before_size() {
    let over_limit = fixture(&PNG_HEADER, MAX_UPLOAD_BYTES as usize);
    let err = validate_document_upload(over_limit.path(), "unknown").unwrap_err();
    assert!(err.to_string().starts_with("Invalid image_type"));
}

#[test]
fn test_missing_file_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.jpg");

    let err = validate_document_upload(&missing, "front").unwrap_err();
    assert!(matches!(err, KycError::NotFound(_)));
    assert_eq!(err.to_string(), format!("Image file not found: {}", missing.display()));

    let err = validate_document_upload(dir.path(), "front").unwrap_err();
    assert!(matches!(err, KycError::NotFound(_)));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file() {
    use std::os::unix::fs::PermissionsExt;

    let png = fixture(&PNG_HEADER, 16);
    std::fs::set_permissions(png.path(), std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read regardless of mode bits.
    if std::fs::File::open(png.path()).is_ok() {
        return;
    }

    let err = validate_document_upload(png.path(), "front").unwrap_err();
    assert!(matches!(err, KycError::PermissionDenied(_)));
    assert_eq!(
        err.to_string(),
        format!("Image file is not readable: {}", png.path().display())
    );
}
