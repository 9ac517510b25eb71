//! Image upload validation and key generation.
//!
//! Validation happens before any byte reaches object storage: the file must
//! declare an image MIME type, carry a known image extension, and fit the
//! 5 MB cap. Keys are generated fresh per upload so a re-uploaded file never
//! clobbers the old object; stored objects are only deleted together with
//! their product.

use rand::Rng;
use rand::distr::Alphanumeric;
use thiserror::Error;

use crate::storage::MAX_UPLOAD_BYTES;

/// File extensions accepted for product images.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Length of the random prefix in generated object keys.
const KEY_TOKEN_LEN: usize = 10;

/// Why an upload was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("File must be an image, got `{0}`")]
    NotAnImage(String),

    #[error("Unsupported image extension `{0}` (use jpg, jpeg, png, gif or webp)")]
    UnsupportedExtension(String),

    #[error("Filename has no extension")]
    MissingExtension,

    #[error("File is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
}

/// An upload that passed validation, ready to be stored.
#[derive(Debug, Clone)]
pub struct ValidatedImage {
    /// Generated object key, unique per upload.
    pub key: String,
    /// Declared MIME type, forwarded as Content-Type.
    pub content_type: String,
}

/// Validate an incoming image file and mint its object key.
///
/// # Errors
///
/// Rejects non-image MIME types, unknown extensions, and files over 5 MB.
pub fn validate_image(
    filename: &str,
    content_type: &str,
    size: usize,
) -> Result<ValidatedImage, UploadError> {
    if !content_type.starts_with("image/") {
        return Err(UploadError::NotAnImage(content_type.to_string()));
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .ok_or(UploadError::MissingExtension)?;

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(UploadError::UnsupportedExtension(ext));
    }

    Ok(ValidatedImage {
        key: generate_key(&ext),
        content_type: content_type.to_string(),
    })
}

/// Mint an object key: random token, upload timestamp, original extension.
fn generate_key(ext: &str) -> String {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_TOKEN_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{token}_{millis}.{ext}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_image_types() {
        for (name, mime) in [
            ("photo.jpg", "image/jpeg"),
            ("photo.JPEG", "image/jpeg"),
            ("banner.png", "image/png"),
            ("anim.gif", "image/gif"),
            ("modern.webp", "image/webp"),
        ] {
            let v = validate_image(name, mime, 1024).unwrap();
            assert_eq!(v.content_type, mime);
        }
    }

    #[test]
    fn test_rejects_non_image_mime() {
        let err = validate_image("doc.jpg", "application/pdf", 1024).unwrap_err();
        assert_eq!(err, UploadError::NotAnImage("application/pdf".to_string()));
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let err = validate_image("vector.svg", "image/svg+xml", 1024).unwrap_err();
        assert_eq!(err, UploadError::UnsupportedExtension("svg".to_string()));

        let err = validate_image("archive.tar.bz2", "image/jpeg", 1024).unwrap_err();
        assert_eq!(err, UploadError::UnsupportedExtension("bz2".to_string()));
    }

    #[test]
    fn test_rejects_missing_extension() {
        let err = validate_image("noext", "image/jpeg", 1024).unwrap_err();
        assert_eq!(err, UploadError::MissingExtension);
    }

    #[test]
    fn test_rejects_oversized_file() {
        let err = validate_image("big.jpg", "image/jpeg", MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert_eq!(
            err,
            UploadError::TooLarge {
                size: MAX_UPLOAD_BYTES + 1,
                limit: MAX_UPLOAD_BYTES,
            }
        );
        // Exactly at the limit is fine.
        assert!(validate_image("big.jpg", "image/jpeg", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn test_generated_keys_keep_extension_and_differ() {
        let a = validate_image("photo.JPG", "image/jpeg", 10).unwrap();
        let b = validate_image("photo.jpg", "image/jpeg", 10).unwrap();
        assert!(a.key.ends_with(".jpg"));
        assert!(b.key.ends_with(".jpg"));
        assert_ne!(a.key, b.key);
        assert!(a.key.contains('_'));
    }
}
