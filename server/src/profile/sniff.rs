//! Content Sniffing
//!
//! Determines the true type of uploaded bytes from magic-byte signatures.
//! Client-declared content types, filenames, and URL suffixes are never
//! trusted; only the byte content decides what gets stored.

use super::error::ProfileImageError;

/// Type detected from byte content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedType {
    /// MIME type, e.g. `image/png`.
    pub mime: String,
    /// Canonical extension for the detected type, e.g. `png`.
    pub extension: String,
}

/// Sniff a byte buffer and require an image type.
///
/// Fails with `IllegalFileType` when the buffer is empty or matches no
/// known signature, and `UnsupportedImageType` when the detected type is
/// not in the `image/` category.
pub fn detect_image(bytes: &[u8]) -> Result<DetectedType, ProfileImageError> {
    if bytes.is_empty() {
        return Err(ProfileImageError::IllegalFileType);
    }

    let kind = infer::get(bytes).ok_or(ProfileImageError::IllegalFileType)?;

    let mime = kind.mime_type();
    if !mime.starts_with("image/") {
        return Err(ProfileImageError::UnsupportedImageType {
            mime: mime.to_string(),
        });
    }

    Ok(DetectedType {
        mime: mime.to_string(),
        extension: kind.extension().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal valid magic-byte prefixes
    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00";
    const PDF_BYTES: &[u8] = b"%PDF-1.4 fake document";

    #[test]
    fn detects_png() {
        let detected = detect_image(PNG_BYTES).unwrap();
        assert_eq!(detected.mime, "image/png");
        assert_eq!(detected.extension, "png");
    }

    #[test]
    fn detects_jpeg() {
        let detected = detect_image(JPEG_BYTES).unwrap();
        assert_eq!(detected.mime, "image/jpeg");
        assert_eq!(detected.extension, "jpg");
    }

    #[test]
    fn detects_gif() {
        let detected = detect_image(GIF_BYTES).unwrap();
        assert_eq!(detected.mime, "image/gif");
        assert_eq!(detected.extension, "gif");
    }

    #[test]
    fn rejects_empty_buffer() {
        assert!(matches!(
            detect_image(&[]),
            Err(ProfileImageError::IllegalFileType)
        ));
    }

    #[test]
    fn rejects_unrecognizable_bytes() {
        assert!(matches!(
            detect_image(b"hello, definitely not an image"),
            Err(ProfileImageError::IllegalFileType)
        ));
    }

    #[test]
    fn rejects_non_image_type() {
        let err = detect_image(PDF_BYTES).unwrap_err();
        match err {
            ProfileImageError::UnsupportedImageType { mime } => {
                assert_eq!(mime, "application/pdf");
            }
            other => panic!("expected UnsupportedImageType, got {other:?}"),
        }
    }
}
