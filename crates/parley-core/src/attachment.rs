//! Image attachments staged by the user before sending.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::error::{ParleyError, Result};

/// File name used for the multipart part when the attachment has none.
pub const FALLBACK_FILE_NAME: &str = "image.png";

/// A binary image payload with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    file_name: Option<String>,
    media_type: String,
    bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(file_name: Option<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.filter(|name| !name.trim().is_empty()),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Name used for the upload, falling back to [`FALLBACK_FILE_NAME`].
    pub fn upload_file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(FALLBACK_FILE_NAME)
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the declared media type is an `image/*` type.
    pub fn is_image(&self) -> bool {
        self.media_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    /// Rejects anything whose declared media type is not an image.
    pub fn validate(&self) -> Result<()> {
        if self.is_image() {
            Ok(())
        } else {
            Err(ParleyError::InvalidAttachment(format!(
                "expected an image/* media type, got '{}'",
                self.media_type
            )))
        }
    }

    /// `data:` URL for rendering a local preview without filesystem access.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            BASE64_STANDARD.encode(&self.bytes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_media_types_are_accepted() {
        let png = ImageAttachment::new(Some("a.png".into()), "image/png", vec![1, 2, 3]);
        let jpeg = ImageAttachment::new(None, "IMAGE/JPEG", vec![]);
        assert!(png.validate().is_ok());
        assert!(jpeg.is_image());
    }

    #[test]
    fn test_non_image_media_types_are_rejected() {
        let pdf = ImageAttachment::new(Some("doc.pdf".into()), "application/pdf", vec![0]);
        let untyped = ImageAttachment::new(Some("blob".into()), "", vec![0]);

        assert!(matches!(pdf.validate(), Err(ParleyError::InvalidAttachment(_))));
        assert!(!untyped.is_image());
    }

    #[test]
    fn test_upload_file_name_falls_back() {
        let unnamed = ImageAttachment::new(Some("  ".into()), "image/png", vec![]);
        assert_eq!(unnamed.file_name(), None);
        assert_eq!(unnamed.upload_file_name(), FALLBACK_FILE_NAME);

        let named = ImageAttachment::new(Some("cat.webp".into()), "image/webp", vec![]);
        assert_eq!(named.upload_file_name(), "cat.webp");
    }

    #[test]
    fn test_data_url_encodes_payload() {
        let attachment = ImageAttachment::new(None, "image/gif", b"GIF".to_vec());
        assert_eq!(attachment.to_data_url(), "data:image/gif;base64,R0lG");
    }
}
