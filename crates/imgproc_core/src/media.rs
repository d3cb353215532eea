//! Image files, data URLs and result decoding.

use std::rc::Rc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::FormError;

/// MIME type the service encodes results with.
pub const RESULT_MIME: &str = "image/jpeg";

/// Filename used when downloading the result.
pub const RESULT_FILENAME: &str = "resultImage.jpg";

/// A user-selected image file.
///
/// Bytes are reference counted so the payload can carry the file without
/// copying it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    /// File name as reported by the picker
    pub name: String,
    /// Declared MIME type
    pub mime: String,
    /// Raw file content
    pub bytes: Rc<[u8]>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Rc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Whether the declared MIME type is an image type.
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime)
    }

    /// Displayable `data:` URL for the preview.
    pub fn to_data_url(&self) -> String {
        data_url(&self.mime, &self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Whether a MIME type begins with `image`.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image")
}

/// Guess a MIME type from file content, falling back to the file extension.
///
/// Used where no browser-declared type exists. Unknown files get
/// `application/octet-stream`, which the picker then rejects.
pub fn sniff_mime(name: &str, bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .or_else(|_| image::ImageFormat::from_path(name))
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Build a base64 `data:` URL.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// A processed image returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultImage {
    /// `data:image/jpeg;base64,...` source for display
    pub data_url: String,
    /// Decoded image bytes
    pub bytes: Vec<u8>,
}

impl ResultImage {
    /// Decode a response body of plain base64 image bytes.
    ///
    /// The body must be valid standard base64 and decode to a recognizable
    /// image, otherwise the response is rejected rather than displayed.
    pub fn from_base64(body: &str) -> Result<Self, FormError> {
        let payload = body.trim();
        if payload.is_empty() {
            return Err(FormError::invalid_response("empty body"));
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| FormError::invalid_response(e.to_string()))?;

        let format = image::guess_format(&bytes)
            .map_err(|_| FormError::invalid_response("unrecognized image format"))?;
        if format != image::ImageFormat::Jpeg {
            log::warn!("⚠️ Service returned {:?}, expected JPEG", format);
        }

        Ok(Self {
            data_url: format!("data:{};base64,{}", RESULT_MIME, payload),
            bytes,
        })
    }
}

/// Result image prepared for download.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedImage {
    pub filename: &'static str,
    pub data_url: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// Smallest byte sequence `image::guess_format` recognizes as JPEG.
    pub const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    pub fn jpeg_base64() -> String {
        STANDARD.encode(JPEG_MAGIC)
    }

    pub fn png_file(name: &str) -> ImageFile {
        ImageFile::new(name, "image/png", b"\x89PNG\r\n\x1a\n0000".to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("image/jpeg"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime("application/image"));
        assert!(!is_image_mime(""));
    }

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime("photo.bin", JPEG_MAGIC), "image/jpeg");
        assert_eq!(sniff_mime("photo.png", b"not really"), "image/png");
        assert_eq!(sniff_mime("notes.txt", b"hello"), "application/octet-stream");
    }

    #[test]
    fn test_sniff_mime_needs_no_decoders() {
        assert_eq!(sniff_mime("a", b"GIF89a\x01\x00"), "image/gif");
        assert_eq!(sniff_mime("a", b"BM\x36\x00\x00\x00"), "image/bmp");
        assert_eq!(sniff_mime("a", b"II*\x00\x08\x00"), "image/tiff");
        assert_eq!(sniff_mime("a", b"RIFF\x00\x00\x00\x00WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime("scan.tiff", b"?"), "image/tiff");
    }

    #[test]
    fn test_result_from_base64() {
        let body = jpeg_base64();
        let result = ResultImage::from_base64(&format!("{}\n", body)).unwrap();
        assert_eq!(result.data_url, format!("data:image/jpeg;base64,{}", body));
        assert_eq!(result.bytes, JPEG_MAGIC);
    }

    #[test]
    fn test_result_rejects_garbage() {
        assert!(matches!(
            ResultImage::from_base64("not base64!"),
            Err(FormError::InvalidResponse(_))
        ));
        assert!(matches!(
            ResultImage::from_base64("   "),
            Err(FormError::InvalidResponse(_))
        ));
        // Valid base64 of plain text
        assert!(matches!(
            ResultImage::from_base64("aGVsbG8gd29ybGQ="),
            Err(FormError::InvalidResponse(_))
        ));
    }
}
