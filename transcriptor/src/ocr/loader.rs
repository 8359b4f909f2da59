use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use thiserror::Error;

/// File extensions accepted by the upload control.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("the uploaded file is empty")]
    Empty,

    #[error("unsupported file extension '{0}', expected one of: png, jpg, jpeg, bmp, tiff")]
    UnsupportedExtension(String),

    #[error("the file is not a recognizable image")]
    UnknownFormat,

    #[error("{0} images are not supported")]
    UnsupportedFormat(String),

    #[error("failed to decode image: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl SupportedFormat {
    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Bmp => Some(Self::Bmp),
            ImageFormat::Tiff => Some(Self::Tiff),
            _ => None,
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff => ImageFormat::Tiff,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

/// An image that decoded successfully in one of the supported formats.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
    format: SupportedFormat,
}

impl DecodedImage {
    pub fn format(&self) -> SupportedFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Lossless PNG encoding, used to hand the pixels to the engine.
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut output = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
        Ok(output)
    }
}

fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check the uploaded filename against [`SUPPORTED_EXTENSIONS`].
pub fn check_extension(filename: &str) -> Result<(), DecodeError> {
    match extension_of(filename) {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(DecodeError::UnsupportedExtension(ext)),
        None => Err(DecodeError::UnsupportedExtension(String::new())),
    }
}

/// Decode uploaded bytes into an image.
///
/// The format is sniffed from the content, so a JPEG named `scan.png` still
/// decodes; the filename only has to carry one of the accepted extensions.
pub fn decode_image(filename: &str, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    check_extension(filename)?;

    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Corrupt(e.to_string()))?;

    let detected = reader.format().ok_or(DecodeError::UnknownFormat)?;
    let format = SupportedFormat::from_image_format(detected)
        .ok_or_else(|| DecodeError::UnsupportedFormat(format!("{detected:?}").to_uppercase()))?;

    let image = reader
        .decode()
        .map_err(|e| DecodeError::Corrupt(e.to_string()))?;

    Ok(DecodedImage { image, format })
}

/// Decode bytes already known to hold an image in `format`.
pub fn decode_as(bytes: &[u8], format: SupportedFormat) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let image = ImageReader::with_format(Cursor::new(bytes), format.image_format())
        .decode()
        .map_err(|e| DecodeError::Corrupt(e.to_string()))?;

    Ok(DecodedImage { image, format })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(16, 12);
        let mut output = Vec::new();
        img.write_to(&mut Cursor::new(&mut output), format).unwrap();
        output
    }

    #[test]
    fn test_decodes_every_supported_format() {
        let cases = [
            ("scan.png", ImageFormat::Png, SupportedFormat::Png),
            ("scan.jpg", ImageFormat::Jpeg, SupportedFormat::Jpeg),
            ("scan.jpeg", ImageFormat::Jpeg, SupportedFormat::Jpeg),
            ("scan.bmp", ImageFormat::Bmp, SupportedFormat::Bmp),
            ("scan.tiff", ImageFormat::Tiff, SupportedFormat::Tiff),
        ];

        for (name, encoded_as, expected) in cases {
            let decoded = decode_image(name, &encode(encoded_as))
                .unwrap_or_else(|e| panic!("{name} should decode: {e}"));
            assert_eq!(decoded.format(), expected);
            assert_eq!(decoded.dimensions(), (16, 12));
        }
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(decode_image("SCAN.PNG", &encode(ImageFormat::Png)).is_ok());
    }

    #[test]
    fn test_content_decides_format() {
        let decoded = decode_image("photo.png", &encode(ImageFormat::Jpeg)).unwrap();
        assert_eq!(decoded.format(), SupportedFormat::Jpeg);
        assert_eq!(decoded.format().mime_type(), "image/jpeg");
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let err = decode_image("notes.gif", &encode(ImageFormat::Png)).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedExtension("gif".to_string()));

        let err = decode_image("README", &encode(ImageFormat::Png)).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedExtension(String::new()));
    }

    #[test]
    fn test_rejects_empty_payload() {
        assert_eq!(decode_image("a.png", &[]).unwrap_err(), DecodeError::Empty);
    }

    #[test]
    fn test_rejects_non_image_bytes() {
        let err = decode_image("a.png", b"definitely not an image").unwrap_err();
        assert_eq!(err, DecodeError::UnknownFormat);
    }

    #[test]
    fn test_rejects_format_outside_allowed_set() {
        let mut gif = b"GIF89a".to_vec();
        gif.extend_from_slice(&[0u8; 32]);
        let err = decode_image("anim.png", &gif).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedFormat("GIF".to_string()));
    }

    #[test]
    fn test_rejects_truncated_image() {
        let png = encode(ImageFormat::Png);
        let err = decode_image("cut.png", &png[..png.len() / 2]).unwrap_err();
        assert!(matches!(err, DecodeError::Corrupt(_)));
    }

    #[test]
    fn test_decode_as_uses_the_given_format() {
        let decoded = decode_as(&encode(ImageFormat::Tiff), SupportedFormat::Tiff).unwrap();
        assert_eq!(decoded.format(), SupportedFormat::Tiff);
        assert_eq!(decoded.dimensions(), (16, 12));

        let err = decode_as(&encode(ImageFormat::Png), SupportedFormat::Bmp).unwrap_err();
        assert!(matches!(err, DecodeError::Corrupt(_)));
        assert_eq!(decode_as(&[], SupportedFormat::Png).unwrap_err(), DecodeError::Empty);
    }

    #[test]
    fn test_png_handoff_round_trips_pixels() {
        let decoded = decode_image("scan.bmp", &encode(ImageFormat::Bmp)).unwrap();
        let png = decoded.to_png().unwrap();
        let again = decode_image("scan.png", &png).unwrap();
        assert_eq!(again.dimensions(), decoded.dimensions());
    }
}
