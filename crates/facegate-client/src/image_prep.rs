//! Image preparation before upload.
//!
//! Validates the captured bytes, normalises them to a size-bounded JPEG and
//! base64-encodes the result.

use crate::error::ClientError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

// --- Upload limits of the analysis service ---
const MIN_SIDE_PX: u32 = 48;
const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;
const REENCODE_MAX_SIDE_PX: u32 = 1920;

/// Validate `bytes` and return the base64 JPEG payload to upload.
///
/// JPEG input within the upload limit is sent untouched; anything else is
/// decoded, downscaled to at most 1920 px on the long side, and re-encoded.
pub fn prepare_image(bytes: &[u8]) -> Result<String, ClientError> {
    if bytes.is_empty() {
        return Err(ClientError::InvalidImage("empty image".to_string()));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| ClientError::InvalidImage("unrecognised image format".to_string()))?;
    if !matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp
    ) {
        return Err(ClientError::InvalidImage(format!(
            "unsupported image format {format:?}"
        )));
    }

    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let (width, height) = decoded.dimensions();
    if width < MIN_SIDE_PX || height < MIN_SIDE_PX {
        return Err(ClientError::InvalidImage(format!(
            "image is {width}x{height}, minimum is {MIN_SIDE_PX}x{MIN_SIDE_PX}"
        )));
    }

    if format == ImageFormat::Jpeg && bytes.len() <= MAX_UPLOAD_BYTES {
        tracing::debug!(width, height, bytes = bytes.len(), "image passed through");
        return Ok(STANDARD.encode(bytes));
    }

    let jpeg = reencode_jpeg(decoded)?;
    tracing::debug!(
        width,
        height,
        original_bytes = bytes.len(),
        jpeg_bytes = jpeg.len(),
        ?format,
        "image re-encoded"
    );
    Ok(STANDARD.encode(jpeg))
}

fn reencode_jpeg(image: DynamicImage) -> Result<Vec<u8>, ClientError> {
    let (width, height) = image.dimensions();
    let image = if width.max(height) > REENCODE_MAX_SIDE_PX {
        image.resize(
            REENCODE_MAX_SIDE_PX,
            REENCODE_MAX_SIDE_PX,
            image::imageops::FilterType::Triangle,
        )
    } else {
        image
    };

    // The JPEG encoder rejects alpha channels.
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut out = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)?;
    Ok(out)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    pub(crate) fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), format)
            .unwrap();
        out
    }

    fn decode_payload(payload: &str) -> Vec<u8> {
        STANDARD.decode(payload).unwrap()
    }

    #[test]
    fn test_small_jpeg_passes_through() {
        let jpeg = encoded(120, 160, ImageFormat::Jpeg);
        let payload = prepare_image(&jpeg).unwrap();
        assert_eq!(decode_payload(&payload), jpeg);
    }

    #[test]
    fn test_png_is_reencoded_as_jpeg() {
        let png = encoded(120, 160, ImageFormat::Png);
        let bytes = decode_payload(&prepare_image(&png).unwrap());
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (120, 160));
    }

    #[test]
    fn test_png_with_alpha_is_accepted() {
        let img = RgbaImage::from_pixel(64, 64, Rgba([10, 20, 30, 128]));
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        assert!(prepare_image(&png).is_ok());
    }

    #[test]
    fn test_large_image_is_downscaled() {
        let png = encoded(2400, 1200, ImageFormat::Png);
        let bytes = decode_payload(&prepare_image(&png).unwrap());
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (1920, 960));
    }

    #[test]
    fn test_tiny_image_rejected() {
        let jpeg = encoded(32, 32, ImageFormat::Jpeg);
        assert!(matches!(prepare_image(&jpeg), Err(ClientError::InvalidImage(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            prepare_image(b"definitely not an image"),
            Err(ClientError::InvalidImage(_))
        ));
        assert!(matches!(prepare_image(&[]), Err(ClientError::InvalidImage(_))));
    }

    #[test]
    fn test_truncated_jpeg_rejected() {
        let jpeg = encoded(120, 160, ImageFormat::Jpeg);
        assert!(matches!(
            prepare_image(&jpeg[..40]),
            Err(ClientError::InvalidImage(_))
        ));
    }
}
