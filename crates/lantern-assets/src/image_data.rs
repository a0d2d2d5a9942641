use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use lantern_gl::ImageData;

/// Owned RGBA8 pixels, flipped so the first row is the bottom of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Bit depth of the source file before RGBA8 expansion.
    pub bits_per_pixel: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Borrowed view for [`lantern_gl::Texture::new`].
    pub fn as_image_data(&self) -> ImageData<'_> {
        ImageData {
            width: self.width,
            height: self.height,
            bits_per_pixel: self.bits_per_pixel,
            pixels: &self.pixels,
        }
    }
}

impl From<DynamicImage> for DecodedImage {
    fn from(img: DynamicImage) -> Self {
        let bits_per_pixel = u32::from(img.color().bits_per_pixel());
        // GL samples row 0 as the bottom edge.
        let rgba = img.flipv().into_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            bits_per_pixel,
            pixels: rgba.into_raw(),
        }
    }
}

/// Decodes an image file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedImage> {
    let path = path.as_ref();
    let img = image::open(path).with_context(|| format!("failed to decode image {}", path.display()))?;
    let decoded = DecodedImage::from(img);
    log::debug!(
        "decoded {} ({}x{}, {} bpp source)",
        path.display(),
        decoded.width,
        decoded.height,
        decoded.bits_per_pixel
    );
    Ok(decoded)
}

/// Decodes an in-memory encoded image (format sniffed from the bytes).
pub fn decode_memory(bytes: &[u8]) -> Result<DecodedImage> {
    let img = image::load_from_memory(bytes).context("failed to decode image from memory")?;
    Ok(DecodedImage::from(img))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    use super::*;

    /// 2x2 PNG: top row red, bottom row blue.
    pub(crate) fn two_row_png() -> Vec<u8> {
        let img = RgbaImage::from_fn(2, 2, |_, y| {
            if y == 0 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn rows_are_flipped() {
        let decoded = decode_memory(&two_row_png()).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 2));
        assert_eq!(decoded.pixels.len(), 16);
        // First stored row is the bottom (blue) row of the source.
        assert_eq!(&decoded.pixels[0..4], &[0, 0, 255, 255]);
        assert_eq!(&decoded.pixels[8..12], &[255, 0, 0, 255]);
    }

    #[test]
    fn rgb_source_expands_to_rgba8() {
        let img = RgbImage::from_pixel(3, 1, Rgb([10, 20, 30]));
        let decoded = DecodedImage::from(DynamicImage::ImageRgb8(img));
        assert_eq!(decoded.bits_per_pixel, 24);
        assert_eq!(decoded.pixels, [10u8, 20, 30, 255].repeat(3));
        assert_eq!(decoded.as_image_data().pixels.len(), 12);
    }

    #[test]
    fn garbage_bytes_fail_with_context() {
        let err = decode_memory(b"definitely not an image").unwrap_err();
        assert!(err.to_string().contains("failed to decode image"));
    }
}
