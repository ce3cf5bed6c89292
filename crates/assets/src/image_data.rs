use image::DynamicImage;
use std::path::Path;
use stilllife_render::{PixelFormat, RenderError, TextureUpload};

/// Errors from decoding or uploading a texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("unsupported channel count {0}: only 3 or 4 channel images are accepted")]
    UnsupportedChannels(u8),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// A decoded texture, flipped so row 0 is the bottom of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Decode an image file and flip it vertically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let img = image::open(path.as_ref())?;
        Self::from_dynamic(img.flipv())
    }

    /// Convert an already-oriented image. Only RGB and RGBA layouts pass.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self, TextureError> {
        let (width, height) = (img.width(), img.height());
        let (format, pixels) = match img.color().channel_count() {
            3 => (PixelFormat::Rgb8, img.into_rgb8().into_raw()),
            4 => (PixelFormat::Rgba8, img.into_rgba8().into_raw()),
            n => return Err(TextureError::UnsupportedChannels(n)),
        };
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    pub fn upload(&self) -> TextureUpload<'_> {
        TextureUpload {
            width: self.width,
            height: self.height,
            format: self.format,
            pixels: &self.pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn flips_rows_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stripes.png");
        let mut img = RgbImage::new(1, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.save(&path).unwrap();

        let loaded = TextureImage::open(&path).unwrap();
        assert_eq!(loaded.format, PixelFormat::Rgb8);
        assert_eq!(&loaded.pixels[0..3], &[0, 0, 255]);
        assert_eq!(&loaded.pixels[3..6], &[255, 0, 0]);
    }

    #[test]
    fn rgba_keeps_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4])));
        let tex = TextureImage::from_dynamic(img).unwrap();
        assert_eq!(tex.format, PixelFormat::Rgba8);
        assert_eq!(tex.pixels.len(), 16);
        assert!(tex.upload().validate().is_ok());
    }

    #[test]
    fn gray_is_rejected() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        assert!(matches!(
            TextureImage::from_dynamic(img),
            Err(TextureError::UnsupportedChannels(1))
        ));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TextureImage::open(dir.path().join("nope.jpg"));
        assert!(matches!(result, Err(TextureError::Image(_))));
    }
}
