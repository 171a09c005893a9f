// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: open a raster image, force it into RGB, and save it
// again. Operates on in-memory images using the `image` crate.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::{debug, info, instrument};
use wandelwerk_core::error::WandelwerkError;

/// Wraps a single decoded image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, enabling
/// method chaining:
///
/// ```ignore
/// ImageProcessor::open("scan.png")?.into_rgb().save("scan.jpg")?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WandelwerkError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            WandelwerkError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, WandelwerkError> {
        let img = image::load_from_memory(data).map_err(|err| {
            WandelwerkError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the current image carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    // -- Transformations ------------------------------------------------------

    /// Convert to 8-bit RGB. Alpha is dropped, not composited.
    #[instrument(skip(self))]
    pub fn into_rgb(self) -> Self {
        if let DynamicImage::ImageRgb8(_) = self.image {
            return self;
        }
        debug!(from = ?self.image.color(), "Converting to RGB8");
        Self {
            image: DynamicImage::ImageRgb8(self.image.to_rgb8()),
        }
    }

    /// Consume the processor and return the RGB8 pixel buffer.
    pub fn into_rgb8(self) -> RgbImage {
        self.image.into_rgb8()
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), WandelwerkError> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path).map_err(|err| {
            WandelwerkError::ImageError(format!(
                "cannot pick an image format for {}: {}",
                path.display(),
                err
            ))
        })?;
        self.image.save_with_format(path, format).map_err(|err| {
            WandelwerkError::ImageError(format!(
                "failed to save image to {}: {}",
                path.display(),
                err
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;
    use image::{Rgba, RgbaImage};

    fn rgba_fixture() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 128])))
    }

    #[test]
    fn rgb_conversion_drops_alpha() {
        let processor = ImageProcessor::from_dynamic(rgba_fixture());
        assert!(processor.has_alpha());

        let rgb = processor.into_rgb();
        assert!(!rgb.has_alpha());
        assert_eq!((rgb.width(), rgb.height()), (4, 3));
        assert_eq!(rgb.into_rgb8().get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn jpeg_bytes_decode_without_alpha() {
        let decoded = ImageProcessor::from_bytes(&test_fixtures::jpeg_bytes()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 9));
        assert!(!decoded.has_alpha());
    }

    #[test]
    fn save_infers_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        ImageProcessor::from_dynamic(rgba_fixture())
            .into_rgb()
            .save(&path)
            .unwrap();

        let reopened = ImageProcessor::open(&path).unwrap();
        assert_eq!(reopened.width(), 4);
    }

    #[test]
    fn unknown_extension_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ImageProcessor::from_dynamic(rgba_fixture()).save(dir.path().join("out.nope"));
        assert!(matches!(result, Err(WandelwerkError::ImageError(_))));
    }

    #[test]
    fn undecodable_bytes_fail() {
        assert!(ImageProcessor::from_bytes(b"not an image").is_err());
    }
}
