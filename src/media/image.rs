// SPDX-License-Identifier: MPL-2.0
//! Image loading and decoding from various formats (PNG, JPEG, GIF, SVG, etc.).

use crate::error::{Error, Result};
use image_rs::{imageops::FilterType, DynamicImage, GenericImageView, RgbaImage};
use resvg::usvg;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Decoded RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// Stored in Arc so entries, presenters and scaling jobs share one buffer.
    rgba_bytes: Arc<Vec<u8>>,
}

impl ImageData {
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_bytes: Arc::new(pixels),
        }
    }

    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Size of the pixel buffer in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.rgba_bytes.len()
    }

    /// Returns a copy resized to `target_width`, keeping the aspect ratio.
    ///
    /// The height is rounded and never drops below one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] if the pixel buffer does not match the
    /// dimensions.
    pub fn scaled_to_width(&self, target_width: u32) -> Result<Self> {
        let target_width = target_width.max(1);
        let target_height = scaled_height(self.width, self.height, target_width);

        let buffer = RgbaImage::from_raw(self.width, self.height, self.rgba_bytes.to_vec())
            .ok_or_else(|| {
                Error::Image(format!(
                    "pixel buffer does not match {}x{}",
                    self.width, self.height
                ))
            })?;
        let resized = DynamicImage::ImageRgba8(buffer).resize_exact(
            target_width,
            target_height,
            FilterType::Lanczos3,
        );
        let (width, height) = resized.dimensions();
        Ok(Self::from_rgba(width, height, resized.to_rgba8().into_vec()))
    }
}

fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return height.max(1);
    }
    let scaled = (u64::from(height) * u64::from(target_width) + u64::from(width) / 2)
        / u64::from(width);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Load an image from the given path and return its data.
///
/// Supports common raster formats (PNG, JPEG, GIF, etc.) as well as SVG.
/// SVG files are rasterized at their intrinsic size using resvg.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read ([`Error::Io`])
/// - The image format is invalid or unsupported ([`Error::Image`])
/// - For SVG files: parsing fails or dimensions are zero ([`Error::Svg`])
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    let path = path.as_ref();
    let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

    if extension.eq_ignore_ascii_case("svg") {
        let svg_data = fs::read(path)?;
        let tree = usvg::Tree::from_data(&svg_data, &usvg::Options::default())
            .map_err(|e| Error::Svg(e.to_string()))?;

        let pixmap_size = tree.size().to_int_size();
        let width = pixmap_size.width();
        let height = pixmap_size.height();
        if width == 0 || height == 0 {
            return Err(Error::Svg("SVG has empty dimensions".into()));
        }

        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| Error::Svg("Failed to allocate SVG pixmap".into()))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(ImageData::from_rgba(width, height, pixmap.take()))
    } else {
        let img_bytes = fs::read(path)?;
        let img = image_rs::load_from_memory(&img_bytes)?;
        let (width, height) = img.dimensions();
        Ok(ImageData::from_rgba(width, height, img.to_rgba8().into_vec()))
    }
}
