// SPDX-License-Identifier: MPL-2.0
//! Image handling: decoding, display-sized variants and the cache-backed store.

pub mod image;
pub mod presenter;
pub mod store;

use std::path::Path;

// Re-export commonly used types
pub use extensions::IMAGE_EXTENSIONS;
pub use image::{load_image, ImageData};
pub use presenter::{NullPresenter, Presenter};
pub use store::ImageStore;

/// Supported media extensions
pub mod extensions {
    /// Image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &[
        "jpg", "jpeg", "png", "gif", "tiff", "tif", "webp", "bmp", "ico", "svg",
    ];
}

/// Returns true if the path has a supported image extension (case-insensitive).
pub fn is_supported_image<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}
