// SPDX-License-Identifier: MPL-2.0
//! Output port for whatever puts images in front of the user.

use crate::error::Error;
use crate::media::image::ImageData;
use std::path::Path;

/// Receives display requests from an [`ImageStore`](crate::media::store::ImageStore).
///
/// `show` may be called twice for the same image: once with the raw pixels
/// and again when a display-sized variant becomes available.
pub trait Presenter {
    /// Shows a decoded image, with its scaled variant when scaling applies.
    fn show(&mut self, path: &Path, raw: &ImageData, scaled: Option<&ImageData>);

    /// Shows a stand-in for an image that could not be loaded.
    fn show_placeholder(&mut self, path: &Path, error: &Error);

    /// Clears the display.
    fn hide(&mut self);
}

/// Presenter that discards everything. Useful for headless runs and benches.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn show(&mut self, _path: &Path, _raw: &ImageData, _scaled: Option<&ImageData>) {}

    fn show_placeholder(&mut self, _path: &Path, _error: &Error) {}

    fn hide(&mut self) {}
}
