// SPDX-License-Identifier: MPL-2.0
//! Image viewer facade.
//!
//! [`Viewer`] ties the [`Navigator`] to the filesystem: it builds item and
//! folder lists with the directory scanner and rescans whenever the folder
//! changes. Everything else is forwarded to the navigator or the store.

use crate::config::{Config, SortOrder};
use crate::directory_scanner;
use crate::error::{Error, Result};
use crate::media::{ImageStore, Presenter};
use crate::navigator::{FolderOutcome, Navigator, Outcome};
use log::info;
use std::path::{Path, PathBuf};

pub struct Viewer<P: Presenter> {
    navigator: Navigator<ImageStore<P>>,
    sort_order: SortOrder,
}

impl<P: Presenter> Viewer<P> {
    /// Creates a viewer with the cache sizes and sort order from `config`.
    #[must_use]
    pub fn new(store: ImageStore<P>, config: &Config) -> Self {
        Self {
            navigator: Navigator::new(
                store,
                config.capacity().value(),
                config.initial_fanout().value(),
            ),
            sort_order: config.display.sort_order,
        }
    }

    /// Opens a file or a directory.
    ///
    /// - A file: its directory's images become the list and the file is shown.
    /// - A directory with subfolders: the subfolders become the folder list
    ///   and the first one is opened.
    /// - Any other directory: its images become the list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if `path` does not exist or cannot be scanned.
    pub fn open(&mut self, path: &Path) -> Result<Outcome> {
        if path.is_file() {
            let (images, index) = directory_scanner::scan_siblings(path, self.sort_order)?;
            self.navigator.set_folders(Vec::new());
            self.navigator.set_list(images);
            let outcome = match index {
                Some(index) => self.navigator.jump_to(index + 1),
                None => self.navigator.jump_to_start(),
            };
            self.navigator.show_current();
            return Ok(outcome);
        }

        if path.is_dir() {
            let folders = directory_scanner::scan_folders(path, self.sort_order)?;
            return match folders.first().cloned() {
                Some(first) => {
                    self.navigator.set_folders(folders);
                    self.load_folder(&first)
                }
                None => {
                    self.navigator.set_folders(Vec::new());
                    self.load_folder(path)
                }
            };
        }

        Err(Error::Io(format!("{} does not exist", path.display())))
    }

    /// Moves to the next folder and loads its images.
    ///
    /// # Errors
    ///
    /// Returns an error if the new folder cannot be scanned.
    pub fn next_folder(&mut self) -> Result<FolderOutcome> {
        let outcome = self.navigator.next_folder();
        self.on_folder_outcome(&outcome)?;
        Ok(outcome)
    }

    /// Moves to the previous folder and loads its images.
    ///
    /// # Errors
    ///
    /// Returns an error if the new folder cannot be scanned.
    pub fn previous_folder(&mut self) -> Result<FolderOutcome> {
        let outcome = self.navigator.previous_folder();
        self.on_folder_outcome(&outcome)?;
        Ok(outcome)
    }

    pub fn set_list(&mut self, paths: Vec<PathBuf>) {
        self.navigator.set_list(paths);
    }

    pub fn append_item(&mut self, path: PathBuf) {
        self.navigator.append_item(path);
    }

    pub fn advance(&mut self) -> Outcome {
        self.navigator.advance()
    }

    pub fn retreat(&mut self) -> Outcome {
        self.navigator.retreat()
    }

    pub fn jump_to(&mut self, n: usize) -> Outcome {
        self.navigator.jump_to(n)
    }

    pub fn jump_to_start(&mut self) -> Outcome {
        self.navigator.jump_to_start()
    }

    pub fn jump_to_end(&mut self) -> Outcome {
        self.navigator.jump_to_end()
    }

    /// Shows the item under the cursor after a jump.
    pub fn show_current(&mut self) -> bool {
        self.navigator.show_current()
    }

    pub fn toggle_scaling(&mut self) -> bool {
        self.navigator.store_mut().toggle_scaling()
    }

    pub fn set_target_width(&mut self, width: u32) {
        self.navigator.store_mut().set_target_width(width);
    }

    /// Applies finished background scaling jobs.
    pub fn poll_scaled(&mut self) -> usize {
        self.navigator.store_mut().poll_scaled()
    }

    /// Waits for the next background scaling job.
    pub async fn next_scaled(&mut self) -> bool {
        self.navigator.store_mut().next_scaled().await
    }

    #[must_use]
    pub fn current_position_label(&self) -> String {
        self.navigator.current_position_label()
    }

    /// Path under the cursor, whether or not it is displayed.
    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        self.navigator.current_id().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn current_folder(&self) -> Option<&Path> {
        self.navigator.current_folder().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator<ImageStore<P>> {
        &self.navigator
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        self.navigator.store().presenter()
    }

    fn on_folder_outcome(&mut self, outcome: &FolderOutcome) -> Result<()> {
        if let FolderOutcome::Changed(folder) = outcome {
            self.load_folder(folder)?;
        }
        Ok(())
    }

    fn load_folder(&mut self, folder: &Path) -> Result<Outcome> {
        let images = directory_scanner::scan_images(folder, self.sort_order)?;
        info!("opened {} ({} image(s))", folder.display(), images.len());
        self.navigator.set_list(images);
        let outcome = self.navigator.jump_to_start();
        self.navigator.show_current();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error as CrateError;
    use crate::media::ImageData;
    use image_rs::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::tempdir;

    #[derive(Default)]
    struct NamePresenter {
        shown: Vec<String>,
    }

    impl Presenter for NamePresenter {
        fn show(&mut self, path: &Path, _raw: &ImageData, _scaled: Option<&ImageData>) {
            self.shown.push(name_of(path));
        }

        fn show_placeholder(&mut self, path: &Path, _error: &CrateError) {
            self.shown.push(format!("!{}", name_of(path)));
        }

        fn hide(&mut self) {}
    }

    fn name_of(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]))
            .save(&path)
            .expect("failed to write test png");
        path
    }

    fn viewer() -> Viewer<NamePresenter> {
        Viewer::new(ImageStore::new(NamePresenter::default()), &Config::default())
    }

    #[test]
    fn open_file_shows_that_file() {
        let dir = tempdir().expect("failed to create temp dir");
        write_png(dir.path(), "a.png");
        let b = write_png(dir.path(), "b.png");
        write_png(dir.path(), "c.png");

        let mut viewer = viewer();
        assert_eq!(viewer.open(&b).expect("open failed"), Outcome::Jumped);
        assert_eq!(viewer.current_position_label(), "2 / 3");
        assert_eq!(viewer.presenter().shown, vec!["b.png"]);

        viewer.advance();
        assert_eq!(viewer.presenter().shown, vec!["b.png", "c.png"]);
    }

    #[test]
    fn open_directory_with_subfolders_walks_folders() {
        let dir = tempdir().expect("failed to create temp dir");
        let first = dir.path().join("day1");
        let second = dir.path().join("day2");
        fs::create_dir(&first).expect("failed to create dir");
        fs::create_dir(&second).expect("failed to create dir");
        write_png(&first, "one.png");
        write_png(&second, "two.png");
        write_png(&second, "three.png");

        let mut viewer = viewer();
        viewer.open(dir.path()).expect("open failed");
        assert_eq!(viewer.current_folder(), Some(first.as_path()));
        assert_eq!(viewer.navigator().len(), 1);

        assert_eq!(
            viewer.next_folder().expect("scan failed"),
            FolderOutcome::Changed(second.clone())
        );
        assert_eq!(viewer.navigator().len(), 2);
        assert_eq!(viewer.current_position_label(), "1 / 2");
        assert_eq!(
            viewer.next_folder().expect("scan failed"),
            FolderOutcome::NoNextFolder
        );
        assert_eq!(
            viewer.previous_folder().expect("scan failed"),
            FolderOutcome::Changed(first)
        );
        assert_eq!(viewer.navigator().len(), 1);
    }

    #[test]
    fn open_plain_directory_lists_images() {
        let dir = tempdir().expect("failed to create temp dir");
        write_png(dir.path(), "img10.png");
        write_png(dir.path(), "img2.png");

        let mut viewer = viewer();
        viewer.open(dir.path()).expect("open failed");
        assert_eq!(viewer.current_folder(), None);
        assert_eq!(viewer.presenter().shown, vec!["img2.png"]);
        assert_eq!(
            viewer.previous_folder().expect("no folders"),
            FolderOutcome::NoPreviousFolder
        );
    }

    #[test]
    fn open_missing_path_errors() {
        let dir = tempdir().expect("failed to create temp dir");
        let mut viewer = viewer();
        assert!(matches!(
            viewer.open(&dir.path().join("nope")),
            Err(CrateError::Io(_))
        ));
    }

    #[test]
    fn appended_file_is_reachable() {
        let dir = tempdir().expect("failed to create temp dir");
        let a = write_png(dir.path(), "a.png");
        let mut viewer = viewer();
        viewer.open(&a).expect("open failed");

        let late = write_png(dir.path(), "late.png");
        viewer.append_item(late);
        viewer.advance();
        assert_eq!(viewer.presenter().shown, vec!["a.png", "late.png"]);
    }
}
