// SPDX-License-Identifier: MPL-2.0
//! Image-backed [`ItemStore`].
//!
//! Each cached position holds the decoded image (or the error that prevented
//! decoding) plus an optional display-sized variant. The variant is produced
//! lazily, the first time an entry is displayed while scaling is enabled and
//! the raw image is wider than the target width.
//!
//! # Background scaling
//!
//! With a tokio runtime handle, scaling runs on the blocking pool and the raw
//! image is presented immediately. Finished jobs come back through a channel
//! tagged with a ticket. Jobs whose entry was evicted, cleared or rescheduled
//! are recognised by their ticket and discarded. Without a handle, scaling
//! happens inline before the image is presented.

use crate::config::defaults::{DEFAULT_SCALE_TO_WIDTH, DEFAULT_TARGET_WIDTH};
use crate::error::{Error, Result};
use crate::media::image::{load_image, ImageData};
use crate::media::presenter::Presenter;
use crate::store::ItemStore;
use log::{debug, warn};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// A scaling job in flight. Dropping it aborts the job if it has not
/// started yet; a job that already runs finishes and its result is discarded.
struct PendingScale {
    ticket: u64,
    handle: JoinHandle<()>,
}

impl Drop for PendingScale {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct ScaledResult {
    ticket: u64,
    result: Result<ImageData>,
}

struct Entry {
    /// Unique per load, used to track which entry is on screen.
    serial: u64,
    path: PathBuf,
    image: Result<ImageData>,
    scaled: Option<ImageData>,
    pending: Option<PendingScale>,
}

impl Entry {
    fn drop_scaled(&mut self) {
        self.scaled = None;
        self.pending = None;
    }
}

pub struct ImageStore<P: Presenter> {
    entries: VecDeque<Entry>,
    presenter: P,
    /// Serial of the entry on screen.
    shown: Option<u64>,
    scale_to_width: bool,
    target_width: u32,
    runtime: Option<Handle>,
    next_serial: u64,
    scaled_tx: UnboundedSender<ScaledResult>,
    scaled_rx: UnboundedReceiver<ScaledResult>,
}

impl<P: Presenter> ImageStore<P> {
    #[must_use]
    pub fn new(presenter: P) -> Self {
        let (scaled_tx, scaled_rx) = mpsc::unbounded_channel();
        Self {
            entries: VecDeque::new(),
            presenter,
            shown: None,
            scale_to_width: DEFAULT_SCALE_TO_WIDTH,
            target_width: DEFAULT_TARGET_WIDTH,
            runtime: None,
            next_serial: 0,
            scaled_tx,
            scaled_rx,
        }
    }

    /// Sets the initial scaling policy.
    #[must_use]
    pub fn with_scaling(mut self, enabled: bool, target_width: u32) -> Self {
        self.scale_to_width = enabled;
        self.target_width = target_width.max(1);
        self
    }

    /// Moves scaling onto the blocking pool of `runtime`.
    #[must_use]
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Flips scaling on or off and presents the current image again.
    /// Returns the new state.
    pub fn toggle_scaling(&mut self) -> bool {
        self.scale_to_width = !self.scale_to_width;
        debug!("scaling to width {}", if self.scale_to_width { "on" } else { "off" });
        self.present_current();
        self.scale_to_width
    }

    /// Changes the target width. Every scaled variant is dropped and the one
    /// on screen is recomputed.
    pub fn set_target_width(&mut self, width: u32) {
        let width = width.max(1);
        if width == self.target_width {
            return;
        }
        self.target_width = width;
        for entry in &mut self.entries {
            entry.drop_scaled();
        }
        debug!("target width set to {width}");
        self.present_current();
    }

    #[must_use]
    pub fn scale_to_width(&self) -> bool {
        self.scale_to_width
    }

    #[must_use]
    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    /// Path of the image on screen.
    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        self.shown_offset()
            .map(|offset| self.entries[offset].path.as_path())
    }

    /// Path of the entry at `offset` from the left edge.
    #[must_use]
    pub fn path(&self, offset: usize) -> Option<&Path> {
        self.entries.get(offset).map(|entry| entry.path.as_path())
    }

    /// Scaled variant of the entry at `offset`, if computed.
    #[must_use]
    pub fn scaled(&self, offset: usize) -> Option<&ImageData> {
        self.entries.get(offset).and_then(|entry| entry.scaled.as_ref())
    }

    /// Whether the entry at `offset` failed to load.
    #[must_use]
    pub fn is_failed(&self, offset: usize) -> bool {
        self.entries
            .get(offset)
            .is_some_and(|entry| entry.image.is_err())
    }

    /// Why the entry at `offset` failed to load.
    #[must_use]
    pub fn load_error(&self, offset: usize) -> Option<&Error> {
        self.entries
            .get(offset)
            .and_then(|entry| entry.image.as_ref().err())
    }

    /// Number of scaling jobs still in flight.
    #[must_use]
    pub fn pending_jobs(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.pending.is_some())
            .count()
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Applies every finished scaling job without waiting.
    /// Returns how many results were accepted.
    pub fn poll_scaled(&mut self) -> usize {
        let mut accepted = 0;
        while let Ok(message) = self.scaled_rx.try_recv() {
            if self.apply_scaled(message) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Waits for the next live scaling job and applies it.
    ///
    /// Returns `false` at once when nothing is pending.
    pub async fn next_scaled(&mut self) -> bool {
        while self.pending_jobs() > 0 {
            let Some(message) = self.scaled_rx.recv().await else {
                return false;
            };
            if self.apply_scaled(message) {
                return true;
            }
        }
        false
    }

    fn apply_scaled(&mut self, message: ScaledResult) -> bool {
        let Some(offset) = self.entries.iter().position(|entry| {
            entry
                .pending
                .as_ref()
                .is_some_and(|pending| pending.ticket == message.ticket)
        }) else {
            debug!("discarding stale scaled result #{}", message.ticket);
            return false;
        };

        let entry = &mut self.entries[offset];
        entry.pending = None;
        match message.result {
            Ok(scaled) => {
                debug!(
                    "scaled {} to {}x{}",
                    entry.path.display(),
                    scaled.width,
                    scaled.height
                );
                entry.scaled = Some(scaled);
            }
            Err(err) => warn!("failed to scale {}: {err}", entry.path.display()),
        }

        if self.shown == Some(entry.serial) {
            self.present(offset);
        }
        true
    }

    fn load_entry(&mut self, path: &Path) -> Entry {
        let image = load_image(path);
        match &image {
            Ok(data) => debug!("loaded {} ({}x{})", path.display(), data.width, data.height),
            Err(err) => warn!("failed to load {}: {err}", path.display()),
        }
        let serial = self.next_serial;
        self.next_serial += 1;
        Entry {
            serial,
            path: path.to_path_buf(),
            image,
            scaled: None,
            pending: None,
        }
    }

    fn shown_offset(&self) -> Option<usize> {
        let serial = self.shown?;
        self.entries.iter().position(|entry| entry.serial == serial)
    }

    fn present_current(&mut self) {
        if let Some(offset) = self.shown_offset() {
            self.request_scaling(offset);
            self.present(offset);
        }
    }

    /// Starts or performs scaling for the entry at `offset` if it needs it.
    fn request_scaling(&mut self, offset: usize) {
        let scale_to_width = self.scale_to_width;
        let target_width = self.target_width;
        let ticket = self.next_serial;

        let entry = &mut self.entries[offset];
        let Ok(raw) = &entry.image else {
            return;
        };
        if !scale_to_width
            || raw.width <= target_width
            || entry.scaled.is_some()
            || entry.pending.is_some()
        {
            return;
        }

        match &self.runtime {
            Some(runtime) => {
                let raw = raw.clone();
                let sender = self.scaled_tx.clone();
                let handle = runtime.spawn_blocking(move || {
                    let result = raw.scaled_to_width(target_width);
                    if sender.send(ScaledResult { ticket, result }).is_err() {
                        debug!("scaled result #{ticket} has no receiver");
                    }
                });
                entry.pending = Some(PendingScale { ticket, handle });
                self.next_serial += 1;
                debug!("scheduled scaling #{ticket} for {}", entry.path.display());
            }
            None => match raw.scaled_to_width(target_width) {
                Ok(scaled) => entry.scaled = Some(scaled),
                Err(err) => warn!("failed to scale {}: {err}", entry.path.display()),
            },
        }
    }

    fn present(&mut self, offset: usize) {
        let entry = &self.entries[offset];
        match &entry.image {
            Ok(raw) => {
                let scaled = if self.scale_to_width {
                    entry.scaled.as_ref()
                } else {
                    None
                };
                self.presenter.show(&entry.path, raw, scaled);
            }
            Err(err) => self.presenter.show_placeholder(&entry.path, err),
        }
    }
}

impl<P: Presenter> ItemStore for ImageStore<P> {
    type Id = PathBuf;

    fn load_back(&mut self, id: &PathBuf) {
        let entry = self.load_entry(id);
        self.entries.push_back(entry);
    }

    fn load_front(&mut self, id: &PathBuf) {
        let entry = self.load_entry(id);
        self.entries.push_front(entry);
    }

    fn evict_front(&mut self) {
        if let Some(entry) = self.entries.pop_front() {
            debug!("evicted {}", entry.path.display());
        }
    }

    fn evict_back(&mut self) {
        if let Some(entry) = self.entries.pop_back() {
            debug!("evicted {}", entry.path.display());
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.shown = None;
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn display(&mut self, offset: usize) {
        let Some(entry) = self.entries.get(offset) else {
            warn!("no cached image at offset {offset}");
            return;
        };
        self.shown = Some(entry.serial);
        self.request_scaling(offset);
        self.present(offset);
    }

    fn hide(&mut self) {
        self.shown = None;
        self.presenter.hide();
    }

    fn is_displaying(&self) -> bool {
        self.shown.is_some()
    }
}
