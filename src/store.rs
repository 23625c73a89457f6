// SPDX-License-Identifier: MPL-2.0
//! Item store port.
//!
//! The windowed cache decides *which* positions are resident; an
//! [`ItemStore`] owns the loaded items themselves and performs the physical
//! loading, eviction and display. Entries are kept in the same left-to-right
//! order as the window, so offset `0` is always the window's left edge.

/// Backing storage for the items of a windowed cache.
pub trait ItemStore {
    /// Identifier used to locate an item (a path for images).
    type Id;

    /// Loads `id` and places it after the current last entry.
    fn load_back(&mut self, id: &Self::Id);

    /// Loads `id` and places it before the current first entry.
    fn load_front(&mut self, id: &Self::Id);

    /// Drops the first entry.
    fn evict_front(&mut self);

    /// Drops the last entry.
    fn evict_back(&mut self);

    /// Drops every entry and whatever background work they own.
    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shows the entry at `offset` from the left edge.
    fn display(&mut self, offset: usize);

    /// Shows nothing.
    fn hide(&mut self);

    /// Whether an entry is currently on screen.
    fn is_displaying(&self) -> bool;
}
