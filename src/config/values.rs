// SPDX-License-Identifier: MPL-2.0
//! Range-checked configuration values.
//!
//! Each newtype clamps on construction, so a value read from a hand-edited
//! `settings.toml` or the command line is always usable.

use super::defaults::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_INITIAL_FANOUT, DEFAULT_TARGET_WIDTH, MAX_CACHE_CAPACITY,
    MAX_TARGET_WIDTH, MIN_CACHE_CAPACITY, MIN_INITIAL_FANOUT, MIN_TARGET_WIDTH,
};

/// Number of images held in memory around the cursor (1–64).
///
/// # Example
///
/// ```
/// use photo_scroller::config::CacheCapacity;
///
/// assert_eq!(CacheCapacity::new(6).value(), 6);
/// assert_eq!(CacheCapacity::new(0).value(), 1);
/// assert_eq!(CacheCapacity::new(500).value(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheCapacity(usize);

impl CacheCapacity {
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_CACHE_CAPACITY, MAX_CACHE_CAPACITY))
    }

    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for CacheCapacity {
    fn default() -> Self {
        Self(DEFAULT_CACHE_CAPACITY)
    }
}

/// Number of images loaded when the window is rebuilt, bounded by the
/// capacity it is used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialFanout(usize);

impl InitialFanout {
    /// Clamps `value` to `1..=capacity`.
    pub fn new(value: usize, capacity: CacheCapacity) -> Self {
        Self(value.clamp(MIN_INITIAL_FANOUT, capacity.value()))
    }

    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for InitialFanout {
    fn default() -> Self {
        Self(DEFAULT_INITIAL_FANOUT)
    }
}

/// Width of display-sized variants in pixels (16–16384).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetWidth(u32);

impl TargetWidth {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(MIN_TARGET_WIDTH, MAX_TARGET_WIDTH))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for TargetWidth {
    fn default() -> Self {
        Self(DEFAULT_TARGET_WIDTH)
    }
}
