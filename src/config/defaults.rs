// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Cache**: window capacity and seeding fan-out
//! - **Display**: display-sized variant policy

// ==========================================================================
// Cache Defaults
// ==========================================================================

/// Default number of images held in memory around the cursor.
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

/// Minimum cache capacity.
pub const MIN_CACHE_CAPACITY: usize = 1;

/// Maximum cache capacity.
pub const MAX_CACHE_CAPACITY: usize = 64;

/// Default number of images loaded when the window is rebuilt.
/// Never exceeds the capacity in effect.
pub const DEFAULT_INITIAL_FANOUT: usize = 10;

/// Minimum seeding fan-out.
pub const MIN_INITIAL_FANOUT: usize = 1;

// ==========================================================================
// Display Defaults
// ==========================================================================

/// Whether display-sized variants are produced by default.
pub const DEFAULT_SCALE_TO_WIDTH: bool = false;

/// Default width of display-sized variants, in pixels.
pub const DEFAULT_TARGET_WIDTH: u32 = 1920;

/// Minimum target width, in pixels.
pub const MIN_TARGET_WIDTH: u32 = 16;

/// Maximum target width, in pixels.
pub const MAX_TARGET_WIDTH: u32 = 16384;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_CACHE_CAPACITY > 0);
    assert!(MAX_CACHE_CAPACITY >= MIN_CACHE_CAPACITY);
    assert!(DEFAULT_CACHE_CAPACITY >= MIN_CACHE_CAPACITY);
    assert!(DEFAULT_CACHE_CAPACITY <= MAX_CACHE_CAPACITY);

    assert!(MIN_INITIAL_FANOUT > 0);
    assert!(DEFAULT_INITIAL_FANOUT >= MIN_INITIAL_FANOUT);
    assert!(DEFAULT_INITIAL_FANOUT <= DEFAULT_CACHE_CAPACITY);

    assert!(MIN_TARGET_WIDTH > 0);
    assert!(MAX_TARGET_WIDTH >= MIN_TARGET_WIDTH);
    assert!(DEFAULT_TARGET_WIDTH >= MIN_TARGET_WIDTH);
    assert!(DEFAULT_TARGET_WIDTH <= MAX_TARGET_WIDTH);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_defaults_are_valid() {
        assert_eq!(DEFAULT_CACHE_CAPACITY, 10);
        assert!(DEFAULT_CACHE_CAPACITY >= MIN_CACHE_CAPACITY);
        assert!(DEFAULT_CACHE_CAPACITY <= MAX_CACHE_CAPACITY);
    }

    #[test]
    fn fanout_default_fits_capacity() {
        assert_eq!(DEFAULT_INITIAL_FANOUT, 10);
        assert!(DEFAULT_INITIAL_FANOUT <= DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn display_defaults_are_valid() {
        assert!(!DEFAULT_SCALE_TO_WIDTH);
        assert_eq!(DEFAULT_TARGET_WIDTH, 1920);
        assert!(DEFAULT_TARGET_WIDTH >= MIN_TARGET_WIDTH);
        assert!(DEFAULT_TARGET_WIDTH <= MAX_TARGET_WIDTH);
    }
}
