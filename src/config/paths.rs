// SPDX-License-Identifier: MPL-2.0
//! Config directory resolution.
//!
//! # Path Resolution Order
//!
//! 1. **Explicit override** - the `base_dir` argument (`--config-dir`, tests)
//! 2. **Environment variable** - `PHOTO_SCROLLER_CONFIG_DIR`
//! 3. **Platform default** - via `dirs` crate
//!
//! Loading from an explicit file path bypasses all of this; see
//! [`load_from_path`](super::load_from_path).

use std::ffi::OsString;
use std::path::PathBuf;

/// Application name used for directory naming.
const APP_NAME: &str = "PhotoScroller";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "PHOTO_SCROLLER_CONFIG_DIR";

/// Returns the application config directory, honouring `base_dir` first.
pub fn config_dir_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    resolve(
        base_dir,
        std::env::var_os(ENV_CONFIG_DIR),
        dirs::config_dir(),
    )
}

fn resolve(
    base_dir: Option<PathBuf>,
    env_dir: Option<OsString>,
    platform_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    base_dir
        .or_else(|| env_dir.filter(|dir| !dir.is_empty()).map(PathBuf::from))
        .or_else(|| platform_dir.map(|dir| dir.join(APP_NAME)))
}
