// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[cache]` - Window capacity and seeding fan-out
//! - `[display]` - Display-sized variants and list ordering
//!
//! Missing keys fall back to their defaults, so a partial file is valid.
//! Out-of-range values are clamped by the accessors on [`Config`].
//!
//! # Examples
//!
//! ```no_run
//! use photo_scroller::config;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! config.cache.capacity = 16;
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;
pub mod paths;
pub mod values;

pub use defaults::*;
pub use values::{CacheCapacity, InitialFanout, TargetWidth};

use crate::error::{Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Enums
// =============================================================================

/// Order in which a directory's images and subfolders are listed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Names compared with digit runs as numbers (`img2` before `img10`).
    #[default]
    Natural,
    Alphabetical,
    ModifiedDate,
    CreatedDate,
}

// =============================================================================
// Section Structs
// =============================================================================

/// Windowed cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Number of images held in memory.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Number of images loaded when the window is rebuilt.
    #[serde(default = "default_initial_fanout")]
    pub initial_fanout: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            initial_fanout: DEFAULT_INITIAL_FANOUT,
        }
    }
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Produce display-sized variants of wide images.
    #[serde(default = "default_scale_to_width")]
    pub scale_to_width: bool,

    /// Width of display-sized variants, in pixels.
    #[serde(default = "default_target_width")]
    pub target_width: u32,

    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            scale_to_width: DEFAULT_SCALE_TO_WIDTH,
            target_width: DEFAULT_TARGET_WIDTH,
            sort_order: SortOrder::default(),
        }
    }
}

// =============================================================================
// Main Config Struct
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    pub fn capacity(&self) -> CacheCapacity {
        CacheCapacity::new(self.cache.capacity)
    }

    /// Seeding fan-out, bounded by [`Config::capacity`].
    pub fn initial_fanout(&self) -> InitialFanout {
        InitialFanout::new(self.cache.initial_fanout, self.capacity())
    }

    pub fn target_width(&self) -> TargetWidth {
        TargetWidth::new(self.display.target_width)
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_initial_fanout() -> usize {
    DEFAULT_INITIAL_FANOUT
}

fn default_scale_to_width() -> bool {
    DEFAULT_SCALE_TO_WIDTH
}

fn default_target_width() -> u32 {
    DEFAULT_TARGET_WIDTH
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    let Some(path) = get_config_path_with_override(base_dir) else {
        return (Config::default(), None);
    };
    if !path.exists() {
        return (Config::default(), None);
    }
    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => {
            let message = format!("ignoring {}: {err}", path.display());
            warn!("{message}");
            (Config::default(), Some(message))
        }
    }
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
