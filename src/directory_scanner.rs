// SPDX-License-Identifier: MPL-2.0
//! Directory scanner module for finding and sorting images and folders.
//!
//! This module scans a directory for supported image formats or for
//! subdirectories, and sorts the result according to the configured
//! sort order.

use crate::config::SortOrder;
use crate::error::{Error, Result};
use crate::media;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Scans `directory` for supported image files and sorts them.
///
/// Returns an error if the directory cannot be read.
pub fn scan_images(directory: &Path, sort_order: SortOrder) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && media::is_supported_image(&path) {
            images.push(path);
        }
    }
    sort_paths(&mut images, sort_order);
    Ok(images)
}

/// Scans `directory` for immediate subdirectories and sorts them.
///
/// Returns an error if the directory cannot be read.
pub fn scan_folders(directory: &Path, sort_order: SortOrder) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_dir() {
            folders.push(path);
        }
    }
    sort_paths(&mut folders, sort_order);
    Ok(folders)
}

/// Scans the directory containing `current_file`.
///
/// Returns the sorted image list and the index of `current_file` in it,
/// which is `None` if the file is gone or not a supported image.
pub fn scan_siblings(
    current_file: &Path,
    sort_order: SortOrder,
) -> Result<(Vec<PathBuf>, Option<usize>)> {
    let parent = current_file
        .parent()
        .ok_or_else(|| Error::Io("No parent directory".into()))?;
    let images = scan_images(parent, sort_order)?;
    let current_index = images.iter().position(|p| p == current_file);
    Ok((images, current_index))
}

/// Sorts a list of paths according to the specified sort order.
pub fn sort_paths(paths: &mut [PathBuf], sort_order: SortOrder) {
    match sort_order {
        SortOrder::Natural => {
            paths.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
        }
        SortOrder::Alphabetical => {
            paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        }
        SortOrder::ModifiedDate => {
            paths.sort_by_key(|p| {
                p.metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH)
            });
        }
        SortOrder::CreatedDate => {
            paths.sort_by_key(|p| {
                p.metadata()
                    .and_then(|m| m.created())
                    .unwrap_or(SystemTime::UNIX_EPOCH)
            });
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compares names treating runs of ASCII digits as numbers and letters
/// case-insensitively. Names equal under those rules fall back to a plain
/// byte comparison so the order stays total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ordering = compare_digit_runs(&l_run, &r_run);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                let ordering = l.to_lowercase().cmp(r.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

/// Numeric comparison of two digit strings of any length.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
