// SPDX-License-Identifier: MPL-2.0
//! `photo_scroller` steps through folders of images one at a time while
//! keeping a bounded window of decoded images around the current position.
//!
//! The core is [`navigator::Navigator`], a cursor state machine over a
//! [`sequence::Sequence`] that drives a [`cache::WindowedCache`]. The cache
//! delegates physical loading to an [`store::ItemStore`]; [`media::ImageStore`]
//! is the image-decoding implementation and [`viewer::Viewer`] wires it to
//! the filesystem.

pub mod cache;
pub mod config;
pub mod direction;
pub mod directory_scanner;
pub mod error;
pub mod media;
pub mod navigator;
pub mod sequence;
pub mod store;
pub mod task_queue;
pub mod viewer;
