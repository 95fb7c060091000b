//! Shared core of the CGM watchface.
//!
//! Platform-agnostic code used by the watch build and the desktop simulator:
//!
//! - [`colors`]: 8-bit watch colors and their RGB565 conversion
//! - [`config`]: persist keys, schema version and layout bounds
//! - [`prefs`]: user preferences, their packed blob and inbound messages
//! - [`storage`]: the key-value persistence interface
//! - [`trend`]: trend classification and its icon table
//! - [`trend_arrow`]: the trend arrow widget
//!
//! # no_std Compatibility
//!
//! This crate is `no_std` and allocation-free. Logging goes to `defmt` when
//! the `defmt` feature is enabled, to stdout with the `std` feature, and is
//! dropped otherwise.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

#[macro_use]
mod log;

pub mod colors;
pub mod config;
pub mod prefs;
pub mod storage;
pub mod trend;
pub mod trend_arrow;

// Re-export commonly used items
pub use colors::GColor;
pub use prefs::{Dictionary, ElementConfig, PrefKey, Preferences, PrefsStore, Tuple};
pub use storage::{MemoryStorage, PersistentStorage, StorageError};
pub use trend::{ResourceId, Trend, TrendIcon};
pub use trend_arrow::{CompOp, ResourceBundle, TrendArrowComponent, TrendArrowState};
