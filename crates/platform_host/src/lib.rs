//! Host-domain contracts shared by the desktop runtime and its embedding host.
//!
//! This crate is the boundary for platform services: the opaque key-value store used for
//! persistence, clock helpers, and the wallpaper configuration model.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;
pub mod wallpaper;

pub use storage::{
    load_or_default, load_typed, save_typed, FailingKeyValueStore, KeyValueFuture, KeyValueStore,
    MemoryKeyValueStore, NoopKeyValueStore, StorageError,
};
pub use time::{next_deletion_stamp_ms, wall_clock_ms};
pub use wallpaper::{
    wallpaper_preset, wallpaper_presets, WallpaperConfig, WallpaperFill, WallpaperPreset,
    WallpaperSelection, DEFAULT_WALLPAPER_ID,
};
