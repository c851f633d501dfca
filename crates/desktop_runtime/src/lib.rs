//! Headless desktop-shell runtime: window management, snapping, desktop icons, and the recycle
//! bin, driven through [`reduce_desktop`] and persisted through `platform_host` storage.

pub mod config;
pub mod effect_executor;
pub mod icon_layout;
pub mod icons;
pub mod model;
pub mod persistence;
pub mod recycle_bin;
pub mod reducer;
pub mod selection;
pub mod snap;
pub mod window_manager;
pub mod z_order;

pub use config::{ConfigError, DesktopConfig, WindowPreset};
pub use effect_executor::EffectExecutor;
pub use icon_layout::{
    clamp_icon_position, snap_to_grid, IconLayout, IconMetrics, ProtectedIconError,
};
pub use model::*;
pub use persistence::{
    load_desktop, load_desktop_icons, load_recycle_bin, load_wallpaper, persist_desktop_icons,
    persist_recycle_bin, persist_wallpaper, PersistedDesktop,
};
pub use recycle_bin::RecycleBin;
pub use reducer::{reduce_desktop, DesktopAction, DesktopState, ReducerError, RuntimeEffect};
pub use selection::{SelectionPhase, SelectionRegion, SelectionState};
pub use snap::{resolve_snap_zone, zone_to_rect, DesktopBounds, SnapZone};
pub use window_manager::{WindowInteraction, WindowManager};
pub use z_order::ZOrderAuthority;
