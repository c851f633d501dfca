//! Desktop runtime persistence adapters for boot hydration and fire-and-forget saves.
//!
//! Loads never fail: a missing, unreadable, or corrupt value falls back to the built-in default
//! and the failure is logged.

use platform_host::{
    load_or_default, load_typed, save_typed, KeyValueStore, StorageError, WallpaperConfig,
};
use tracing::warn;

use crate::{
    icons::{default_desktop_icons, merge_required_icons},
    model::{DesktopIcon, RecycleBinItem},
    recycle_bin::RecycleBin,
};

pub const WALLPAPER_KEY: &str = "desktop.wallpaper.v1";
pub const DESKTOP_ICONS_KEY: &str = "desktop.icons.v1";
pub const RECYCLE_BIN_KEY: &str = "desktop.recycle_bin.v1";

/// Everything restored from storage at boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDesktop {
    pub wallpaper: WallpaperConfig,
    pub icons: Vec<DesktopIcon>,
    pub recycle_bin: RecycleBin,
}

impl Default for PersistedDesktop {
    fn default() -> Self {
        Self {
            wallpaper: WallpaperConfig::default(),
            icons: default_desktop_icons(),
            recycle_bin: RecycleBin::default(),
        }
    }
}

pub async fn load_wallpaper<S: KeyValueStore + ?Sized>(store: &S) -> WallpaperConfig {
    let wallpaper: WallpaperConfig = load_or_default(store, WALLPAPER_KEY).await;
    if !wallpaper.is_valid() {
        warn!(
            key = WALLPAPER_KEY,
            selection = ?wallpaper.selection,
            "unknown wallpaper, using default"
        );
    }
    wallpaper.canonicalized()
}

/// Loads desktop icons with required system icons merged back in.
pub async fn load_desktop_icons<S: KeyValueStore + ?Sized>(store: &S) -> Vec<DesktopIcon> {
    match load_typed::<_, Vec<DesktopIcon>>(store, DESKTOP_ICONS_KEY).await {
        Ok(Some(icons)) => merge_required_icons(icons),
        Ok(None) => default_desktop_icons(),
        Err(err) => {
            warn!(key = DESKTOP_ICONS_KEY, error = %err, "desktop icons load failed");
            default_desktop_icons()
        }
    }
}

/// Loads the recycle bin; system icons found in stored data are dropped.
pub async fn load_recycle_bin<S: KeyValueStore + ?Sized>(store: &S) -> RecycleBin {
    let items: Vec<RecycleBinItem> = load_or_default(store, RECYCLE_BIN_KEY).await;
    RecycleBin::from_items(items)
}

pub async fn load_desktop<S: KeyValueStore + ?Sized>(store: &S) -> PersistedDesktop {
    PersistedDesktop {
        wallpaper: load_wallpaper(store).await,
        icons: load_desktop_icons(store).await,
        recycle_bin: load_recycle_bin(store).await,
    }
}

pub async fn persist_wallpaper<S: KeyValueStore + ?Sized>(
    store: &S,
    wallpaper: &WallpaperConfig,
) -> Result<(), StorageError> {
    save_typed(store, WALLPAPER_KEY, wallpaper).await
}

pub async fn persist_desktop_icons<S: KeyValueStore + ?Sized>(
    store: &S,
    icons: &[DesktopIcon],
) -> Result<(), StorageError> {
    save_typed(store, DESKTOP_ICONS_KEY, icons).await
}

pub async fn persist_recycle_bin<S: KeyValueStore + ?Sized>(
    store: &S,
    recycle_bin: &RecycleBin,
) -> Result<(), StorageError> {
    save_typed(store, RECYCLE_BIN_KEY, recycle_bin).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{FailingKeyValueStore, MemoryKeyValueStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        icons::{required_system_icons, RECYCLE_BIN_ICON_ID},
        model::{IconKind, IconPayload},
    };

    fn shortcut(id: &str) -> DesktopIcon {
        DesktopIcon {
            id: id.to_string(),
            name: "MyShortcut".to_string(),
            image: "/icons8-github.svg".to_string(),
            kind: IconKind::Shortcut,
            x: 220,
            y: 20,
            payload: IconPayload::default(),
        }
    }

    #[test]
    fn empty_store_yields_defaults() {
        let store = MemoryKeyValueStore::default();
        assert_eq!(block_on(load_desktop(&store)), PersistedDesktop::default());
    }

    #[test]
    fn saved_state_round_trips_through_the_store() {
        let store = MemoryKeyValueStore::default();
        let wallpaper = WallpaperConfig::custom_image("data:image/png;base64,AAAA");
        let icons = vec![required_system_icons().remove(0), shortcut("shortcut-1")];
        let mut bin = RecycleBin::default();
        bin.delete(shortcut("shortcut-2"), 42).expect("delete");

        block_on(async {
            persist_wallpaper(&store, &wallpaper).await.expect("wallpaper");
            persist_desktop_icons(&store, &icons).await.expect("icons");
            persist_recycle_bin(&store, &bin).await.expect("bin");
        });

        let loaded = block_on(load_desktop(&store));
        assert_eq!(loaded.wallpaper, wallpaper);
        assert_eq!(loaded.icons, icons);
        assert_eq!(loaded.recycle_bin, bin);
    }

    #[test]
    fn corrupt_json_falls_back_to_defaults() {
        let store = MemoryKeyValueStore::default();
        store.insert_raw(WALLPAPER_KEY, "{not json");
        store.insert_raw(DESKTOP_ICONS_KEY, "[{\"id\": 3}]");
        store.insert_raw(RECYCLE_BIN_KEY, "\"nope\"");

        let loaded = block_on(load_desktop(&store));
        assert_eq!(loaded, PersistedDesktop::default());
        assert!(loaded.icons.iter().any(|icon| icon.id == RECYCLE_BIN_ICON_ID));
    }

    #[test]
    fn stored_icons_without_system_icon_get_it_back() {
        let store = MemoryKeyValueStore::default();
        block_on(persist_desktop_icons(&store, &[shortcut("shortcut-1")])).expect("save");

        let icons = block_on(load_desktop_icons(&store));
        let ids: Vec<&str> = icons.iter().map(|icon| icon.id.as_str()).collect();
        assert_eq!(ids, vec![RECYCLE_BIN_ICON_ID, "shortcut-1"]);
    }

    #[test]
    fn stored_recycle_bin_drops_system_icons() {
        let store = MemoryKeyValueStore::default();
        let items = vec![
            RecycleBinItem {
                icon: required_system_icons().remove(0),
                deleted_at: 1,
                original_location: "Desktop".to_string(),
            },
            RecycleBinItem {
                icon: shortcut("shortcut-1"),
                deleted_at: 2,
                original_location: "Desktop".to_string(),
            },
        ];
        store.insert_raw(
            RECYCLE_BIN_KEY,
            serde_json::to_string(&items).expect("encode"),
        );

        let bin = block_on(load_recycle_bin(&store));
        assert_eq!(bin.len(), 1);
        assert!(bin.contains("shortcut-1"));
    }

    #[test]
    fn unknown_stored_wallpaper_preset_loads_default() {
        let store = MemoryKeyValueStore::default();
        store.insert_raw(
            WALLPAPER_KEY,
            r#"{"selection":{"kind":"preset","preset_id":"retired"}}"#,
        );
        assert_eq!(block_on(load_wallpaper(&store)), WallpaperConfig::default());
    }

    #[test]
    fn failing_backend_loads_defaults_and_reports_save_errors() {
        let store = FailingKeyValueStore;
        assert_eq!(block_on(load_desktop(&store)), PersistedDesktop::default());

        let err = block_on(persist_wallpaper(&store, &WallpaperConfig::default())).unwrap_err();
        assert!(matches!(err, StorageError::Backend { ref key, .. } if key == WALLPAPER_KEY));
    }
}
