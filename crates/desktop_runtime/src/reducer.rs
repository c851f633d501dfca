//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use platform_host::{next_deletion_stamp_ms, WallpaperConfig, WallpaperSelection};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::DesktopConfig,
    icon_layout::{IconLayout, IconMetrics, ProtectedIconError},
    icons::{default_desktop_icons, icon_display_name, merge_required_icons, open_request_for},
    model::{
        CreateShortcutRequest, DesktopIcon, OpenWindowRequest, PointerPosition, RecycleBinItem,
        ResizeEdge, WindowId, WindowRect,
    },
    persistence::PersistedDesktop,
    recycle_bin::RecycleBin,
    snap::DesktopBounds,
    window_manager::WindowManager,
    z_order::ZOrderAuthority,
};

/// Complete desktop shell state owned by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub windows: WindowManager,
    pub icons: IconLayout,
    pub recycle_bin: RecycleBin,
    pub wallpaper: WallpaperConfig,
    pub start_menu_open: bool,
    pub config: DesktopConfig,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new(DesktopConfig::default())
    }
}

impl DesktopState {
    /// Fresh desktop with default icons, sized to the default viewport until the host reports one.
    pub fn new(config: DesktopConfig) -> Self {
        let defaults = DesktopBounds::default();
        let bounds = DesktopBounds::new(defaults.width, defaults.height, config.taskbar_height);
        Self {
            windows: WindowManager::new(config.clone(), bounds, ZOrderAuthority::default()),
            icons: IconLayout::new(
                IconMetrics::from_config(&config),
                bounds,
                default_desktop_icons(),
            ),
            recycle_bin: RecycleBin::default(),
            wallpaper: WallpaperConfig::default(),
            start_menu_open: false,
            config,
        }
    }

    /// Label rendered under an icon.
    pub fn icon_label(&self, icon: &DesktopIcon) -> String {
        icon_display_name(icon, self.recycle_bin.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or bring back the existing one with the same id.
    OpenWindow(OpenWindowRequest),
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Toggle a window between minimized and its previous status.
    MinimizeWindow {
        /// Window to minimize or bring back.
        window_id: WindowId,
    },
    /// Toggle a window between maximized and open.
    MaximizeWindow {
        /// Window to maximize or restore.
        window_id: WindowId,
    },
    /// Taskbar button press (restore, minimize, or focus).
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Final geometry reported by the host after a host-driven drag.
    DragStop {
        /// Window that was dragged.
        window_id: WindowId,
        /// Geometry at release.
        rect: WindowRect,
    },
    /// Minimize everything, or bring back what the previous show-desktop hid.
    ShowDesktop,
    /// Begin dragging a window.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag, applying any hovered snap zone.
    EndMove,
    /// Begin resizing a window.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
        /// Pointer position at resize start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window resize.
    UpdateResize {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window resize.
    EndResize,
    /// Viewport size reported by the host.
    SetViewport {
        /// Viewport width in pixels.
        width: i32,
        /// Viewport height in pixels, taskbar included.
        height: i32,
    },
    /// Toggle the start menu open/closed.
    ToggleStartMenu,
    /// Close the start menu if open.
    CloseStartMenu,
    /// Escape key.
    Escape,
    /// Pointer press on empty desktop space.
    BeginBoxSelection {
        /// Press position.
        pointer: PointerPosition,
        /// Whether a modifier key extends the current selection.
        additive: bool,
    },
    /// Pointer move while box-selecting.
    UpdateBoxSelection {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer release after box-selecting.
    EndBoxSelection,
    /// Click on empty desktop space.
    ClickDesktop,
    /// Click on an icon.
    ClickIcon {
        /// Clicked icon.
        icon_id: String,
        /// Whether a modifier key toggles instead of replacing.
        additive: bool,
    },
    /// Select every icon on the desktop.
    SelectAllIcons,
    /// Empty the icon selection.
    ClearIconSelection,
    /// Begin dragging the icon selection.
    BeginIconDrag {
        /// Icon under the pointer.
        icon_id: String,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress icon drag.
    UpdateIconDrag {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the icon drag.
    EndIconDrag,
    /// Double-click on an icon.
    OpenIcon {
        /// Icon to open.
        icon_id: String,
    },
    /// Enter name-editing mode for an icon.
    BeginRenameIcon {
        /// Icon to rename.
        icon_id: String,
    },
    /// Replace the in-progress rename text.
    UpdateRenameDraft {
        /// Current text in the name editor.
        draft: String,
    },
    /// Apply the in-progress rename.
    CommitRename,
    /// Abandon the in-progress rename.
    CancelRename,
    /// Move one icon into the recycle bin.
    DeleteIcon {
        /// Icon to delete.
        icon_id: String,
    },
    /// Move every selected icon into the recycle bin.
    DeleteSelectedIcons,
    /// Add a shortcut icon to the desktop.
    CreateShortcut(CreateShortcutRequest),
    /// Put a recycle-bin item back on the desktop.
    RestoreRecycleBinItem {
        /// Item to restore.
        item_id: String,
    },
    /// Put several recycle-bin items back on the desktop.
    RestoreRecycleBinItems {
        /// Items to restore.
        item_ids: Vec<String>,
    },
    /// Permanently delete a recycle-bin item.
    PurgeRecycleBinItem {
        /// Item to purge.
        item_id: String,
    },
    /// Permanently delete several recycle-bin items.
    PurgeRecycleBinItems {
        /// Items to purge.
        item_ids: Vec<String>,
    },
    /// Permanently delete everything in the recycle bin.
    EmptyRecycleBin,
    /// Change the desktop wallpaper.
    SetWallpaper {
        /// New wallpaper.
        wallpaper: WallpaperConfig,
    },
    /// Replace persisted parts of the state with values loaded at boot.
    Hydrate(PersistedDesktop),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host to execute.
pub enum RuntimeEffect {
    /// Persist the current wallpaper.
    PersistWallpaper,
    /// Persist the desktop icon list.
    PersistDesktopIcons,
    /// Persist the recycle-bin ledger.
    PersistRecycleBin,
    /// Move focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that must be refused.
pub enum ReducerError {
    /// A delete targeted a system icon; nothing was deleted.
    #[error(transparent)]
    ProtectedIcon(#[from] ProtectedIconError),
    /// The wallpaper names a preset that does not exist.
    #[error("unknown wallpaper preset `{preset_id}`")]
    UnknownWallpaper {
        /// Requested preset id.
        preset_id: String,
    },
    /// The custom wallpaper source is blank.
    #[error("custom wallpaper source is empty")]
    InvalidWallpaper,
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// Actions naming unknown windows or icons are ignored rather than reported.
///
/// # Errors
///
/// Returns [`ReducerError::ProtectedIcon`] when a delete includes a system icon and a wallpaper
/// error when [`DesktopAction::SetWallpaper`] carries an invalid selection. State is left
/// untouched in both cases.
pub fn reduce_desktop(
    state: &mut DesktopState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let window_id = state.windows.open_window(req);
            state.start_menu_open = false;
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::CloseWindow { window_id } => {
            state.windows.close_window(&window_id);
        }
        DesktopAction::FocusWindow { window_id } => {
            if state.windows.focus_window(&window_id) {
                state.start_menu_open = false;
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            state.windows.minimize_window(&window_id);
        }
        DesktopAction::MaximizeWindow { window_id } => {
            state.windows.maximize_window(&window_id);
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            state.windows.toggle_taskbar_window(&window_id);
            if state.windows.active_window_id() == Some(&window_id) {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::DragStop { window_id, rect } => {
            state.windows.drag_stop(&window_id, rect);
        }
        DesktopAction::ShowDesktop => {
            state.windows.show_desktop();
            state.start_menu_open = false;
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            state.windows.begin_move(&window_id, pointer);
        }
        DesktopAction::UpdateMove { pointer } => {
            state.windows.update_move(pointer);
        }
        DesktopAction::EndMove => {
            state.windows.end_move();
        }
        DesktopAction::BeginResize {
            window_id,
            edge,
            pointer,
        } => {
            state.windows.begin_resize(&window_id, edge, pointer);
        }
        DesktopAction::UpdateResize { pointer } => {
            state.windows.update_resize(pointer);
        }
        DesktopAction::EndResize => {
            state.windows.end_resize();
        }
        DesktopAction::SetViewport { width, height } => {
            let bounds = DesktopBounds::new(width, height, state.config.taskbar_height);
            state.windows.set_bounds(bounds);
            if state.icons.set_bounds(bounds) {
                effects.push(RuntimeEffect::PersistDesktopIcons);
            }
        }
        DesktopAction::ToggleStartMenu => {
            state.start_menu_open = !state.start_menu_open;
        }
        DesktopAction::CloseStartMenu => {
            state.start_menu_open = false;
        }
        DesktopAction::Escape => {
            if state.icons.cancel_rename() {
                return Ok(effects);
            }
            if state.start_menu_open {
                state.start_menu_open = false;
                return Ok(effects);
            }
            state.icons.clear_selection();
        }
        DesktopAction::BeginBoxSelection { pointer, additive } => {
            state.start_menu_open = false;
            state.icons.begin_box_selection(pointer, additive);
        }
        DesktopAction::UpdateBoxSelection { pointer } => {
            state.icons.update_box_selection(pointer);
        }
        DesktopAction::EndBoxSelection => {
            state.icons.end_box_selection();
        }
        DesktopAction::ClickDesktop => {
            state.start_menu_open = false;
            state.icons.click_desktop();
        }
        DesktopAction::ClickIcon { icon_id, additive } => {
            state.icons.click_icon(&icon_id, additive);
        }
        DesktopAction::SelectAllIcons => {
            state.icons.select_all();
        }
        DesktopAction::ClearIconSelection => {
            state.icons.clear_selection();
        }
        DesktopAction::BeginIconDrag { icon_id, pointer } => {
            state.icons.begin_drag(&icon_id, pointer);
        }
        DesktopAction::UpdateIconDrag { pointer } => {
            state.icons.update_drag(pointer);
        }
        DesktopAction::EndIconDrag => {
            if state.icons.end_drag() {
                effects.push(RuntimeEffect::PersistDesktopIcons);
            }
        }
        DesktopAction::OpenIcon { icon_id } => {
            let Some(icon) = state.icons.icon(&icon_id) else {
                debug!(%icon_id, "open ignored for unknown icon");
                return Ok(effects);
            };
            let req = open_request_for(icon);
            return reduce_desktop(state, DesktopAction::OpenWindow(req));
        }
        DesktopAction::BeginRenameIcon { icon_id } => {
            if state.icons.rename().is_some() && state.icons.commit_rename() {
                effects.push(RuntimeEffect::PersistDesktopIcons);
            }
            state.icons.begin_rename(&icon_id);
        }
        DesktopAction::UpdateRenameDraft { draft } => {
            state.icons.update_rename_draft(draft);
        }
        DesktopAction::CommitRename => {
            if state.icons.commit_rename() {
                effects.push(RuntimeEffect::PersistDesktopIcons);
            }
        }
        DesktopAction::CancelRename => {
            state.icons.cancel_rename();
        }
        DesktopAction::DeleteIcon { icon_id } => {
            delete_icons(state, &[icon_id], &mut effects)?;
        }
        DesktopAction::DeleteSelectedIcons => {
            let selected: Vec<String> =
                state.icons.selection().selected().iter().cloned().collect();
            delete_icons(state, &selected, &mut effects)?;
        }
        DesktopAction::CreateShortcut(req) => {
            if state.icons.create_shortcut(req).is_some() {
                effects.push(RuntimeEffect::PersistDesktopIcons);
            }
        }
        DesktopAction::RestoreRecycleBinItem { item_id } => {
            if let Some(icon) = state.recycle_bin.restore(&item_id) {
                state.icons.insert_icon(icon);
                effects.push(RuntimeEffect::PersistDesktopIcons);
                effects.push(RuntimeEffect::PersistRecycleBin);
            }
        }
        DesktopAction::RestoreRecycleBinItems { item_ids } => {
            let restored = state.recycle_bin.restore_many(&item_ids);
            if !restored.is_empty() {
                for icon in restored {
                    state.icons.insert_icon(icon);
                }
                effects.push(RuntimeEffect::PersistDesktopIcons);
                effects.push(RuntimeEffect::PersistRecycleBin);
            }
        }
        DesktopAction::PurgeRecycleBinItem { item_id } => {
            if state.recycle_bin.purge(&item_id) {
                effects.push(RuntimeEffect::PersistRecycleBin);
            }
        }
        DesktopAction::PurgeRecycleBinItems { item_ids } => {
            if state.recycle_bin.purge_many(&item_ids) > 0 {
                effects.push(RuntimeEffect::PersistRecycleBin);
            }
        }
        DesktopAction::EmptyRecycleBin => {
            if state.recycle_bin.purge_all() > 0 {
                effects.push(RuntimeEffect::PersistRecycleBin);
            }
        }
        DesktopAction::SetWallpaper { wallpaper } => {
            if !wallpaper.is_valid() {
                return Err(match wallpaper.selection {
                    WallpaperSelection::Preset { preset_id } => {
                        ReducerError::UnknownWallpaper { preset_id }
                    }
                    WallpaperSelection::CustomImage { .. } => ReducerError::InvalidWallpaper,
                });
            }
            if state.wallpaper != wallpaper {
                state.wallpaper = wallpaper;
                effects.push(RuntimeEffect::PersistWallpaper);
            }
        }
        DesktopAction::Hydrate(persisted) => {
            state.wallpaper = persisted.wallpaper.canonicalized();
            state
                .icons
                .replace_icons(merge_required_icons(persisted.icons));
            state.recycle_bin = RecycleBin::from_items(persisted.recycle_bin.items().to_vec());
            state
                .icons
                .reserve_shortcut_ids(state.recycle_bin.items().iter().map(RecycleBinItem::id));
        }
    }

    Ok(effects)
}

fn delete_icons(
    state: &mut DesktopState,
    icon_ids: &[String],
    effects: &mut Vec<RuntimeEffect>,
) -> Result<(), ReducerError> {
    let removed = state.icons.remove_icons(icon_ids)?;
    if removed.is_empty() {
        debug!(?icon_ids, "delete ignored, no matching icons");
        return Ok(());
    }
    let deleted_at = next_deletion_stamp_ms();
    for icon in removed {
        state.recycle_bin.delete(icon, deleted_at)?;
    }
    effects.push(RuntimeEffect::PersistDesktopIcons);
    effects.push(RuntimeEffect::PersistRecycleBin);
    Ok(())
}
