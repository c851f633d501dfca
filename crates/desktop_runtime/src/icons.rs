//! Built-in desktop icons and the helpers that keep them consistent across loads.

use std::collections::HashSet;

use serde_json::json;

use crate::model::{AppType, DesktopIcon, IconKind, IconPayload, OpenWindowRequest};

pub const RECYCLE_BIN_ICON_ID: &str = "recycle-bin";
/// Origin recorded for icons deleted from the desktop.
pub const DESKTOP_LOCATION: &str = "Desktop";
pub const DEFAULT_SHORTCUT_CONTENT: &str = "Custom application";

fn app_icon(app_type: AppType, kind: IconKind, x: i32, y: i32) -> DesktopIcon {
    DesktopIcon {
        id: app_type.key().to_string(),
        name: app_type.title().to_string(),
        image: app_type.image_ref().to_string(),
        kind,
        x,
        y,
        payload: IconPayload {
            app_type: Some(app_type),
            content: None,
        },
    }
}

/// Icons present on a fresh desktop, in one column down the left edge.
pub fn default_desktop_icons() -> Vec<DesktopIcon> {
    vec![
        app_icon(AppType::RecycleBin, IconKind::System, 20, 20),
        app_icon(AppType::FileExplorer, IconKind::App, 20, 120),
        app_icon(AppType::Notepad, IconKind::App, 20, 220),
        app_icon(AppType::Calculator, IconKind::App, 20, 320),
        app_icon(AppType::Settings, IconKind::App, 20, 420),
    ]
}

/// Icons that must exist on every desktop regardless of what was persisted.
pub fn required_system_icons() -> Vec<DesktopIcon> {
    default_desktop_icons()
        .into_iter()
        .filter(DesktopIcon::is_system)
        .collect()
}

/// Drops duplicate ids (first wins) and re-adds any missing required system icon.
///
/// A persisted copy of a system icon keeps its position and name but is forced back to
/// [`IconKind::System`].
pub fn merge_required_icons(loaded: Vec<DesktopIcon>) -> Vec<DesktopIcon> {
    let required = required_system_icons();
    let mut seen = HashSet::new();
    let mut merged: Vec<DesktopIcon> = loaded
        .into_iter()
        .filter(|icon| seen.insert(icon.id.clone()))
        .map(|mut icon| {
            if required.iter().any(|r| r.id == icon.id) {
                icon.kind = IconKind::System;
            }
            icon
        })
        .collect();

    for icon in required {
        if !merged.iter().any(|existing| existing.id == icon.id) {
            merged.insert(0, icon);
        }
    }
    merged
}

/// Label shown under an icon; the recycle bin reports how many items it holds.
pub fn icon_display_name(icon: &DesktopIcon, recycle_bin_len: usize) -> String {
    if icon.id == RECYCLE_BIN_ICON_ID && recycle_bin_len > 0 {
        format!("{} ({recycle_bin_len})", icon.name)
    } else {
        icon.name.clone()
    }
}

/// Window request issued when an icon is opened.
pub fn open_request_for(icon: &DesktopIcon) -> OpenWindowRequest {
    match (icon.kind, icon.payload.app_type) {
        (IconKind::Shortcut, app_type) => {
            let mut req = OpenWindowRequest::new(icon.id.clone()).with_title(icon.name.clone());
            req.app_type = app_type;
            req.image_ref = Some(icon.image.clone());
            req.content = json!({
                "description": icon
                    .payload
                    .content
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SHORTCUT_CONTENT.to_string()),
            });
            req
        }
        (_, Some(app_type)) => {
            let mut req = OpenWindowRequest::for_app(app_type);
            req.image_ref = Some(icon.image.clone());
            req
        }
        (_, None) => {
            let mut req = OpenWindowRequest::new(icon.id.clone()).with_title(icon.name.clone());
            req.image_ref = Some(icon.image.clone());
            req
        }
    }
}
