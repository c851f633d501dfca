//! Desktop icon positions, multi-selection, grid-snapped dragging, rename, and lifecycle.

use thiserror::Error;
use tracing::debug;

use crate::{
    config::DesktopConfig,
    icons::DEFAULT_SHORTCUT_CONTENT,
    model::{
        CreateShortcutRequest, DesktopIcon, IconKind, IconPayload, PointerPosition, WindowRect,
    },
    selection::SelectionState,
    snap::DesktopBounds,
};

const SHORTCUT_ID_PREFIX: &str = "shortcut-";
const DEFAULT_SHORTCUT_IMAGE: &str = "/icons8-visual-studio-code.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconMetrics {
    pub icon_size: i32,
    pub grid_size: i32,
    pub padding: i32,
}

impl IconMetrics {
    pub fn from_config(config: &DesktopConfig) -> Self {
        Self {
            icon_size: config.icon_size,
            grid_size: config.grid_size,
            padding: config.grid_padding,
        }
    }
}

impl Default for IconMetrics {
    fn default() -> Self {
        Self::from_config(&DesktopConfig::default())
    }
}

/// Rounds a coordinate to the nearest grid line, measured from the edge padding.
pub fn snap_to_grid(value: i32, metrics: IconMetrics) -> i32 {
    let grid = metrics.grid_size.max(1);
    let offset = value - metrics.padding;
    let cells = (offset + grid / 2).div_euclid(grid);
    metrics.padding + cells * grid
}

/// Keeps an icon inside the desktop, off the taskbar, and `padding` away from every edge.
pub fn clamp_icon_position(
    position: PointerPosition,
    bounds: DesktopBounds,
    metrics: IconMetrics,
) -> PointerPosition {
    let min = metrics.padding;
    let max_x = (bounds.width - metrics.icon_size - metrics.padding).max(min);
    let max_y = (bounds.usable_height() - metrics.icon_size - metrics.padding).max(min);
    PointerPosition::new(position.x.clamp(min, max_x), position.y.clamp(min, max_y))
}

fn shortcut_seq(icon_id: &str) -> Option<u64> {
    icon_id.strip_prefix(SHORTCUT_ID_PREFIX)?.parse().ok()
}

fn icon_rect(icon: &DesktopIcon, metrics: IconMetrics) -> WindowRect {
    WindowRect::new(icon.x, icon.y, metrics.icon_size, metrics.icon_size)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("`{icon_id}` is a system icon and cannot be deleted")]
pub struct ProtectedIconError {
    pub icon_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDragSession {
    pub primary_id: String,
    pub pointer_start: PointerPosition,
    /// Position of every dragged icon when the drag began.
    pub origins: Vec<(String, PointerPosition)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameSession {
    pub icon_id: String,
    pub original_name: String,
    pub draft: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconLayout {
    icons: Vec<DesktopIcon>,
    selection: SelectionState,
    drag: Option<IconDragSession>,
    rename: Option<RenameSession>,
    bounds: DesktopBounds,
    metrics: IconMetrics,
    next_shortcut_seq: u64,
}

impl IconLayout {
    pub fn new(metrics: IconMetrics, bounds: DesktopBounds, icons: Vec<DesktopIcon>) -> Self {
        let mut layout = Self {
            icons: Vec::new(),
            selection: SelectionState::default(),
            drag: None,
            rename: None,
            bounds,
            metrics,
            next_shortcut_seq: 1,
        };
        layout.replace_icons(icons);
        layout
    }

    pub fn icons(&self) -> &[DesktopIcon] {
        &self.icons
    }

    pub fn icon(&self, icon_id: &str) -> Option<&DesktopIcon> {
        self.icons.iter().find(|icon| icon.id == icon_id)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn drag(&self) -> Option<&IconDragSession> {
        self.drag.as_ref()
    }

    pub fn rename(&self) -> Option<&RenameSession> {
        self.rename.as_ref()
    }

    pub fn bounds(&self) -> DesktopBounds {
        self.bounds
    }

    pub fn metrics(&self) -> IconMetrics {
        self.metrics
    }

    /// Replaces the whole icon set, as done when hydrating from storage.
    pub fn replace_icons(&mut self, icons: Vec<DesktopIcon>) {
        self.icons = icons;
        self.drag = None;
        self.rename = None;
        self.clamp_all();
        let icons = &self.icons;
        self.selection
            .retain(|id| icons.iter().any(|icon| icon.id == id));
        self.next_shortcut_seq = 1;
        let ids: Vec<String> = self.icons.iter().map(|icon| icon.id.clone()).collect();
        self.reserve_shortcut_ids(ids.iter().map(String::as_str));
    }

    /// Keeps future shortcut ids clear of `ids`, such as those still held by the recycle bin.
    pub fn reserve_shortcut_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        if let Some(max) = ids.into_iter().filter_map(shortcut_seq).max() {
            self.next_shortcut_seq = self.next_shortcut_seq.max(max.saturating_add(1));
        }
    }

    /// Updates the desktop size and pulls every icon back inside it.
    pub fn set_bounds(&mut self, bounds: DesktopBounds) -> bool {
        self.bounds = bounds;
        self.clamp_all()
    }

    /// Topmost icon whose box contains `point`.
    pub fn hit_test(&self, point: PointerPosition) -> Option<&str> {
        self.icons
            .iter()
            .rev()
            .find(|icon| icon_rect(icon, self.metrics).contains(point))
            .map(|icon| icon.id.as_str())
    }

    pub fn icons_in_rect(&self, rect: WindowRect) -> Vec<String> {
        icons_overlapping(&self.icons, rect, self.metrics)
    }

    pub fn begin_box_selection(&mut self, anchor: PointerPosition, additive: bool) -> bool {
        if self.drag.is_some() {
            debug!("box selection ignored during icon drag");
            return false;
        }
        self.selection.begin_box(anchor, additive);
        true
    }

    pub fn update_box_selection(&mut self, pointer: PointerPosition) -> bool {
        let metrics = self.metrics;
        let icons = &self.icons;
        self.selection
            .update_box(pointer, |rect| icons_overlapping(icons, rect, metrics))
    }

    pub fn end_box_selection(&mut self) -> bool {
        self.selection.finish_box()
    }

    /// Click on empty desktop space. Clears the selection unless a box selection just ended.
    pub fn click_desktop(&mut self) -> bool {
        if self.selection.consume_click_token() {
            return false;
        }
        if self.selection.is_empty() {
            return false;
        }
        self.selection.clear();
        true
    }

    /// Plain click selects only `icon_id`; additive click toggles it.
    pub fn click_icon(&mut self, icon_id: &str, additive: bool) -> bool {
        if self.selection.consume_click_token() {
            return false;
        }
        if self.icon(icon_id).is_none() {
            debug!(%icon_id, "click ignored for unknown icon");
            return false;
        }
        if additive {
            self.selection.toggle(icon_id);
        } else {
            self.selection.select_only(icon_id);
        }
        true
    }

    pub fn select_all(&mut self) {
        let icons = &self.icons;
        self.selection
            .select_all(icons.iter().map(|icon| icon.id.as_str()));
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.selection.clear();
        true
    }

    /// Starts dragging the selection. An unselected icon first becomes the only selection.
    pub fn begin_drag(&mut self, icon_id: &str, pointer: PointerPosition) -> bool {
        if self.drag.is_some() || self.selection.is_selecting() {
            debug!(%icon_id, "icon drag ignored while another gesture is in progress");
            return false;
        }
        if self.icon(icon_id).is_none() {
            return false;
        }
        if !self.selection.contains(icon_id) {
            self.selection.select_only(icon_id);
        }
        let origins = self
            .icons
            .iter()
            .filter(|icon| self.selection.contains(&icon.id))
            .map(|icon| (icon.id.clone(), icon.position()))
            .collect();
        self.drag = Some(IconDragSession {
            primary_id: icon_id.to_string(),
            pointer_start: pointer,
            origins,
        });
        true
    }

    /// Moves every dragged icon by the primary icon's grid-snapped delta.
    pub fn update_drag(&mut self, pointer: PointerPosition) -> bool {
        let Some(session) = self.drag.as_ref() else {
            return false;
        };
        let Some(primary_origin) = session
            .origins
            .iter()
            .find(|(id, _)| *id == session.primary_id)
            .map(|(_, origin)| *origin)
        else {
            return false;
        };

        let raw_x = primary_origin.x + pointer.x - session.pointer_start.x;
        let raw_y = primary_origin.y + pointer.y - session.pointer_start.y;
        let dx = snap_to_grid(raw_x, self.metrics) - primary_origin.x;
        let dy = snap_to_grid(raw_y, self.metrics) - primary_origin.y;

        for (id, origin) in &session.origins {
            let Some(icon) = self.icons.iter_mut().find(|icon| icon.id == *id) else {
                continue;
            };
            let next = clamp_icon_position(
                PointerPosition::new(origin.x + dx, origin.y + dy),
                self.bounds,
                self.metrics,
            );
            icon.x = next.x;
            icon.y = next.y;
        }
        true
    }

    /// Ends the drag. Returns `true` when any icon ended up somewhere new.
    pub fn end_drag(&mut self) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        session.origins.iter().any(|(id, origin)| {
            self.icon(id)
                .is_some_and(|icon| icon.position() != *origin)
        })
    }

    /// Enters name-editing mode for an icon, committing any rename already in progress.
    pub fn begin_rename(&mut self, icon_id: &str) -> bool {
        if self.icon(icon_id).is_none() {
            debug!(%icon_id, "rename ignored for unknown icon");
            return false;
        }
        self.commit_rename();
        let Some(icon) = self.icon(icon_id) else {
            return false;
        };
        self.rename = Some(RenameSession {
            icon_id: icon.id.clone(),
            original_name: icon.name.clone(),
            draft: icon.name.clone(),
        });
        true
    }

    pub fn update_rename_draft(&mut self, draft: impl Into<String>) -> bool {
        match self.rename.as_mut() {
            Some(session) => {
                session.draft = draft.into();
                true
            }
            None => false,
        }
    }

    /// Applies the trimmed draft. Blank drafts are dropped and the prior name stays.
    pub fn commit_rename(&mut self) -> bool {
        let Some(session) = self.rename.take() else {
            return false;
        };
        let name = session.draft.trim();
        if name.is_empty() {
            debug!(icon_id = %session.icon_id, "blank rename rejected");
            return false;
        }
        match self.icons.iter_mut().find(|icon| icon.id == session.icon_id) {
            Some(icon) if icon.name != name => {
                icon.name = name.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn cancel_rename(&mut self) -> bool {
        self.rename.take().is_some()
    }

    /// Removes icons from the desktop and hands them back for the recycle bin.
    ///
    /// # Errors
    ///
    /// Returns [`ProtectedIconError`] and removes nothing if any of `icon_ids` is a system icon.
    pub fn remove_icons(
        &mut self,
        icon_ids: &[String],
    ) -> Result<Vec<DesktopIcon>, ProtectedIconError> {
        if let Some(protected) = self
            .icons
            .iter()
            .find(|icon| icon.is_system() && icon_ids.contains(&icon.id))
        {
            return Err(ProtectedIconError {
                icon_id: protected.id.clone(),
            });
        }

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.icons)
            .into_iter()
            .partition(|icon| icon_ids.contains(&icon.id));
        self.icons = kept;
        if removed.is_empty() {
            return Ok(removed);
        }

        let icons = &self.icons;
        self.selection
            .retain(|id| icons.iter().any(|icon| icon.id == id));
        if self
            .rename
            .as_ref()
            .is_some_and(|session| icon_ids.contains(&session.icon_id))
        {
            self.rename = None;
        }
        if self.drag.as_ref().is_some_and(|session| {
            session.origins.iter().any(|(id, _)| icon_ids.contains(id))
        }) {
            self.drag = None;
        }
        Ok(removed)
    }

    /// Puts an icon back on the desktop, re-identifying it if its id is taken.
    pub fn insert_icon(&mut self, mut icon: DesktopIcon) -> String {
        if self.icon(&icon.id).is_some() {
            icon.id = self.unique_id(&icon.id);
        }
        let position = clamp_icon_position(icon.position(), self.bounds, self.metrics);
        icon.x = position.x;
        icon.y = position.y;
        let icon_id = icon.id.clone();
        self.icons.push(icon);
        icon_id
    }

    /// Creates a shortcut icon in the first free grid cell. Blank names create nothing.
    pub fn create_shortcut(&mut self, req: CreateShortcutRequest) -> Option<String> {
        let name = req.name.trim();
        if name.is_empty() {
            debug!("shortcut with blank name ignored");
            return None;
        }
        let content = req
            .content
            .as_deref()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .unwrap_or(DEFAULT_SHORTCUT_CONTENT)
            .to_string();
        let image = match req.image.trim() {
            "" => DEFAULT_SHORTCUT_IMAGE.to_string(),
            image => image.to_string(),
        };

        let icon_id = self.next_shortcut_id();
        let position = self.first_free_cell();
        self.icons.push(DesktopIcon {
            id: icon_id.clone(),
            name: name.to_string(),
            image,
            kind: IconKind::Shortcut,
            x: position.x,
            y: position.y,
            payload: IconPayload {
                app_type: req.app_type,
                content: Some(content),
            },
        });
        Some(icon_id)
    }

    fn next_shortcut_id(&mut self) -> String {
        loop {
            let candidate = format!("{SHORTCUT_ID_PREFIX}{}", self.next_shortcut_seq);
            self.next_shortcut_seq = self.next_shortcut_seq.saturating_add(1);
            if self.icon(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn unique_id(&self, base: &str) -> String {
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| self.icon(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    /// First grid cell, scanning column by column, that no icon overlaps.
    fn first_free_cell(&self) -> PointerPosition {
        let IconMetrics {
            icon_size,
            grid_size,
            padding,
        } = self.metrics;
        let grid = grid_size.max(1);
        let max_x = self.bounds.width - icon_size - padding;
        let max_y = self.bounds.usable_height() - icon_size - padding;
        let columns = if max_x >= padding { (max_x - padding) / grid + 1 } else { 1 };
        let rows = if max_y >= padding { (max_y - padding) / grid + 1 } else { 1 };

        for column in 0..columns {
            for row in 0..rows {
                let cell = WindowRect::new(
                    padding + column * grid,
                    padding + row * grid,
                    icon_size,
                    icon_size,
                );
                let occupied = self
                    .icons
                    .iter()
                    .any(|icon| icon_rect(icon, self.metrics).intersects(cell));
                if !occupied {
                    return PointerPosition::new(cell.x, cell.y);
                }
            }
        }
        PointerPosition::new(padding, padding)
    }

    fn clamp_all(&mut self) -> bool {
        let mut changed = false;
        for icon in &mut self.icons {
            let clamped = clamp_icon_position(icon.position(), self.bounds, self.metrics);
            if clamped != icon.position() {
                icon.x = clamped.x;
                icon.y = clamped.y;
                changed = true;
            }
        }
        changed
    }
}

fn icons_overlapping(
    icons: &[DesktopIcon],
    rect: WindowRect,
    metrics: IconMetrics,
) -> Vec<String> {
    icons
        .iter()
        .filter(|icon| icon_rect(icon, metrics).intersects(rect))
        .map(|icon| icon.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{icons::default_desktop_icons, model::AppType};

    const BOUNDS: DesktopBounds = DesktopBounds::new(1000, 748, 48);

    fn icon(id: &str, kind: IconKind, x: i32, y: i32) -> DesktopIcon {
        DesktopIcon {
            id: id.to_string(),
            name: id.to_uppercase(),
            image: "/icon.svg".to_string(),
            kind,
            x,
            y,
            payload: IconPayload::default(),
        }
    }

    fn layout(icons: Vec<DesktopIcon>) -> IconLayout {
        IconLayout::new(IconMetrics::default(), BOUNDS, icons)
    }

    fn selected(layout: &IconLayout) -> BTreeSet<String> {
        layout.selection().selected().clone()
    }

    fn set(raw: &[&str]) -> BTreeSet<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn position(layout: &IconLayout, id: &str) -> (i32, i32) {
        let icon = layout.icon(id).expect("icon");
        (icon.x, icon.y)
    }

    #[test]
    fn grid_snap_is_idempotent_on_aligned_values() {
        let metrics = IconMetrics::default();
        for aligned in [20, 120, 220, 920] {
            assert_eq!(snap_to_grid(aligned, metrics), aligned);
        }
        assert_eq!(snap_to_grid(69, metrics), 20);
        assert_eq!(snap_to_grid(70, metrics), 120);
        assert_eq!(snap_to_grid(-30, metrics), 20);
        assert_eq!(snap_to_grid(-31, metrics), -80);
    }

    #[test]
    fn box_selection_picks_overlapping_icons() {
        let mut layout = layout(vec![
            icon("a", IconKind::App, 20, 20),
            icon("b", IconKind::App, 20, 120),
            icon("far", IconKind::App, 520, 520),
        ]);

        layout.begin_box_selection(PointerPosition::new(0, 0), false);
        layout.update_box_selection(PointerPosition::new(200, 200));
        layout.end_box_selection();

        assert_eq!(selected(&layout), set(&["a", "b"]));
    }

    #[test]
    fn click_after_box_selection_is_suppressed_once() {
        let mut layout = layout(vec![icon("a", IconKind::App, 20, 20)]);
        layout.begin_box_selection(PointerPosition::new(0, 0), false);
        layout.update_box_selection(PointerPosition::new(150, 150));
        layout.end_box_selection();

        assert!(!layout.click_desktop());
        assert_eq!(selected(&layout), set(&["a"]));

        assert!(layout.click_desktop());
        assert!(layout.selection().is_empty());
    }

    #[test]
    fn plain_and_modifier_clicks() {
        let mut layout = layout(vec![
            icon("a", IconKind::App, 20, 20),
            icon("b", IconKind::App, 20, 120),
        ]);
        layout.click_icon("a", false);
        layout.click_icon("b", true);
        assert_eq!(selected(&layout), set(&["a", "b"]));

        layout.click_icon("a", true);
        assert_eq!(selected(&layout), set(&["b"]));

        layout.click_icon("a", false);
        assert_eq!(selected(&layout), set(&["a"]));
        assert!(!layout.click_icon("ghost", false));
    }

    #[test]
    fn dragging_moves_whole_selection_by_snapped_delta() {
        let mut layout = layout(vec![
            icon("a", IconKind::App, 20, 20),
            icon("b", IconKind::App, 20, 120),
            icon("c", IconKind::App, 420, 20),
        ]);
        layout.click_icon("a", false);
        layout.click_icon("b", true);

        layout.begin_drag("a", PointerPosition::new(50, 50));
        layout.update_drag(PointerPosition::new(262, 81));
        assert!(layout.end_drag());

        assert_eq!(position(&layout, "a"), (220, 20));
        assert_eq!(position(&layout, "b"), (220, 120));
        assert_eq!(position(&layout, "c"), (420, 20));
    }

    #[test]
    fn dragging_unselected_icon_collapses_selection() {
        let mut layout = layout(vec![
            icon("a", IconKind::App, 20, 20),
            icon("b", IconKind::App, 20, 120),
        ]);
        layout.select_all();
        layout.click_icon("a", true);

        layout.begin_drag("a", PointerPosition::new(30, 30));
        assert_eq!(selected(&layout), set(&["a"]));
        layout.update_drag(PointerPosition::new(130, 30));
        layout.end_drag();

        assert_eq!(position(&layout, "a"), (120, 20));
        assert_eq!(position(&layout, "b"), (20, 120));
    }

    #[test]
    fn second_drag_start_is_ignored() {
        let mut layout = layout(vec![
            icon("a", IconKind::App, 20, 20),
            icon("b", IconKind::App, 20, 120),
        ]);
        assert!(layout.begin_drag("a", PointerPosition::new(0, 0)));
        assert!(!layout.begin_drag("b", PointerPosition::new(0, 0)));
        assert_eq!(layout.drag().expect("drag").primary_id, "a");
    }

    #[test]
    fn every_dragged_icon_stays_in_bounds_for_any_delta() {
        let metrics = IconMetrics::default();
        let max_x = BOUNDS.width - metrics.icon_size - metrics.padding;
        let max_y = BOUNDS.height - BOUNDS.taskbar_height - metrics.icon_size - metrics.padding;

        for (dx, dy) in [(-5000, -5000), (5000, 5000), (-37, 912), (733, -12), (0, 0)] {
            let mut layout = layout(vec![
                icon("a", IconKind::App, 20, 20),
                icon("b", IconKind::App, 320, 420),
                icon("c", IconKind::App, 820, 620),
            ]);
            layout.select_all();
            layout.begin_drag("b", PointerPosition::new(340, 440));
            layout.update_drag(PointerPosition::new(340 + dx, 440 + dy));
            layout.end_drag();

            for icon in layout.icons() {
                assert!((metrics.padding..=max_x).contains(&icon.x), "{dx},{dy}: {icon:?}");
                assert!((metrics.padding..=max_y).contains(&icon.y), "{dx},{dy}: {icon:?}");
            }
        }
    }

    #[test]
    fn rename_commits_trimmed_name_and_rejects_blank() {
        let mut layout = layout(vec![icon("a", IconKind::Shortcut, 20, 20)]);

        layout.begin_rename("a");
        layout.update_rename_draft("  Projects  ");
        assert!(layout.commit_rename());
        assert_eq!(layout.icon("a").unwrap().name, "Projects");

        layout.begin_rename("a");
        layout.update_rename_draft("   ");
        assert!(!layout.commit_rename());
        assert_eq!(layout.icon("a").unwrap().name, "Projects");
        assert!(layout.rename().is_none());
    }

    #[test]
    fn restarting_rename_on_the_same_icon_keeps_the_committed_draft() {
        let mut layout = layout(vec![icon("a", IconKind::Shortcut, 20, 20)]);

        layout.begin_rename("a");
        layout.update_rename_draft("Scratch");
        assert!(layout.begin_rename("a"));
        assert_eq!(layout.rename().unwrap().draft, "Scratch");
        assert_eq!(layout.rename().unwrap().original_name, "Scratch");

        layout.commit_rename();
        assert_eq!(layout.icon("a").unwrap().name, "Scratch");
    }

    #[test]
    fn cancel_rename_keeps_prior_name() {
        let mut layout = layout(vec![icon("a", IconKind::Shortcut, 20, 20)]);
        layout.begin_rename("a");
        layout.update_rename_draft("Other");
        assert!(layout.cancel_rename());
        assert_eq!(layout.icon("a").unwrap().name, "A");
        assert!(!layout.begin_rename("ghost"));
    }

    #[test]
    fn system_icons_block_removal() {
        let mut layout = layout(default_desktop_icons());
        let before = layout.clone();

        let err = layout
            .remove_icons(&["notepad".to_string(), "recycle-bin".to_string()])
            .unwrap_err();
        assert_eq!(err.icon_id, "recycle-bin");
        assert_eq!(layout, before);
    }

    #[test]
    fn removing_icons_prunes_selection_and_rename() {
        let mut layout = layout(vec![
            icon("a", IconKind::Shortcut, 20, 20),
            icon("b", IconKind::Shortcut, 20, 120),
        ]);
        layout.select_all();
        layout.begin_rename("a");

        let removed = layout.remove_icons(&["a".to_string()]).expect("remove");
        assert_eq!(removed.len(), 1);
        assert_eq!(selected(&layout), set(&["b"]));
        assert!(layout.rename().is_none());
    }

    #[test]
    fn shortcuts_get_unique_ids_and_free_cells() {
        let mut layout = layout(vec![icon("a", IconKind::App, 20, 20)]);
        let first = layout
            .create_shortcut(CreateShortcutRequest {
                name: " GitHub ".to_string(),
                image: "/icons8-github.svg".to_string(),
                content: None,
                app_type: None,
            })
            .expect("shortcut");
        let second = layout
            .create_shortcut(CreateShortcutRequest {
                name: "Calc".to_string(),
                image: String::new(),
                content: Some("Numbers".to_string()),
                app_type: Some(AppType::Calculator),
            })
            .expect("shortcut");

        assert_eq!(first, "shortcut-1");
        assert_eq!(second, "shortcut-2");
        let github = layout.icon(&first).unwrap();
        assert_eq!(github.name, "GitHub");
        assert_eq!((github.x, github.y), (20, 120));
        assert_eq!(github.payload.content.as_deref(), Some(DEFAULT_SHORTCUT_CONTENT));
        let calc = layout.icon(&second).unwrap();
        assert_eq!((calc.x, calc.y), (20, 220));
        assert_eq!(calc.image, DEFAULT_SHORTCUT_IMAGE);
        assert_eq!(calc.payload.app_type, Some(AppType::Calculator));

        assert_eq!(
            layout.create_shortcut(CreateShortcutRequest {
                name: "   ".to_string(),
                image: String::new(),
                content: None,
                app_type: None,
            }),
            None
        );
    }

    #[test]
    fn shortcut_sequence_resumes_after_hydration() {
        let layout_icons = vec![icon("shortcut-7", IconKind::Shortcut, 20, 20)];
        let mut layout = layout(layout_icons);
        let id = layout
            .create_shortcut(CreateShortcutRequest {
                name: "Next".to_string(),
                image: String::new(),
                content: None,
                app_type: None,
            })
            .expect("shortcut");
        assert_eq!(id, "shortcut-8");
    }

    #[test]
    fn reserved_ids_are_never_handed_out_again() {
        let mut layout = layout(vec![icon("shortcut-2", IconKind::Shortcut, 20, 20)]);
        layout.reserve_shortcut_ids(["shortcut-5", "notepad", "shortcut-x"]);
        layout.reserve_shortcut_ids(["shortcut-1"]);

        let id = layout
            .create_shortcut(CreateShortcutRequest {
                name: "Next".to_string(),
                image: String::new(),
                content: None,
                app_type: None,
            })
            .expect("shortcut");
        assert_eq!(id, "shortcut-6");
    }

    #[test]
    fn inserted_icon_with_taken_id_is_reidentified_and_clamped() {
        let mut layout = layout(vec![icon("a", IconKind::Shortcut, 20, 20)]);
        let id = layout.insert_icon(icon("a", IconKind::Shortcut, 5000, -10));
        assert_eq!(id, "a-2");
        assert_eq!(position(&layout, "a-2"), (900, 20));
    }

    #[test]
    fn shrinking_bounds_pulls_icons_inside() {
        let mut layout = layout(vec![icon("a", IconKind::App, 820, 620)]);
        assert!(layout.set_bounds(DesktopBounds::new(640, 480, 48)));
        assert_eq!(position(&layout, "a"), (540, 332));
    }

    #[test]
    fn hit_test_prefers_topmost_icon() {
        let layout = layout(vec![
            icon("under", IconKind::App, 20, 20),
            icon("over", IconKind::App, 60, 60),
        ]);
        assert_eq!(layout.hit_test(PointerPosition::new(70, 70)), Some("over"));
        assert_eq!(layout.hit_test(PointerPosition::new(25, 25)), Some("under"));
        assert_eq!(layout.hit_test(PointerPosition::new(500, 500)), None);
    }
}
