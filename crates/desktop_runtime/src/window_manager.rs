//! Window lifecycle, stacking, and pointer-driven move/resize/snap transitions.

use tracing::debug;

use crate::{
    config::DesktopConfig,
    model::{
        OpenWindowRequest, PointerPosition, ResizeEdge, TaskbarEntry, WindowId, WindowRecord,
        WindowRect, WindowStatus, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
    },
    snap::{resolve_snap_zone, zone_to_rect, DesktopBounds, SnapZone},
    z_order::ZOrderAuthority,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
    pub snap_zone: SnapZone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowInteraction {
    Moving(MoveSession),
    Resizing(ResizeSession),
}

impl WindowInteraction {
    fn window_id(&self) -> &WindowId {
        match self {
            Self::Moving(session) => &session.window_id,
            Self::Resizing(session) => &session.window_id,
        }
    }
}

/// Owns every tracked window. Windows are kept in open order; stacking is carried by
/// `z_order`, issued by the injected [`ZOrderAuthority`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowManager {
    windows: Vec<WindowRecord>,
    z_order: ZOrderAuthority,
    active: Option<WindowId>,
    bounds: DesktopBounds,
    config: DesktopConfig,
    interaction: Option<WindowInteraction>,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(
            DesktopConfig::default(),
            DesktopBounds::default(),
            ZOrderAuthority::default(),
        )
    }
}

impl WindowManager {
    pub fn new(config: DesktopConfig, bounds: DesktopBounds, z_order: ZOrderAuthority) -> Self {
        Self {
            windows: Vec::new(),
            z_order,
            active: None,
            bounds,
            config,
            interaction: None,
        }
    }

    /// Windows in the order they were opened.
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    /// Windows from back to front.
    pub fn windows_by_z(&self) -> Vec<&WindowRecord> {
        let mut ordered: Vec<&WindowRecord> = self.windows.iter().collect();
        ordered.sort_by_key(|w| w.z_order);
        ordered
    }

    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn active_window_id(&self) -> Option<&WindowId> {
        self.active.as_ref()
    }

    pub fn bounds(&self) -> DesktopBounds {
        self.bounds
    }

    pub fn interaction(&self) -> Option<&WindowInteraction> {
        self.interaction.as_ref()
    }

    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        self.windows
            .iter()
            .map(|w| TaskbarEntry {
                window_id: w.id.clone(),
                title: w.title.clone(),
                image_ref: w.image_ref.clone(),
                is_active: self.active.as_ref() == Some(&w.id),
                is_minimized: w.is_minimized(),
            })
            .collect()
    }

    /// Opens a window, or restores and focuses the existing window with the same id.
    pub fn open_window(&mut self, req: OpenWindowRequest) -> WindowId {
        if let Some(index) = self.index_of(&req.id) {
            self.focus_index(index);
            return req.id;
        }

        let slot = (self.windows.len() % self.config.cascade_slots.max(1)) as i32;
        let offset = self.config.cascade_origin + slot * self.config.cascade_step;
        let preset = self.config.window_preset(req.app_type);
        let geometry = req
            .rect
            .unwrap_or(WindowRect::new(offset, offset, preset.width, preset.height))
            .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);

        let title = req
            .title
            .or_else(|| req.app_type.map(|app| app.title().to_string()))
            .unwrap_or_else(|| req.id.to_string());
        let image_ref = req
            .image_ref
            .or_else(|| req.app_type.map(|app| app.image_ref().to_string()));

        let window_id = req.id;
        self.windows.push(WindowRecord {
            id: window_id.clone(),
            title,
            app_type: req.app_type,
            image_ref,
            content: req.content,
            geometry,
            prior_geometry: None,
            status: WindowStatus::Open,
            resume_status: WindowStatus::Open,
            z_order: self.z_order.next(),
            minimized_by_show_desktop: false,
        });
        self.active = Some(window_id.clone());
        window_id
    }

    /// Removes a window. Closing an unknown id is a no-op.
    pub fn close_window(&mut self, window_id: &WindowId) -> bool {
        let before = self.windows.len();
        self.windows.retain(|w| &w.id != window_id);
        if self.windows.len() == before {
            debug!(%window_id, "close ignored for unknown window");
            return false;
        }
        if self.active.as_ref() == Some(window_id) {
            self.active = None;
        }
        self.cancel_interaction_for(window_id);
        true
    }

    /// Raises and activates a window, bringing it back if minimized.
    pub fn focus_window(&mut self, window_id: &WindowId) -> bool {
        let Some(index) = self.index_of(window_id) else {
            debug!(%window_id, "focus ignored for unknown window");
            return false;
        };
        self.focus_index(index);
        true
    }

    /// Toggles between minimized and the status the window had before.
    ///
    /// Leaving the minimized state does not refocus the window.
    pub fn minimize_window(&mut self, window_id: &WindowId) -> bool {
        let Some(index) = self.index_of(window_id) else {
            debug!(%window_id, "minimize ignored for unknown window");
            return false;
        };
        let window = &mut self.windows[index];
        if window.is_minimized() {
            window.status = window.resume_status;
            window.minimized_by_show_desktop = false;
            return true;
        }

        window.resume_status = window.status;
        window.status = WindowStatus::Minimized;
        if self.active.as_ref() == Some(window_id) {
            self.active = None;
        }
        self.cancel_interaction_for(window_id);
        true
    }

    /// Toggles between maximized and open. Always raises and activates the window.
    pub fn maximize_window(&mut self, window_id: &WindowId) -> bool {
        let Some(index) = self.index_of(window_id) else {
            debug!(%window_id, "maximize ignored for unknown window");
            return false;
        };
        let usable = self.bounds.usable_rect();
        let window = &mut self.windows[index];
        let currently_maximized = match window.status {
            WindowStatus::Maximized => true,
            WindowStatus::Minimized => window.resume_status == WindowStatus::Maximized,
            WindowStatus::Open => false,
        };

        if currently_maximized {
            if let Some(prior) = window.prior_geometry.take() {
                window.geometry = prior;
            }
            window.status = WindowStatus::Open;
        } else {
            window.prior_geometry = Some(window.geometry);
            window.geometry = usable;
            window.status = WindowStatus::Maximized;
        }
        window.resume_status = WindowStatus::Open;
        self.cancel_interaction_for(window_id);
        self.focus_index(index);
        true
    }

    /// Commits final geometry from the host. Ignored unless the window is plainly open.
    pub fn drag_stop(&mut self, window_id: &WindowId, rect: WindowRect) -> bool {
        let Some(window) = self.windows.iter_mut().find(|w| &w.id == window_id) else {
            return false;
        };
        if window.status != WindowStatus::Open {
            debug!(%window_id, status = ?window.status, "drag stop ignored");
            return false;
        }
        window.geometry = rect.clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
        true
    }

    /// Minimizes every visible window, or brings back exactly the windows a previous call hid.
    pub fn show_desktop(&mut self) -> bool {
        if self.windows.iter().any(|w| w.minimized_by_show_desktop) {
            for window in self.windows.iter_mut().filter(|w| w.minimized_by_show_desktop) {
                window.status = window.resume_status;
                window.minimized_by_show_desktop = false;
            }
            return true;
        }

        let mut changed = false;
        for window in self.windows.iter_mut().filter(|w| !w.is_minimized()) {
            window.resume_status = window.status;
            window.status = WindowStatus::Minimized;
            window.minimized_by_show_desktop = true;
            changed = true;
        }
        if changed {
            self.active = None;
            self.interaction = None;
        }
        changed
    }

    /// Taskbar button behavior: restore a minimized window, minimize the active one, or focus.
    pub fn toggle_taskbar_window(&mut self, window_id: &WindowId) -> bool {
        let Some(window) = self.window(window_id) else {
            return false;
        };
        if !window.is_minimized() && self.active.as_ref() == Some(window_id) {
            self.minimize_window(window_id)
        } else {
            self.focus_window(window_id)
        }
    }

    /// Updates the desktop size; maximized windows follow the new usable area.
    pub fn set_bounds(&mut self, bounds: DesktopBounds) {
        self.bounds = bounds;
        let usable = bounds.usable_rect();
        for window in &mut self.windows {
            let maximized = window.is_maximized()
                || (window.is_minimized() && window.resume_status == WindowStatus::Maximized);
            if maximized {
                window.geometry = usable;
            }
        }
    }

    pub fn begin_move(&mut self, window_id: &WindowId, pointer: PointerPosition) -> bool {
        let Some(rect_start) = self.interactive_rect(window_id) else {
            return false;
        };
        self.focus_window(window_id);
        self.interaction = Some(WindowInteraction::Moving(MoveSession {
            window_id: window_id.clone(),
            pointer_start: pointer,
            rect_start,
            snap_zone: SnapZone::None,
        }));
        true
    }

    /// Moves the dragged window with the pointer and tracks the hovered snap zone.
    pub fn update_move(&mut self, pointer: PointerPosition) -> bool {
        let Some(WindowInteraction::Moving(session)) = self.interaction.as_mut() else {
            return false;
        };
        let Some(window) = self.windows.iter_mut().find(|w| w.id == session.window_id) else {
            self.interaction = None;
            return false;
        };
        let dx = pointer.x - session.pointer_start.x;
        let dy = pointer.y - session.pointer_start.y;
        window.geometry = session.rect_start.offset(dx, dy);
        session.snap_zone = resolve_snap_zone(pointer, self.bounds, self.config.snap_threshold);
        true
    }

    /// Translucent preview rectangle for the snap zone under the pointer, if any.
    pub fn drag_preview(&self) -> Option<WindowRect> {
        match self.interaction.as_ref() {
            Some(WindowInteraction::Moving(session)) => {
                zone_to_rect(session.snap_zone, self.bounds)
            }
            _ => None,
        }
    }

    /// Releases the dragged window, applying the active snap zone.
    pub fn end_move(&mut self) -> bool {
        let Some(WindowInteraction::Moving(session)) = self.interaction.take() else {
            return false;
        };
        let Some(index) = self.index_of(&session.window_id) else {
            return false;
        };

        if session.snap_zone.is_maximize() {
            self.windows[index].geometry = session.rect_start;
            return self.maximize_window(&session.window_id);
        }
        if let Some(target) = zone_to_rect(session.snap_zone, self.bounds) {
            self.windows[index].geometry = target;
        }
        true
    }

    pub fn begin_resize(
        &mut self,
        window_id: &WindowId,
        edge: ResizeEdge,
        pointer: PointerPosition,
    ) -> bool {
        let Some(rect_start) = self.interactive_rect(window_id) else {
            return false;
        };
        self.focus_window(window_id);
        self.interaction = Some(WindowInteraction::Resizing(ResizeSession {
            window_id: window_id.clone(),
            edge,
            pointer_start: pointer,
            rect_start,
        }));
        true
    }

    pub fn update_resize(&mut self, pointer: PointerPosition) -> bool {
        let Some(WindowInteraction::Resizing(session)) = self.interaction.as_ref() else {
            return false;
        };
        let start = session.rect_start;
        let mut dx = pointer.x - session.pointer_start.x;
        let mut dy = pointer.y - session.pointer_start.y;
        // Stop a west or north edge at the minimum size so the opposite edge stays put.
        if matches!(
            session.edge,
            ResizeEdge::West | ResizeEdge::NorthWest | ResizeEdge::SouthWest
        ) {
            dx = dx.min(start.w - MIN_WINDOW_WIDTH);
        }
        if matches!(
            session.edge,
            ResizeEdge::North | ResizeEdge::NorthWest | ResizeEdge::NorthEast
        ) {
            dy = dy.min(start.h - MIN_WINDOW_HEIGHT);
        }
        let next = resize_rect(start, session.edge, dx, dy)
            .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
        let window_id = session.window_id.clone();
        match self.windows.iter_mut().find(|w| w.id == window_id) {
            Some(window) => {
                window.geometry = next;
                true
            }
            None => {
                self.interaction = None;
                false
            }
        }
    }

    pub fn end_resize(&mut self) -> bool {
        matches!(
            self.interaction.take(),
            Some(WindowInteraction::Resizing(_))
        )
    }

    fn index_of(&self, window_id: &WindowId) -> Option<usize> {
        self.windows.iter().position(|w| &w.id == window_id)
    }

    /// Geometry at the start of a move/resize, or `None` when the gesture must be ignored.
    fn interactive_rect(&self, window_id: &WindowId) -> Option<WindowRect> {
        if self.interaction.is_some() {
            debug!(%window_id, "pointer gesture ignored while another is in progress");
            return None;
        }
        let window = self.window(window_id)?;
        if window.status != WindowStatus::Open {
            debug!(%window_id, status = ?window.status, "pointer gesture ignored");
            return None;
        }
        Some(window.geometry)
    }

    fn focus_index(&mut self, index: usize) {
        let is_top = self
            .windows
            .iter()
            .map(|w| w.z_order)
            .max()
            .is_some_and(|top| top == self.windows[index].z_order);
        let window = &mut self.windows[index];
        let already_focused_top = is_top
            && !window.is_minimized()
            && self.active.as_ref() == Some(&window.id);
        if already_focused_top {
            return;
        }

        if window.is_minimized() {
            window.status = window.resume_status;
        }
        window.minimized_by_show_desktop = false;
        window.z_order = self.z_order.next();
        self.active = Some(window.id.clone());
    }

    fn cancel_interaction_for(&mut self, window_id: &WindowId) {
        if self
            .interaction
            .as_ref()
            .is_some_and(|interaction| interaction.window_id() == window_id)
        {
            self.interaction = None;
        }
    }
}

/// Applies resize deltas for a given edge/corner drag.
pub fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}
