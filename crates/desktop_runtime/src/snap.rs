//! Pure geometry for window snap zones.

use serde::{Deserialize, Serialize};

use crate::model::{PointerPosition, WindowRect};

/// Desktop viewport size plus the taskbar strip reserved at its bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopBounds {
    pub width: i32,
    pub height: i32,
    pub taskbar_height: i32,
}

impl DesktopBounds {
    pub const fn new(width: i32, height: i32, taskbar_height: i32) -> Self {
        Self {
            width,
            height,
            taskbar_height,
        }
    }

    pub fn usable_height(self) -> i32 {
        (self.height - self.taskbar_height).max(0)
    }

    /// The desktop area windows may occupy.
    pub fn usable_rect(self) -> WindowRect {
        WindowRect::new(0, 0, self.width.max(0), self.usable_height())
    }
}

impl Default for DesktopBounds {
    fn default() -> Self {
        Self::new(1280, 800, 48)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapZone {
    None,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Maximize,
}

impl SnapZone {
    /// `Maximize` is a status transition, not a plain resize.
    pub fn is_maximize(self) -> bool {
        self == Self::Maximize
    }
}

/// Resolves which snap zone, if any, the pointer is hovering.
///
/// Corners take precedence over edges. The top edge on its own means maximize; the bottom edge
/// is the top of the taskbar strip. Pointers outside the desktop count as touching the nearest
/// edge.
pub fn resolve_snap_zone(
    pointer: PointerPosition,
    bounds: DesktopBounds,
    threshold: i32,
) -> SnapZone {
    let near_left = pointer.x <= threshold;
    let near_right = pointer.x >= bounds.width - threshold;
    let near_top = pointer.y <= threshold;
    let near_bottom = pointer.y >= bounds.usable_height() - threshold;

    match (near_left, near_right, near_top, near_bottom) {
        (true, _, true, _) => SnapZone::TopLeft,
        (_, true, true, _) => SnapZone::TopRight,
        (true, _, _, true) => SnapZone::BottomLeft,
        (_, true, _, true) => SnapZone::BottomRight,
        (_, _, true, _) => SnapZone::Maximize,
        (true, _, _, _) => SnapZone::Left,
        (_, true, _, _) => SnapZone::Right,
        _ => SnapZone::None,
    }
}

/// Maps a snap zone to its target rectangle inside the usable desktop area.
pub fn zone_to_rect(zone: SnapZone, bounds: DesktopBounds) -> Option<WindowRect> {
    let area = bounds.usable_rect();
    let half_w = area.w / 2;
    let half_h = area.h / 2;
    let rect = match zone {
        SnapZone::None => return None,
        SnapZone::Maximize => area,
        SnapZone::Left => WindowRect::new(0, 0, half_w, area.h),
        SnapZone::Right => WindowRect::new(half_w, 0, area.w - half_w, area.h),
        SnapZone::TopLeft => WindowRect::new(0, 0, half_w, half_h),
        SnapZone::TopRight => WindowRect::new(half_w, 0, area.w - half_w, half_h),
        SnapZone::BottomLeft => WindowRect::new(0, half_h, half_w, area.h - half_h),
        SnapZone::BottomRight => WindowRect::new(half_w, half_h, area.w - half_w, area.h - half_h),
    };
    Some(rect)
}
