use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppType {
    Calculator,
    Notepad,
    FileExplorer,
    Settings,
    RecycleBin,
    Clock,
    Weather,
}

impl AppType {
    pub const ALL: [AppType; 7] = [
        Self::Calculator,
        Self::Notepad,
        Self::FileExplorer,
        Self::Settings,
        Self::RecycleBin,
        Self::Clock,
        Self::Weather,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Calculator => "Calculator",
            Self::Notepad => "Notepad",
            Self::FileExplorer => "File Explorer",
            Self::Settings => "Settings",
            Self::RecycleBin => "Recycle Bin",
            Self::Clock => "Clock",
            Self::Weather => "Weather",
        }
    }

    /// Stable key used for window ids and configuration tables.
    pub fn key(self) -> &'static str {
        match self {
            Self::Calculator => "calculator",
            Self::Notepad => "notepad",
            Self::FileExplorer => "file-explorer",
            Self::Settings => "settings",
            Self::RecycleBin => "recycle-bin",
            Self::Clock => "clock",
            Self::Weather => "weather",
        }
    }

    pub fn image_ref(self) -> &'static str {
        match self {
            Self::Calculator => "/calculator-icon.svg",
            Self::Notepad => "/notepad-icon.svg",
            Self::FileExplorer => "/file-explorer-icon.svg",
            Self::Settings => "/settings-icon.svg",
            Self::RecycleBin => "/recycle-bin-icon.svg",
            Self::Clock => "/clock-icon.svg",
            Self::Weather => "/weather-icon.svg",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|app| app.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    pub fn right(self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(self) -> i32 {
        self.y + self.h
    }

    /// Strict overlap test; rectangles that only share an edge do not intersect.
    pub fn intersects(self, other: WindowRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(self, point: PointerPosition) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Normalized rectangle spanning two arbitrary corner points.
    pub fn from_corners(a: PointerPosition, b: PointerPosition) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            w: (a.x - b.x).abs(),
            h: (a.y - b.y).abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowStatus {
    Open,
    Minimized,
    Maximized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub app_type: Option<AppType>,
    pub image_ref: Option<String>,
    /// Launch payload handed to the embedded application view.
    pub content: Value,
    pub geometry: WindowRect,
    /// Geometry to return to when leaving [`WindowStatus::Maximized`].
    pub prior_geometry: Option<WindowRect>,
    pub status: WindowStatus,
    /// Status an un-minimize returns to. Only meaningful while minimized.
    pub resume_status: WindowStatus,
    pub z_order: u64,
    pub minimized_by_show_desktop: bool,
}

impl WindowRecord {
    pub fn is_minimized(&self) -> bool {
        self.status == WindowStatus::Minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.status == WindowStatus::Maximized
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub id: WindowId,
    pub title: Option<String>,
    pub app_type: Option<AppType>,
    pub image_ref: Option<String>,
    pub content: Value,
    pub rect: Option<WindowRect>,
}

impl OpenWindowRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: WindowId::new(id),
            title: None,
            app_type: None,
            image_ref: None,
            content: Value::Null,
            rect: None,
        }
    }

    /// Request for an application window keyed by the app type.
    pub fn for_app(app_type: AppType) -> Self {
        Self {
            app_type: Some(app_type),
            ..Self::new(app_type.key())
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_app_type(mut self, app_type: AppType) -> Self {
        self.app_type = Some(app_type);
        self
    }

    pub fn with_content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconKind {
    System,
    App,
    Shortcut,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IconPayload {
    #[serde(default)]
    pub app_type: Option<AppType>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopIcon {
    pub id: String,
    pub name: String,
    pub image: String,
    pub kind: IconKind,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub payload: IconPayload,
}

impl DesktopIcon {
    pub fn is_system(&self) -> bool {
        self.kind == IconKind::System
    }

    pub fn position(&self) -> PointerPosition {
        PointerPosition::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecycleBinItem {
    #[serde(flatten)]
    pub icon: DesktopIcon,
    pub deleted_at: u64,
    pub original_location: String,
}

impl RecycleBinItem {
    pub fn id(&self) -> &str {
        &self.icon.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShortcutRequest {
    pub name: String,
    pub image: String,
    pub content: Option<String>,
    pub app_type: Option<AppType>,
}

/// Taskbar button derived from the window list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub window_id: WindowId,
    pub title: String,
    pub image_ref: Option<String>,
    pub is_active: bool,
    pub is_minimized: bool,
}
