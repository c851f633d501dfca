//! Layout constants for the desktop, overridable from a TOML document.
//!
//! Every field has a default, so a host can ship a partial file:
//!
//! ```toml
//! taskbar_height = 56
//!
//! [window_presets.notepad]
//! width = 720
//! height = 480
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::AppType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPreset {
    pub width: i32,
    pub height: i32,
}

impl WindowPreset {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    /// Edge length of the square icon hit box.
    pub icon_size: i32,
    /// Grid cell edge used when snapping dragged icons.
    pub grid_size: i32,
    /// Distance kept between icons and the desktop edges.
    pub grid_padding: i32,
    /// Height of the taskbar strip reserved at the bottom of the desktop.
    pub taskbar_height: i32,
    /// Pointer distance from an edge that activates a snap zone.
    pub snap_threshold: i32,
    pub cascade_origin: i32,
    pub cascade_step: i32,
    /// Number of cascade positions before wrapping back to the origin.
    pub cascade_slots: usize,
    /// Size used for windows without an app type or preset.
    pub default_window: WindowPreset,
    /// Per-app overrides keyed by [`AppType::key`].
    pub window_presets: BTreeMap<String, WindowPreset>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            icon_size: 80,
            grid_size: 100,
            grid_padding: 20,
            taskbar_height: 48,
            snap_threshold: 20,
            cascade_origin: 100,
            cascade_step: 30,
            cascade_slots: 10,
            default_window: WindowPreset::new(600, 400),
            window_presets: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse desktop config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("desktop config field `{field}` is invalid: {reason}")]
    Invalid { field: String, reason: String },
}

fn builtin_preset(app_type: AppType) -> WindowPreset {
    match app_type {
        AppType::Calculator => WindowPreset::new(400, 500),
        AppType::Notepad => WindowPreset::new(600, 450),
        AppType::FileExplorer => WindowPreset::new(800, 550),
        AppType::Settings => WindowPreset::new(700, 500),
        AppType::RecycleBin => WindowPreset::new(700, 500),
        AppType::Clock => WindowPreset::new(360, 300),
        AppType::Weather => WindowPreset::new(380, 480),
    }
}

impl DesktopConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and [`ConfigError::Invalid`] when a
    /// dimension is not positive or a preset names an unknown app.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let dimensions = [
            ("icon_size", self.icon_size),
            ("grid_size", self.grid_size),
            ("taskbar_height", self.taskbar_height),
            ("default_window.width", self.default_window.width),
            ("default_window.height", self.default_window.height),
        ];
        for (field, value) in dimensions {
            if value <= 0 {
                return Err(invalid(field, format!("expected a positive value, found {value}")));
            }
        }
        for (field, value) in [
            ("grid_padding", self.grid_padding),
            ("snap_threshold", self.snap_threshold),
            ("cascade_step", self.cascade_step),
        ] {
            if value < 0 {
                return Err(invalid(field, format!("expected zero or more, found {value}")));
            }
        }
        if self.cascade_slots == 0 {
            return Err(invalid("cascade_slots", "expected at least one slot".to_string()));
        }
        for (key, preset) in &self.window_presets {
            if AppType::from_key(key).is_none() {
                return Err(invalid(
                    &format!("window_presets.{key}"),
                    "unknown app type".to_string(),
                ));
            }
            if preset.width <= 0 || preset.height <= 0 {
                return Err(invalid(
                    &format!("window_presets.{key}"),
                    format!("expected a positive size, found {}x{}", preset.width, preset.height),
                ));
            }
        }
        Ok(())
    }

    /// Default window size for an app type, honoring overrides.
    pub fn window_preset(&self, app_type: Option<AppType>) -> WindowPreset {
        let Some(app_type) = app_type else {
            return self.default_window;
        };
        self.window_presets
            .get(app_type.key())
            .copied()
            .unwrap_or_else(|| builtin_preset(app_type))
    }
}

fn invalid(field: &str, reason: String) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = DesktopConfig::from_toml_str("").expect("parse");
        assert_eq!(config, DesktopConfig::default());
        assert_eq!(
            config.window_preset(Some(AppType::Calculator)),
            WindowPreset::new(400, 500)
        );
        assert_eq!(config.window_preset(None), WindowPreset::new(600, 400));
    }

    #[test]
    fn partial_document_overrides_selected_fields() {
        let config = DesktopConfig::from_toml_str(
            r#"
            taskbar_height = 56

            [window_presets.notepad]
            width = 720
            height = 480
            "#,
        )
        .expect("parse");

        assert_eq!(config.taskbar_height, 56);
        assert_eq!(config.icon_size, 80);
        assert_eq!(
            config.window_preset(Some(AppType::Notepad)),
            WindowPreset::new(720, 480)
        );
        assert_eq!(
            config.window_preset(Some(AppType::Weather)),
            WindowPreset::new(380, 480)
        );
    }

    #[test]
    fn rejects_unknown_preset_keys_and_non_positive_sizes() {
        let err = DesktopConfig::from_toml_str(
            r#"
            [window_presets.minesweeper]
            width = 300
            height = 300
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { ref field, .. } if field == "window_presets.minesweeper"
        ));

        let err = DesktopConfig::from_toml_str("grid_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "grid_size"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = DesktopConfig::from_toml_str("icon_size = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
