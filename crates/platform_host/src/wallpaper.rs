//! Wallpaper configuration model and built-in preset catalog.

use serde::{Deserialize, Serialize};

/// Preset used when nothing has been persisted yet.
pub const DEFAULT_WALLPAPER_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a built-in wallpaper paints the desktop background.
pub enum WallpaperFill {
    /// Bitmap image served by the host.
    Image(&'static str),
    /// Solid CSS color.
    Color(&'static str),
    /// CSS gradient expression.
    Gradient(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Built-in wallpaper entry.
pub struct WallpaperPreset {
    /// Stable preset identifier stored in [`WallpaperSelection::Preset`].
    pub id: &'static str,
    /// User-facing label.
    pub name: &'static str,
    /// Background fill.
    pub fill: WallpaperFill,
}

const WALLPAPER_PRESETS: [WallpaperPreset; 6] = [
    WallpaperPreset {
        id: DEFAULT_WALLPAPER_ID,
        name: "Windows 11 Default",
        fill: WallpaperFill::Image("/Windows-11-bg.webp"),
    },
    WallpaperPreset {
        id: "solid-blue",
        name: "Solid Blue",
        fill: WallpaperFill::Color("#0078d4"),
    },
    WallpaperPreset {
        id: "solid-dark",
        name: "Dark Theme",
        fill: WallpaperFill::Color("#1e1e1e"),
    },
    WallpaperPreset {
        id: "gradient-blue",
        name: "Blue Gradient",
        fill: WallpaperFill::Gradient("linear-gradient(135deg, #667eea 0%, #764ba2 100%)"),
    },
    WallpaperPreset {
        id: "gradient-sunset",
        name: "Sunset Gradient",
        fill: WallpaperFill::Gradient("linear-gradient(135deg, #ff9a9e 0%, #fecfef 100%)"),
    },
    WallpaperPreset {
        id: "gradient-ocean",
        name: "Ocean Gradient",
        fill: WallpaperFill::Gradient("linear-gradient(135deg, #a8edea 0%, #fed6e3 100%)"),
    },
];

/// Returns every built-in wallpaper in display order.
pub fn wallpaper_presets() -> &'static [WallpaperPreset] {
    &WALLPAPER_PRESETS
}

/// Looks up a built-in wallpaper by id.
pub fn wallpaper_preset(id: &str) -> Option<&'static WallpaperPreset> {
    wallpaper_presets().iter().find(|preset| preset.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// Identifies either a built-in preset or a user-provided image.
pub enum WallpaperSelection {
    /// Built-in preset from [`wallpaper_presets`].
    Preset {
        /// Stable preset identifier.
        preset_id: String,
    },
    /// User-provided image, either a URL or a data URL.
    CustomImage {
        /// Image source handed to the renderer.
        source: String,
    },
}

impl Default for WallpaperSelection {
    fn default() -> Self {
        Self::Preset {
            preset_id: DEFAULT_WALLPAPER_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
/// Persisted wallpaper configuration.
pub struct WallpaperConfig {
    /// Active wallpaper.
    pub selection: WallpaperSelection,
}

impl WallpaperConfig {
    /// Builds a configuration for a built-in preset.
    pub fn preset(preset_id: impl Into<String>) -> Self {
        Self {
            selection: WallpaperSelection::Preset {
                preset_id: preset_id.into(),
            },
        }
    }

    /// Builds a configuration for a custom image source.
    pub fn custom_image(source: impl Into<String>) -> Self {
        Self {
            selection: WallpaperSelection::CustomImage {
                source: source.into(),
            },
        }
    }

    /// Returns `true` when the selection names a known preset or a non-blank custom source.
    pub fn is_valid(&self) -> bool {
        match &self.selection {
            WallpaperSelection::Preset { preset_id } => wallpaper_preset(preset_id).is_some(),
            WallpaperSelection::CustomImage { source } => !source.trim().is_empty(),
        }
    }

    /// Returns this configuration if valid, otherwise the default preset.
    pub fn canonicalized(self) -> Self {
        if self.is_valid() {
            self
        } else {
            Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_selection_points_at_a_known_preset() {
        let config = WallpaperConfig::default();
        assert!(config.is_valid());
        assert_eq!(config, WallpaperConfig::preset(DEFAULT_WALLPAPER_ID));
    }

    #[test]
    fn unknown_preset_and_blank_custom_source_canonicalize_to_default() {
        assert_eq!(
            WallpaperConfig::preset("missing").canonicalized(),
            WallpaperConfig::default()
        );
        assert_eq!(
            WallpaperConfig::custom_image("   ").canonicalized(),
            WallpaperConfig::default()
        );
        let custom = WallpaperConfig::custom_image("https://example.test/bg.png");
        assert_eq!(custom.clone().canonicalized(), custom);
    }

    #[test]
    fn selection_serializes_with_kind_tag() {
        let raw = serde_json::to_string(&WallpaperConfig::preset("solid-dark")).expect("encode");
        assert_eq!(
            raw,
            r#"{"selection":{"kind":"preset","preset_id":"solid-dark"}}"#
        );
    }
}
