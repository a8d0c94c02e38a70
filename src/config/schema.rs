use std::path::PathBuf;

use serde::Deserialize;

use crate::library::SortMode;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/photomap/config.toml` or `~/.config/photomap/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `PHOTOMAP__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub sort: SortSettings,
    pub map: MapSettings,
    pub preview: PreviewSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as photos (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Read GPS coordinates and capture time from EXIF when available.
    pub read_exif: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: ["jpg", "jpeg", "png", "bmp", "gif", "webp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            follow_links: true,
            include_hidden: true,
            max_depth: None,
            read_exif: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SortSettings {
    /// Sort order used when the application starts.
    pub default_mode: SortModeSetting,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortModeSetting {
    #[default]
    #[serde(alias = "time", alias = "by_time", alias = "date")]
    ByTime,
    #[serde(
        alias = "location",
        alias = "by_location",
        alias = "place",
        alias = "by-location-name"
    )]
    ByLocation,
}

impl From<SortModeSetting> for SortMode {
    fn from(setting: SortModeSetting) -> Self {
        match setting {
            SortModeSetting::ByTime => SortMode::ByTime,
            SortModeSetting::ByLocation => SortMode::ByLocation,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Whether marker feeds are pushed to the HTML map page at all.
    pub enabled: bool,
    /// Where the map page is written. Defaults to the user cache directory.
    pub output: Option<PathBuf>,
    /// Tile server URL template handed to the map page.
    pub tile_url: String,
    /// Minimum zoom level used when centering on a marker.
    pub focus_zoom: u8,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            output: None,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            focus_zoom: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Thumbnail target width in pixels.
    pub width: u32,
    /// Thumbnail target height in pixels.
    pub height: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            width: 520,
            height: 320,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long status messages stay visible (milliseconds).
    pub status_ms: u64,
    pub theme: ThemeSettings,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ photos on the map ~ ".to_string(),
            status_ms: 4000,
            theme: ThemeSettings::default(),
        }
    }
}

/// Colours applied once when the UI is built. Each value is `#rrggbb`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub background: String,
    pub text: String,
    pub muted: String,
    pub accent: String,
    pub highlight: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            background: "#12151c".to_string(),
            text: "#e9ecf2".to_string(),
            muted: "#7c8696".to_string(),
            accent: "#3ba9ff".to_string(),
            highlight: "#243245".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Log file. Defaults to the user state directory.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
