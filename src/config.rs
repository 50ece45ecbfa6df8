//! Configuration management for Markdown PDF Forge
//!
//! Handles loading and managing application configuration.
//! Configuration is an optional JSON file in the user's configuration directory.

use crate::error::{ConfigError, ConfigResult, LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier, used as the configuration directory name
pub const APP_ID: &str = "markdown-pdf-forge";

/// Name of the configuration file inside the configuration directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Maximum input file size to load (in bytes) - 10MB
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Title used for the output filename when the document has no level-1 heading
pub const DEFAULT_TITLE: &str = "Markdown Document";

/// A4 page width in millimetres
pub const A4_WIDTH_MM: f32 = 210.0;

/// A4 page height in millimetres
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Uniform page margin in millimetres
pub const PAGE_MARGIN_MM: f32 = 20.0;

/// Points per millimetre
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Export configuration
    pub export: ExportConfig,

    /// UI configuration
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the config directory, or return defaults when no file exists
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_dir()?.join(CONFIG_FILE_NAME);
        Self::load_from(&path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            log::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory generated PDFs are written to (current directory when unset)
    pub output_dir: Option<PathBuf>,

    /// Title used when the document has no level-1 heading
    pub default_title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            default_title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme the session starts with
    pub theme: ThemePreference,
}

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Light preview styles
    #[default]
    Light,
    /// Dark preview styles
    Dark,
}

impl ThemePreference {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Parse a theme name as given on the command line
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            _ => None,
        }
    }
}

/// Fixed page geometry, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Applied on all four sides
    pub margin: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    /// A4 portrait with the standard margin
    pub fn a4() -> Self {
        Self {
            width: A4_WIDTH_MM,
            height: A4_HEIGHT_MM,
            margin: PAGE_MARGIN_MM,
        }
    }

    /// Horizontal space between the left and right margins
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Lowest y a block may start at before a page break is forced
    pub fn printable_bottom(&self) -> f32 {
        self.height - self.margin
    }

    /// Reject geometries that leave no room for content
    pub fn validate(&self) -> LayoutResult<()> {
        let values = [self.width, self.height, self.margin];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LayoutError::InvalidGeometry {
                reason: "dimensions must be finite".to_string(),
            });
        }
        if self.width <= 0.0 || self.height <= 0.0 || self.margin < 0.0 {
            return Err(LayoutError::InvalidGeometry {
                reason: format!(
                    "page {}x{} with margin {} is not a positive size",
                    self.width, self.height, self.margin
                ),
            });
        }
        if self.content_width() <= 0.0 || self.height - 2.0 * self.margin <= 0.0 {
            return Err(LayoutError::InvalidGeometry {
                reason: format!(
                    "margin {} leaves no printable area on a {}x{} page",
                    self.margin, self.width, self.height
                ),
            });
        }
        Ok(())
    }

    /// Page size in PDF points
    pub fn size_pt(&self) -> (f32, f32) {
        (self.width * PT_PER_MM, self.height * PT_PER_MM)
    }
}
