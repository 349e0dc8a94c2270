//! Editor configuration.

use crate::annotation::{PaletteColor, Rgba};
use crate::tools::{PenWidth, ToolKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default file name of exported images.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "image.png";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Editor configuration.
///
/// Missing fields fall back to [`EditorConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Tool active when the editor opens.
    pub default_tool: ToolKind,
    /// Color active when the editor opens.
    pub default_color: PaletteColor,
    /// Pen width active when the editor opens.
    pub default_pen_width: PenWidth,
    /// Stroke width of outline circles, rectangles and triangles.
    pub outline_width: f64,
    /// Stroke width of lines.
    pub line_width: f64,
    /// Color of the selection halo.
    pub highlight_color: Rgba,
    /// Halo width under a selected outline shape.
    pub outline_highlight_width: f64,
    /// Halo width under a selected line.
    pub line_highlight_width: f64,
    /// Highlight outline width around a selected filled shape.
    pub filled_highlight_width: f64,
    /// Highlight outline width around selected text.
    pub text_highlight_width: f64,
    /// Font size of text annotations.
    pub text_size: f64,
    /// Extra distance around a shape that still counts as a click on it.
    pub hit_tolerance: f64,
    /// File name given to exported images.
    pub export_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_tool: ToolKind::RectFilled,
            default_color: PaletteColor::Black,
            default_pen_width: PenWidth::Small,
            outline_width: 5.0,
            line_width: 10.0,
            highlight_color: Rgba::orange(),
            outline_highlight_width: 10.0,
            line_highlight_width: 15.0,
            filled_highlight_width: 3.0,
            text_highlight_width: 1.0,
            text_size: 24.0,
            hit_tolerance: 2.0,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let widths = [
            ("outline_width", self.outline_width),
            ("line_width", self.line_width),
            ("outline_highlight_width", self.outline_highlight_width),
            ("line_highlight_width", self.line_highlight_width),
            ("filled_highlight_width", self.filled_highlight_width),
            ("text_highlight_width", self.text_highlight_width),
            ("text_size", self.text_size),
            ("hit_tolerance", self.hit_tolerance),
        ];
        for (field, value) in widths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a non-negative number, got {value}"),
                });
            }
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "export_file_name",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
