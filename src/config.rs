// ── Window configuration ──────────────────────────────────────────────────────
//
// What a caller asks for when creating a window.  Loadable from JSON so the
// demo (and tests) can describe windows declaratively.  No `unsafe`.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SashError};
use crate::input::CursorMode;

/// Creation parameters for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title bar text.
    pub title: String,
    /// Client-area width in pixels.
    pub width: u32,
    /// Client-area height in pixels.
    pub height: u32,
    /// Whether the frame has a sizing border and maximise box.
    pub resizable: bool,
    /// Show the window immediately after creation.
    pub visible: bool,
    /// Cursor mode applied once the window exists.
    pub cursor_mode: CursorMode,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "sash".to_owned(),
            width: 640,
            height: 480,
            resizable: true,
            visible: true,
            cursor_mode: CursorMode::Normal,
        }
    }
}

impl WindowConfig {
    /// Parse and validate a JSON object; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject sizes the OS cannot represent.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SashError::InvalidConfig(format!(
                "client size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(SashError::InvalidConfig(format!(
                "client size {}x{} is too large",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = WindowConfig::from_json(r#"{"title":"demo"}"#).expect("parse");
        assert_eq!(config.title, "demo");
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert!(config.resizable);
        assert_eq!(config.cursor_mode, CursorMode::Normal);
    }

    #[test]
    fn cursor_mode_is_lowercase() {
        let config = WindowConfig::from_json(r#"{"cursor_mode":"captured"}"#).expect("parse");
        assert_eq!(config.cursor_mode, CursorMode::Captured);

        let json = serde_json::to_string(&config).expect("serialize");
        assert!(json.contains(r#""cursor_mode":"captured""#));
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = WindowConfig::from_json(r#"{"width":0}"#).unwrap_err();
        assert!(matches!(err, SashError::InvalidConfig(_)));
    }

    #[test]
    fn oversized_is_rejected() {
        let config = WindowConfig {
            width: u32::MAX,
            ..WindowConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = WindowConfig::from_json("{").unwrap_err();
        assert!(matches!(err, SashError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = WindowConfig::load(Path::new("/nonexistent/sash/window.json")).unwrap_err();
        assert!(matches!(err, SashError::Io(_)));
    }
}
