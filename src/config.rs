//! Configuration file loading for vtframe.
//!
//! Settings are read from `~/.vtframe/config.toml`; every field has a
//! default, so a missing or unparsable file falls back silently.
//!
//! ```toml
//! [frame]
//! title = "VT100 Colors"
//! header_fg = 30
//! header_bg = 42
//! top_margin = 1
//! bottom_margin = 1
//! border = false
//! status = "Here is a status line"
//!
//! [counter]
//! limit = 100
//! tick_ms = 50
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Static frame settings
    pub frame: FrameSection,
    /// Counting demo settings
    pub counter: CounterSection,
}

/// Frame settings: title bar, margins, status line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSection {
    /// Title bar text; the demos supply their own when unset
    pub title: Option<String>,
    /// Title bar foreground SGR code
    pub header_fg: u8,
    /// Title bar background SGR code
    pub header_bg: u8,
    /// Rows reserved above the scroll region
    pub top_margin: u16,
    /// Rows reserved below the scroll region
    pub bottom_margin: u16,
    /// Draw horizontal borders along the margin bands
    pub border: bool,
    /// Status line text for the last row
    pub status: Option<String>,
}

impl Default for FrameSection {
    fn default() -> Self {
        Self {
            title: None,
            // Black on green, as the original demos
            header_fg: 30,
            header_bg: 42,
            top_margin: 1,
            bottom_margin: 1,
            border: false,
            status: None,
        }
    }
}

/// Counting demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterSection {
    /// Count from 0 up to (excluding) this limit
    pub limit: u32,
    /// Delay between counts, milliseconds
    pub tick_ms: u64,
}

impl Default for CounterSection {
    fn default() -> Self {
        Self {
            limit: 100,
            tick_ms: 50,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(config) = toml::from_str(&content) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".vtframe").join("config.toml"))
    }
}

// Get home directory
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.frame.header_fg, 30);
        assert_eq!(config.frame.header_bg, 42);
        assert_eq!(config.frame.top_margin, 1);
        assert_eq!(config.frame.bottom_margin, 1);
        assert!(!config.frame.border);
        assert_eq!(config.counter.limit, 100);
        assert_eq!(config.counter.tick_ms, 50);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [frame]
            title = "Custom"
            top_margin = 2

            [counter]
            limit = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.frame.title.as_deref(), Some("Custom"));
        assert_eq!(config.frame.top_margin, 2);
        assert_eq!(config.frame.bottom_margin, 1);
        assert_eq!(config.counter.limit, 10);
        assert_eq!(config.counter.tick_ms, 50);
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.frame.header_fg, Config::default().frame.header_fg);
    }
}
