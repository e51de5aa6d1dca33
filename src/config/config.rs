use anyhow::{Context, Result};
use crossterm::event::KeyModifiers;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::data::data_view::DEFAULT_SORT_COLUMN;
use crate::utils::app_paths::AppPaths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Dataset endpoint; must return a JSON array of flat objects
    pub url: String,

    /// Request timeout in seconds; unset waits for the server indefinitely
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for icons
    pub use_glyphs: bool,

    /// Icons for different states (can be overridden)
    pub icons: IconConfig,

    pub thousands_separator: String,
    pub decimal_separator: String,

    /// Case-insensitive suffixes that mark a string value as an image reference
    pub image_suffixes: Vec<String>,

    /// Upper bound on a rendered column's width
    pub max_column_width: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub pin: String,
    pub image: String,
    pub sort_ascending: String,
    pub sort_descending: String,
    pub loading: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Column the sort cycle resets to
    pub default_sort_column: String,

    /// Modifier that turns a header click into a pin toggle: "ctrl", "alt" or "shift"
    pub pin_modifier: String,

    /// Sort the dataset by the default column as soon as it loads
    pub sort_on_load: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/data.json".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            icons: IconConfig::default(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            image_suffixes: vec![".png".to_string()],
            max_column_width: 40,
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            pin: "📌".to_string(),
            image: "🖼".to_string(),
            sort_ascending: "↑".to_string(),
            sort_descending: "↓".to_string(),
            loading: "⏳".to_string(),
            error: "❌".to_string(),
        }
    }
}

impl IconConfig {
    /// ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            pin: "[P]".to_string(),
            image: "[img]".to_string(),
            sort_ascending: "^".to_string(),
            sort_descending: "v".to_string(),
            loading: "...".to_string(),
            error: "[X]".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            default_sort_column: DEFAULT_SORT_COLUMN.to_string(),
            pin_modifier: "ctrl".to_string(),
            sort_on_load: false,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl BehaviorConfig {
    /// Key modifiers that count as a "modified" header click
    pub fn pin_modifiers(&self) -> KeyModifiers {
        match self.pin_modifier.to_lowercase().as_str() {
            "alt" | "option" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => KeyModifiers::CONTROL,
        }
    }
}

impl Config {
    /// Load config from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        if !config.display.use_glyphs {
            config.display.icons = IconConfig::simple();
        }

        Ok(config)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        AppPaths::config_file()
    }

    /// Default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# json-table configuration file
# Location: ~/.config/json-table/config.toml (Linux)
#           ~/Library/Application Support/json-table/config.toml (macOS)
#           %APPDATA%\json-table\config.toml (Windows)

[api]
# Endpoint returning a JSON array of flat objects
url = "http://localhost:8080/data.json"

# Request timeout in seconds. Unset by default: the one fetch waits for the server.
# timeout_secs = 30

[display]
# Set to false for ASCII-only icons
use_glyphs = true

# Number grouping, e.g. 1234567.5 -> 1,234,567.5
thousands_separator = ","
decimal_separator = "."

# String values ending in one of these (case-insensitive) are image references
image_suffixes = [".png"]

# Widest a column may render
max_column_width = 40

[display.icons]
pin = "📌"
image = "🖼"
sort_ascending = "↑"
sort_descending = "↓"
loading = "⏳"
error = "❌"

[behavior]
# Column the sort cycle falls back to after descending
default_sort_column = "state"

# Modifier held while clicking a header to pin it: "ctrl", "alt" or "shift"
pin_modifier = "ctrl"

# Sort by the default column as soon as the data arrives
sort_on_load = false
"#
        .to_string()
    }
}
