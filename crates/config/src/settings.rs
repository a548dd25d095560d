// Application settings
// Loaded from ~/.config/booklist/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Minimum severity written to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Logging
    #[serde(rename = "log.level")]
    pub log_level: LogLevel,

    #[serde(rename = "log.file")]
    pub log_file: Option<PathBuf>,  // None = no log file

    // Table
    /// Name, author and pages of a freshly added row.
    #[serde(rename = "table.newRow")]
    pub new_row: [String; 3],

    // History
    #[serde(rename = "history.limit")]
    pub history_limit: Option<usize>,  // None = unlimited
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_file: None,
            new_row: ["New book".to_string(), "Author".to_string(), "1".to_string()],
            history_limit: None,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("booklist");
        config_dir.join("settings.json")
    }

    /// Load settings from the user config directory, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Error loading settings.json: {}", e);
                eprintln!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from a specific file. Lines starting with `//` are comments.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// History limit as the undo stack expects it (0 = unlimited)
    pub fn effective_history_limit(&self) -> usize {
        self.history_limit.unwrap_or(0)
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Logging: "off", "error", "warn", "info", "debug", "trace"
    "log.level": "info",
    // Append-only log file (null = none)
    "log.file": null,

    // Content of a newly added row: name, author, pages
    "table.newRow": ["New book", "Author", "1"],

    // Maximum undo steps kept (null = unlimited)
    "history.limit": null
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            eprintln!("Error writing default settings.json: {}", e);
        }
    }
}
