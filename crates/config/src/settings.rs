// Registry settings
// Loaded from ~/.config/bindparam/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when a binding declares an identifier or alias it already has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail the declaration (default)
    #[default]
    Reject,
    /// Last declaration wins
    Overwrite,
}

/// Options shared by every binding, exempt from per-binding snapshots
pub const DEFAULT_PERSISTENT_PARAMS: &[&str] = &["verbose", "copy_all_inputs", "help", "info", "version"];

/// Persistent options that are declared without restoring a binding first
pub const DEFAULT_GLOBAL_PARAMS: &[&str] = &["verbose", "copy_all_inputs"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    #[serde(rename = "registry.duplicatePolicy")]
    pub duplicate_policy: DuplicatePolicy,

    #[serde(rename = "registry.persistentParams")]
    pub persistent_params: Vec<String>,

    #[serde(rename = "registry.globalParams")]
    pub global_params: Vec<String>,

    /// Fail when restoring a binding that was never stored
    #[serde(rename = "registry.strictRestore")]
    pub strict_restore: bool,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            persistent_params: DEFAULT_PERSISTENT_PARAMS.iter().map(|s| s.to_string()).collect(),
            global_params: DEFAULT_GLOBAL_PARAMS.iter().map(|s| s.to_string()).collect(),
            strict_restore: false,
        }
    }
}

impl RegistrySettings {
    pub fn is_persistent(&self, identifier: &str) -> bool {
        self.persistent_params.iter().any(|p| p == identifier)
    }

    /// Global options skip the restore step of a declaration. A global option
    /// that is not also persistent is not global.
    pub fn is_global(&self, identifier: &str) -> bool {
        self.is_persistent(identifier) && self.global_params.iter().any(|p| p == identifier)
    }

    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bindparam");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Error parsing {}: {}", path.display(), e);
                    eprintln!("Using default settings");
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with // are comments.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Save current settings to the default location
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&Self::config_path())
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

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
