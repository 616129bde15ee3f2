//! Persistent configuration: the selected editor and the scan root.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::editor::Editor;

/// Persistent tool configuration, stored as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Editor preference.
    pub editor: EditorConfig,
    /// Project scanning knobs.
    pub scan: ScanConfig,
}

/// The stored editor selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Catalog id of the last-selected editor, e.g. `"vscode"` or `"vim"`.
    pub selected: Option<String>,
}

/// Where to look for projects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory listed inside each distribution; `~` expands to the
    /// distribution's home directory.
    pub root: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: "~".to_string(),
        }
    }
}

impl Config {
    /// Path of the config file.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("wsldev").join("config.toml"))
    }

    /// Load the configuration, or defaults when no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration, creating the parent directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Get a config value by dot-separated key path.
    pub fn get_value(&self, key: &str) -> Result<String> {
        match key {
            "editor.selected" => Ok(self.editor.selected.clone().unwrap_or_default()),
            "scan.root" => Ok(self.scan.root.clone()),
            _ => anyhow::bail!("Unknown config key: {key}"),
        }
    }

    /// Set a config value by dot-separated key path. An empty value clears
    /// the editor selection.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "editor.selected" => {
                if value.is_empty() {
                    self.editor.selected = None;
                } else {
                    if Editor::find(value).is_none() {
                        anyhow::bail!("Unknown editor id: {value}");
                    }
                    self.editor.selected = Some(value.to_string());
                }
            }
            "scan.root" => {
                if value.is_empty() {
                    anyhow::bail!("scan.root cannot be empty");
                }
                self.scan.root = value.to_string();
            }
            _ => anyhow::bail!("Unknown config key: {key}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.editor.selected, None);
        assert_eq!(config.scan.root, "~");
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("[editor]\nselected = \"vim\"\n").unwrap();
        assert_eq!(config.editor.selected.as_deref(), Some("vim"));
        assert_eq!(config.scan.root, "~");
    }

    #[test]
    fn test_set_and_get_values() {
        let mut config = Config::default();
        config.set_value("editor.selected", "vscode").unwrap();
        config.set_value("scan.root", "~/code").unwrap();
        assert_eq!(config.get_value("editor.selected").unwrap(), "vscode");
        assert_eq!(config.get_value("scan.root").unwrap(), "~/code");

        config.set_value("editor.selected", "").unwrap();
        assert_eq!(config.get_value("editor.selected").unwrap(), "");
    }

    #[test]
    fn test_rejects_unknown_keys_and_ids() {
        let mut config = Config::default();
        assert!(config.set_value("editor.command", "code .").is_err());
        assert!(config.get_value("editor.command").is_err());
        assert!(config.set_value("editor.selected", "emacs").is_err());
        assert!(config.set_value("scan.root", "").is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_value("editor.selected", "cursor").unwrap();
        config.set_value("scan.root", "/srv/projects").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.editor.selected.as_deref(), Some("cursor"));
        assert_eq!(loaded.scan.root, "/srv/projects");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.scan.root, "~");
    }
}
