use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{DiaglabError, Result};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the authentication endpoints
    pub auth_url: String,

    /// Base URL of the diagram endpoints
    pub api_url: String,

    /// Directory where session state (token and user record) is kept
    pub state_dir: PathBuf,

    /// Default page size for list requests
    pub page_size: u32,

    /// Default editor command (for future extension)
    pub editor_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            auth_url: "https://auth.diaglab.dev/v1".to_string(),
            api_url: "https://api.diaglab.dev/v1".to_string(),
            state_dir: default_state_dir(),
            page_size: 10,
            editor_command: None,
        }
    }
}

/// Platform state directory for the session files, with a dotdir fallback
/// when the platform dirs cannot be resolved.
fn default_state_dir() -> PathBuf {
    ProjectDirs::from("dev", "diaglab", "diaglab")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".diaglab"))
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("dev", "diaglab", "diaglab")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from(".diaglab").join("config.json"))
    }

    /// Loads the configuration from `path`, writing the defaults there on
    /// first use so the file is discoverable.
    pub fn load_or_init(path: &Path) -> Result<Config> {
        if !path.exists() {
            debug!("No configuration at {}, writing defaults", path.display());
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let raw = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read configuration {}: {}", path.display(), e);
            DiaglabError::Io(e)
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            error!("Failed to parse configuration {}: {}", path.display(), e);
            DiaglabError::ConfigError {
                message: format!("invalid configuration file {}: {}", path.display(), e),
            }
        })
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create directory {}: {}", parent.display(), e);
                    DiaglabError::DirectoryError {
                        path: parent.to_path_buf(),
                    }
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(DiaglabError::Io)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Applies a `key=value` update from the command line.
    pub fn set(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            DiaglabError::ConfigError {
                message: format!("expected key=value, got '{assignment}'"),
            }
        })?;

        match key.trim() {
            "auth_url" => self.auth_url = value.trim().to_string(),
            "api_url" => self.api_url = value.trim().to_string(),
            "state_dir" => self.state_dir = PathBuf::from(value.trim()),
            "page_size" => {
                self.page_size = value.trim().parse().map_err(|_| {
                    DiaglabError::ConfigError {
                        message: format!("page_size must be a positive integer, got '{value}'"),
                    }
                })?;
            }
            "editor_command" => {
                let trimmed = value.trim();
                self.editor_command = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                };
            }
            other => {
                return Err(DiaglabError::ConfigError {
                    message: format!("unknown configuration key '{other}'"),
                });
            }
        }
        Ok(())
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        // First try the configured editor
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        // Then try environment variable
        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        // Fall back to platform defaults
        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -t".to_string()
        } else {
            // Try common Linux editors
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}
