//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\tag-minder\config.toml
//! - macOS: ~/Library/Application Support/tag-minder/config.toml
//! - Linux: ~/.config/tag-minder/config.toml
//!
//! The config file is human-readable and editable. It names the ban list
//! and association resources and the default replace modes for tagging.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::tagger::AutoTagOptions;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the ban list and association stores live
    pub resources: ResourcePaths,

    /// Default replace modes for auto tagging
    pub tagging: AutoTagOptions,
}

/// Locations of the persisted tagging resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePaths {
    /// Line-oriented list of fragments stripped from file names
    pub ban_list: PathBuf,

    /// Artist → image associations (JSON)
    pub image_associations: PathBuf,

    /// Artist → (title, album) associations (JSON)
    pub album_associations: PathBuf,
}

impl ResourcePaths {
    /// Resource files with their default names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            ban_list: dir.join("banlist.txt"),
            image_associations: dir.join("images.json"),
            album_associations: dir.join("albums.json"),
        }
    }
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self::in_dir(&config_dir().unwrap_or_else(|| PathBuf::from(".")))
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tag-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if file doesn't exist or can't be parsed.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::warn!(target: "config", "Could not determine config directory, using defaults");
            Config::default()
        }
    }
}

/// Load configuration from `path`.
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!(target: "config", "No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!(target: "config", "Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!(target: "config", "Failed to parse config file {:?}: {}", path, e);
                tracing::warn!(target: "config", "Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!(target: "config", "Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Save configuration to `path`.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!(target: "config", "Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
