//! Configuration file handling.
//!
//! Settings live in `config.toml` under the platform config directory
//! (`~/.config/tasklist/config.toml` on Linux). Every field has a default, so
//! a missing file or a partial file is fine.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const APP_DIR: &str = "tasklist";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON store file. `~` is expanded.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    // Same fallback the data dir lookup has always had: the working directory.
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push("storage.json");
    path.to_string_lossy().to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_notice_duration_ms")]
    pub notice_duration_ms: u64,

    /// Ask before deleting a task or clearing the list.
    #[serde(default = "default_confirm_destructive")]
    pub confirm_destructive: bool,

    #[serde(default = "default_window_width")]
    pub window_width: f32,

    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

fn default_notice_duration_ms() -> u64 {
    1500
}

fn default_confirm_destructive() -> bool {
    true
}

fn default_window_width() -> f32 {
    520.0
}

fn default_window_height() -> f32 {
    640.0
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_duration_ms: default_notice_duration_ms(),
            confirm_destructive: default_confirm_destructive(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl UiConfig {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "tasklist=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load config from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load the config named on the command line, or the one at the default
    /// location. A path given explicitly has to exist.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(Error::Config(format!(
                "config file {} does not exist",
                path.display()
            ))),
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Store file path with `~` expanded.
    pub fn storage_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.storage.path);
        PathBuf::from(expanded.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.ui.notice_duration_ms, 1500);
        assert!(config.ui.confirm_destructive);
        assert_eq!(config.logging.level, "tasklist=info");
        assert!(config.storage.path.ends_with("storage.json"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [ui]
            confirm_destructive = false
            "#,
        )
        .unwrap();

        assert!(!config.ui.confirm_destructive);
        assert_eq!(config.ui.notice_duration(), Duration::from_millis(1500));
        assert_eq!(config.ui.window_width, 520.0);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[storage]\npath = \"/tmp/tasks.json\"\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/tasks.json"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.toml");

        match Config::resolve(Some(path.as_path())) {
            Err(Error::Config(msg)) => assert!(msg.contains("typo.toml")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_existing_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ui]\nnotice_duration_ms = 250\n").unwrap();

        let config = Config::resolve(Some(path.as_path())).unwrap();
        assert_eq!(config.ui.notice_duration_ms, 250);
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = Config::from_toml("[storage]\npath = \"~/tasks.json\"\n").unwrap();
        let path = config.storage_path();

        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("tasks.json"));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Config::from_toml("[ui\nbroken").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
