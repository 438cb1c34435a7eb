//! core::config
//!
//! Workspace settings loading.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$REPOSCOPE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/reposcope/config.toml`
//! 3. `~/.reposcope/config.toml` (canonical write location)
//!
//! Missing files are not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use reposcope::core::config::Settings;
//!
//! let result = Settings::load().unwrap();
//! println!("git program: {}", result.settings.git_program());
//! ```

pub mod schema;

pub use schema::RepoSettings;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "REPOSCOPE_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Result of loading settings.
#[derive(Debug)]
pub struct SettingsLoadResult {
    /// The loaded settings.
    pub settings: RepoSettings,
    /// The file they came from, if any.
    pub loaded_from: Option<PathBuf>,
}

/// Settings file discovery and persistence.
pub struct Settings;

impl Settings {
    /// Load settings from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read,
    /// parsed, or validated.
    pub fn load() -> Result<SettingsLoadResult, ConfigError> {
        // 1. Check $REPOSCOPE_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/reposcope/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("reposcope/config.toml");
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // 3. Check ~/.reposcope/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".reposcope/config.toml");
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(SettingsLoadResult {
            settings: RepoSettings::default(),
            loaded_from: None,
        })
    }

    /// Load and validate settings from a specific file.
    pub fn load_from(path: &Path) -> Result<SettingsLoadResult, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings: RepoSettings =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        settings.validate()?;

        Ok(SettingsLoadResult {
            settings,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// Get the canonical settings path, `~/.reposcope/config.toml`.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".reposcope/config.toml"))
    }

    /// Write settings to `path` atomically.
    ///
    /// Creates parent directories if needed. Uses atomic write
    /// (write to temp file, then rename) to prevent corruption.
    pub fn write_to(path: &Path, settings: &RepoSettings) -> Result<(), ConfigError> {
        settings.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents = toml::to_string_pretty(settings)
            .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        drop(file);

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            git = "/usr/bin/git"
            clone_bundle = false
            "#,
        )
        .unwrap();

        let result = Settings::load_from(&path).unwrap();
        assert_eq!(result.settings.git_program(), "/usr/bin/git");
        assert!(!result.settings.clone_bundle());
        assert_eq!(result.loaded_from.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn load_from_env() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "mirror = true\n").unwrap();

        std::env::set_var(CONFIG_ENV, &path);
        let result = Settings::load().unwrap();
        std::env::remove_var(CONFIG_ENV);

        assert!(result.settings.is_mirror());
    }

    #[test]
    fn parse_error_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "mirror = [").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "git = \"\"\n").unwrap();

        assert!(matches!(
            Settings::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn write_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");
        let settings = RepoSettings {
            reference: Some(PathBuf::from("/srv/mirror")),
            clone_bundle: Some(false),
            ..Default::default()
        };

        Settings::write_to(&path, &settings).unwrap();
        assert!(!temp.path().join("nested/config.toml.tmp").exists());

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.settings, settings);
    }
}
