//! core::config::schema
//!
//! Workspace settings schema.
//!
//! # Validation
//!
//! Values are validated after parsing: the git program, when given, must be
//! non-empty.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::git::{Toolchain, DEFAULT_GIT};

/// Workspace-level flags that shape how repositories are configured.
///
/// # Example
///
/// ```toml
/// git = "/usr/local/bin/git"
/// mirror = false
/// reference = "/srv/mirror"
/// clone_bundle = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoSettings {
    /// Git program used for subprocess calls (default: "git")
    pub git: Option<String>,

    /// Repositories are bare mirrors with no worktree
    pub mirror: Option<bool>,

    /// Mirror directory holding `<project>.git` repositories whose objects
    /// may be borrowed via alternates
    pub reference: Option<PathBuf>,

    /// Whether clone bundles may seed new clones (default: true)
    pub clone_bundle: Option<bool>,
}

impl RepoSettings {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(git) = &self.git {
            if git.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "git program cannot be empty".into(),
                ));
            }
        }

        Ok(())
    }

    /// Git program name or path.
    pub fn git_program(&self) -> &str {
        self.git.as_deref().unwrap_or(DEFAULT_GIT)
    }

    /// Subprocess runner for the configured git program.
    pub fn toolchain(&self) -> Toolchain {
        Toolchain::new(self.git_program())
    }

    /// Check if repositories are bare mirrors.
    ///
    /// Defaults to `false` if not configured.
    pub fn is_mirror(&self) -> bool {
        self.mirror.unwrap_or(false)
    }

    /// Reference mirror directory, if configured and non-empty.
    pub fn reference(&self) -> Option<&Path> {
        self.reference
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Check if clone bundles are allowed.
    ///
    /// Defaults to `true` if not configured.
    pub fn clone_bundle(&self) -> bool {
        self.clone_bundle.unwrap_or(true)
    }
}
