//! repository::config
//!
//! Reading and writing the repository's git config.
//!
//! The config file lives at `<common_dir>/config`, so every worktree of a
//! repository shares one. A missing file reads as empty; a file that exists
//! but cannot be parsed is a hard error.

use tracing::{debug, error};

use super::{RepoError, Repository};
use crate::core::remote::{default_fetch_refspec, Remote, RemoteMap};
use crate::git::GitConfig;

impl Repository {
    /// Load the repository config.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Config`] if the file exists but cannot be read
    /// or parsed.
    pub fn config(&self) -> Result<GitConfig, RepoError> {
        let path = self.paths.config_path();
        GitConfig::load_or_default(&path).map_err(|e| {
            error!(path = %path.display(), error = %e, "cannot load repository config");
            RepoError::from(e)
        })
    }

    /// Save `config` as the repository config.
    ///
    /// A config loaded from this repository has its edits applied in
    /// place. Any other config replaces the file; `None` writes an empty
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Config`] if the file cannot be written.
    pub fn save_config(&self, config: Option<&GitConfig>) -> Result<(), RepoError> {
        let path = self.paths.config_path();
        let empty = GitConfig::new();
        config.unwrap_or(&empty).save(&path)?;
        debug!(path = %path.display(), "saved repository config");
        Ok(())
    }

    /// Configure the repository for a checkout and register a remote.
    ///
    /// A non-empty `url` becomes this repository's `remote_url`. For a
    /// non-bare repository, `core.bare` is removed and
    /// `core.logAllRefUpdates` is set. When both `name` and `url` are
    /// given, `remote.<name>.url` and `remote.<name>.fetch` are written.
    /// The file is only written when a value changes, and then only the
    /// changed lines are touched.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Config`] if the config cannot be loaded or
    /// saved.
    pub fn set_remote(&mut self, name: &str, url: &str) -> Result<(), RepoError> {
        if !url.is_empty() {
            self.remote_url = Some(url.to_string());
        }

        let mut config = self.config()?;

        if !self.is_bare {
            config.unset("core.bare");
            config.set("core.logAllRefUpdates", "true")?;
        }

        if !name.is_empty() && !url.is_empty() {
            config.set(&format!("remote.{}.url", name), url)?;
            config.set(
                &format!("remote.{}.fetch", name),
                &default_fetch_refspec(name),
            )?;
            if let Some(remotes) = self.remotes.as_mut() {
                remotes.insert(Remote::new(name, url));
            }
        }

        if !config.is_modified() {
            debug!(project = %self.project.name, "remote config unchanged");
            return Ok(());
        }
        self.save_config(Some(&config))
    }

    /// URL configured for remote `name`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Config`] if the config cannot be loaded.
    pub fn git_config_remote_url(&self, name: &str) -> Result<Option<String>, RepoError> {
        let config = self.config()?;
        Ok(config
            .get(&format!("remote.{}.url", name))
            .map(String::from))
    }

    /// Read every configured remote into `remotes`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Config`] if the config cannot be loaded.
    pub fn load_remotes(&mut self) -> Result<&RemoteMap, RepoError> {
        let config = self.config()?;
        Ok(self.remotes.insert(RemoteMap::from_config(&config)))
    }
}
