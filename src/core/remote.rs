//! core::remote
//!
//! Named remotes attached to a repository.
//!
//! A [`RemoteMap`] is keyed by remote name, so names are unique. Ordering
//! carries no meaning; iteration is sorted by name to keep output stable.

use std::collections::BTreeMap;

use crate::git::GitConfig;

/// Fetch refspec that mirrors every branch of `name` into
/// `refs/remotes/<name>/`.
///
/// # Example
///
/// ```
/// use reposcope::core::remote::default_fetch_refspec;
///
/// assert_eq!(
///     default_fetch_refspec("origin"),
///     "+refs/heads/*:refs/remotes/origin/*"
/// );
/// ```
pub fn default_fetch_refspec(name: &str) -> String {
    format!("+refs/heads/*:refs/remotes/{}/*", name)
}

/// A single remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    /// Remote name (e.g. "origin")
    pub name: String,
    /// Fetch URL
    pub url: String,
    /// Fetch refspecs
    pub fetch: Vec<String>,
}

impl Remote {
    /// Create a remote tracking all branches with the default refspec.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let name = name.into();
        let fetch = vec![default_fetch_refspec(&name)];
        Self {
            name,
            url: url.into(),
            fetch,
        }
    }
}

/// Remotes by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMap {
    remotes: BTreeMap<String, Remote>,
}

impl RemoteMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every `remote.<name>.url` from a git config.
    ///
    /// Remotes without a URL are skipped.
    pub fn from_config(config: &GitConfig) -> Self {
        let mut map = Self::new();
        for name in config.subsections("remote") {
            let Some(url) = config.get(&format!("remote.{}.url", name)) else {
                continue;
            };
            map.insert(Remote {
                fetch: config.get_all(&format!("remote.{}.fetch", name)),
                url: url.to_string(),
                name,
            });
        }
        map
    }

    /// Insert a remote, replacing any remote with the same name.
    ///
    /// Returns the replaced remote.
    pub fn insert(&mut self, remote: Remote) -> Option<Remote> {
        self.remotes.insert(remote.name.clone(), remote)
    }

    /// Look up a remote by name.
    pub fn get(&self, name: &str) -> Option<&Remote> {
        self.remotes.get(name)
    }

    /// Remove a remote by name.
    pub fn remove(&mut self, name: &str) -> Option<Remote> {
        self.remotes.remove(name)
    }

    /// Remote names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.remotes.keys().map(String::as_str)
    }

    /// Remotes in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Remote> {
        self.remotes.values()
    }

    /// Number of remotes.
    pub fn len(&self) -> usize {
        self.remotes.len()
    }

    /// Check if there are no remotes.
    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }
}
