//! git::config
//!
//! A git config file: a read snapshot plus a list of pending edits.
//!
//! # Design
//!
//! Files are parsed by libgit2 (`git2::Config::open`) so quoting, escapes,
//! continuation lines and `[include]` directives follow git's own rules.
//! Reads are served from a snapshot of the parsed entries, included files
//! and all. Mutations update the snapshot and are also recorded as edits.
//!
//! [`GitConfig::save`] replays the edits through libgit2 against the file on
//! disk, which rewrites only the touched lines under git's lockfile. Comments,
//! blank lines, key spelling and `[include]` sections are left as they were,
//! and included values are never copied into the file.
//!
//! A key with no `=` (`[core] bare`) is git's implicit boolean and reads as
//! `"true"`. Unless it is set or unset, the line is saved back unchanged.
//!
//! # Keys
//!
//! Keys are `section[.subsection].name`. Section and variable names are
//! case-insensitive; the subsection is case-sensitive and may itself
//! contain dots (`remote.my.fork.url` has subsection `my.fork`).
//!
//! # Example
//!
//! ```
//! use reposcope::git::GitConfig;
//!
//! let mut config = GitConfig::new();
//! config.set("core.bare", "false").unwrap();
//! config.set("remote.origin.url", "https://example.com/app.git").unwrap();
//!
//! assert_eq!(config.get("CORE.Bare"), Some("false"));
//! assert_eq!(config.subsections("remote"), vec!["origin"]);
//! assert!(config.is_modified());
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from git config operations.
#[derive(Debug, Error)]
pub enum GitConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config file '{path}': {message}")]
    ReadError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {message}")]
    WriteError { path: PathBuf, message: String },

    #[error("invalid config key: {0}")]
    InvalidKey(String),
}

impl GitConfigError {
    fn write(path: &Path, message: impl ToString) -> Self {
        Self::WriteError {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}
/// A parsed `section[.subsection].name` key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Key<'a> {
    section: &'a str,
    subsection: Option<&'a str>,
    name: &'a str,
}

impl<'a> Key<'a> {
    fn parse(key: &'a str) -> Result<Self, GitConfigError> {
        let invalid = || GitConfigError::InvalidKey(key.to_string());

        let (section, rest) = key.split_once('.').ok_or_else(invalid)?;
        let (subsection, name) = match rest.rsplit_once('.') {
            Some((sub, name)) => (Some(sub), name),
            None => (None, rest),
        };

        let valid_ident = |s: &str| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        };
        if !valid_ident(section) || !valid_ident(name) {
            return Err(invalid());
        }
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        if subsection.is_some_and(|s| s.contains('\n')) {
            return Err(invalid());
        }

        Ok(Self {
            section,
            subsection,
            name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    subsection: Option<String>,
    entries: Vec<Entry>,
}

impl Section {
    fn matches(&self, key: &Key<'_>) -> bool {
        self.name.eq_ignore_ascii_case(key.section) && self.subsection.as_deref() == key.subsection
    }
}

/// A change to replay against the file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    /// Leave exactly one value. `replace_all` drops existing values first.
    Set {
        key: String,
        value: String,
        replace_all: bool,
    },
    Unset { key: String },
}

/// A git config file held in memory.
#[derive(Debug, Clone, Default)]
pub struct GitConfig {
    sections: Vec<Section>,
    edits: Vec<Edit>,
    /// File the snapshot was read from.
    source: Option<PathBuf>,
}

impl GitConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config file.
    ///
    /// # Errors
    ///
    /// - [`GitConfigError::NotFound`] if the file does not exist
    /// - [`GitConfigError::ReadError`] if it cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, GitConfigError> {
        if !path.exists() {
            return Err(GitConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let read_error = |e: git2::Error| GitConfigError::ReadError {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        };

        let raw = git2::Config::open(path).map_err(read_error)?;
        let mut entries = raw.entries(None).map_err(read_error)?;

        let mut config = Self::empty_at(path);
        while let Some(entry) = entries.next() {
            let entry = entry.map_err(read_error)?;
            let Some(name) = entry.name() else {
                continue;
            };
            let value = if entry.has_value() {
                match entry.value() {
                    Some(value) => value,
                    None => continue,
                }
            } else {
                "true"
            };
            let key = Key::parse(name)?;
            config.push_entry(&key, value);
        }

        Ok(config)
    }

    /// Load a config file, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns [`GitConfigError::ReadError`] if the file exists but cannot
    /// be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, GitConfigError> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(GitConfigError::NotFound { .. }) => Ok(Self::empty_at(path)),
            Err(e) => Err(e),
        }
    }

    fn empty_at(path: &Path) -> Self {
        Self {
            source: Some(path.to_path_buf()),
            ..Self::default()
        }
    }

    /// Write pending edits to `path`.
    ///
    /// If this config was loaded from `path`, the edits are applied to the
    /// file in place and lines they don't touch are kept byte for byte.
    /// Otherwise `path` is replaced by a file holding only the values set
    /// on this config. Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns [`GitConfigError::WriteError`] if the file cannot be written
    /// or libgit2 refuses an edit.
    pub fn save(&self, path: &Path) -> Result<(), GitConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| GitConfigError::write(path, e))?;
        }

        if self.source.as_deref() == Some(path) {
            if !path.exists() {
                fs::File::create(path).map_err(|e| GitConfigError::write(path, e))?;
            }
            return self.apply_edits(path);
        }

        let mut staged = OsString::from(path.as_os_str());
        staged.push(".new");
        let staged = PathBuf::from(staged);

        fs::write(&staged, "").map_err(|e| GitConfigError::write(&staged, e))?;
        let result = self
            .apply_edits(&staged)
            .and_then(|()| fs::rename(&staged, path).map_err(|e| GitConfigError::write(path, e)));
        if result.is_err() {
            let _ = fs::remove_file(&staged);
        }
        result
    }

    fn apply_edits(&self, path: &Path) -> Result<(), GitConfigError> {
        let write_error = |e: git2::Error| GitConfigError::write(path, e.message());
        let mut raw = git2::Config::open(path).map_err(write_error)?;

        for edit in &self.edits {
            match edit {
                Edit::Set {
                    key,
                    value,
                    replace_all,
                } => {
                    if *replace_all {
                        remove_all(&mut raw, key).map_err(write_error)?;
                    }
                    raw.set_str(key, value).map_err(write_error)?;
                }
                Edit::Unset { key } => remove_all(&mut raw, key).map_err(write_error)?,
            }
        }
        Ok(())
    }

    /// Check whether any value changed since this config was loaded.
    pub fn is_modified(&self) -> bool {
        !self.edits.is_empty()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get the last value set for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = Key::parse(key).ok()?;
        self.values(&key).last()
    }

    /// Get every value set for `key`, in file order.
    pub fn get_all(&self, key: &str) -> Vec<String> {
        match Key::parse(key) {
            Ok(key) => self.values(&key).map(String::from).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Check if `key` has at least one value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Distinct subsection names of `section`, in file order.
    ///
    /// ```
    /// use reposcope::git::GitConfig;
    ///
    /// let mut config = GitConfig::new();
    /// config.set("remote.origin.url", "a").unwrap();
    /// config.set("remote.backup.url", "b").unwrap();
    /// assert_eq!(config.subsections("remote"), vec!["origin", "backup"]);
    /// ```
    pub fn subsections(&self, section: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for s in &self.sections {
            if !s.name.eq_ignore_ascii_case(section) {
                continue;
            }
            if let Some(sub) = &s.subsection {
                if !names.contains(sub) {
                    names.push(sub.clone());
                }
            }
        }
        names
    }

    /// Check if there are no entries at all.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.entries.is_empty())
    }

    fn values<'s>(&'s self, key: &Key<'_>) -> impl Iterator<Item = &'s str> + 's {
        let section = key.section.to_ascii_lowercase();
        let subsection = key.subsection.map(String::from);
        let name = key.name.to_ascii_lowercase();
        self.sections
            .iter()
            .filter(move |s| {
                s.name.eq_ignore_ascii_case(&section) && s.subsection == subsection
            })
            .flat_map(|s| s.entries.iter())
            .filter(move |e| e.name.eq_ignore_ascii_case(&name))
            .map(|e| e.value.as_str())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Set `key` to a single value.
    ///
    /// Setting the value `key` already has, and only that, records nothing.
    /// Otherwise the first existing value is replaced, any others are
    /// dropped, and the change is recorded for [`save`](Self::save).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), GitConfigError> {
        let parsed = Key::parse(key)?;

        let existing = self.values(&parsed).count();
        if existing == 1 && self.values(&parsed).all(|v| v == value) {
            return Ok(());
        }

        let mut replaced = false;
        for section in self.sections.iter_mut().filter(|s| s.matches(&parsed)) {
            section.entries.retain_mut(|e| {
                if !e.name.eq_ignore_ascii_case(parsed.name) {
                    return true;
                }
                if replaced {
                    return false;
                }
                e.value = value.to_string();
                replaced = true;
                true
            });
        }
        if !replaced {
            self.push_entry(&parsed, value);
        }

        self.edits.push(Edit::Set {
            key: key.to_string(),
            value: value.to_string(),
            replace_all: existing > 1,
        });
        Ok(())
    }

    /// Remove every value of `key`.
    ///
    /// Returns `true` if anything was removed. Sections left empty are
    /// dropped.
    pub fn unset(&mut self, key: &str) -> bool {
        let Ok(parsed) = Key::parse(key) else {
            return false;
        };

        let mut removed = false;
        for section in self.sections.iter_mut().filter(|s| s.matches(&parsed)) {
            let before = section.entries.len();
            section
                .entries
                .retain(|e| !e.name.eq_ignore_ascii_case(parsed.name));
            removed |= section.entries.len() != before;
        }

        if removed {
            self.sections.retain(|s| !s.entries.is_empty());
            self.edits.push(Edit::Unset {
                key: key.to_string(),
            });
        }
        removed
    }

    fn push_entry(&mut self, key: &Key<'_>, value: &str) {
        let entry = Entry {
            name: key.name.to_string(),
            value: value.to_string(),
        };

        match self.sections.iter_mut().rev().find(|s| s.matches(key)) {
            Some(section) => section.entries.push(entry),
            None => self.sections.push(Section {
                name: key.section.to_string(),
                subsection: key.subsection.map(String::from),
                entries: vec![entry],
            }),
        }
    }
}

/// Remove every value of `key` from the file itself. Absent keys are fine.
fn remove_all(raw: &mut git2::Config, key: &str) -> Result<(), git2::Error> {
    match raw.remove_multivar(key, ".*") {
        Err(e) if e.code() != git2::ErrorCode::NotFound => Err(e),
        _ => Ok(()),
    }
}
