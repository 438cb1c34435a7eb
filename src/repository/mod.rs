//! repository
//!
//! A project's repository inside the workspace.
//!
//! # Overview
//!
//! [`Repository`] binds a manifest [`Project`] to its on-disk layout and the
//! workspace [`RepoSettings`]. Everything else is a read/write accessor or a
//! query against that bound state:
//!
//! - Layout: [`Repository::repo_dir`], [`Repository::common_dir`], [`Repository::exists`]
//! - Config: [`Repository::config`], [`Repository::set_remote`] (see `config.rs`)
//! - Object sharing: [`Repository::set_alternates`],
//!   [`Repository::objects_repository`] (see `objects.rs`)
//! - History: [`Repository::head`], [`Repository::revision_is_valid`],
//!   [`Repository::revlist`] (see `history.rs`)
//!
//! # Failure Tiers
//!
//! Each operation belongs to exactly one tier:
//!
//! 1. **Degrade silently** - returns `Option`/`bool`; absence is the answer
//!    (`head`, `revision_is_valid`, `last_modified`, `has_alternates`)
//! 2. **Log and continue** - failure goes to `tracing` and the caller gets
//!    a degraded result (`set_alternates`, `raw`)
//! 3. **Fail hard** - returns `Result<_, RepoError>` (`revlist`, `config`,
//!    `save_config`, `set_remote`)
//!
//! # Concurrency
//!
//! A `Repository` is single-threaded: the lazily opened engine handle lives
//! in a [`OnceCell`], so the type is `!Sync`. Nothing here serializes
//! concurrent writers to the same directory; the last writer wins.

mod config;
mod history;
mod objects;

use std::cell::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::core::config::RepoSettings;
use crate::core::naming::{self, REFS_HEADS, REFS_TAGS};
use crate::core::paths::{is_git_dir, RepoPaths};
use crate::core::project::Project;
use crate::core::remote::RemoteMap;
use crate::git::{Git, GitConfigError, ToolchainError};

/// Errors from operations that cannot degrade gracefully.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The repository config could not be loaded or saved.
    #[error("repository config: {0}")]
    Config(#[from] GitConfigError),

    /// The external toolchain failed.
    #[error("history query: {0}")]
    History(#[from] ToolchainError),
}

/// A project's repository.
#[derive(Debug)]
pub struct Repository {
    /// The manifest entry this repository belongs to
    pub project: Project,

    /// Where the repository's metadata lives
    pub paths: RepoPaths,

    /// Workspace default revision, kept for projects pinned to a fixed point
    pub manifest_default_revision: String,

    /// Whether this repository has no worktree
    pub is_bare: bool,

    /// URL of the project's remote
    pub remote_url: Option<String>,

    /// Known remotes, when loaded
    pub remotes: Option<RemoteMap>,

    /// Reference repository to borrow objects from at clone time
    pub reference: Option<PathBuf>,

    /// Workspace settings shared by every repository
    pub settings: Arc<RepoSettings>,

    /// Embedded engine handle, opened on first use; `Some(None)` after a
    /// failed open
    raw: OnceCell<Option<Git>>,
}

impl Repository {
    /// Bind a project to its layout.
    ///
    /// Mirror workspaces produce bare repositories. With a reference mirror
    /// configured, `reference` starts as `<mirror>/<project name>.git`.
    pub fn new(project: Project, paths: RepoPaths, settings: Arc<RepoSettings>) -> Self {
        let reference = settings
            .reference()
            .map(|mirror| mirror.join(format!("{}.git", project.name)));
        Self {
            is_bare: settings.is_mirror(),
            project,
            paths,
            manifest_default_revision: String::new(),
            remote_url: None,
            remotes: None,
            reference,
            settings,
            raw: OnceCell::new(),
        }
    }

    /// Set the remote URL.
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    /// Set the reference repository.
    pub fn with_reference(mut self, reference: impl Into<PathBuf>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Set the workspace default revision.
    pub fn with_manifest_default_revision(mut self, revision: impl Into<String>) -> Self {
        self.manifest_default_revision = revision.into();
        self
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Directory holding this checkout's metadata.
    ///
    /// See [`RepoPaths::repo_dir`].
    pub fn repo_dir(&self) -> PathBuf {
        self.paths.repo_dir()
    }

    /// Directory holding refs, objects and config.
    ///
    /// See [`RepoPaths::common_dir`].
    pub fn common_dir(&self) -> PathBuf {
        self.paths.common_dir()
    }

    /// Check that `git_dir` is a valid metadata directory.
    pub fn exists(&self) -> bool {
        self.paths.exists()
    }

    /// Path of the cache for transport probe results.
    pub fn ssh_info_cache_file(&self) -> PathBuf {
        self.paths.ssh_info_cache_file()
    }

    // =========================================================================
    // Derived accessors
    // =========================================================================

    /// Shell-style prompt for this project.
    ///
    /// Empty for the workspace root, `"<path>> "` otherwise.
    pub fn prompt(&self) -> String {
        if self.project.is_root() {
            String::new()
        } else {
            format!("{}> ", self.project.path)
        }
    }

    /// Branch this project tracks by default.
    ///
    /// Candidates in priority order: project revision, dest-branch,
    /// upstream, workspace default revision. The first one that is set and
    /// names a movable branch wins.
    pub fn default_tracking_branch(&self) -> Option<&str> {
        [
            self.project.revision.as_str(),
            self.project.dest_branch.as_str(),
            self.project.upstream.as_str(),
            self.manifest_default_revision.as_str(),
        ]
        .into_iter()
        .find(|rev| !rev.is_empty() && !self.is_immutable(rev))
    }

    /// Check whether `revision` names a fixed point.
    ///
    /// Full object ids and `refs/tags/*` are always fixed. A short name is
    /// fixed when this repository has it as a tag but not as a branch.
    pub fn is_immutable(&self, revision: &str) -> bool {
        naming::is_immutable(revision) || self.is_local_tag(revision)
    }

    fn is_local_tag(&self, name: &str) -> bool {
        if name.starts_with("refs/") || !is_git_dir(&self.common_dir()) {
            return false;
        }
        self.raw().is_some_and(|git| {
            git.ref_exists(&format!("{}{}", REFS_TAGS, name))
                && !git.ref_exists(&format!("{}{}", REFS_HEADS, name))
        })
    }
}
