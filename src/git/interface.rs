//! git::interface
//!
//! Embedded history engine built on git2.
//!
//! This module is the only place that talks to libgit2 for history reads.
//! It covers the single-revision capabilities the repository layer needs:
//!
//! - Open a repository by path (bare or not, no discovery)
//! - Resolve a revision expression to an object id
//! - Read a commit's committer timestamp
//! - Tell whether HEAD is unborn
//!
//! Range listings are not done here; see [`crate::git::Toolchain`].
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Path is not a git directory
//! - [`GitError::RevisionNotFound`]: Revision does not resolve
//! - [`GitError::ObjectNotFound`]: Object id is not in the store
//! - [`GitError::InvalidSpec`]: Revision expression is malformed
//!
//! # Example
//!
//! ```ignore
//! use reposcope::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("/ws/.repo/projects/app.git"))?;
//! let oid = git.resolve("main~2")?;
//! println!("main~2 is {}", oid);
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::core::types::{Oid, TypeError};

/// Errors from the embedded history engine.
#[derive(Debug, Error)]
pub enum GitError {
    /// Path is not a git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
    },

    /// Revision does not resolve to any object.
    #[error("revision not found: {revision}")]
    RevisionNotFound {
        /// The revision expression
        revision: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Malformed revision expression or object id.
    #[error("invalid revision: {revision}")]
    InvalidSpec {
        /// The offending expression
        revision: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with the revision or oid that
    /// was being looked up.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RevisionNotFound {
                revision: context.to_string(),
            },
            git2::ErrorCode::InvalidSpec | git2::ErrorCode::Ambiguous => GitError::InvalidSpec {
                revision: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidSpec { revision: msg },
        }
    }
}

/// An open handle on the embedded history engine.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening
    // =========================================================================

    /// Open the repository whose metadata directory is `path`.
    ///
    /// No upward discovery is done: `path` must itself be a git directory
    /// (or a worktree whose `.git` resolves to one).
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if `path` is not a repository
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::open(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        Ok(Self { repo })
    }

    // =========================================================================
    // Revision Resolution
    // =========================================================================

    /// Resolve any revision expression to the id of the object it names.
    ///
    /// Accepts branch and tag names, full or abbreviated ids, and revparse
    /// syntax such as `main~2` or `v1.0^{commit}`.
    ///
    /// # Errors
    ///
    /// - [`GitError::RevisionNotFound`] if nothing matches
    /// - [`GitError::InvalidSpec`] if the expression is malformed or ambiguous
    pub fn resolve(&self, revision: &str) -> Result<Oid, GitError> {
        let object = self
            .repo
            .revparse_single(revision)
            .map_err(|e| GitError::from_git2(e, revision))?;

        Ok(Oid::new(object.id().to_string())?)
    }

    /// Resolve a revision and peel it to a commit.
    ///
    /// Annotated tags resolve to the commit they point at.
    pub fn resolve_commit(&self, revision: &str) -> Result<Oid, GitError> {
        let commit = self
            .repo
            .revparse_single(revision)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, revision))?;

        Ok(Oid::new(commit.id().to_string())?)
    }

    /// Check if a fully-qualified reference exists.
    pub fn ref_exists(&self, refname: &str) -> bool {
        self.repo.find_reference(refname).is_ok()
    }

    // =========================================================================
    // Head
    // =========================================================================

    /// Check if HEAD points at a branch with no commits yet.
    ///
    /// A HEAD that cannot be read at all also counts as unborn.
    pub fn is_head_unborn(&self) -> bool {
        self.repo.head().is_err()
    }

    // =========================================================================
    // Commit Operations
    // =========================================================================

    /// Committer timestamp of a commit, in the committer's own offset.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if the commit doesn't exist
    pub fn commit_time(&self, oid: &Oid) -> Result<DateTime<FixedOffset>, GitError> {
        let git_oid =
            git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        let commit = self
            .repo
            .find_commit(git_oid)
            .map_err(|_| GitError::ObjectNotFound {
                oid: oid.to_string(),
            })?;

        let when = commit.committer().when();
        to_datetime(when).ok_or_else(|| GitError::Internal {
            message: format!("commit {} has an out-of-range timestamp", oid),
        })
    }
}

/// Convert a git2 timestamp, keeping its recorded offset.
fn to_datetime(time: git2::Time) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    let utc = DateTime::from_timestamp(time.seconds(), 0)?;
    Some(utc.with_timezone(&offset))
}
