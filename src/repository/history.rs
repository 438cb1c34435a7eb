//! repository::history
//!
//! Revision queries: current branch, rebase state, revision lookup,
//! commit timestamps and range listings.
//!
//! Single-revision questions go to the embedded engine, opened lazily by
//! [`Repository::raw`]. Range listings go to the external toolchain.

use std::fs::File;
use std::io::{BufRead, BufReader};

use tracing::{debug, error};

use super::{RepoError, Repository};
use crate::git::{format_log_date, Git, RevisionLister, RevisionResolver};

/// Prefix of a symbolic `HEAD`.
const SYMREF_PREFIX: &str = "ref: ";

impl Repository {
    // =========================================================================
    // Engine handle
    // =========================================================================

    /// The embedded engine handle, opened on first use.
    ///
    /// Opens `common_dir` once. The outcome is kept for the lifetime of
    /// this `Repository`: a failed open is logged and every later call
    /// returns `None` until [`close_raw`](Self::close_raw) resets it.
    pub fn raw(&self) -> Option<&Git> {
        self.raw
            .get_or_init(|| {
                let dir = self.common_dir();
                match Git::open(&dir) {
                    Ok(git) => {
                        debug!(dir = %dir.display(), "opened repository");
                        Some(git)
                    }
                    Err(e) => {
                        error!(
                            project = %self.project.name,
                            dir = %dir.display(),
                            error = %e,
                            "cannot open repository"
                        );
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Drop the engine handle, or forget a failed open. The next
    /// [`raw`](Self::raw) opens again.
    pub fn close_raw(&mut self) {
        self.raw.take();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Branch `HEAD` points at, e.g. `refs/heads/main`.
    ///
    /// Reads the first line of `<repo_dir>/HEAD`. Returns `None` when the
    /// file is missing or unreadable, or when `HEAD` is detached.
    pub fn head(&self) -> Option<String> {
        let path = self.paths.head_path();
        if !path.is_file() {
            return None;
        }

        let file = File::open(&path).ok()?;
        let mut line = String::new();
        BufReader::new(file).read_line(&mut line).ok()?;

        line.trim_end_matches(['\n', '\r'])
            .strip_prefix(SYMREF_PREFIX)
            .filter(|target| !target.is_empty())
            .map(String::from)
    }

    /// Check for an interrupted rebase.
    ///
    /// True if any of `rebase-apply`, `rebase-merge` or `.dotest` exists
    /// under `repo_dir`.
    pub fn is_rebase_in_progress(&self) -> bool {
        self.paths.rebase_markers().iter().any(|marker| marker.exists())
    }

    /// Check that `revision` resolves to an object.
    ///
    /// False when the engine is unavailable.
    pub fn revision_is_valid(&self, revision: &str) -> bool {
        let Some(git) = self.raw() else {
            return false;
        };
        match git.resolve_revision(revision) {
            Ok(_) => true,
            Err(e) => {
                debug!(revision, error = %e, "revision does not resolve");
                false
            }
        }
    }

    /// Committer date of the commit `revision` points at, formatted like
    /// `git log` (`Mon Jan 2 15:04:05 -0700 2006`).
    ///
    /// `None` when the engine is unavailable or the revision does not
    /// resolve to a commit.
    pub fn last_modified(&self, revision: &str) -> Option<String> {
        let git = self.raw()?;
        match git.committer_time(revision) {
            Ok(time) => Some(format_log_date(&time)),
            Err(e) => {
                debug!(revision, error = %e, "no commit for revision");
                None
            }
        }
    }

    /// Commit ids selected by `args`, e.g. `["HEAD", "^origin/main"]`.
    ///
    /// Runs the configured git program in `repo_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::History`] if the program cannot be started or
    /// exits unsuccessfully.
    pub fn revlist(&self, args: &[&str]) -> Result<Vec<String>, RepoError> {
        let toolchain = self.settings.toolchain();
        Ok(toolchain.list_revisions(&self.repo_dir(), args)?)
    }

    /// Check whether `HEAD` names a branch with no commits yet.
    pub fn is_unborn(&self) -> bool {
        self.raw().is_some_and(Git::is_head_unborn)
    }
}
