//! git
//!
//! Every interaction with git goes through this module.
//!
//! # Architecture
//!
//! Two backends sit behind one set of capabilities:
//!
//! - [`Git`] - the embedded engine (git2) for opening a repository,
//!   resolving a revision and reading commit metadata
//! - [`Toolchain`] - the external `git` binary, run as a subprocess, for
//!   revision-range listings
//!
//! [`GitConfig`] reads and writes git config files. No other module should
//! import `git2` directly.
//!
//! # Example
//!
//! ```ignore
//! use reposcope::git::{Git, RevisionResolver};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("/ws/.repo/projects/app.git"))?;
//! let when = git.committer_time("main")?;
//! ```

pub mod config;
mod history;
mod interface;
mod toolchain;

pub use config::{GitConfig, GitConfigError};
pub use history::{format_log_date, RevisionLister, RevisionResolver, LOG_DATE_FORMAT};
pub use interface::{Git, GitError};
pub use toolchain::{Toolchain, ToolchainError, DEFAULT_GIT};
