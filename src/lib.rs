//! Reposcope - the repository layer of a multi-repository workspace manager
//!
//! A workspace is a set of projects, each checked out from its own git
//! repository. This crate answers the questions a workspace manager asks
//! about one of those repositories: where its metadata lives, what its
//! config says, where it borrows objects from, and what its history holds.
//!
//! # Architecture
//!
//! - [`core`] - Domain types: projects, remotes, layouts, workspace settings
//! - [`git`] - Single interface for all git operations (embedded engine,
//!   external toolchain, config files)
//! - [`repository`] - [`Repository`], the per-project handle built on both
//!
//! # Failure Tiers
//!
//! 1. Queries that can answer "no" degrade silently
//! 2. Best-effort side effects log through `tracing` and report `false`
//! 3. Config and toolchain failures return a typed error
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use reposcope::core::config::Settings;
//! use reposcope::{Project, RepoPaths, Repository};
//!
//! let settings = Arc::new(Settings::load()?.settings);
//! let mut repo = Repository::new(
//!     Project::new("app", "src/app"),
//!     RepoPaths::new(
//!         Some(PathBuf::from("/ws/src/app/.git")),
//!         PathBuf::from("/ws/.repo/projects/src/app.git"),
//!         Some(PathBuf::from("/ws/.repo/project-objects/app.git")),
//!     ),
//!     settings,
//! );
//!
//! repo.set_remote("origin", "https://example.com/app.git")?;
//! println!("{}{:?}", repo.prompt(), repo.head());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod git;
pub mod repository;

pub use crate::core::config::RepoSettings;
pub use crate::core::paths::RepoPaths;
pub use crate::core::project::Project;
pub use crate::core::remote::{Remote, RemoteMap};
pub use crate::repository::{RepoError, Repository};
