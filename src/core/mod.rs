//! core
//!
//! Domain types for the repository layer.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid
//! - [`naming`] - Revision classification (object ids, tags, branches)
//! - [`paths`] - Repository layout resolution
//! - [`project`] - Manifest project entries
//! - [`remote`] - Configured remotes
//! - [`config`] - Workspace settings schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Layout resolution never fails; a missing directory is an answer
//! - Nothing here opens a repository

pub mod config;
pub mod naming;
pub mod paths;
pub mod project;
pub mod remote;
pub mod types;
