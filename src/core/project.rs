//! core::project
//!
//! The project descriptor supplied by manifest parsing.
//!
//! Manifest parsing itself lives outside this crate; a [`Project`] is the
//! slice of a manifest entry that the repository layer decorates with
//! on-disk state.

use serde::{Deserialize, Serialize};

/// Path of the project that sits at the workspace root.
pub const ROOT_PATH: &str = ".";

/// A project entry from the workspace manifest.
///
/// # Example
///
/// ```
/// use reposcope::core::project::Project;
///
/// let project: Project = toml::from_str(r#"
///     name = "platform/app"
///     path = "app"
///     revision = "main"
/// "#).unwrap();
///
/// assert_eq!(project.path, "app");
/// assert!(project.upstream.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Project {
    /// Repository name on the remote
    pub name: String,

    /// Checkout path relative to the workspace root
    pub path: String,

    /// Revision to check out (branch, tag or commit id)
    pub revision: String,

    /// Upstream branch when `revision` is a fixed point
    pub upstream: String,

    /// Branch that review uploads target
    pub dest_branch: String,

    /// Name of the remote this project is fetched from
    pub remote_name: String,
}

impl Project {
    /// Create a project with a name and checkout path.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Check if this project is checked out at the workspace root.
    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }
}
