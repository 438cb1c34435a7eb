//! core::paths
//!
//! Centralized path routing for a project's on-disk repository layout.
//!
//! # Architecture
//!
//! A project checkout can be laid out several ways:
//! - Standalone repository (`<worktree>/.git` is a real directory)
//! - Worktree whose `.git` is an indirection file pointing at a git dir
//!   kept inside the workspace metadata area
//! - Linked worktree whose git dir carries a `commondir` file naming the
//!   shared directory that holds refs, objects and config
//! - Object-only store shared by several projects (`objects_git_dir`)
//!
//! **Hard rule:** No code may assume `.git/` is a directory or that the
//! per-worktree directory equals the common directory. All paths must go
//! through [`RepoPaths`].
//!
//! # Example
//!
//! ```
//! use reposcope::core::paths::RepoPaths;
//! use std::path::PathBuf;
//!
//! let paths = RepoPaths::bare(PathBuf::from("/ws/.repo/projects/app.git"));
//!
//! assert_eq!(
//!     paths.repo_dir(),
//!     PathBuf::from("/ws/.repo/projects/app.git")
//! );
//! ```

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Component, Path, PathBuf};

/// Markers left behind by an interrupted rebase or `git am`.
pub const REBASE_MARKERS: [&str; 3] = ["rebase-apply", "rebase-merge", ".dotest"];

/// Path routing for one project's repository.
///
/// # Invariants
///
/// - [`RepoPaths::repo_dir`] is `dot_git` when that is a real directory,
///   otherwise `git_dir`
/// - Configuration and history always target [`RepoPaths::common_dir`]
/// - Per-worktree state (`HEAD`, rebase markers) lives under `repo_dir`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepoPaths {
    /// Path to `<worktree>/.git`. May be absent, a directory, or a file.
    pub dot_git: Option<PathBuf>,

    /// The project's metadata directory inside the workspace.
    pub git_dir: PathBuf,

    /// A separate repository whose object store this project shares.
    pub objects_git_dir: Option<PathBuf>,
}

impl RepoPaths {
    /// Create a layout from its three locations.
    pub fn new(
        dot_git: Option<PathBuf>,
        git_dir: PathBuf,
        objects_git_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            dot_git,
            git_dir,
            objects_git_dir,
        }
    }

    /// Layout of a bare repository with no worktree and no shared store.
    pub fn bare(git_dir: PathBuf) -> Self {
        Self::new(None, git_dir, None)
    }

    // =========================================================================
    // Layout resolution
    // =========================================================================

    /// The directory holding the metadata for this checkout.
    ///
    /// Returns `dot_git` if it is a directory, else `git_dir`. Neither path
    /// existing is not an error; callers treat that as "not initialized".
    pub fn repo_dir(&self) -> PathBuf {
        match &self.dot_git {
            Some(dot_git) if dot_git.is_dir() => dot_git.clone(),
            _ => self.git_dir.clone(),
        }
    }

    /// The directory holding refs, objects and config shared across
    /// worktrees.
    ///
    /// Follows `<repo_dir>/commondir` when it exists. A relative target is
    /// resolved against `repo_dir`; either way `.` and `..` segments are
    /// folded. Any read problem falls back to `repo_dir`.
    pub fn common_dir(&self) -> PathBuf {
        let dir = self.repo_dir();
        read_commondir(&dir).unwrap_or(dir)
    }

    /// Check if `common_dir` differs from `repo_dir`.
    pub fn is_worktree(&self) -> bool {
        self.common_dir() != self.repo_dir()
    }

    /// Check that `git_dir` looks like a git metadata directory.
    pub fn exists(&self) -> bool {
        is_git_dir(&self.git_dir)
    }

    // =========================================================================
    // Files under common_dir
    // =========================================================================

    /// `<common_dir>/config`.
    pub fn config_path(&self) -> PathBuf {
        self.common_dir().join("config")
    }

    // =========================================================================
    // Files under git_dir
    // =========================================================================

    /// `<git_dir>/objects`.
    pub fn objects_dir(&self) -> PathBuf {
        self.git_dir.join("objects")
    }

    /// `<git_dir>/objects/info/alternates`.
    pub fn alternates_path(&self) -> PathBuf {
        self.objects_dir().join("info").join("alternates")
    }

    // =========================================================================
    // Files under repo_dir
    // =========================================================================

    /// `<repo_dir>/HEAD`.
    pub fn head_path(&self) -> PathBuf {
        self.repo_dir().join("HEAD")
    }

    /// `<repo_dir>/info/sshinfo.cache`, where transport probes are cached.
    pub fn ssh_info_cache_file(&self) -> PathBuf {
        self.repo_dir().join("info").join("sshinfo.cache")
    }

    /// Paths whose presence means a rebase is in progress.
    pub fn rebase_markers(&self) -> [PathBuf; 3] {
        let dir = self.repo_dir();
        REBASE_MARKERS.map(|marker| dir.join(marker))
    }
}

/// Read the first line of `<dir>/commondir` and resolve it.
fn read_commondir(dir: &Path) -> Option<PathBuf> {
    let path = dir.join("commondir");
    if !path.is_file() {
        return None;
    }

    let file = fs::File::open(&path).ok()?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line).ok()?;

    let target = line.trim();
    if target.is_empty() {
        return None;
    }

    let target = Path::new(target);
    if target.is_absolute() {
        Some(normalize(target))
    } else {
        Some(normalize(&dir.join(target)))
    }
}

/// Structural check for a git metadata directory.
///
/// Requires a `HEAD` file plus `objects/` and `refs/` directories.
pub fn is_git_dir(dir: &Path) -> bool {
    dir.join("HEAD").is_file() && dir.join("objects").is_dir() && dir.join("refs").is_dir()
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
///
/// Does not touch the filesystem, so symlinks are not resolved. A `..`
/// directly under the root is dropped; leading `..` of a relative path is
/// kept.
///
/// # Example
///
/// ```
/// use reposcope::core::paths::normalize;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
/// assert_eq!(normalize(Path::new("../x/../y")), PathBuf::from("../y"));
/// ```
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Compute `target` relative to `base`, lexically.
///
/// Both paths are normalized first. Returns `None` when one path is
/// absolute and the other is not, or when `base` climbs above the common
/// prefix so no relative path exists.
///
/// # Example
///
/// ```
/// use reposcope::core::paths::relative_to;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     relative_to(Path::new("/ws/a.git/objects"), Path::new("/ref/a.git/objects")),
///     Some(PathBuf::from("../../../ref/a.git/objects"))
/// );
/// ```
pub fn relative_to(base: &Path, target: &Path) -> Option<PathBuf> {
    let base = normalize(base);
    let target = normalize(target);
    if base.is_absolute() != target.is_absolute() {
        return None;
    }

    let base_parts: Vec<Component<'_>> = base
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let target_parts: Vec<Component<'_>> = target
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for part in &base_parts[common..] {
        match part {
            Component::Normal(_) => rel.push(".."),
            _ => return None,
        }
    }
    for part in &target_parts[common..] {
        rel.push(part.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}
