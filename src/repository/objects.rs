//! repository::objects
//!
//! Object sharing between repositories.
//!
//! A repository borrows objects from another through
//! `<git_dir>/objects/info/alternates`, a list of object directories. Paths
//! written here are relative to this repository's `objects` directory so a
//! workspace can be moved as a whole.

use std::cell::OnceCell;
use std::fs;
use std::io::{self, Write};
use std::path::{absolute, Path};
use std::sync::Arc;

use tracing::{debug, error};

use super::Repository;
use crate::core::paths::{relative_to, RepoPaths};

impl Repository {
    /// Point this repository's alternates at `<reference>/objects`.
    ///
    /// An empty `reference` does nothing. Otherwise the alternates file is
    /// created (truncating any prior content) and the relative path from
    /// `<git_dir>/objects` to `<reference>/objects` is written as its only
    /// line. Failures are logged and reported as `false`; a file that was
    /// created but not written is left empty.
    pub fn set_alternates(&self, reference: &Path) -> bool {
        if reference.as_os_str().is_empty() {
            return false;
        }

        match self.write_alternates(reference) {
            Ok(()) => true,
            Err(e) => {
                error!(
                    project = %self.project.name,
                    reference = %reference.display(),
                    error = %e,
                    "cannot set alternates"
                );
                false
            }
        }
    }

    /// Borrow objects from [`reference`](Repository::reference), if set.
    ///
    /// Same as [`set_alternates`](Self::set_alternates) on that path;
    /// `false` when no reference is configured.
    pub fn link_reference(&self) -> bool {
        match &self.reference {
            Some(reference) => self.set_alternates(reference),
            None => false,
        }
    }

    fn write_alternates(&self, reference: &Path) -> io::Result<()> {
        let path = self.paths.alternates_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&path)?;

        let objects = absolute(self.paths.objects_dir())?;
        let target = absolute(reference.join("objects"))?;
        let relative = relative_to(&objects, &target).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "no relative path from {} to {}",
                    objects.display(),
                    target.display()
                ),
            )
        })?;

        writeln!(file, "{}", relative.display())?;
        debug!(path = %path.display(), target = %relative.display(), "wrote alternates");
        Ok(())
    }

    /// Check for a non-empty alternates file.
    ///
    /// A zero-length file counts as no alternates.
    pub fn has_alternates(&self) -> bool {
        fs::metadata(self.paths.alternates_path())
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// The shared object store this repository draws from.
    ///
    /// A bare repository at `objects_git_dir` for the same project, sharing
    /// its remote URL and workspace settings. `None` when no object store
    /// is configured.
    pub fn objects_repository(&self) -> Option<Repository> {
        let git_dir = self
            .paths
            .objects_git_dir
            .as_ref()
            .filter(|dir| !dir.as_os_str().is_empty())?;

        Some(Repository {
            project: self.project.clone(),
            paths: RepoPaths::bare(git_dir.clone()),
            manifest_default_revision: String::new(),
            is_bare: true,
            remote_url: self.remote_url.clone(),
            remotes: None,
            reference: None,
            settings: Arc::clone(&self.settings),
            raw: OnceCell::new(),
        })
    }

    /// Seed a fresh clone from a clone bundle.
    ///
    /// Bundle download is not supported; this only records that a bundle
    /// was not applied, so clones always fall back to a normal fetch.
    pub fn apply_clone_bundle(&self) {
        if !self.settings.clone_bundle() {
            debug!(project = %self.project.name, "clone bundles disabled");
            return;
        }
        debug!(project = %self.project.name, "clone bundle not applied");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::core::config::RepoSettings;
    use crate::core::paths::RepoPaths;
    use crate::core::project::Project;
    use crate::repository::Repository;

    fn repo_with(paths: RepoPaths) -> Repository {
        Repository::new(
            Project::new("app", "app"),
            paths,
            Arc::new(RepoSettings::default()),
        )
    }

    #[test]
    fn empty_reference_is_noop() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with(RepoPaths::bare(temp.path().join("app.git")));

        assert!(!repo.set_alternates(Path::new("")));
        assert!(!temp.path().join("app.git").exists());
        assert!(!repo.has_alternates());
    }

    #[test]
    fn alternates_written_relative() {
        let temp = TempDir::new().unwrap();
        let git_dir = temp.path().join("projects/app.git");
        let reference = temp.path().join("project-objects/app.git");
        let repo = repo_with(RepoPaths::bare(git_dir.clone()));

        assert!(repo.set_alternates(&reference));
        assert!(repo.has_alternates());

        let content = fs::read_to_string(git_dir.join("objects/info/alternates")).unwrap();
        assert_eq!(content, "../../../project-objects/app.git/objects\n");
    }

    #[test]
    fn alternates_overwrite_prior_content() {
        let temp = TempDir::new().unwrap();
        let git_dir = temp.path().join("app.git");
        let repo = repo_with(RepoPaths::bare(git_dir.clone()));

        assert!(repo.set_alternates(&temp.path().join("first.git")));
        assert!(repo.set_alternates(&temp.path().join("second.git")));

        let content = fs::read_to_string(git_dir.join("objects/info/alternates")).unwrap();
        assert_eq!(content, "../../second.git/objects\n");
    }

    #[test]
    fn reference_comes_from_settings() {
        let temp = TempDir::new().unwrap();
        let git_dir = temp.path().join("projects/app.git");
        let settings = RepoSettings {
            reference: Some(temp.path().join("mirror")),
            ..Default::default()
        };
        let repo = Repository::new(
            Project::new("platform/app", "app"),
            RepoPaths::bare(git_dir.clone()),
            Arc::new(settings),
        );

        assert_eq!(
            repo.reference,
            Some(temp.path().join("mirror/platform/app.git"))
        );
        assert!(repo.link_reference());

        let content = fs::read_to_string(git_dir.join("objects/info/alternates")).unwrap();
        assert_eq!(content, "../../../mirror/platform/app.git/objects\n");
    }

    #[test]
    fn link_reference_without_reference_is_noop() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with(RepoPaths::bare(temp.path().join("app.git")));

        assert!(repo.reference.is_none());
        assert!(!repo.link_reference());
        assert!(!temp.path().join("app.git").exists());
    }

    #[test]
    fn zero_length_alternates_is_absent() {
        let temp = TempDir::new().unwrap();
        let git_dir = temp.path().join("app.git");
        fs::create_dir_all(git_dir.join("objects/info")).unwrap();
        fs::write(git_dir.join("objects/info/alternates"), "").unwrap();

        assert!(!repo_with(RepoPaths::bare(git_dir)).has_alternates());
    }

    #[test]
    fn objects_repository_absent_without_store() {
        let repo = repo_with(RepoPaths::bare(PathBuf::from("/ws/app.git")));
        assert!(repo.objects_repository().is_none());

        let repo = repo_with(RepoPaths::new(
            None,
            PathBuf::from("/ws/app.git"),
            Some(PathBuf::new()),
        ));
        assert!(repo.objects_repository().is_none());
    }

    #[test]
    fn objects_repository_is_bare_and_shares_project() {
        let paths = RepoPaths::new(
            Some(PathBuf::from("/ws/app/.git")),
            PathBuf::from("/ws/.repo/projects/app.git"),
            Some(PathBuf::from("/ws/.repo/project-objects/app.git")),
        );
        let repo = repo_with(paths).with_remote_url("https://example.com/app.git");

        let objects = repo.objects_repository().unwrap();
        assert!(objects.is_bare);
        assert_eq!(objects.project, repo.project);
        assert_eq!(objects.remote_url, repo.remote_url);
        assert_eq!(
            objects.paths.git_dir,
            PathBuf::from("/ws/.repo/project-objects/app.git")
        );
        assert!(objects.paths.dot_git.is_none());
        assert!(objects.paths.objects_git_dir.is_none());
        assert!(Arc::ptr_eq(&objects.settings, &repo.settings));
    }

    #[test]
    fn clone_bundle_is_noop() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with(RepoPaths::bare(temp.path().join("app.git")));
        repo.apply_clone_bundle();
        assert!(!temp.path().join("app.git").exists());
    }
}
