//! Integration tests for layout resolution across worktrees.
//!
//! A linked worktree keeps its own HEAD under
//! `<main>/.git/worktrees/<name>` and finds the shared refs, objects and
//! config through a `commondir` file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;

use reposcope::core::paths::normalize;
use reposcope::{Project, RepoPaths, RepoSettings, Repository};

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn repository(paths: RepoPaths) -> Repository {
    Repository::new(
        Project::new("app", "app"),
        paths,
        Arc::new(RepoSettings::default()),
    )
}

#[test]
fn relative_commondir_resolves_against_repo_dir() {
    let temp = TempDir::new().unwrap();
    let repo_dir = temp.path().join("wt");
    fs::create_dir_all(&repo_dir).unwrap();
    fs::write(repo_dir.join("commondir"), "../common\n").unwrap();

    let repo = repository(RepoPaths::bare(repo_dir.clone()));
    assert_eq!(repo.repo_dir(), repo_dir);
    assert_eq!(repo.common_dir(), temp.path().join("common"));
}

#[test]
fn absolute_commondir_is_used_verbatim() {
    let temp = TempDir::new().unwrap();
    let repo_dir = temp.path().join("wt");
    let common = temp.path().join("elsewhere/shared.git");
    fs::create_dir_all(&repo_dir).unwrap();
    fs::write(
        repo_dir.join("commondir"),
        format!("{}\n", common.display()),
    )
    .unwrap();

    let repo = repository(RepoPaths::bare(repo_dir));
    assert_eq!(repo.common_dir(), common);
}

#[test]
fn absolute_commondir_folds_parent_segments() {
    let temp = TempDir::new().unwrap();
    let repo_dir = temp.path().join("wt");
    fs::create_dir_all(&repo_dir).unwrap();
    fs::create_dir_all(temp.path().join("elsewhere")).unwrap();
    fs::write(
        repo_dir.join("commondir"),
        format!("{}/elsewhere/../shared.git\n", temp.path().display()),
    )
    .unwrap();

    let repo = repository(RepoPaths::bare(repo_dir));
    assert_eq!(repo.common_dir(), temp.path().join("shared.git"));
    assert_eq!(
        repo.paths.config_path(),
        temp.path().join("shared.git/config")
    );
}

#[test]
fn dot_git_directory_wins_over_git_dir() {
    let temp = TempDir::new().unwrap();
    let dot_git = temp.path().join("checkout/.git");
    fs::create_dir_all(&dot_git).unwrap();

    let repo = repository(RepoPaths::new(
        Some(dot_git.clone()),
        temp.path().join("projects/app.git"),
        None,
    ));
    assert_eq!(repo.repo_dir(), dot_git);
}

#[test]
fn dot_git_file_falls_back_to_git_dir() {
    let temp = TempDir::new().unwrap();
    let checkout = temp.path().join("checkout");
    fs::create_dir_all(&checkout).unwrap();
    fs::write(checkout.join(".git"), "gitdir: ../projects/app.git\n").unwrap();
    let git_dir = temp.path().join("projects/app.git");

    let repo = repository(RepoPaths::new(
        Some(checkout.join(".git")),
        git_dir.clone(),
        None,
    ));
    assert_eq!(repo.repo_dir(), git_dir);
    assert_eq!(repo.common_dir(), git_dir);
}

/// Create `<temp>/main` with one commit and a linked worktree at
/// `<temp>/side` on branch `side`.
fn main_with_linked_worktree(temp: &TempDir) -> PathBuf {
    let main = temp.path().join("main");
    fs::create_dir_all(&main).unwrap();
    run_git(&main, &["init", "-q"]);
    run_git(&main, &["config", "user.email", "test@example.com"]);
    run_git(&main, &["config", "user.name", "Test User"]);
    run_git(&main, &["config", "commit.gpgsign", "false"]);
    fs::write(main.join("README.md"), "# Test\n").unwrap();
    run_git(&main, &["add", "README.md"]);
    run_git(&main, &["commit", "-q", "-m", "Initial commit"]);
    run_git(&main, &["worktree", "add", "-q", "-b", "side", "../side"]);
    main
}

#[test]
fn linked_worktree_writes_shared_config() {
    let temp = TempDir::new().unwrap();
    let main = main_with_linked_worktree(&temp);
    let worktree_git_dir = main.join(".git/worktrees/side");
    let shared_config = main.join(".git/config");

    run_git(&main, &["config", "remote.upstream.url", "https://example.com/up.git"]);
    let before = fs::read_to_string(&shared_config).unwrap();

    let mut repo = repository(RepoPaths::new(
        Some(temp.path().join("side/.git")),
        worktree_git_dir.clone(),
        None,
    ));
    assert_eq!(
        repo.config().unwrap().get("remote.upstream.url"),
        Some("https://example.com/up.git")
    );

    repo.set_remote("origin", "https://example.com/app.git").unwrap();

    let after = fs::read_to_string(&shared_config).unwrap();
    assert_ne!(before, after);
    assert!(after.contains("https://example.com/app.git"));
    assert!(!worktree_git_dir.join("config").exists());
    assert_eq!(
        repo.git_config_remote_url("origin").unwrap().as_deref(),
        Some("https://example.com/app.git")
    );
}

#[test]
fn linked_worktree_shares_config_and_history() {
    let temp = TempDir::new().unwrap();
    let main = main_with_linked_worktree(&temp);

    let worktree_git_dir = main.join(".git/worktrees/side");
    let mut repo = repository(RepoPaths::new(
        Some(temp.path().join("side/.git")),
        worktree_git_dir.clone(),
        None,
    ));

    assert_eq!(repo.repo_dir(), worktree_git_dir);
    assert_eq!(normalize(&repo.common_dir()), normalize(&main.join(".git")));
    assert_eq!(repo.head().as_deref(), Some("refs/heads/side"));
    assert!(repo.revision_is_valid("side"));

    // Remotes land in the shared config
    repo.set_remote("origin", "https://example.com/app.git").unwrap();
    let output = Command::new("git")
        .args(["config", "--get", "remote.origin.url"])
        .current_dir(&main)
        .output()
        .unwrap();
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "https://example.com/app.git"
    );
}
