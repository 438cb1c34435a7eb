//! git::toolchain
//!
//! Subprocess wrapper around the external `git` binary.
//!
//! The embedded engine answers single-revision questions. Listing a
//! revision range needs git's own traversal (topological ordering, merge
//! handling, the full `rev-list` option set), so that is delegated to the
//! installed toolchain.
//!
//! The program name is injected rather than hard-coded so callers (and
//! tests) can point at a different binary.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Program used when none is configured.
pub const DEFAULT_GIT: &str = "git";

/// Errors from running the external toolchain.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// The process could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    /// Reading the process output failed.
    #[error("failed to read output of {program} {subcommand}: {source}")]
    Read {
        program: PathBuf,
        subcommand: &'static str,
        source: std::io::Error,
    },

    /// The process exited unsuccessfully.
    #[error("{program} {subcommand} failed ({status})")]
    Failed {
        program: PathBuf,
        subcommand: &'static str,
        status: ExitStatus,
    },
}

/// Handle on the external git toolchain.
///
/// # Example
///
/// ```
/// use reposcope::git::Toolchain;
///
/// let git = Toolchain::default();
/// assert_eq!(git.program().to_str(), Some("git"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    program: PathBuf,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new(DEFAULT_GIT)
    }
}

impl Toolchain {
    /// Use `program` as the git binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The configured program.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `git rev-list <args>` in `dir` and collect its output lines.
    ///
    /// Standard output is read incrementally; each line is trimmed and empty
    /// lines are skipped. Standard error is discarded.
    ///
    /// # Errors
    ///
    /// Fails if the process cannot be started, its output cannot be read,
    /// or it exits non-zero. No partial result is returned.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub fn rev_list(&self, dir: &Path, args: &[&str]) -> Result<Vec<String>, ToolchainError> {
        self.run_lines(dir, "rev-list", args)
    }

    fn run_lines(
        &self,
        dir: &Path,
        subcommand: &'static str,
        args: &[&str],
    ) -> Result<Vec<String>, ToolchainError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(subcommand)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        debug!(program = %self.program.display(), subcommand, "spawning git");

        let mut child = cmd.spawn().map_err(|e| ToolchainError::Spawn {
            program: self.program.clone(),
            source: e,
        })?;

        let read_error = |e: std::io::Error| ToolchainError::Read {
            program: self.program.clone(),
            subcommand,
            source: e,
        };

        let mut lines = Vec::new();
        let read_result = match child.stdout.take() {
            Some(stdout) => collect_lines(BufReader::new(stdout), &mut lines),
            None => Ok(()),
        };

        if let Err(e) = read_result {
            // Reap the child so it does not linger as a zombie.
            let _ = child.kill();
            let _ = child.wait();
            return Err(read_error(e));
        }

        let status = child.wait().map_err(read_error)?;
        if !status.success() {
            warn!(program = %self.program.display(), subcommand, %status, "git exited unsuccessfully");
            return Err(ToolchainError::Failed {
                program: self.program.clone(),
                subcommand,
                status,
            });
        }

        debug!(count = lines.len(), "git output collected");
        Ok(lines)
    }
}

/// Push every trimmed, non-empty line of `reader` onto `out`.
fn collect_lines<R: BufRead>(mut reader: R, out: &mut Vec<String>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if !line.is_empty() {
            out.push(line.to_string());
        }
    }
}
