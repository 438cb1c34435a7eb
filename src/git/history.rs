//! git::history
//!
//! Capability traits for history queries.
//!
//! # Design
//!
//! History questions are split by capability rather than by backend:
//!
//! - [`RevisionResolver`]: one revision in, one answer out. Served by the
//!   embedded engine ([`Git`]).
//! - [`RevisionLister`]: a revision range in, an ordered list of commits
//!   out. Served by the external toolchain ([`Toolchain`]).
//!
//! Call sites pick the capability they need and stay agnostic of which
//! backend provides it.

use std::path::Path;

use chrono::{DateTime, FixedOffset};

use super::interface::{Git, GitError};
use super::toolchain::{Toolchain, ToolchainError};
use crate::core::types::Oid;

/// Timestamp layout used by `git log` for default-format dates.
///
/// Renders as `Mon Jan 2 15:04:05 -0700 2006`: weekday, month, unpadded
/// day, time, numeric offset, year. English names regardless of locale.
pub const LOG_DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %z %Y";

/// Format a timestamp the way `git log` prints it.
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use reposcope::git::format_log_date;
///
/// let dt = DateTime::parse_from_rfc3339("2006-01-02T15:04:05-07:00").unwrap();
/// assert_eq!(format_log_date(&dt), "Mon Jan 2 15:04:05 -0700 2006");
/// ```
pub fn format_log_date(time: &DateTime<FixedOffset>) -> String {
    time.format(LOG_DATE_FORMAT).to_string()
}

/// Resolve single revisions and read what they point at.
pub trait RevisionResolver {
    /// Resolve a revision expression to an object id.
    fn resolve_revision(&self, revision: &str) -> Result<Oid, GitError>;

    /// Committer timestamp of the commit a revision points at.
    fn committer_time(&self, revision: &str) -> Result<DateTime<FixedOffset>, GitError>;
}

/// List the commits selected by a revision range.
pub trait RevisionLister {
    /// List commit ids for `args` (e.g. `["HEAD", "^origin/main"]`),
    /// evaluated in `dir`, in traversal order.
    fn list_revisions(&self, dir: &Path, args: &[&str]) -> Result<Vec<String>, ToolchainError>;
}

impl RevisionResolver for Git {
    fn resolve_revision(&self, revision: &str) -> Result<Oid, GitError> {
        self.resolve(revision)
    }

    fn committer_time(&self, revision: &str) -> Result<DateTime<FixedOffset>, GitError> {
        let oid = self.resolve_commit(revision)?;
        self.commit_time(&oid)
    }
}

impl RevisionLister for Toolchain {
    fn list_revisions(&self, dir: &Path, args: &[&str]) -> Result<Vec<String>, ToolchainError> {
        self.rev_list(dir, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_date_pads_time_not_day() {
        let dt = DateTime::parse_from_rfc3339("2021-03-07T04:05:06+08:00").unwrap();
        assert_eq!(format_log_date(&dt), "Sun Mar 7 04:05:06 +0800 2021");
    }

    #[test]
    fn log_date_two_digit_day() {
        let dt = DateTime::parse_from_rfc3339("1999-12-31T23:59:59+00:00").unwrap();
        assert_eq!(format_log_date(&dt), "Fri Dec 31 23:59:59 +0000 1999");
    }

    #[test]
    fn log_date_half_hour_offset() {
        let dt = DateTime::parse_from_rfc3339("2020-06-15T12:00:00+05:30").unwrap();
        assert_eq!(format_log_date(&dt), "Mon Jun 15 12:00:00 +0530 2020");
    }
}
