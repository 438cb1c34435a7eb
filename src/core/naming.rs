//! core::naming
//!
//! Revision naming rules.
//!
//! Manifest revisions come in two flavours: movable branch names that a
//! checkout can track, and fixed points (full object ids, tags) that it
//! cannot. The predicates here classify a revision string syntactically;
//! [`crate::repository::Repository`] layers a repository-aware tag lookup on
//! top.

use crate::core::types::Oid;

/// Prefix of fully-qualified tag refs.
pub const REFS_TAGS: &str = "refs/tags/";

/// Prefix of fully-qualified branch refs.
pub const REFS_HEADS: &str = "refs/heads/";

/// Check whether a revision is a full object id.
///
/// Abbreviated ids are not considered, since they are indistinguishable
/// from branch names such as `cafe` or `deadbeef`.
///
/// # Example
///
/// ```
/// use reposcope::core::naming::is_sha;
///
/// assert!(is_sha("0123456789abcdef0123456789abcdef01234567"));
/// assert!(!is_sha("main"));
/// assert!(!is_sha("deadbeef"));
/// ```
pub fn is_sha(revision: &str) -> bool {
    Oid::new(revision).is_ok()
}

/// Check whether a revision is a fully-qualified tag ref.
pub fn is_tag(revision: &str) -> bool {
    revision.starts_with(REFS_TAGS)
}

/// Check whether a revision names a fixed point rather than a branch.
///
/// # Example
///
/// ```
/// use reposcope::core::naming::is_immutable;
///
/// assert!(is_immutable("refs/tags/v1.0"));
/// assert!(!is_immutable("refs/heads/main"));
/// assert!(!is_immutable("dev"));
/// ```
pub fn is_immutable(revision: &str) -> bool {
    is_sha(revision) || is_tag(revision)
}
