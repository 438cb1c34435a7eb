//! core::types
//!
//! Strong types for core domain concepts.
//!
//! [`Oid`] is the only one: a full object id as handed out by the history
//! engine. Abbreviations are rejected, so an `Oid` always names exactly one
//! object.
//!
//! # Example
//!
//! ```
//! use reposcope::core::types::Oid;
//!
//! let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
//! assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
//!
//! assert!(Oid::new("abc123").is_err());
//! ```

use std::fmt;

use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),
}

/// Hex lengths of SHA-1 and SHA-256 object ids.
const OID_LENGTHS: [usize; 2] = [40, 64];

/// A full git object id, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid(String);

impl Oid {
    /// Validate and normalize a hex object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` unless `oid` is 40 or 64 hex digits.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into();
        if !OID_LENGTHS.contains(&oid.len()) {
            return Err(TypeError::InvalidOid(format!(
                "{:?} is {} characters, want 40 or 64",
                oid,
                oid.len()
            )));
        }
        if !oid.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(format!("{:?} is not hex", oid)));
        }
        Ok(Self(oid.to_ascii_lowercase()))
    }

    /// The id as lowercase hex.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_hash_lengths() {
        assert!(Oid::new("0".repeat(40)).is_ok());
        assert!(Oid::new("f".repeat(64)).is_ok());
    }

    #[test]
    fn lowercases() {
        let oid = Oid::new("ABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
        assert_eq!(oid.to_string(), "abcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn rejects_abbreviations() {
        assert!(matches!(
            Oid::new("deadbeef"),
            Err(TypeError::InvalidOid(_))
        ));
        assert!(Oid::new("a".repeat(41)).is_err());
    }

    #[test]
    fn rejects_non_hex() {
        let err = Oid::new("g".repeat(40)).unwrap_err();
        assert!(err.to_string().contains("not hex"));
    }
}
