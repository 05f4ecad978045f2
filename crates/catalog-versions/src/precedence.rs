//! Semantic-version precedence for ledger versions.
//!
//! Only `major.minor.patch` takes part in ordering. A pre-release suffix
//! (`-beta.1`) and build metadata (`+build.5`) are stripped before parsing.
//!
//! Two entry points with different failure policies:
//!
//! - [`parse_semantic_version`] never fails and maps anything unparseable to
//!   `(0, 0, 0)`, so an invalid entry in an existing ledger sorts as the
//!   oldest version instead of making the whole history unreadable.
//! - [`SemanticVersion::parse`] is strict and is used wherever a version is
//!   being introduced (publish, rollback), so bad input fails loudly there.

use std::fmt;

use crate::{Error, Result};

/// A `major.minor.patch` triple ordered by precedence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string strictly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVersion`] when the core is not exactly three
    /// dot-separated non-negative integers.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidVersion {
            version: text.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = strip_suffixes(text).split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(invalid("expected major.minor.patch"));
        };

        let component = |part: &str| -> Result<u64> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("components must be non-negative integers"));
            }
            part.parse().map_err(|_| invalid("component out of range"))
        };

        Ok(Self::new(component(*major)?, component(*minor)?, component(*patch)?))
    }

    pub fn as_tuple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Next patch version.
    ///
    /// This and the other bumps return [`Error::InvalidVersion`] when the
    /// bumped component would overflow.
    pub fn bump_patch(&self) -> Result<Self> {
        Ok(Self::new(self.major, self.minor, self.increment(self.patch)?))
    }

    pub fn bump_minor(&self) -> Result<Self> {
        Ok(Self::new(self.major, self.increment(self.minor)?, 0))
    }

    pub fn bump_major(&self) -> Result<Self> {
        Ok(Self::new(self.increment(self.major)?, 0, 0))
    }

    fn increment(&self, component: u64) -> Result<u64> {
        component.checked_add(1).ok_or_else(|| Error::InvalidVersion {
            version: self.to_string(),
            reason: "cannot bump past the largest component value".to_string(),
        })
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl std::str::FromStr for SemanticVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse `major.minor.patch`, returning `(0, 0, 0)` for anything unparseable.
pub fn parse_semantic_version(text: &str) -> (u64, u64, u64) {
    SemanticVersion::parse(text)
        .map(|v| v.as_tuple())
        .unwrap_or((0, 0, 0))
}

/// Remove `+build` metadata, then a `-prerelease` suffix.
fn strip_suffixes(text: &str) -> &str {
    let without_build = text.split('+').next().unwrap_or_default();
    without_build.split('-').next().unwrap_or_default()
}
