//! Policies deciding when a schema change is breaking

use std::fmt;

use catalog_versions::SchemaFingerprint;

use crate::{Error, Result};

/// Decides whether a schema change escalates STALE to BREAKING.
///
/// Only consulted when the stored and current fingerprint hashes differ.
pub trait SchemaChangePolicy: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn is_breaking(&self, stored: &SchemaFingerprint, current: &SchemaFingerprint) -> bool;
}

/// Removed or retyped columns break; purely additive changes do not.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralPolicy;

impl SchemaChangePolicy for StructuralPolicy {
    fn name(&self) -> &str {
        "structural"
    }

    fn is_breaking(&self, stored: &SchemaFingerprint, current: &SchemaFingerprint) -> bool {
        !stored.diff(current).is_additive()
    }
}

/// Any fingerprint change breaks, including column reordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictPolicy;

impl SchemaChangePolicy for StrictPolicy {
    fn name(&self) -> &str {
        "strict"
    }

    fn is_breaking(&self, stored: &SchemaFingerprint, current: &SchemaFingerprint) -> bool {
        !stored.matches(current)
    }
}

/// Schema changes never break.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientPolicy;

impl SchemaChangePolicy for LenientPolicy {
    fn name(&self) -> &str {
        "lenient"
    }

    fn is_breaking(&self, _stored: &SchemaFingerprint, _current: &SchemaFingerprint) -> bool {
        false
    }
}

/// Names accepted by [`policy_by_name`].
pub const POLICY_NAMES: [&str; 3] = ["structural", "strict", "lenient"];

/// Look up a built-in policy by name.
pub fn policy_by_name(name: &str) -> Result<Box<dyn SchemaChangePolicy>> {
    match name {
        "structural" => Ok(Box::new(StructuralPolicy)),
        "strict" => Ok(Box::new(StrictPolicy)),
        "lenient" => Ok(Box::new(LenientPolicy)),
        other => Err(Error::Config {
            message: format!(
                "unknown schema policy '{}' (expected one of: {})",
                other,
                POLICY_NAMES.join(", ")
            ),
        }),
    }
}
