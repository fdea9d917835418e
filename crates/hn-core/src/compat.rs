//! # Compatibility Adapter
//!
//! Decides whether a parser may consume a document tagged with another
//! schema version. There is never an implicit upgrade: the V2 parser always
//! refuses `"1.0"` documents. The V1 parser's handling of `"2.0"` documents
//! is configurable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ParseError, Result};
use crate::version::SchemaVersion;

/// How the V1 parser treats a document declaring `"2.0"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DowngradePolicy {
    /// Fail with `VersionMismatch`.
    #[default]
    Reject,
    /// Parse the shared fields and drop everything V2-only.
    IgnoreExtras,
}

/// Admits a document declaring `declared` into the `requested` parser.
pub fn admit(
    requested: SchemaVersion,
    declared: SchemaVersion,
    downgrade: DowngradePolicy,
) -> Result<()> {
    match (requested, declared) {
        (requested, declared) if requested == declared => Ok(()),
        (SchemaVersion::V1, SchemaVersion::V2) if downgrade == DowngradePolicy::IgnoreExtras => {
            debug!("reading a 2.0 document with the 1.0 parser; V2-only fields are dropped");
            Ok(())
        }
        _ => Err(ParseError::VersionMismatch {
            requested,
            declared,
        }),
    }
}
