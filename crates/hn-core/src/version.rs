//! # Version Detector
//!
//! Reads the declared `version` tag of a raw document and maps it onto the
//! closed [`SchemaVersion`] set. Anything else is rejected up front.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ParseError, Result};
use crate::field::type_name;

/// Input format revisions understood by the parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchemaVersion {
    #[serde(rename = "1.0")]
    V1,
    #[serde(rename = "2.0")]
    V2,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::V1, SchemaVersion::V2];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1.0",
            Self::V2 => "2.0",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "1.0" => Some(Self::V1),
            "2.0" => Some(Self::V2),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = ParseError;

    fn from_str(tag: &str) -> Result<Self> {
        Self::from_tag(tag).ok_or_else(|| ParseError::UnsupportedVersion {
            found: Some(Value::String(tag.to_string())),
        })
    }
}

/// Selects the schema a raw document declares.
///
/// Fails with `MalformedInput` when the document is not an object and with
/// `UnsupportedVersion` when the tag is absent, not a string, or unknown.
pub fn detect(raw: &Value) -> Result<SchemaVersion> {
    let object = raw.as_object().ok_or_else(|| {
        ParseError::MalformedInput(format!(
            "expected a JSON object at the top level, found {}",
            type_name(raw)
        ))
    })?;

    match object.get("version") {
        Some(Value::String(tag)) => tag.parse(),
        other => Err(ParseError::UnsupportedVersion {
            found: other.cloned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_tags_select_their_schema() {
        assert_eq!(detect(&json!({"version": "1.0"})).unwrap(), SchemaVersion::V1);
        assert_eq!(detect(&json!({"version": "2.0"})).unwrap(), SchemaVersion::V2);
    }

    #[test]
    fn unknown_tag_is_named_in_the_error() {
        let err = detect(&json!({"version": "3.0", "stories": []})).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnsupportedVersion {
                found: Some(json!("3.0"))
            }
        );
        assert!(err.to_string().contains("\"3.0\""));
    }

    #[test]
    fn missing_or_non_string_tag_is_unsupported() {
        assert_eq!(
            detect(&json!({"stories": []})).unwrap_err(),
            ParseError::UnsupportedVersion { found: None }
        );
        assert_eq!(
            detect(&json!({"version": 2})).unwrap_err(),
            ParseError::UnsupportedVersion {
                found: Some(json!(2))
            }
        );
        // Tags are exact; no numeric coercion.
        assert!(detect(&json!({"version": "2"})).is_err());
    }

    #[test]
    fn non_object_documents_are_malformed() {
        for raw in [json!([]), json!("1.0"), json!(null), json!(42)] {
            let err = detect(&raw).unwrap_err();
            assert!(matches!(err, ParseError::MalformedInput(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn serializes_as_the_wire_tag() {
        assert_eq!(serde_json::to_value(SchemaVersion::V2).unwrap(), json!("2.0"));
        let parsed: SchemaVersion = serde_json::from_value(json!("1.0")).unwrap();
        assert_eq!(parsed, SchemaVersion::V1);
    }
}
