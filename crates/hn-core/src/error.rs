//! # ParseError
//!
//! Centralized error handling for the hn-parser core.
//! Every failure here is recoverable; hosting layers decide how an
//! [`ErrorKind`] maps onto exit codes or HTTP statuses.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::version::SchemaVersion;

/// A single field-level problem found while validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// Dotted path into the input document, e.g. `stories[2].points`.
    pub path: String,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// The primary error type for all hn-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The `version` tag is absent, not a string, or not a known schema.
    #[error("unsupported version: {} (supported: 1.0, 2.0)", describe_found(.found))]
    UnsupportedVersion { found: Option<Value> },

    /// A parser was explicitly requested for a document tagged with another version.
    #[error("version mismatch: requested the {requested} parser but the document declares {declared}")]
    VersionMismatch {
        requested: SchemaVersion,
        declared: SchemaVersion,
    },

    /// A required field is missing, mistyped, or out of bounds.
    ///
    /// `path`/`reason` describe the first problem in document order; `related`
    /// holds the other problems found in the same story.
    #[error("validation error at {path}: {reason}{}", more_issues(.related))]
    Validation {
        path: String,
        reason: String,
        related: Vec<FieldIssue>,
    },

    /// The input is not a well-formed JSON object at all.
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

fn describe_found(found: &Option<Value>) -> String {
    match found {
        Some(value) => value.to_string(),
        None => "missing".to_string(),
    }
}

fn more_issues(related: &[FieldIssue]) -> String {
    match related.len() {
        0 => String::new(),
        1 => " (and 1 more issue)".to_string(),
        n => format!(" (and {n} more issues)"),
    }
}

impl ParseError {
    pub fn validation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            reason: reason.into(),
            related: Vec::new(),
        }
    }

    pub(crate) fn from_issues(first: FieldIssue, related: Vec<FieldIssue>) -> Self {
        Self::Validation {
            path: first.path,
            reason: first.reason,
            related,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedVersion { .. } => ErrorKind::UnsupportedVersion,
            Self::VersionMismatch { .. } => ErrorKind::VersionMismatch,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
        }
    }

    /// Path of the offending field; only validation errors carry one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Validation { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Every field issue carried by a validation error, primary issue first.
    pub fn issues(&self) -> Vec<FieldIssue> {
        match self {
            Self::Validation {
                path,
                reason,
                related,
            } => std::iter::once(FieldIssue::new(path.clone(), reason.clone()))
                .chain(related.iter().cloned())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload::from(self)
    }
}

impl From<FieldIssue> for ParseError {
    fn from(issue: FieldIssue) -> Self {
        Self::from_issues(issue, Vec::new())
    }
}

/// Coarse classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedVersion,
    VersionMismatch,
    Validation,
    MalformedInput,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "unsupported_version",
            Self::VersionMismatch => "version_mismatch",
            Self::Validation => "validation",
            Self::MalformedInput => "malformed_input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable error body handed to hosting layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<FieldIssue>,
}

impl From<&ParseError> for ErrorPayload {
    fn from(err: &ParseError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            path: err.path().map(str::to_string),
            issues: err.issues(),
        }
    }
}

/// A specialized Result type for hn-core logic.
pub type Result<T> = std::result::Result<T, ParseError>;
