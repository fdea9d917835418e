//! Field-level validation primitives shared by both schema parsers.
//!
//! These only read and check raw JSON; building entities stays with each
//! parser so the two schemas never share constructors.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

use crate::error::{FieldIssue, ParseError, Result};

/// Dotted path into the raw document, rendered as `stories[2].comments[0].id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn issue(&self, reason: impl Into<String>) -> FieldIssue {
        FieldIssue::new(self.0.clone(), reason)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable JSON type, used in "expected X, found Y" reasons.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS[.fff]` date-times.
pub(crate) fn is_iso8601(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Collects field issues so a whole story can be checked before failing.
#[derive(Debug, Default)]
pub(crate) struct Report {
    issues: Vec<FieldIssue>,
}

impl Report {
    /// Returns the checked value, or records the issue and yields a placeholder.
    ///
    /// Placeholders never escape: callers must run [`Report::finish`] before
    /// building an entity from the values.
    pub fn take<T: Default>(&mut self, checked: std::result::Result<T, FieldIssue>) -> T {
        match checked {
            Ok(value) => value,
            Err(issue) => {
                self.issues.push(issue);
                T::default()
            }
        }
    }

    pub fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    pub fn count(&self) -> usize {
        self.issues.len()
    }

    pub fn finish(self) -> Result<()> {
        let mut issues = self.issues.into_iter();
        match issues.next() {
            None => Ok(()),
            Some(first) => Err(ParseError::from_issues(first, issues.collect())),
        }
    }
}

/// Tracks keys that must be unique within one owner (stories in a dataset,
/// comments in a story).
#[derive(Debug)]
pub(crate) struct Seen<K> {
    what: &'static str,
    keys: HashSet<K>,
}

impl<K: Eq + Hash + Clone + fmt::Debug> Seen<K> {
    pub fn new(what: &'static str) -> Self {
        Self {
            what,
            keys: HashSet::new(),
        }
    }

    /// Registers `key`, handing it back when it has not been seen before.
    pub fn claim(&mut self, key: K, path: FieldPath) -> std::result::Result<K, FieldIssue> {
        if self.keys.insert(key.clone()) {
            Ok(key)
        } else {
            Err(path.issue(format!("duplicate {} {:?}", self.what, key)))
        }
    }
}

/// Typed, path-aware view over one JSON object.
#[derive(Debug, Clone)]
pub(crate) struct Fields<'a> {
    object: &'a Map<String, Value>,
    path: FieldPath,
}

type Checked<T> = std::result::Result<T, FieldIssue>;

impl<'a> Fields<'a> {
    pub fn object(value: &'a Value, path: FieldPath) -> Checked<Self> {
        match value.as_object() {
            Some(object) => Ok(Self { object, path }),
            None => Err(path.issue(format!("expected an object, found {}", type_name(value)))),
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// True when `name` is present with a non-null value.
    pub fn has(&self, name: &str) -> bool {
        self.optional(name).is_some()
    }

    fn optional(&self, name: &str) -> Option<&'a Value> {
        self.object.get(name).filter(|value| !value.is_null())
    }

    fn required(&self, name: &str) -> Checked<&'a Value> {
        self.object
            .get(name)
            .ok_or_else(|| self.path.key(name).issue("missing required field"))
    }

    fn mistyped(&self, name: &str, expected: &str, found: &Value) -> FieldIssue {
        self.path
            .key(name)
            .issue(format!("expected {expected}, found {}", type_name(found)))
    }

    pub fn string(&self, name: &str) -> Checked<String> {
        match self.required(name)? {
            Value::String(text) => Ok(text.clone()),
            other => Err(self.mistyped(name, "a string", other)),
        }
    }

    pub fn timestamp(&self, name: &str) -> Checked<String> {
        let text = self.string(name)?;
        if is_iso8601(&text) {
            Ok(text)
        } else {
            Err(self
                .path
                .key(name)
                .issue(format!("expected an ISO-8601 timestamp, found {text:?}")))
        }
    }

    pub fn non_negative_int(&self, name: &str) -> Checked<u64> {
        let value = self.required(name)?;
        match value.as_u64() {
            Some(number) => Ok(number),
            None if value.is_number() => Err(self
                .path
                .key(name)
                .issue(format!("expected a non-negative integer, found {value}"))),
            None => Err(self.mistyped(name, "a non-negative integer", value)),
        }
    }

    pub fn positive_int(&self, name: &str) -> Checked<u64> {
        let value = self.required(name)?;
        match value.as_u64() {
            Some(number) if number > 0 => Ok(number),
            _ if value.is_number() => Err(self
                .path
                .key(name)
                .issue(format!("expected a positive integer, found {value}"))),
            _ => Err(self.mistyped(name, "a positive integer", value)),
        }
    }

    pub fn bounded(&self, name: &str, range: RangeInclusive<f64>) -> Checked<f64> {
        let value = self.required(name)?;
        self.within(name, value, range)
    }

    pub fn optional_bounded(&self, name: &str, range: RangeInclusive<f64>) -> Checked<Option<f64>> {
        match self.optional(name) {
            Some(value) => self.within(name, value, range).map(Some),
            None => Ok(None),
        }
    }

    fn within(&self, name: &str, value: &Value, range: RangeInclusive<f64>) -> Checked<f64> {
        let number = value
            .as_f64()
            .ok_or_else(|| self.mistyped(name, "a number", value))?;
        if range.contains(&number) {
            Ok(number)
        } else {
            Err(self.path.key(name).issue(format!(
                "must be within [{}, {}], found {number}",
                range.start(),
                range.end()
            )))
        }
    }

    pub fn array(&self, name: &str) -> Checked<&'a [Value]> {
        match self.required(name)? {
            Value::Array(items) => Ok(items),
            other => Err(self.mistyped(name, "an array", other)),
        }
    }

    /// Like [`Fields::array`], but an absent or null field reads as empty.
    pub fn optional_array(&self, name: &str) -> Checked<&'a [Value]> {
        match self.optional(name) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(self.mistyped(name, "an array", other)),
        }
    }

    pub fn optional_object(&self, name: &str) -> Checked<Option<Fields<'a>>> {
        self.optional(name)
            .map(|value| Fields::object(value, self.path.key(name)))
            .transpose()
    }

    /// Optional array of strings; absent reads as empty.
    pub fn string_list(&self, name: &str) -> Checked<Vec<String>> {
        let path = self.path.key(name);
        self.optional_array(name)?
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(text) => Ok(text.clone()),
                other => Err(path
                    .index(index)
                    .issue(format!("expected a string, found {}", type_name(other)))),
            })
            .collect()
    }
}
