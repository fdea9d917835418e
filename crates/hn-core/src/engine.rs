//! Version-aware entry point used by hosting layers.

use std::sync::Arc;

use serde_json::Value;

use crate::compat::DowngradePolicy;
use crate::error::{ParseError, Result};
use crate::models::Dataset;
use crate::traits::{DatasetParser, EngagementStrategy};
use crate::v1::ParserV1;
use crate::v2::ParserV2;
use crate::version::{self, SchemaVersion};

/// Holds one configured parser per schema and dispatches on the declared
/// version. Cheap to clone and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    v1: ParserV1,
    v2: ParserV2,
}

impl Engine {
    pub fn new(downgrade: DowngradePolicy, strategy: Arc<dyn EngagementStrategy>) -> Self {
        Self {
            v1: ParserV1::new(downgrade),
            v2: ParserV2::with_strategy(strategy),
        }
    }

    pub fn with_downgrade(downgrade: DowngradePolicy) -> Self {
        Self {
            v1: ParserV1::new(downgrade),
            ..Self::default()
        }
    }

    pub fn parser(&self, version: SchemaVersion) -> &dyn DatasetParser {
        match version {
            SchemaVersion::V1 => &self.v1,
            SchemaVersion::V2 => &self.v2,
        }
    }

    /// Parses with the parser matching the document's declared version.
    pub fn parse(&self, raw: &Value) -> Result<Dataset> {
        let declared = version::detect(raw)?;
        self.parser(declared).parse(raw)
    }

    /// Parses with an explicitly requested parser, subject to the
    /// compatibility policy.
    pub fn parse_as(&self, requested: SchemaVersion, raw: &Value) -> Result<Dataset> {
        self.parser(requested).parse(raw)
    }

    /// Decodes raw JSON text first; syntax errors surface as `MalformedInput`.
    pub fn parse_slice(&self, bytes: &[u8], requested: Option<SchemaVersion>) -> Result<Dataset> {
        let raw: Value = serde_json::from_slice(bytes)
            .map_err(|err| ParseError::MalformedInput(format!("invalid JSON: {err}")))?;
        match requested {
            Some(version) => self.parse_as(version, &raw),
            None => self.parse(&raw),
        }
    }
}
