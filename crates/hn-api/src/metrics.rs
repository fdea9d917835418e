//! Prometheus instrumentation, exposed at `GET /metrics`.

use std::fmt;

use hn_core::{Dataset, ParseError};
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

/// Label set for parse outcomes.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ParseLabels {
    /// Schema of the produced dataset, or the declared one when known.
    pub version: String,
    /// `ok` or the error kind.
    pub outcome: String,
}

pub struct ApiMetrics {
    registry: Registry,
    parse_requests_total: Family<ParseLabels, Counter>,
}

impl fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiMetrics").finish_non_exhaustive()
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let parse_requests_total = Family::<ParseLabels, Counter>::default();
        registry.register(
            "hn_parse_requests",
            "Parse requests by schema version and outcome",
            parse_requests_total.clone(),
        );

        Self {
            registry,
            parse_requests_total,
        }
    }

    pub fn record(&self, outcome: &Result<Dataset, ParseError>) {
        let labels = match outcome {
            Ok(dataset) => ParseLabels {
                version: dataset.version().to_string(),
                outcome: "ok".into(),
            },
            Err(err) => ParseLabels {
                version: match err {
                    ParseError::VersionMismatch { declared, .. } => declared.to_string(),
                    _ => "unknown".into(),
                },
                outcome: err.kind().to_string(),
            },
        };
        self.parse_requests_total.get_or_create(&labels).inc();
    }

    pub fn count(&self, version: &str, outcome: &str) -> u64 {
        self.parse_requests_total
            .get_or_create(&ParseLabels {
                version: version.into(),
                outcome: outcome.into(),
            })
            .get()
    }

    /// Renders the registry in the OpenMetrics text format.
    pub fn encode(&self) -> Result<String, fmt::Error> {
        let mut buf = String::new();
        encode(&mut buf, &self.registry)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_core::SchemaVersion;

    #[test]
    fn outcomes_are_counted_by_version_and_kind() {
        let metrics = ApiMetrics::new();
        metrics.record(&Err(ParseError::VersionMismatch {
            requested: SchemaVersion::V2,
            declared: SchemaVersion::V1,
        }));
        metrics.record(&Err(ParseError::MalformedInput("x".into())));

        assert_eq!(metrics.count("1.0", "version_mismatch"), 1);
        assert_eq!(metrics.count("unknown", "malformed_input"), 1);
        assert_eq!(metrics.count("2.0", "ok"), 0);
    }

    #[test]
    fn exposition_names_the_counter() {
        let metrics = ApiMetrics::new();
        metrics.record(&Err(ParseError::MalformedInput("x".into())));
        let text = metrics.encode().unwrap();
        assert!(text.contains("hn_parse_requests_total"));
        assert!(text.contains("outcome=\"malformed_input\""));
    }
}
