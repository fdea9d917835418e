//! hn-parser/crates/hn-core/src/lib.rs
//!
//! The version-aware parsing, validation and metric-derivation engine for
//! forum snapshots. Pure and synchronous: no I/O, no shared mutable state.

pub mod compat;
pub mod engagement;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod models;
pub mod traits;
pub mod v1;
pub mod v2;
pub mod version;

mod field;

// Re-exporting for easier access in other crates
pub use compat::DowngradePolicy;
pub use engagement::LogEngagement;
pub use engine::Engine;
pub use error::*;
pub use models::*;
pub use traits::*;
pub use v1::ParserV1;
pub use v2::ParserV2;
pub use version::{detect, SchemaVersion};

use serde_json::Value;

/// Parses `raw` with the parser matching its declared version, using the
/// default policy and engagement strategy.
pub fn parse(raw: &Value) -> Result<Dataset> {
    Engine::default().parse(raw)
}

/// Parses `raw` with an explicitly requested parser.
pub fn parse_as(requested: SchemaVersion, raw: &Value) -> Result<Dataset> {
    Engine::default().parse_as(requested, raw)
}

/// Parses raw JSON text.
pub fn parse_str(input: &str) -> Result<Dataset> {
    Engine::default().parse_slice(input.as_bytes(), None)
}
