//! # Core Traits (Ports)
//!
//! Each schema parser implements [`DatasetParser`] on its own; hosting layers
//! pick one through [`SchemaVersion`] rather than through a type hierarchy.

use serde_json::Value;

use crate::error::Result;
use crate::models::{CommentV2, Dataset};
use crate::version::SchemaVersion;

/// Capability shared by every schema parser.
pub trait DatasetParser: Send + Sync {
    /// The schema this parser targets and tags its datasets with.
    fn version(&self) -> SchemaVersion;

    /// Validates `raw` and builds a fresh, independent entity graph.
    fn parse(&self, raw: &Value) -> Result<Dataset>;
}

/// Policy that derives a V2 story's `engagement_score`.
///
/// Implementations must be pure: the score may depend only on the story's
/// own points and comments. Returning `None` leaves the story unscored.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait EngagementStrategy: Send + Sync {
    fn score(&self, points: u64, comments: &[CommentV2]) -> Option<f64>;
}

impl<F> EngagementStrategy for F
where
    F: Fn(u64, &[CommentV2]) -> Option<f64> + Send + Sync,
{
    fn score(&self, points: u64, comments: &[CommentV2]) -> Option<f64> {
        self(points, comments)
    }
}
