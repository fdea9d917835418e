//! # Domain Models
//!
//! Entities produced by the schema parsers. Each schema owns its own comment
//! and story types; a V2 story never holds V1 comments. Stories own their
//! comments by value and nothing is shared between parse calls.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::version::SchemaVersion;

/// A single reply within a V1 story's thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comment {
    /// Unique within the owning story.
    pub id: String,
    pub author: String,
    /// ISO-8601, kept exactly as supplied.
    pub timestamp: String,
    pub text: String,
}

/// A V1 discussion thread with its comments in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Story {
    /// Unique within the dataset.
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub author: String,
    pub timestamp: String,
    pub points: u64,
    /// Front-page position; unique within the dataset, not necessarily contiguous.
    pub rank: u64,
    pub comments: Vec<Comment>,
}

/// Sentiment analysis attached to a V2 comment or story.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentiment {
    /// Polarity in `[-1.0, 1.0]`.
    pub score: f64,
    /// Classifier confidence in `[0.0, 1.0]`, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub aspects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentV2 {
    pub id: String,
    pub author: String,
    pub timestamp: String,
    pub text: String,
    /// Polarity in `[-1.0, 1.0]`. Comments without one are left out of averages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// Per-story aggregates derived from the story's own comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationships {
    pub comment_count: usize,
    /// Mean of the defined comment sentiment scores, `0.0` when there are none.
    pub comment_sentiment_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryV2 {
    pub id: String,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub author: String,
    pub timestamp: String,
    pub points: u64,
    pub rank: u64,
    pub comments: Vec<CommentV2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    /// Derived by the configured engagement strategy; never read from input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,
    pub relationships: Relationships,
}

/// Dataset-level aggregates; only V2 datasets carry them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_stories: usize,
    pub total_comments: usize,
    pub comment_sentiment_avg: f64,
    pub engagement_score_avg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetV1 {
    /// When the snapshot was taken.
    pub timestamp: String,
    pub stories: Vec<Story>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetV2 {
    pub timestamp: String,
    pub stories: Vec<StoryV2>,
    pub metrics: Metrics,
}

/// A parsed snapshot, tagged by the parser that produced it.
///
/// The wire `version` is derived from the variant, so a dataset can never be
/// tagged with a version other than the one its parser targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    V1(DatasetV1),
    V2(DatasetV2),
}

impl Dataset {
    pub fn version(&self) -> SchemaVersion {
        match self {
            Self::V1(_) => SchemaVersion::V1,
            Self::V2(_) => SchemaVersion::V2,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Self::V1(data) => &data.timestamp,
            Self::V2(data) => &data.timestamp,
        }
    }

    /// Always `None` for V1 datasets.
    pub fn metrics(&self) -> Option<&Metrics> {
        match self {
            Self::V1(_) => None,
            Self::V2(data) => Some(&data.metrics),
        }
    }

    pub fn story_count(&self) -> usize {
        match self {
            Self::V1(data) => data.stories.len(),
            Self::V2(data) => data.stories.len(),
        }
    }

    pub fn comment_count(&self) -> usize {
        match self {
            Self::V1(data) => data.stories.iter().map(|story| story.comments.len()).sum(),
            Self::V2(data) => data.stories.iter().map(|story| story.comments.len()).sum(),
        }
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::V1(data) => {
                let mut state = serializer.serialize_struct("Dataset", 3)?;
                state.serialize_field("version", &SchemaVersion::V1)?;
                state.serialize_field("timestamp", &data.timestamp)?;
                state.serialize_field("stories", &data.stories)?;
                state.end()
            }
            Self::V2(data) => {
                let mut state = serializer.serialize_struct("Dataset", 4)?;
                state.serialize_field("version", &SchemaVersion::V2)?;
                state.serialize_field("timestamp", &data.timestamp)?;
                state.serialize_field("stories", &data.stories)?;
                state.serialize_field("metrics", &data.metrics)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn story() -> Story {
        Story {
            id: "123".into(),
            title: "T".into(),
            url: "u".into(),
            domain: "d".into(),
            author: "a".into(),
            timestamp: "2024-03-14T10:00:00Z".into(),
            points: 10,
            rank: 1,
            comments: vec![Comment {
                id: "c1".into(),
                author: "b".into(),
                timestamp: "2024-03-14T11:00:00Z".into(),
                text: "hi".into(),
            }],
        }
    }

    #[test]
    fn v1_dataset_serializes_without_metrics() {
        let dataset = Dataset::V1(DatasetV1 {
            timestamp: "2024-03-14T12:00:00Z".into(),
            stories: vec![story()],
        });
        let body = serde_json::to_value(&dataset).unwrap();
        assert_eq!(body["version"], "1.0");
        assert_eq!(body["stories"][0]["comments"][0]["id"], "c1");
        assert!(body.get("metrics").is_none());
        assert!(dataset.metrics().is_none());
        assert_eq!(dataset.comment_count(), 1);
    }

    #[test]
    fn v2_dataset_serializes_metrics_and_skips_unset_scores() {
        let dataset = Dataset::V2(DatasetV2 {
            timestamp: "2024-03-14T12:00:00Z".into(),
            stories: vec![StoryV2 {
                id: "1".into(),
                title: "T".into(),
                url: "u".into(),
                domain: "d".into(),
                author: "a".into(),
                timestamp: "2024-03-14T10:00:00Z".into(),
                points: 0,
                rank: 4,
                comments: vec![CommentV2 {
                    id: "c1".into(),
                    ..CommentV2::default()
                }],
                sentiment: None,
                engagement_score: None,
                relationships: Relationships {
                    comment_count: 1,
                    comment_sentiment_avg: 0.0,
                },
            }],
            metrics: Metrics {
                total_stories: 1,
                total_comments: 1,
                comment_sentiment_avg: 0.0,
                engagement_score_avg: 0.0,
            },
        });
        let body = serde_json::to_value(&dataset).unwrap();
        assert_eq!(body["version"], "2.0");
        assert_eq!(body["metrics"]["total_comments"], json!(1));
        assert!(body["stories"][0].get("engagement_score").is_none());
        assert!(body["stories"][0]["comments"][0].get("sentiment_score").is_none());
        assert_eq!(body["stories"][0]["relationships"]["comment_count"], json!(1));
    }
}
