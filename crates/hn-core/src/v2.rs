//! # Schema-V2 Parser
//!
//! Validates a `"2.0"` document and builds the V2 entity graph. Shares field
//! validation with V1 but constructs its own comments and stories, scores each
//! story with the configured [`EngagementStrategy`], and finishes with the
//! dataset-level [`Metrics`](crate::models::Metrics).
//!
//! Derived blocks (`relationships`, `engagement_score`, `metrics`) are never
//! read from input; they are always recomputed.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::compat::{self, DowngradePolicy};
use crate::engagement::LogEngagement;
use crate::error::Result;
use crate::field::{FieldPath, Fields, Report, Seen};
use crate::metrics::{self, mean};
use crate::models::{CommentV2, Dataset, DatasetV2, Relationships, Sentiment, StoryV2};
use crate::traits::{DatasetParser, EngagementStrategy};
use crate::version::{self, SchemaVersion};

pub const SENTIMENT_RANGE: RangeInclusive<f64> = -1.0..=1.0;
pub const CONFIDENCE_RANGE: RangeInclusive<f64> = 0.0..=1.0;

const DERIVED_STORY_FIELDS: [&str; 2] = ["engagement_score", "relationships"];

#[derive(Clone)]
pub struct ParserV2 {
    strategy: Arc<dyn EngagementStrategy>,
}

impl Default for ParserV2 {
    fn default() -> Self {
        Self::with_strategy(Arc::new(LogEngagement))
    }
}

impl fmt::Debug for ParserV2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserV2").finish_non_exhaustive()
    }
}

impl ParserV2 {
    pub fn with_strategy(strategy: Arc<dyn EngagementStrategy>) -> Self {
        Self { strategy }
    }

    /// Typed variant of [`DatasetParser::parse`].
    #[instrument(level = "debug", skip_all, fields(schema = "2.0"))]
    pub fn parse_dataset(&self, raw: &Value) -> Result<DatasetV2> {
        let declared = version::detect(raw)?;
        // The downgrade policy only widens the V1 parser; V2 always refuses "1.0".
        compat::admit(SchemaVersion::V2, declared, DowngradePolicy::Reject)?;

        let root = Fields::object(raw, FieldPath::root())?;
        let timestamp = root.timestamp("timestamp")?;
        let raw_stories = root.array("stories")?;
        if root.has("metrics") {
            debug!("ignoring supplied metrics block; metrics are always recomputed");
        }

        let stories_path = root.path().key("stories");
        let mut ids = Seen::new("story id");
        let mut ranks = Seen::new("rank");
        let stories = raw_stories
            .iter()
            .enumerate()
            .map(|(index, raw_story)| {
                self.story(raw_story, stories_path.index(index), &mut ids, &mut ranks)
            })
            .collect::<Result<Vec<_>>>()?;

        let metrics = metrics::compute(&stories);
        debug!(
            stories = metrics.total_stories,
            comments = metrics.total_comments,
            "parsed dataset"
        );
        Ok(DatasetV2 {
            timestamp,
            stories,
            metrics,
        })
    }

    fn story(
        &self,
        raw: &Value,
        path: FieldPath,
        ids: &mut Seen<String>,
        ranks: &mut Seen<u64>,
    ) -> Result<StoryV2> {
        let fields = Fields::object(raw, path)?;
        let mut report = Report::default();

        let id = report.take(
            fields
                .string("id")
                .and_then(|id| ids.claim(id, fields.path().key("id"))),
        );
        let title = report.take(fields.string("title"));
        let url = report.take(fields.string("url"));
        let domain = report.take(fields.string("domain"));
        let author = report.take(fields.string("author"));
        let timestamp = report.take(fields.timestamp("timestamp"));
        let points = report.take(fields.non_negative_int("points"));
        let rank = report.take(
            fields
                .positive_int("rank")
                .and_then(|rank| ranks.claim(rank, fields.path().key("rank"))),
        );
        let sentiment = sentiment(&fields, &mut report);

        let comments_path = fields.path().key("comments");
        let mut comment_ids = Seen::new("comment id");
        let comments: Vec<CommentV2> = report
            .take(fields.optional_array("comments"))
            .iter()
            .enumerate()
            .map(|(index, raw_comment)| {
                comment(raw_comment, comments_path.index(index), &mut comment_ids, &mut report)
            })
            .collect();

        report.finish()?;

        for name in DERIVED_STORY_FIELDS {
            if fields.has(name) {
                debug!(field = %fields.path().key(name), "ignoring supplied derived field");
            }
        }

        let engagement_score = self.engagement(points, &comments, fields.path());
        let relationships = Relationships {
            comment_count: comments.len(),
            comment_sentiment_avg: mean(comments.iter().filter_map(|c| c.sentiment_score)),
        };

        Ok(StoryV2 {
            id,
            title,
            url,
            domain,
            author,
            timestamp,
            points,
            rank,
            comments,
            sentiment,
            engagement_score,
            relationships,
        })
    }

    fn engagement(&self, points: u64, comments: &[CommentV2], path: &FieldPath) -> Option<f64> {
        match self.strategy.score(points, comments) {
            Some(score) if score.is_finite() && score >= 0.0 => Some(score),
            Some(score) => {
                warn!(story = %path, score, "engagement strategy returned an unusable score; leaving it unset");
                None
            }
            None => None,
        }
    }
}

impl DatasetParser for ParserV2 {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::V2
    }

    fn parse(&self, raw: &Value) -> Result<Dataset> {
        self.parse_dataset(raw).map(Dataset::V2)
    }
}

fn comment(
    raw: &Value,
    path: FieldPath,
    ids: &mut Seen<String>,
    report: &mut Report,
) -> CommentV2 {
    let fields = match Fields::object(raw, path) {
        Ok(fields) => fields,
        Err(issue) => {
            report.push(issue);
            return CommentV2::default();
        }
    };

    let id = report.take(
        fields
            .string("id")
            .and_then(|id| ids.claim(id, fields.path().key("id"))),
    );
    let author = report.take(fields.string("author"));
    let timestamp = report.take(fields.timestamp("timestamp"));
    let text = report.take(fields.string("text"));
    let flat = report.take(fields.optional_bounded("sentiment_score", SENTIMENT_RANGE));
    let sentiment = sentiment(&fields, report);

    // Both sources must agree; the nested score fills in when the flat one is absent.
    let sentiment_score = match (flat, sentiment.as_ref().map(|s| s.score)) {
        (Some(flat), Some(nested)) if flat != nested => {
            report.push(fields.path().key("sentiment_score").issue(format!(
                "conflicts with sentiment.score ({nested})"
            )));
            None
        }
        (Some(flat), _) => Some(flat),
        (None, nested) => nested,
    };

    CommentV2 {
        id,
        author,
        timestamp,
        text,
        sentiment_score,
        sentiment,
    }
}

/// Optional nested `sentiment` object; `None` when absent or invalid.
fn sentiment(fields: &Fields<'_>, report: &mut Report) -> Option<Sentiment> {
    let before = report.count();
    let nested = report.take(fields.optional_object("sentiment"))?;
    let sentiment = Sentiment {
        score: report.take(nested.bounded("score", SENTIMENT_RANGE)),
        confidence: report.take(nested.optional_bounded("confidence", CONFIDENCE_RANGE)),
        aspects: report.take(nested.string_list("aspects")),
    };
    (report.count() == before).then_some(sentiment)
}
