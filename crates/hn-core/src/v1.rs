//! # Schema-V1 Parser
//!
//! Validates a `"1.0"` document and builds the base entity graph: comments
//! first, then their story, then the dataset. Nothing is derived.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "timestamp": "2024-03-14T12:00:00Z",
//!   "stories": [{
//!     "id": "123", "title": "Story title", "url": "https://example.com",
//!     "domain": "example.com", "author": "pg", "timestamp": "2024-03-14T10:00:00Z",
//!     "points": 123, "rank": 1,
//!     "comments": [{ "id": "c1", "author": "dang", "timestamp": "2024-03-14T11:00:00Z", "text": "..." }]
//!   }]
//! }
//! ```

use serde_json::Value;
use tracing::{debug, instrument};

use crate::compat::{self, DowngradePolicy};
use crate::error::Result;
use crate::field::{FieldPath, Fields, Report, Seen};
use crate::models::{Comment, Dataset, DatasetV1, Story};
use crate::traits::DatasetParser;
use crate::version::{self, SchemaVersion};

#[derive(Debug, Clone, Copy, Default)]
pub struct ParserV1 {
    downgrade: DowngradePolicy,
}

impl ParserV1 {
    pub fn new(downgrade: DowngradePolicy) -> Self {
        Self { downgrade }
    }

    pub fn downgrade(&self) -> DowngradePolicy {
        self.downgrade
    }

    /// Typed variant of [`DatasetParser::parse`].
    ///
    /// Stops at the first invalid story, reporting every issue inside it.
    #[instrument(level = "debug", skip_all, fields(schema = "1.0"))]
    pub fn parse_dataset(&self, raw: &Value) -> Result<DatasetV1> {
        let declared = version::detect(raw)?;
        compat::admit(SchemaVersion::V1, declared, self.downgrade)?;

        let root = Fields::object(raw, FieldPath::root())?;
        let timestamp = root.timestamp("timestamp")?;
        let raw_stories = root.array("stories")?;

        let stories_path = root.path().key("stories");
        let mut ids = Seen::new("story id");
        let mut ranks = Seen::new("rank");
        let stories = raw_stories
            .iter()
            .enumerate()
            .map(|(index, raw_story)| {
                story(raw_story, stories_path.index(index), &mut ids, &mut ranks)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(stories = stories.len(), "parsed dataset");
        Ok(DatasetV1 { timestamp, stories })
    }
}

impl DatasetParser for ParserV1 {
    fn version(&self) -> SchemaVersion {
        SchemaVersion::V1
    }

    fn parse(&self, raw: &Value) -> Result<Dataset> {
        self.parse_dataset(raw).map(Dataset::V1)
    }
}

fn story(
    raw: &Value,
    path: FieldPath,
    ids: &mut Seen<String>,
    ranks: &mut Seen<u64>,
) -> Result<Story> {
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

    let comments_path = fields.path().key("comments");
    let mut comment_ids = Seen::new("comment id");
    let comments: Vec<Comment> = report
        .take(fields.optional_array("comments"))
        .iter()
        .enumerate()
        .map(|(index, raw_comment)| {
            comment(raw_comment, comments_path.index(index), &mut comment_ids, &mut report)
        })
        .collect();

    report.finish()?;
    Ok(Story {
        id,
        title,
        url,
        domain,
        author,
        timestamp,
        points,
        rank,
        comments,
    })
}

fn comment(
    raw: &Value,
    path: FieldPath,
    ids: &mut Seen<String>,
    report: &mut Report,
) -> Comment {
    let fields = match Fields::object(raw, path) {
        Ok(fields) => fields,
        Err(issue) => {
            report.push(issue);
            return Comment::default();
        }
    };

    Comment {
        id: report.take(
            fields
                .string("id")
                .and_then(|id| ids.claim(id, fields.path().key("id"))),
        ),
        author: report.take(fields.string("author")),
        timestamp: report.take(fields.timestamp("timestamp")),
        text: report.take(fields.string("text")),
    }
}
