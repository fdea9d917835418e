//! Plain-text rendering for `parse --summary`.

use std::fmt::Write;

use hn_core::Dataset;

pub fn render(dataset: &Dataset) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_summary(&mut out, dataset);
    out
}

fn write_summary(out: &mut String, dataset: &Dataset) -> std::fmt::Result {
    writeln!(out, "Snapshot {} (schema {})", dataset.timestamp(), dataset.version())?;
    writeln!(
        out,
        "{} stories, {} comments",
        dataset.story_count(),
        dataset.comment_count()
    )?;

    match dataset {
        Dataset::V1(v1) => {
            for story in &v1.stories {
                writeln!(
                    out,
                    "  #{} {} by {} ({} points, {} comments)",
                    story.rank,
                    story.title,
                    story.author,
                    story.points,
                    story.comments.len()
                )?;
            }
        }
        Dataset::V2(v2) => {
            for story in &v2.stories {
                let engagement = story
                    .engagement_score
                    .map_or_else(|| "n/a".to_string(), |score| format!("{score:.3}"));
                writeln!(
                    out,
                    "  #{} {} by {} ({} points, {} comments, engagement {}, sentiment avg {:.3})",
                    story.rank,
                    story.title,
                    story.author,
                    story.points,
                    story.relationships.comment_count,
                    engagement,
                    story.relationships.comment_sentiment_avg
                )?;
            }
            let metrics = &v2.metrics;
            writeln!(
                out,
                "Metrics: comment sentiment avg {:.3}, engagement avg {:.3}",
                metrics.comment_sentiment_avg, metrics.engagement_score_avg
            )?;
        }
    }
    Ok(())
}
