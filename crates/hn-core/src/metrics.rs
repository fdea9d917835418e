//! # Metric Calculator
//!
//! Pure aggregation over a completed V2 story graph.

use crate::models::{Metrics, StoryV2};

/// Arithmetic mean, or `0.0` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Computes dataset-level metrics.
///
/// Comments without a sentiment score and stories without an engagement
/// score are left out of the respective denominators.
pub fn compute(stories: &[StoryV2]) -> Metrics {
    Metrics {
        total_stories: stories.len(),
        total_comments: stories.iter().map(|story| story.comments.len()).sum(),
        comment_sentiment_avg: mean(
            stories
                .iter()
                .flat_map(|story| &story.comments)
                .filter_map(|comment| comment.sentiment_score),
        ),
        engagement_score_avg: mean(stories.iter().filter_map(|story| story.engagement_score)),
    }
}
