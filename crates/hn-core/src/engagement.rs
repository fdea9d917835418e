//! Default engagement policy.

use crate::models::CommentV2;
use crate::traits::EngagementStrategy;

/// Scores a story as `ln(1 + points) + ln(1 + comment_count)`.
///
/// Non-negative, monotone in both inputs, and a function of the story alone.
/// The logarithms keep a front-page outlier from swamping dataset averages.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEngagement;

impl LogEngagement {
    pub fn formula(points: u64, comment_count: usize) -> f64 {
        (points as f64).ln_1p() + (comment_count as f64).ln_1p()
    }
}

impl EngagementStrategy for LogEngagement {
    fn score(&self, points: u64, comments: &[CommentV2]) -> Option<f64> {
        Some(Self::formula(points, comments.len()))
    }
}
