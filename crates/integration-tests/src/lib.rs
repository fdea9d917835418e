//! Shared fixtures for the integration suites.

use serde_json::{json, Value};

pub const SAMPLE_V1: &str = include_str!("../../../data/hackernews_v1.json");
pub const SAMPLE_V2: &str = include_str!("../../../data/hackernews_v2.json");

pub fn sample_v1() -> Value {
    serde_json::from_str(SAMPLE_V1).expect("bundled V1 sample is valid JSON")
}

pub fn sample_v2() -> Value {
    serde_json::from_str(SAMPLE_V2).expect("bundled V2 sample is valid JSON")
}

/// One story with ten points and no comments.
pub fn minimal(version: &str) -> Value {
    json!({
        "version": version,
        "timestamp": "2024-03-14T12:00:00Z",
        "stories": [story(1, 10, json!([]))]
    })
}

pub fn story(rank: u64, points: u64, comments: Value) -> Value {
    json!({
        "id": format!("s{rank}"),
        "title": format!("Story {rank}"),
        "url": "https://example.com",
        "domain": "example.com",
        "author": "alice",
        "timestamp": "2024-03-14T10:00:00Z",
        "points": points,
        "rank": rank,
        "comments": comments
    })
}

pub fn comment(id: &str, sentiment_score: Option<f64>) -> Value {
    let mut comment = json!({
        "id": id,
        "author": "bob",
        "timestamp": "2024-03-14T11:00:00Z",
        "text": "Interesting."
    });
    if let Some(score) = sentiment_score {
        comment["sentiment_score"] = json!(score);
    }
    comment
}

/// Wraps stories into a document declaring `version`.
pub fn document(version: &str, stories: Vec<Value>) -> Value {
    json!({
        "version": version,
        "timestamp": "2024-03-14T12:00:00Z",
        "stories": stories
    })
}
