use std::sync::Arc;

use hn_core::traits::MockEngagementStrategy;
use hn_core::{parse, Dataset, DatasetV2, Engine, ErrorKind, LogEngagement, ParserV2};
use integration_tests::{comment, document, minimal, sample_v2, story};
use serde_json::json;

fn v2(dataset: Dataset) -> DatasetV2 {
    match dataset {
        Dataset::V2(v2) => v2,
        Dataset::V1(_) => panic!("expected a 2.0 dataset"),
    }
}

#[test]
fn opposite_comment_sentiments_cancel_out() {
    let raw = document(
        "2.0",
        vec![story(1, 10, json!([comment("c1", Some(0.5)), comment("c2", Some(-0.5))]))],
    );
    let dataset = v2(parse(&raw).unwrap());
    assert_eq!(dataset.metrics.comment_sentiment_avg, 0.0);
    assert_eq!(dataset.metrics.total_comments, 2);
}

#[test]
fn no_sentiments_average_to_zero() {
    let dataset = v2(parse(&minimal("2.0")).unwrap());
    assert_eq!(dataset.metrics.comment_sentiment_avg, 0.0);
    assert_eq!(dataset.stories[0].relationships.comment_sentiment_avg, 0.0);
    assert_eq!(dataset.metrics.total_stories, 1);
}

#[test]
fn bundled_sample_derives_relationships_and_metrics() {
    let dataset = ParserV2::default().parse_dataset(&sample_v2()).unwrap();

    let first = &dataset.stories[0];
    assert_eq!(first.relationships.comment_count, 3);
    // 0.1 from the flat field, 0.8 from the nested block, third comment unscored.
    assert!((first.relationships.comment_sentiment_avg - 0.45).abs() < 1e-9);
    assert_eq!(first.sentiment.as_ref().unwrap().aspects, ["tooling", "performance"]);

    let expected_comment_avg = (0.1 + 0.8 - 0.2) / 3.0;
    assert!((dataset.metrics.comment_sentiment_avg - expected_comment_avg).abs() < 1e-9);

    let expected_engagement = (LogEngagement::formula(142, 3) + LogEngagement::formula(87, 1)) / 2.0;
    assert!((dataset.metrics.engagement_score_avg - expected_engagement).abs() < 1e-9);
}

#[test]
fn supplied_derived_values_are_recomputed() {
    let mut raw = minimal("2.0");
    raw["stories"][0]["engagement_score"] = json!(999.0);
    raw["stories"][0]["relationships"] = json!({"comment_count": 40});
    raw["metrics"] = json!({"total_stories": 7});

    let dataset = v2(parse(&raw).unwrap());
    assert_eq!(dataset.stories[0].engagement_score, Some(LogEngagement::formula(10, 0)));
    assert_eq!(dataset.stories[0].relationships.comment_count, 0);
    assert_eq!(dataset.metrics.total_stories, 1);
}

#[test]
fn out_of_range_story_sentiment_is_rejected() {
    let mut raw = minimal("2.0");
    raw["stories"][0]["sentiment"] = json!({"score": -1.5});

    let err = parse(&raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.path(), Some("stories[0].sentiment.score"));
}

#[test]
fn duplicate_comment_ids_are_rejected() {
    let raw = document(
        "2.0",
        vec![story(1, 3, json!([comment("c1", None), comment("c1", None)]))],
    );
    let err = parse(&raw).unwrap_err();
    assert_eq!(err.path(), Some("stories[0].comments[1].id"));
}

#[test]
fn custom_strategy_drives_engagement() {
    let mut strategy = MockEngagementStrategy::new();
    strategy
        .expect_score()
        .withf(|points, comments| *points == 10 && comments.is_empty())
        .times(1)
        .return_const(Some(2.5));

    let engine = Engine::new(Default::default(), Arc::new(strategy));
    let dataset = v2(engine.parse(&minimal("2.0")).unwrap());
    assert_eq!(dataset.stories[0].engagement_score, Some(2.5));
    assert_eq!(dataset.metrics.engagement_score_avg, 2.5);
}

#[test]
fn unscored_stories_are_left_out_of_the_engagement_average() {
    let strategy = |points: u64, _: &[hn_core::CommentV2]| -> Option<f64> {
        (points > 5).then_some(points as f64)
    };
    let engine = Engine::new(Default::default(), Arc::new(strategy));
    let raw = document("2.0", vec![story(1, 10, json!([])), story(2, 1, json!([]))]);

    let dataset = v2(engine.parse(&raw).unwrap());
    assert_eq!(dataset.stories[1].engagement_score, None);
    assert_eq!(dataset.metrics.engagement_score_avg, 10.0);
}

#[test]
fn serialized_dataset_includes_metrics() {
    let value = serde_json::to_value(parse(&minimal("2.0")).unwrap()).unwrap();
    assert_eq!(value["version"], "2.0");
    assert_eq!(value["metrics"]["total_stories"], 1);
    assert_eq!(value["stories"][0]["relationships"]["comment_count"], 0);
}
