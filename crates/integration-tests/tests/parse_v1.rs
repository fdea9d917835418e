use hn_core::{parse, Dataset, ErrorKind, ParserV1};
use integration_tests::{comment, document, minimal, sample_v1, story};
use serde_json::json;

#[test]
fn minimal_document_has_one_story_and_no_metrics() {
    let dataset = parse(&minimal("1.0")).unwrap();

    assert_eq!(dataset.story_count(), 1);
    assert!(dataset.metrics().is_none());
    let Dataset::V1(v1) = dataset else {
        panic!("expected a 1.0 dataset");
    };
    assert_eq!(v1.stories[0].points, 10);
    assert!(v1.stories[0].comments.is_empty());
}

#[test]
fn missing_points_names_the_field() {
    let mut raw = minimal("1.0");
    raw["stories"][0].as_object_mut().unwrap().remove("points");

    let err = parse(&raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.path(), Some("stories[0].points"));
}

#[test]
fn bundled_sample_parses() {
    let dataset = ParserV1::default().parse_dataset(&sample_v1()).unwrap();
    assert_eq!(dataset.stories.len(), 2);
    assert_eq!(dataset.stories[0].comments.len(), 2);
    assert_eq!(dataset.stories[0].comments[1].author, "carol");
}

#[test]
fn output_keeps_input_order() {
    let raw = document(
        "1.0",
        vec![
            story(2, 5, json!([comment("b", None), comment("a", None)])),
            story(1, 7, json!([])),
        ],
    );
    let Dataset::V1(v1) = parse(&raw).unwrap() else {
        panic!("expected a 1.0 dataset");
    };
    let ranks: Vec<u64> = v1.stories.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, [2, 1]);
    let ids: Vec<&str> = v1.stories[0].comments.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
}

#[test]
fn validation_error_lists_every_issue_in_the_failing_story() {
    let mut raw = minimal("1.0");
    raw["stories"][0]["points"] = json!(-1);
    raw["stories"][0]["title"] = json!(42);

    let err = parse(&raw).unwrap_err();
    let paths: Vec<String> = err.issues().into_iter().map(|i| i.path).collect();
    assert_eq!(paths, ["stories[0].title", "stories[0].points"]);
    insta::assert_snapshot!(
        err.to_string(),
        @"validation error at stories[0].title: expected a string, found a number (and 1 more issue)"
    );
}

#[test]
fn bad_comment_timestamp_is_reported_with_its_index() {
    let mut bad = comment("c2", None);
    bad["timestamp"] = json!("yesterday");
    let raw = document("1.0", vec![story(1, 1, json!([comment("c1", None), bad]))]);

    let err = parse(&raw).unwrap_err();
    assert_eq!(err.path(), Some("stories[0].comments[1].timestamp"));
}

#[test]
fn serialized_dataset_carries_its_version() {
    let dataset = parse(&minimal("1.0")).unwrap();
    let value = serde_json::to_value(&dataset).unwrap();
    assert_eq!(value["version"], "1.0");
    assert!(value.get("metrics").is_none());
}
