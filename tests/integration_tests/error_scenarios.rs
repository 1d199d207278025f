//! Error scenario tests
//!
//! Malformed month files are skipped; a missing allow-list is fatal.

use newsgraph::analytics::TimeseriesAggregator;
use newsgraph::error::ErrorCategory;
use newsgraph::storage;
use std::collections::BTreeSet;
use tempfile::TempDir;

use super::fixtures::{doc, write_month};

#[test]
fn test_one_unreadable_month_among_twelve() {
    let data_dir = TempDir::new().unwrap();
    for month in 1..=12u32 {
        write_month(
            data_dir.path(),
            2022,
            month,
            vec![doc(&["climate"], Some(u64::from(month) * 100), Some("Climate")); 2],
        );
    }
    std::fs::write(data_dir.path().join("rsp_2022_7.json"), "{\"response\": {\"docs\": [").unwrap();

    let allowed: BTreeSet<String> = ["climate".to_string()].into_iter().collect();
    let monthly = storage::load_monthly_articles(data_dir.path()).unwrap();
    assert_eq!(monthly.len(), 11);

    let series = TimeseriesAggregator::new(allowed).aggregate(&monthly);
    let points = &series["climate"];
    assert_eq!(points.len(), 11);
    assert!(points.iter().all(|p| p.time.as_str() != "2022-07"));

    for point in points {
        assert_eq!(point.count, 2);
        assert!((point.proportion.unwrap() - 2.0 / 22.0).abs() < 1e-9);
        let month: u64 = point.time.as_str()[5..].parse().unwrap();
        assert!((point.median_word_count.unwrap() - (month * 100) as f64).abs() < 1e-9);
    }
}

#[test]
fn test_malformed_file_skipped_for_graph() {
    let data_dir = TempDir::new().unwrap();
    write_month(data_dir.path(), 2020, 1, vec![doc(&["a"], None, None); 3]);
    std::fs::write(data_dir.path().join("rsp_2020_2.json"), "not json at all").unwrap();

    let articles = storage::load_articles(data_dir.path()).unwrap();
    assert_eq!(articles.len(), 3);
}

#[test]
fn test_missing_graph_is_fatal() {
    let out_dir = TempDir::new().unwrap();
    let err = storage::load_graph_keywords(&out_dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Storage);
    assert!(!err.is_recoverable());
}

#[test]
fn test_corrupt_graph_is_fatal() {
    let out_dir = TempDir::new().unwrap();
    for (name, content) in [
        ("graph.json", "{ not json"),
        ("wrong_shape.json", "{\"nodes\": [{\"keyword\": 1}]}"),
    ] {
        let path = out_dir.path().join(name);
        std::fs::write(&path, content).unwrap();

        let err = storage::load_graph_keywords(&path).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Storage, "{name}");
        assert!(!err.is_recoverable(), "{name}");
        assert!(err.to_string().contains(name));
    }
}

#[test]
fn test_ill_typed_field_keeps_rest_of_month() {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(
        data_dir.path().join("rsp_2021_4.json"),
        r#"{"response": {"docs": [
            {"keywords": [{"value": "cats"}], "word_count": 100, "section_name": "Science"},
            {"keywords": [{"value": "cats"}, {"value": 12}], "word_count": 300, "section_name": 7}
        ]}}"#,
    )
    .unwrap();

    let monthly = storage::load_monthly_articles(data_dir.path()).unwrap();
    assert_eq!(monthly.len(), 1);

    let allowed: BTreeSet<String> = ["cats".to_string()].into_iter().collect();
    let series = TimeseriesAggregator::new(allowed).aggregate(&monthly);
    let point = &series["cats"][0];
    assert_eq!(point.time.as_str(), "2021-04");
    assert_eq!(point.count, 2);
    assert!((point.median_word_count.unwrap() - 200.0).abs() < 1e-9);
    assert_eq!(point.top_section.as_deref(), Some("Science"));
}

#[test]
fn test_missing_optional_fields_are_not_errors() {
    let data_dir = TempDir::new().unwrap();
    std::fs::write(
        data_dir.path().join("rsp_2020_5.json"),
        r#"{"response": {"docs": [
            {"keywords": [{"value": "x"}]},
            {"keywords": [], "word_count": 10, "section_name": "World"},
            {"word_count": null, "section_name": null},
            {"keywords": [{"value": "x"}], "word_count": "n/a", "section_name": ""}
        ]}}"#,
    )
    .unwrap();

    let articles = storage::load_articles(data_dir.path()).unwrap();
    assert_eq!(articles.len(), 4);
    assert_eq!(articles.iter().filter(|a| a.has_keywords()).count(), 2);
    assert!(articles.iter().all(|a| a.section_name.is_none() || a.section_name.as_deref() == Some("World")));
}
