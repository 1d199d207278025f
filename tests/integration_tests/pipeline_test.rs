//! End-to-end pipeline integration tests
//!
//! Tests the complete workflow:
//! 1. Archive files on disk
//! 2. Keyword tallying and graph construction
//! 3. Graph persistence
//! 4. Timeseries aggregation against the persisted graph

use newsgraph::analytics::{
    build_keyword_graph, FixedCoordinates, GraphBuilder, KeywordAggregator, RandomCoordinates,
    TimeseriesAggregator,
};
use newsgraph::config::PipelineConfig;
use newsgraph::models::Graph;
use newsgraph::storage;
use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;

use super::fixtures::{cats_and_dogs, doc, write_month};

fn keep_all(min_keyword_count: u64) -> PipelineConfig {
    PipelineConfig {
        min_keyword_count,
        node_keep_percent: 1.0,
        link_keep_percent: 1.0,
        coordinate_seed: Some(1),
    }
}

fn graph_from_dir(dir: &Path, config: &PipelineConfig) -> Graph {
    let articles = storage::load_articles(dir).unwrap();
    build_keyword_graph(&articles, config, &mut RandomCoordinates::from_config(config))
}

#[test]
fn test_cats_and_dogs_scenario() {
    let temp_dir = TempDir::new().unwrap();
    write_month(temp_dir.path(), 2020, 1, cats_and_dogs());

    let config = keep_all(1);
    let articles = storage::load_articles(temp_dir.path()).unwrap();
    assert_eq!(articles.len(), 5);

    let stats = KeywordAggregator::from_config(&config).aggregate(&articles);
    let builder = GraphBuilder::from_config(&config);
    let graph = builder.build(&articles, &stats, &mut FixedCoordinates);

    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.node("cats").unwrap().count, 5);
    assert_eq!(graph.node("dogs").unwrap().count, 3);

    let selected: HashSet<String> = graph.keywords().into_iter().collect();
    let pairs = GraphBuilder::cooccurrence_counts(&articles, &selected);
    assert_eq!(pairs[&("cats".to_string(), "dogs".to_string())], 3);

    assert_eq!(graph.links.len(), 1);
    let edge = &graph.links[0];
    assert_eq!(edge.source, "cats");
    assert_eq!(edge.target, "dogs");
    assert!((edge.strength - 1.0).abs() < 1e-12);

    let cats = graph.node("cats").unwrap();
    assert!((cats.mean_word_count.unwrap() - 500.0).abs() < 1e-9);
    assert!((cats.median_word_count.unwrap() - 400.0).abs() < 1e-9);
    assert_eq!(cats.top_section.as_deref(), Some("Science"));
}

#[test]
fn test_three_keywords_keep_one_node() {
    let temp_dir = TempDir::new().unwrap();
    let mut docs = Vec::new();
    for (keyword, n) in [("alpha", 7), ("beta", 6), ("gamma", 5), ("rare", 2)] {
        docs.extend(vec![doc(&[keyword], None, None); n]);
    }
    write_month(temp_dir.path(), 2020, 1, docs);

    let config = PipelineConfig {
        coordinate_seed: Some(3),
        ..PipelineConfig::default()
    };
    let graph = graph_from_dir(temp_dir.path(), &config);

    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].keyword, "alpha");
    assert!(graph.links.is_empty());
}

#[test]
fn test_graph_deterministic_except_coordinates() {
    let temp_dir = TempDir::new().unwrap();
    let mut docs = Vec::new();
    for i in 0..60 {
        let a = format!("k{}", i % 7);
        let b = format!("k{}", (i * 3) % 11);
        let c = format!("k{}", (i * 5) % 13);
        docs.push(doc(&[a.as_str(), b.as_str(), c.as_str()], Some(100 + i), Some(if i % 2 == 0 { "A" } else { "B" })));
    }
    write_month(temp_dir.path(), 2021, 6, docs);

    let config = PipelineConfig {
        min_keyword_count: 2,
        node_keep_percent: 0.6,
        link_keep_percent: 0.3,
        coordinate_seed: None,
    };

    let strip = |mut g: Graph| {
        for node in &mut g.nodes {
            node.x = 0;
            node.y = 0;
        }
        serde_json::to_string(&g).unwrap()
    };

    let first = strip(graph_from_dir(temp_dir.path(), &config));
    for _ in 0..5 {
        assert_eq!(first, strip(graph_from_dir(temp_dir.path(), &config)));
    }
}

#[test]
fn test_graph_invariants() {
    let temp_dir = TempDir::new().unwrap();
    let mut docs = Vec::new();
    for i in 0..80u64 {
        let keys: Vec<String> = (0..4).map(|j| format!("t{}", (i * (j + 1)) % 17)).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        docs.push(doc(&refs, Some(i * 10), None));
    }
    write_month(temp_dir.path(), 2019, 3, docs);

    let config = PipelineConfig {
        min_keyword_count: 5,
        node_keep_percent: 0.5,
        link_keep_percent: 0.2,
        coordinate_seed: Some(9),
    };
    let graph = graph_from_dir(temp_dir.path(), &config);
    let keywords = graph.keywords();

    assert!(!graph.nodes.is_empty());
    for node in &graph.nodes {
        assert!(node.count >= 5);
        assert!(node.x < 1000 && node.y < 1000);
    }
    for edge in &graph.links {
        assert!(edge.source < edge.target);
        assert!(keywords.contains(&edge.source));
        assert!(keywords.contains(&edge.target));
        assert!(edge.strength > 0.0 && edge.strength <= 1.0);
    }
    let unique: HashSet<(&str, &str)> = graph
        .links
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(unique.len(), graph.links.len());
}

#[test]
fn test_full_run_through_persisted_graph() {
    let data_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();

    write_month(data_dir.path(), 2020, 1, cats_and_dogs());
    write_month(
        data_dir.path(),
        2020,
        2,
        vec![
            doc(&["cats"], Some(100), Some("Arts")),
            doc(&["birds"], Some(100), Some("Arts")),
        ],
    );

    let config = keep_all(3);
    let graph = graph_from_dir(data_dir.path(), &config);
    let graph_file = out_dir.path().join("project").join("graph.json");
    storage::save_graph(&graph_file, &graph).unwrap();

    let allowed = storage::load_graph_keywords(&graph_file).unwrap();
    let monthly = storage::load_monthly_articles(data_dir.path()).unwrap();
    let series = TimeseriesAggregator::new(allowed).aggregate(&monthly);

    let series_file = out_dir.path().join("project").join("series.json");
    storage::save_timeseries(&series_file, &series).unwrap();
    let series = storage::load_timeseries(&series_file).unwrap();

    // Every graph keyword is a key; nothing else is
    let keys: Vec<&str> = series.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["cats", "dogs"]);

    let cats = &series["cats"];
    assert_eq!(cats.len(), 2);
    assert_eq!(cats[0].time.as_str(), "2020-01");
    assert_eq!(cats[0].count, 5);
    assert_eq!(cats[1].time.as_str(), "2020-02");
    assert_eq!(cats[1].count, 1);
    assert_eq!(cats[1].top_section.as_deref(), Some("Arts"));

    let total: f64 = cats.iter().filter_map(|p| p.proportion).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_proportions_sum_to_one_across_year() {
    let data_dir = TempDir::new().unwrap();
    for month in 1..=12u32 {
        let n = (month % 4 + 1) as usize;
        write_month(data_dir.path(), 2018, month, vec![doc(&["economy"], Some(500), None); n]);
    }

    let allowed = ["economy".to_string()].into_iter().collect();
    let monthly = storage::load_monthly_articles(data_dir.path()).unwrap();
    let series = TimeseriesAggregator::new(allowed).aggregate(&monthly);

    let points = &series["economy"];
    assert_eq!(points.len(), 12);
    let sum: f64 = points.iter().map(|p| p.proportion.unwrap()).sum();
    assert!((sum - 1.0).abs() < 1e-9);

    let times: Vec<&str> = points.iter().map(|p| p.time.as_str()).collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);
}

#[test]
fn test_empty_archive_produces_empty_outputs() {
    let data_dir = TempDir::new().unwrap();
    let graph = graph_from_dir(data_dir.path(), &PipelineConfig::default());
    assert!(graph.nodes.is_empty());
    assert!(graph.links.is_empty());

    let monthly = storage::load_monthly_articles(data_dir.path()).unwrap();
    let series = TimeseriesAggregator::from_graph(&graph).aggregate(&monthly);
    assert!(series.is_empty());
}
