//! Archive fixtures for integration tests

use serde_json::{json, Value};
use std::path::Path;

/// One archive document
pub fn doc(keywords: &[&str], word_count: Option<u64>, section: Option<&str>) -> Value {
    let keywords: Vec<Value> = keywords
        .iter()
        .map(|k| json!({"name": "subject", "value": k, "rank": 1}))
        .collect();

    let mut doc = json!({
        "keywords": keywords,
        "headline": {"main": "Headline"},
        "pub_date": "2020-01-01T00:00:00+0000",
    });
    if let Some(wc) = word_count {
        doc["word_count"] = json!(wc);
    }
    if let Some(section) = section {
        doc["section_name"] = json!(section);
    }
    doc
}

/// Write `docs` as `rsp_<year>_<month>.json` inside `dir`
pub fn write_month(dir: &Path, year: i32, month: u32, docs: Vec<Value>) {
    let body = json!({
        "status": "OK",
        "copyright": "fixture",
        "response": {"meta": {"hits": docs.len()}, "docs": docs},
    });
    std::fs::write(
        dir.join(format!("rsp_{year}_{month}.json")),
        serde_json::to_string_pretty(&body).unwrap(),
    )
    .unwrap();
}

/// Three articles tagged cats+dogs and two tagged cats only
pub fn cats_and_dogs() -> Vec<Value> {
    let mut docs = vec![doc(&["cats", "dogs"], Some(400), Some("Science")); 3];
    docs.push(doc(&["cats"], Some(800), Some("Science")));
    docs.push(doc(&["cats"], None, Some("Pets")));
    docs
}
