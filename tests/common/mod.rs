//! Common test utilities

use newsgraph::models::ArticleRecord;

/// Article with keywords only
pub fn article(keywords: &[&str]) -> ArticleRecord {
    ArticleRecord::new(keywords.iter().copied(), None, None)
}

/// Article with every field set
#[allow(dead_code)]
pub fn full_article(keywords: &[&str], word_count: i64, section: &str) -> ArticleRecord {
    ArticleRecord::new(keywords.iter().copied(), Some(word_count), Some(section))
}
