//! Keyword frequency tallying
//!
//! One pass over the corpus produces, per distinct keyword, the number of
//! articles carrying it, the word counts of those articles and a tally of
//! their section labels.

use std::collections::HashMap;

use super::stats::{self, SectionTally};
use crate::config::PipelineConfig;
use crate::models::ArticleRecord;

/// Accumulated statistics for one keyword
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordStat {
    /// Number of distinct articles carrying the keyword
    pub count: u64,

    /// Word counts of those articles, in scan order
    pub word_counts: Vec<i64>,

    /// Section labels of those articles
    pub section_tally: SectionTally,
}

impl KeywordStat {
    /// Fold one article into the statistics
    pub fn record(&mut self, article: &ArticleRecord) {
        self.count += 1;
        if let Some(wc) = article.word_count {
            self.word_counts.push(wc);
        }
        if let Some(section) = &article.section_name {
            self.section_tally.record(section);
        }
    }

    #[must_use]
    pub fn mean_word_count(&self) -> Option<f64> {
        stats::mean(&self.word_counts)
    }

    #[must_use]
    pub fn median_word_count(&self) -> Option<f64> {
        stats::median(&self.word_counts)
    }

    #[must_use]
    pub fn top_section(&self) -> Option<&str> {
        self.section_tally.top()
    }
}

/// Keyword → statistics
pub type KeywordStats = HashMap<String, KeywordStat>;

/// Scans articles and keeps keywords above a frequency threshold
#[derive(Debug, Clone)]
pub struct KeywordAggregator {
    min_keyword_count: u64,
}

impl KeywordAggregator {
    pub fn new(min_keyword_count: u64) -> Self {
        Self { min_keyword_count }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.min_keyword_count)
    }

    /// Tally every keyword, without thresholding
    pub fn tally(articles: &[ArticleRecord]) -> KeywordStats {
        let mut stats = KeywordStats::new();

        for article in articles.iter().filter(|a| a.has_keywords()) {
            for keyword in &article.keywords {
                stats.entry(keyword.clone()).or_default().record(article);
            }
        }

        stats
    }

    /// Tally keywords and drop those seen in fewer than `min_keyword_count` articles
    pub fn aggregate(&self, articles: &[ArticleRecord]) -> KeywordStats {
        let mut stats = Self::tally(articles);
        let distinct = stats.len();
        stats.retain(|_, s| s.count >= self.min_keyword_count);

        tracing::info!(
            articles = articles.len(),
            distinct_keywords = distinct,
            min_keyword_count = self.min_keyword_count,
            kept = stats.len(),
            "Keyword frequencies tallied"
        );

        stats
    }
}

impl Default for KeywordAggregator {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}
