//! Monthly keyword statistics restricted to the graph's keywords
//!
//! The aggregator only needs the set of node keywords from a persisted
//! graph. Each month is aggregated independently; the only cross-month
//! quantity is a keyword's total count, used as the proportion denominator.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::keywords::KeywordStat;
use crate::models::{ArticleRecord, Graph, MonthlyArticles, Timeseries, TimeseriesPoint};

/// Builds per-keyword monthly series for an allow-list of keywords
#[derive(Debug, Clone, Default)]
pub struct TimeseriesAggregator {
    allowed: BTreeSet<String>,
}

impl TimeseriesAggregator {
    pub fn new(allowed: BTreeSet<String>) -> Self {
        Self { allowed }
    }

    /// Use the node keywords of `graph` as the allow-list
    pub fn from_graph(graph: &Graph) -> Self {
        Self::new(graph.keywords())
    }

    pub fn allowed(&self) -> &BTreeSet<String> {
        &self.allowed
    }

    fn allowed_keywords<'a>(&'a self, article: &'a ArticleRecord) -> impl Iterator<Item = &'a String> {
        article
            .keywords
            .iter()
            .filter(move |k| self.allowed.contains(*k))
    }

    /// Occurrences of each allowed keyword across all months
    pub fn total_counts(&self, monthly: &MonthlyArticles) -> HashMap<String, u64> {
        let mut totals: HashMap<String, u64> = HashMap::new();

        for article in monthly.values().flatten() {
            for keyword in self.allowed_keywords(article) {
                *totals.entry(keyword.clone()).or_insert(0) += 1;
            }
        }

        totals
    }

    /// Statistics of each allowed keyword within one month's articles
    pub fn month_stats(&self, articles: &[ArticleRecord]) -> BTreeMap<String, KeywordStat> {
        let mut stats: BTreeMap<String, KeywordStat> = BTreeMap::new();

        for article in articles {
            for keyword in self.allowed_keywords(article) {
                stats.entry(keyword.clone()).or_default().record(article);
            }
        }

        stats
    }

    /// Build the series for every allowed keyword
    ///
    /// Every allowed keyword gets an entry, empty when it never occurs.
    /// Points are emitted in ascending month order.
    pub fn aggregate(&self, monthly: &MonthlyArticles) -> Timeseries {
        let totals = self.total_counts(monthly);
        tracing::info!(
            allowed = self.allowed.len(),
            tracked = totals.len(),
            months = monthly.len(),
            "Total tracked keywords"
        );

        let mut series: Timeseries = self
            .allowed
            .iter()
            .map(|k| (k.clone(), Vec::new()))
            .collect();

        for (month, articles) in monthly {
            for (keyword, stat) in self.month_stats(articles) {
                if stat.count == 0 {
                    continue;
                }

                let total = totals.get(&keyword).copied().unwrap_or(0);
                let point = TimeseriesPoint {
                    time: month.clone(),
                    count: stat.count,
                    median_word_count: stat.median_word_count(),
                    top_section: stat.top_section().map(str::to_string),
                    proportion: (total > 0).then(|| stat.count as f64 / total as f64),
                };

                series.entry(keyword).or_default().push(point);
            }
        }

        series
    }
}
