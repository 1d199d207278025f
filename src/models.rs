// Core data structures for the newsgraph pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Keyword tag as it appears in the archive JSON (`{"name": ..., "value": ...}`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawKeyword {
    /// Non-string values are dropped when normalizing
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Article document as it appears in the archive JSON
///
/// Only the fields used by the pipeline are declared; everything else in the
/// document is ignored during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub keywords: Option<Vec<RawKeyword>>,

    /// Scalar fields are kept as raw JSON values so that one ill-typed
    /// field is dropped instead of failing the whole file.
    #[serde(default)]
    pub word_count: Option<serde_json::Value>,

    #[serde(default)]
    pub section_name: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchiveBody {
    #[serde(default)]
    pub docs: Vec<RawArticle>,
}

/// Top-level archive file: `{"response": {"docs": [...]}}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchiveResponse {
    #[serde(default)]
    pub response: Option<ArchiveBody>,
}

impl ArchiveResponse {
    /// Consume the response and return its normalized articles
    pub fn into_articles(self) -> Vec<ArticleRecord> {
        self.response
            .map(|body| body.docs.into_iter().map(ArticleRecord::from).collect())
            .unwrap_or_default()
    }
}

/// Normalized article metadata
///
/// Keywords are trimmed, deduplicated and never empty strings. The set is
/// ordered, so iterating it yields keywords in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub keywords: BTreeSet<String>,
    pub word_count: Option<i64>,
    pub section_name: Option<String>,
}

impl ArticleRecord {
    /// Build a record, normalizing keywords and section label
    pub fn new<I, S>(keywords: I, word_count: Option<i64>, section_name: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            keywords,
            word_count,
            section_name: section_name.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }

    /// True when the article carries no usable keyword
    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }
}

impl From<RawArticle> for ArticleRecord {
    fn from(raw: RawArticle) -> Self {
        let keywords = raw.keywords.unwrap_or_default();
        let values = keywords
            .iter()
            .filter_map(|k| k.value.as_ref().and_then(serde_json::Value::as_str));

        // Only integer-typed counts contribute
        let word_count = raw.word_count.as_ref().and_then(serde_json::Value::as_i64);
        let section = raw.section_name.as_ref().and_then(serde_json::Value::as_str);

        Self::new(values, word_count, section)
    }
}

/// Calendar month key in `YYYY-MM` form
///
/// Lexicographic order of the key is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(String);

impl MonthKey {
    /// Create from numeric parts, rejecting impossible months
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(0..=9999).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self(format!("{year:04}-{month:02}")))
    }

    /// Parse a `YYYY-MM` string
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid month key: {value}"))
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.0
    }
}

/// Articles grouped by the month of the archive file they came from
pub type MonthlyArticles = BTreeMap<MonthKey, Vec<ArticleRecord>>;

/// Graph node: one retained keyword with its corpus statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub keyword: String,
    pub count: u64,
    pub mean_word_count: Option<f64>,
    pub median_word_count: Option<f64>,
    pub top_section: Option<String>,
    /// Placeholder position in `[0, 1000)`
    pub x: u32,
    /// Placeholder position in `[0, 1000)`
    pub y: u32,
}

/// Undirected graph edge, stored with `source < target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Co-occurrence count normalized by the rarer endpoint, in `(0, 1]`
    pub strength: f64,
}

impl Edge {
    /// Create an edge in canonical orientation
    pub fn new(a: impl Into<String>, b: impl Into<String>, strength: f64) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { source: a, target: b, strength }
        } else {
            Self { source: b, target: a, strength }
        }
    }
}

/// Keyword co-occurrence graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Edge>,
}

impl Graph {
    /// Keyword set of the graph's nodes
    pub fn keywords(&self) -> BTreeSet<String> {
        self.nodes.iter().map(|n| n.keyword.clone()).collect()
    }

    pub fn node(&self, keyword: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.keyword == keyword)
    }

    /// Look up the edge between two keywords in either orientation
    pub fn link(&self, a: &str, b: &str) -> Option<&Edge> {
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        self.links
            .iter()
            .find(|e| e.source == source && e.target == target)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Statistics for one keyword in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    pub time: MonthKey,
    pub count: u64,
    pub median_word_count: Option<f64>,
    pub top_section: Option<String>,
    /// Share of the keyword's total occurrences that fall in this month
    pub proportion: Option<f64>,
}

/// Per-keyword monthly series, each ordered by ascending month
pub type Timeseries = BTreeMap<String, Vec<TimeseriesPoint>>;
