//! Keyword co-occurrence graph construction
//!
//! The builder works in five steps:
//! 1. Rank keywords by article count and keep the top fraction as nodes
//! 2. Count, per article, every pair of retained keywords that appear together
//! 3. For each node, keep its top fraction of neighbors by co-occurrence count;
//!    an edge survives when either endpoint keeps it
//! 4. Normalize each surviving edge by the rarer endpoint's article count
//! 5. Attach word count and section statistics to every node
//!
//! # Ordering
//!
//! Every ranking breaks ties on the keyword string (ascending), so identical
//! input always yields identical nodes and links. Only the placeholder
//! coordinates, supplied by a [`CoordinateStrategy`], may vary between runs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::keywords::KeywordStats;
use crate::config::PipelineConfig;
use crate::models::{ArticleRecord, Edge, Graph, Node};

/// Exclusive upper bound of placeholder coordinates
pub const COORDINATE_LIMIT: u32 = 1000;

/// Canonical unordered keyword pair, `(a, b)` with `a < b`
pub type KeywordPair = (String, String);

/// Assigns placeholder `(x, y)` positions to nodes
pub trait CoordinateStrategy {
    /// Called once with the final node count before any position is assigned
    fn prepare(&mut self, _node_count: usize) {}

    /// Position for the node at `rank` (0-based) holding `keyword`
    fn assign(&mut self, rank: usize, keyword: &str) -> (u32, u32);
}

/// Uniformly random positions
pub struct RandomCoordinates {
    rng: ChaCha8Rng,
}

impl RandomCoordinates {
    /// Seeded from OS entropy; positions differ between runs
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Reproducible positions for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        config.coordinate_seed.map_or_else(Self::new, Self::seeded)
    }
}

impl Default for RandomCoordinates {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateStrategy for RandomCoordinates {
    fn assign(&mut self, _rank: usize, _keyword: &str) -> (u32, u32) {
        (
            self.rng.gen_range(0..COORDINATE_LIMIT),
            self.rng.gen_range(0..COORDINATE_LIMIT),
        )
    }
}

/// Nodes laid out row by row on a square grid, in rank order
#[derive(Debug, Clone)]
pub struct GridCoordinates {
    side: usize,
    cell: u32,
}

impl GridCoordinates {
    /// Grid large enough for `node_count` nodes
    pub fn new(node_count: usize) -> Self {
        let side = ((node_count as f64).sqrt().ceil() as usize).max(1);
        let cell = (COORDINATE_LIMIT as usize / side).max(1) as u32;
        Self { side, cell }
    }
}

impl Default for GridCoordinates {
    fn default() -> Self {
        Self::new(1)
    }
}

impl CoordinateStrategy for GridCoordinates {
    fn prepare(&mut self, node_count: usize) {
        *self = Self::new(node_count);
    }

    fn assign(&mut self, rank: usize, _keyword: &str) -> (u32, u32) {
        let col = (rank % self.side) as u32;
        let row = (rank / self.side) as u32;
        let x = (col * self.cell + self.cell / 2).min(COORDINATE_LIMIT - 1);
        let y = (row * self.cell + self.cell / 2).min(COORDINATE_LIMIT - 1);
        (x, y)
    }
}

/// Every node at the origin
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCoordinates;

impl CoordinateStrategy for FixedCoordinates {
    fn assign(&mut self, _rank: usize, _keyword: &str) -> (u32, u32) {
        (0, 0)
    }
}

/// `max(1, floor(total * fraction))`, or zero when there is nothing to keep
#[must_use]
pub fn keep_count(total: usize, fraction: f64) -> usize {
    if total == 0 {
        return 0;
    }
    ((total as f64 * fraction).floor() as usize).clamp(1, total)
}

/// Builds a pruned co-occurrence graph from tallied keywords
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    node_keep_percent: f64,
    link_keep_percent: f64,
}

impl GraphBuilder {
    pub fn new(node_keep_percent: f64, link_keep_percent: f64) -> Self {
        Self {
            node_keep_percent,
            link_keep_percent,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.node_keep_percent, config.link_keep_percent)
    }

    /// Rank keywords and return the retained ones, best first
    ///
    /// Ranking is by article count descending, then keyword ascending.
    pub fn select_nodes(&self, stats: &KeywordStats) -> Vec<String> {
        let mut ranked: Vec<(&String, u64)> = stats.iter().map(|(k, s)| (k, s.count)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let keep = keep_count(ranked.len(), self.node_keep_percent);
        ranked
            .into_iter()
            .take(keep)
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Count articles in which each pair of selected keywords appears together
    pub fn cooccurrence_counts(
        articles: &[ArticleRecord],
        selected: &HashSet<String>,
    ) -> BTreeMap<KeywordPair, u64> {
        let mut pairs: BTreeMap<KeywordPair, u64> = BTreeMap::new();

        for article in articles {
            // Article keyword sets iterate in ascending order, so a < b below
            let kept: Vec<&String> = article
                .keywords
                .iter()
                .filter(|k| selected.contains(*k))
                .collect();

            for (i, a) in kept.iter().enumerate() {
                for b in &kept[i + 1..] {
                    *pairs.entry(((*a).clone(), (*b).clone())).or_insert(0) += 1;
                }
            }
        }

        pairs
    }

    /// Pairs kept by at least one endpoint's top-fraction neighbor list
    pub fn prune_links(&self, pairs: &BTreeMap<KeywordPair, u64>) -> BTreeSet<KeywordPair> {
        let mut adjacency: HashMap<&str, Vec<(&str, u64)>> = HashMap::new();
        for ((a, b), &count) in pairs {
            adjacency.entry(a.as_str()).or_default().push((b.as_str(), count));
            adjacency.entry(b.as_str()).or_default().push((a.as_str(), count));
        }

        let mut kept = BTreeSet::new();
        for (node, mut neighbors) in adjacency {
            neighbors.sort_by(|x, y| y.1.cmp(&x.1).then_with(|| x.0.cmp(y.0)));
            let keep = keep_count(neighbors.len(), self.link_keep_percent);

            for (neighbor, _) in neighbors.into_iter().take(keep) {
                let pair = match node.cmp(neighbor) {
                    Ordering::Less => (node.to_string(), neighbor.to_string()),
                    _ => (neighbor.to_string(), node.to_string()),
                };
                kept.insert(pair);
            }
        }

        kept
    }

    /// Run every step and assemble the graph
    ///
    /// `stats` must be the thresholded output of
    /// [`KeywordAggregator::aggregate`](super::keywords::KeywordAggregator::aggregate)
    /// over the same `articles`.
    pub fn build(
        &self,
        articles: &[ArticleRecord],
        stats: &KeywordStats,
        coordinates: &mut dyn CoordinateStrategy,
    ) -> Graph {
        let ranked = self.select_nodes(stats);
        if ranked.is_empty() {
            tracing::warn!("No keywords met the frequency threshold; graph is empty");
            return Graph::default();
        }

        tracing::info!(
            candidates = stats.len(),
            kept = ranked.len(),
            node_keep_percent = self.node_keep_percent,
            "Selected graph nodes"
        );

        coordinates.prepare(ranked.len());

        let selected: HashSet<String> = ranked.iter().cloned().collect();
        let pairs = Self::cooccurrence_counts(articles, &selected);
        let kept_pairs = self.prune_links(&pairs);

        let count_of = |k: &str| stats.get(k).map_or(0, |s| s.count);
        let links: Vec<Edge> = kept_pairs
            .into_iter()
            .filter_map(|(a, b)| {
                let together = *pairs.get(&(a.clone(), b.clone()))?;
                let rarer = count_of(&a).min(count_of(&b));
                if rarer == 0 {
                    return None;
                }
                Some(Edge {
                    strength: together as f64 / rarer as f64,
                    source: a,
                    target: b,
                })
            })
            .collect();

        tracing::info!(
            candidate_pairs = pairs.len(),
            links = links.len(),
            link_keep_percent = self.link_keep_percent,
            "Links after per-node filtering"
        );

        let nodes = ranked
            .into_iter()
            .enumerate()
            .filter_map(|(rank, keyword)| {
                let stat = stats.get(&keyword)?;
                let (x, y) = coordinates.assign(rank, &keyword);
                Some(Node {
                    count: stat.count,
                    mean_word_count: stat.mean_word_count(),
                    median_word_count: stat.median_word_count(),
                    top_section: stat.top_section().map(str::to_string),
                    x,
                    y,
                    keyword,
                })
            })
            .collect();

        Graph { nodes, links }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}
