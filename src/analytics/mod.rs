//! Aggregation pipeline: keyword tallying, graph construction and monthly series
//!
//! Control flow is strictly sequential: [`KeywordAggregator`] feeds
//! [`GraphBuilder`], whose node set becomes the allow-list of
//! [`TimeseriesAggregator`].

pub mod graph;
pub mod keywords;
pub mod stats;
pub mod timeseries;

pub use graph::{
    keep_count, CoordinateStrategy, FixedCoordinates, GraphBuilder, GridCoordinates,
    RandomCoordinates, COORDINATE_LIMIT,
};
pub use keywords::{KeywordAggregator, KeywordStat, KeywordStats};
pub use stats::SectionTally;
pub use timeseries::TimeseriesAggregator;

use crate::config::PipelineConfig;
use crate::models::{ArticleRecord, Graph};

/// Tally keywords and build the graph in one call
pub fn build_keyword_graph(
    articles: &[ArticleRecord],
    config: &PipelineConfig,
    coordinates: &mut dyn CoordinateStrategy,
) -> Graph {
    let stats = KeywordAggregator::from_config(config).aggregate(articles);
    GraphBuilder::from_config(config).build(articles, &stats, coordinates)
}
