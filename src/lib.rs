//! newsgraph - keyword co-occurrence graphs and monthly keyword series from news archives
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`] - Core data structures and types
//! - [`analytics`] - Keyword tallying, graph construction and timeseries aggregation
//! - [`storage`] - Archive file loading and JSON persistence
//! - [`archive`] - Rate-limited download of monthly archive files
//! - [`config`] - Configuration management and settings
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use newsgraph::analytics::{build_keyword_graph, RandomCoordinates, TimeseriesAggregator};
//! use newsgraph::config::Config;
//! use newsgraph::storage;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let articles = storage::load_articles(&config.paths.data_dir)?;
//!     let mut coordinates = RandomCoordinates::from_config(&config.pipeline);
//!     let graph = build_keyword_graph(&articles, &config.pipeline, &mut coordinates);
//!     storage::save_graph(&config.paths.graph_file, &graph)?;
//!
//!     let allowed = storage::load_graph_keywords(&config.paths.graph_file)?;
//!     let monthly = storage::load_monthly_articles(&config.paths.data_dir)?;
//!     let series = TimeseriesAggregator::new(allowed).aggregate(&monthly);
//!     storage::save_timeseries(&config.paths.timeseries_file, &series)?;
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod archive;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{
        CoordinateStrategy, GraphBuilder, KeywordAggregator, TimeseriesAggregator,
    };
    pub use crate::config::{Config, PipelineConfig};
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{ArticleRecord, Edge, Graph, MonthKey, Node, Timeseries, TimeseriesPoint};
}

// Direct re-exports for convenience
pub use models::{ArticleRecord, Graph, Timeseries};
