//! Configuration management for newsgraph
//!
//! This module handles loading and validating configuration from environment variables,
//! files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Aggregation thresholds
    pub pipeline: PipelineConfig,

    /// Input and output locations
    pub paths: PathsConfig,

    /// Archive download settings
    pub archive: ArchiveConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Thresholds shared by the aggregation stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Keywords seen in fewer articles than this are discarded
    pub min_keyword_count: u64,

    /// Fraction of ranked keywords kept as graph nodes, in (0, 1]
    pub node_keep_percent: f64,

    /// Fraction of each node's ranked neighbors kept as edges, in (0, 1]
    pub link_keep_percent: f64,

    /// Seed for placeholder coordinates; random when unset
    pub coordinate_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_keyword_count: 5,
            node_keep_percent: 0.2,
            link_keep_percent: 0.02,
            coordinate_seed: None,
        }
    }
}

/// File locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `rsp_<year>_<month>.json` archive files
    pub data_dir: PathBuf,

    /// Graph output, also the allow-list source for the timeseries stage
    pub graph_file: PathBuf,

    /// Timeseries output
    pub timeseries_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/subset"),
            graph_file: PathBuf::from("project/nyt_keyword_graph.json"),
            timeseries_file: PathBuf::from("project/nyt_keyword_timeseries.json"),
        }
    }
}

/// Archive API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// API key appended to every request
    pub api_key: Option<String>,

    /// Endpoint prefix; requests go to `{base_url}/{year}/{month}.json`
    pub base_url: String,

    /// Minimum spacing between requests in seconds
    pub request_interval_secs: u64,

    /// Hard cap on requests per run
    pub max_calls: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Where downloaded month files are written
    pub output_dir: PathBuf,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: String::from("https://api.nytimes.com/svc/archive/v1"),
            request_interval_secs: 12,
            max_calls: 400,
            timeout_secs: 30,
            output_dir: PathBuf::from("data"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let pipeline = PipelineConfig {
            min_keyword_count: env_parse("NEWSGRAPH_MIN_KEYWORD_COUNT")
                .unwrap_or(defaults.pipeline.min_keyword_count),
            node_keep_percent: env_parse("NEWSGRAPH_NODE_KEEP_PERCENT")
                .unwrap_or(defaults.pipeline.node_keep_percent),
            link_keep_percent: env_parse("NEWSGRAPH_LINK_KEEP_PERCENT")
                .unwrap_or(defaults.pipeline.link_keep_percent),
            coordinate_seed: env_parse("NEWSGRAPH_COORDINATE_SEED"),
        };

        let paths = PathsConfig {
            data_dir: std::env::var("NEWSGRAPH_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.paths.data_dir),
            graph_file: std::env::var("NEWSGRAPH_GRAPH_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.paths.graph_file),
            timeseries_file: std::env::var("NEWSGRAPH_TIMESERIES_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.paths.timeseries_file),
        };

        let archive = ArchiveConfig {
            api_key: std::env::var("NYT_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("NEWSGRAPH_ARCHIVE_URL")
                .unwrap_or(defaults.archive.base_url),
            ..defaults.archive
        };

        let logging = LoggingConfig {
            level: std::env::var("NEWSGRAPH_LOG_LEVEL").unwrap_or(defaults.logging.level),
            format: std::env::var("NEWSGRAPH_LOG_FORMAT").unwrap_or(defaults.logging.format),
        };

        Ok(Self {
            pipeline,
            paths,
            archive,
            logging,
        })
    }

    /// Load configuration from a file
    ///
    /// The archive API key falls back to `NYT_API_KEY` when the file sets none.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        if config.archive.api_key.as_deref().map_or(true, str::is_empty) {
            config.archive.api_key = std::env::var("NYT_API_KEY").ok().filter(|k| !k.is_empty());
        }

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;

        if self.archive.max_calls == 0 {
            anyhow::bail!("max_calls must be greater than 0");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.archive.timeout_secs)
    }
}

impl PipelineConfig {
    /// Check that both keep fractions lie in (0, 1]
    pub fn validate(&self) -> crate::error::Result<()> {
        for (name, value) in [
            ("node_keep_percent", self.node_keep_percent),
            ("link_keep_percent", self.link_keep_percent),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(crate::error::Error::config(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
