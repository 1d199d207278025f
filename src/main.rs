use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsgraph::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "newsgraph",
    version,
    about = "Keyword co-occurrence graph and monthly keyword series from news archive metadata",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (defaults to environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding rsp_<year>_<month>.json archive files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Graph output file (input allow-list for the timeseries stage)
    #[arg(long, global = true)]
    graph: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(clap::Args, Debug, Default)]
struct PipelineArgs {
    /// Minimum number of articles a keyword must appear in
    #[arg(long)]
    min_count: Option<u64>,

    /// Fraction of ranked keywords kept as nodes, in (0, 1]
    #[arg(long)]
    node_keep: Option<f64>,

    /// Fraction of each node's ranked neighbors kept as links, in (0, 1]
    #[arg(long)]
    link_keep: Option<f64>,

    /// Seed for placeholder node coordinates
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the pruned keyword co-occurrence graph
    Graph {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Build monthly keyword series for the keywords of an existing graph
    Timeseries {
        /// Timeseries output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the graph, then the timeseries
    Run {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Timeseries output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download monthly archive files
    Download {
        #[arg(long)]
        start_year: i32,

        #[arg(long)]
        end_year: i32,

        #[arg(long, default_value = "1")]
        start_month: u32,

        /// Directory to write rsp_<year>_<month>.json files into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

impl PipelineArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(v) = self.min_count {
            config.pipeline.min_keyword_count = v;
        }
        if let Some(v) = self.node_keep {
            config.pipeline.node_keep_percent = v;
        }
        if let Some(v) = self.link_keep {
            config.pipeline.link_keep_percent = v;
        }
        if let Some(v) = self.seed {
            config.pipeline.coordinate_seed = Some(v);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(dir) = &cli.data_dir {
        config.paths.data_dir = dir.clone();
    }
    if let Some(graph) = &cli.graph {
        config.paths.graph_file = graph.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    // Initialize tracing/logging
    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;

    tracing::info!("newsgraph starting");

    match cli.command {
        Commands::Graph { pipeline } => {
            pipeline.apply(&mut config);
            tracing::info!(pipeline = ?config.pipeline, "Starting graph command");
            commands::graph(&config)?;
        }

        Commands::Timeseries { output } => {
            if let Some(output) = output {
                config.paths.timeseries_file = output;
            }
            tracing::info!(
                graph = %config.paths.graph_file.display(),
                output = %config.paths.timeseries_file.display(),
                "Starting timeseries command"
            );
            commands::timeseries(&config)?;
        }

        Commands::Run { pipeline, output } => {
            pipeline.apply(&mut config);
            if let Some(output) = output {
                config.paths.timeseries_file = output;
            }
            tracing::info!(pipeline = ?config.pipeline, "Starting run command");
            commands::graph(&config)?;
            commands::timeseries(&config)?;
        }

        Commands::Download {
            start_year,
            end_year,
            start_month,
            output_dir,
        } => {
            if let Some(dir) = output_dir {
                config.archive.output_dir = dir;
            }
            tracing::info!(
                start_year = %start_year,
                end_year = %end_year,
                start_month = %start_month,
                "Starting download command"
            );
            commands::download(&config, start_year, end_year, start_month).await?;
        }
    }

    tracing::info!("newsgraph completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("newsgraph=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("newsgraph={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
