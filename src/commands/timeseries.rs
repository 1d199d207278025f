use anyhow::{Context, Result};

use newsgraph::analytics::TimeseriesAggregator;
use newsgraph::config::Config;
use newsgraph::storage;

/// Build monthly series for the keywords of a persisted graph
pub fn timeseries(config: &Config) -> Result<()> {
    let graph_file = &config.paths.graph_file;
    let allowed = storage::load_graph_keywords(graph_file).with_context(|| {
        format!(
            "Failed to read keyword allow-list from {}",
            graph_file.display()
        )
    })?;
    println!("Loaded {} keywords from graph.", allowed.len());

    let data_dir = &config.paths.data_dir;
    let monthly = storage::load_monthly_articles(data_dir)
        .with_context(|| format!("Failed to list archive files in {}", data_dir.display()))?;

    let series = TimeseriesAggregator::new(allowed).aggregate(&monthly);

    storage::save_timeseries(&config.paths.timeseries_file, &series).with_context(|| {
        format!(
            "Failed to save timeseries to {}",
            config.paths.timeseries_file.display()
        )
    })?;

    let points: usize = series.values().map(Vec::len).sum();
    println!("Months:           {}", monthly.len());
    println!("Keywords:         {}", series.len());
    println!("Points:           {points}");
    println!("Saved timeseries: {}", config.paths.timeseries_file.display());

    Ok(())
}
