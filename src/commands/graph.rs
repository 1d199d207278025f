use anyhow::{Context, Result};

use newsgraph::analytics::{build_keyword_graph, RandomCoordinates};
use newsgraph::config::Config;
use newsgraph::storage;

/// Build the keyword graph from the archive files and persist it
pub fn graph(config: &Config) -> Result<()> {
    config.validate()?;

    let data_dir = &config.paths.data_dir;
    println!("Loading articles from {}...", data_dir.display());
    let articles = storage::load_articles(data_dir)
        .with_context(|| format!("Failed to list archive files in {}", data_dir.display()))?;

    if articles.is_empty() {
        println!("No articles found; writing an empty graph.");
    }

    let mut coordinates = RandomCoordinates::from_config(&config.pipeline);
    let graph = build_keyword_graph(&articles, &config.pipeline, &mut coordinates);

    storage::save_graph(&config.paths.graph_file, &graph).with_context(|| {
        format!(
            "Failed to save graph to {}",
            config.paths.graph_file.display()
        )
    })?;

    println!("Articles:     {}", articles.len());
    println!(
        "Nodes:        {} (top {:.0}% of keywords with >= {} articles)",
        graph.nodes.len(),
        config.pipeline.node_keep_percent * 100.0,
        config.pipeline.min_keyword_count
    );
    println!("Links:        {}", graph.links.len());
    println!("Saved graph:  {}", config.paths.graph_file.display());

    Ok(())
}
