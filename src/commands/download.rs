use anyhow::{Context, Result};

use newsgraph::archive::ArchiveClient;
use newsgraph::config::Config;

/// Download archive months into the configured output directory
pub async fn download(
    config: &Config,
    start_year: i32,
    end_year: i32,
    start_month: u32,
) -> Result<()> {
    if !(1..=12).contains(&start_month) {
        anyhow::bail!("start month must be between 1 and 12, got {start_month}");
    }
    if end_year < start_year {
        anyhow::bail!("end year {end_year} is before start year {start_year}");
    }

    let client =
        ArchiveClient::new(&config.archive).context("Failed to create archive client")?;
    let output_dir = &config.archive.output_dir;

    println!(
        "Downloading {start_year}-{start_month:02} through {end_year}-12 into {}...",
        output_dir.display()
    );

    let report = client
        .download_range(start_year, end_year, start_month, output_dir)
        .await
        .context("Archive download failed")?;

    println!("Downloaded {} month files.", report.written.len());
    if report.remaining > 0 {
        println!(
            "Reached maximum call count ({}); {} months not requested.",
            config.archive.max_calls, report.remaining
        );
    }

    Ok(())
}
