//! Archive file loading and JSON persistence
//!
//! Archive files are named `rsp_<year>_<month>.json` and hold one month of
//! article metadata as `{"response": {"docs": [...]}}`. A file that cannot be
//! read or parsed is skipped with a warning; it never aborts a run.
//!
//! Outputs are written atomically (temporary file, then rename) so that the
//! timeseries stage never reads a half-written graph.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::models::{ArchiveResponse, ArticleRecord, Graph, MonthKey, MonthlyArticles, Timeseries};

/// File name prefix of archive month files
pub const ARCHIVE_PREFIX: &str = "rsp_";

static MONTH_FILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^rsp_(\d+)_(\d+)(?:_[^.]*)?\.json$").unwrap());

/// Archive file name for a month, e.g. `rsp_2021_3.json`
#[must_use]
pub fn archive_file_name(year: i32, month: u32) -> String {
    format!("{ARCHIVE_PREFIX}{year}_{month}.json")
}

/// Month encoded in an archive file name
///
/// `rsp_2021_3.json` → `2021-03`. Returns `None` for names that do not
/// follow the pattern or name an impossible month.
#[must_use]
pub fn month_from_file_name(name: &str) -> Option<MonthKey> {
    let caps = MONTH_FILE_REGEX.captures(name)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    MonthKey::new(year, month)
}

/// All `rsp_*.json` files directly inside `dir`, sorted by name
pub fn archive_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(ARCHIVE_PREFIX) && n.ends_with(".json"))
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Parse one archive file into normalized articles
pub fn read_archive_file(path: &Path) -> Result<Vec<ArticleRecord>> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let response: ArchiveResponse =
        serde_json::from_str(&content).map_err(|e| Error::malformed(path, e))?;
    Ok(response.into_articles())
}

/// Load every archive file in `dir` into one article list
///
/// Unreadable files are skipped with a warning.
pub fn load_articles(dir: &Path) -> Result<Vec<ArticleRecord>> {
    let files = archive_files(dir)?;
    let mut articles = Vec::new();
    let mut skipped = 0usize;

    for path in &files {
        match read_archive_file(path) {
            Ok(batch) => {
                tracing::debug!(path = %path.display(), articles = batch.len(), "Loaded archive file");
                articles.extend(batch);
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!(path = %path.display(), error = %e, "Could not load archive file, skipping");
            }
        }
    }

    tracing::info!(
        dir = %dir.display(),
        files = files.len(),
        skipped,
        articles = articles.len(),
        "Loaded articles"
    );

    Ok(articles)
}

/// Load archive files in `dir` grouped by the month in their file name
///
/// Files whose names carry no valid month are ignored; files that fail to
/// parse are skipped with a warning and contribute no articles. Several
/// files naming the same month are merged.
pub fn load_monthly_articles(dir: &Path) -> Result<MonthlyArticles> {
    let mut monthly = MonthlyArticles::new();

    for path in archive_files(dir)? {
        let Some(month) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(month_from_file_name)
        else {
            tracing::debug!(path = %path.display(), "Archive file name carries no month, ignoring");
            continue;
        };

        match read_archive_file(&path) {
            Ok(batch) => monthly.entry(month).or_default().extend(batch),
            Err(e) => {
                tracing::warn!(path = %path.display(), month = %month, error = %e, "Could not load month file, skipping");
            }
        }
    }

    tracing::info!(dir = %dir.display(), months = monthly.len(), "Loaded monthly articles");
    Ok(monthly)
}

/// Serialize `value` as pretty JSON and write it atomically
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let content = serde_json::to_string_pretty(value)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content).map_err(|e| Error::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

    Ok(())
}

/// Read and deserialize a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::malformed(path, e))
}

pub fn save_graph(path: &Path, graph: &Graph) -> Result<()> {
    save_json(path, graph)?;
    tracing::info!(
        path = %path.display(),
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "Saved graph"
    );
    Ok(())
}

/// Read a persisted graph
///
/// Unlike archive files, a graph that fails to parse is not skippable: it
/// is reported as [`Error::AllowList`], which is never recoverable.
pub fn load_graph(path: &Path) -> Result<Graph> {
    load_json(path).map_err(|e| match e {
        Error::MalformedInput { path, reason } => Error::AllowList { path, reason },
        other => other,
    })
}

/// Node keywords of a persisted graph
///
/// Any failure here is fatal for the timeseries stage: without the
/// allow-list there is nothing meaningful to compute.
pub fn load_graph_keywords(path: &Path) -> Result<BTreeSet<String>> {
    let keywords = load_graph(path)?.keywords();
    tracing::info!(path = %path.display(), keywords = keywords.len(), "Loaded keywords from graph");
    Ok(keywords)
}

pub fn save_timeseries(path: &Path, series: &Timeseries) -> Result<()> {
    save_json(path, series)?;
    tracing::info!(path = %path.display(), keywords = series.len(), "Saved timeseries");
    Ok(())
}

pub fn load_timeseries(path: &Path) -> Result<Timeseries> {
    load_json(path)
}
