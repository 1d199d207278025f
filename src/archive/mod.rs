//! Monthly archive downloader
//!
//! Fetches one month of article metadata per request from an archive API
//! (`{base_url}/{year}/{month}.json?api-key=...`) and stores each response as
//! `rsp_<year>_<month>.json`, the layout the aggregation stages read.
//!
//! Requests are paced by a governor rate limiter and retried with
//! exponential backoff on 429 and 5xx responses.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{header::ACCEPT, Client};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::config::ArchiveConfig;
use crate::storage::archive_file_name;

/// Errors that can occur while downloading archive months
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Archive returned status {0}")]
    Status(u16),

    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts exceeded")]
    MaxRetriesExceeded,

    /// No API key configured
    #[error("No API key configured (set NYT_API_KEY or archive.api_key)")]
    MissingApiKey,

    /// Invalid month
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    /// Writing the response to disk failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status(code) => ArchiveClient::should_retry(*code),
            Self::MaxRetriesExceeded => true,
            Self::MissingApiKey | Self::InvalidMonth { .. } | Self::Write { .. } => false,
        }
    }
}

/// Every `(year, month)` from `start_month` of `start_year` through December of `end_year`
#[must_use]
pub fn months_in_range(start_year: i32, end_year: i32, start_month: u32) -> Vec<(i32, u32)> {
    (start_year..=end_year)
        .flat_map(|year| {
            let first = if year == start_year { start_month.max(1) } else { 1 };
            (first..=12).map(move |month| (year, month))
        })
        .collect()
}

/// Summary of a download run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Files written, in request order
    pub written: Vec<PathBuf>,
    /// Months left unrequested because the call budget ran out
    pub remaining: usize,
}

/// Archive API client with pacing and retry
pub struct ArchiveClient {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter spacing out requests
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    api_key: String,

    base_url: String,

    /// Maximum number of retry attempts for failed requests
    max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    base_delay_ms: u64,

    max_calls: u32,
}

impl ArchiveClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::MissingApiKey` when no key is configured and
    /// `ArchiveError::Http` if the HTTP client cannot be created
    pub fn new(config: &ArchiveConfig) -> Result<Self, ArchiveError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(ArchiveError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .build()?;

        let quota = match config.request_interval_secs {
            0 => Quota::per_second(NonZeroU32::MAX),
            secs => Quota::with_period(Duration::from_secs(secs))
                .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN)),
        };

        Ok(Self {
            client,
            rate_limiter: RateLimiter::direct(quota),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: 3,
            base_delay_ms: 1000,
            max_calls: config.max_calls,
        })
    }

    /// Override retry behaviour
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, base_delay_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.base_delay_ms = base_delay_ms;
        self
    }

    fn month_url(&self, year: i32, month: u32) -> String {
        format!("{}/{year}/{month}.json", self.base_url)
    }

    /// Fetch the raw JSON body for one month
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::Status` for non-retryable statuses and
    /// `ArchiveError::MaxRetriesExceeded` when every attempt failed
    pub async fn fetch_month(&self, year: i32, month: u32) -> Result<String, ArchiveError> {
        if !(1..=12).contains(&month) {
            return Err(ArchiveError::InvalidMonth { year, month });
        }

        let url = self.month_url(year, month);

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay_ms * 2_u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            self.rate_limiter.until_ready().await;

            let response = self
                .client
                .get(&url)
                .query(&[("api-key", self.api_key.as_str())])
                .header(ACCEPT, "application/json")
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if response.status().is_success() {
                        return Ok(response.text().await?);
                    } else if Self::should_retry(status) {
                        tracing::warn!(year, month, status, attempt, "Retryable archive response");
                        continue;
                    } else {
                        return Err(ArchiveError::Status(status));
                    }
                }
                Err(e) => {
                    tracing::warn!(year, month, attempt, error = %e, "Archive request failed");
                }
            }
        }

        Err(ArchiveError::MaxRetriesExceeded)
    }

    /// Download every month in range into `output_dir`
    ///
    /// Stops early, without error, once `max_calls` requests were made.
    pub async fn download_range(
        &self,
        start_year: i32,
        end_year: i32,
        start_month: u32,
        output_dir: &Path,
    ) -> Result<DownloadReport, ArchiveError> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| ArchiveError::Write {
                path: output_dir.to_path_buf(),
                source,
            })?;

        let months = months_in_range(start_year, end_year, start_month);
        let mut report = DownloadReport::default();

        for (i, &(year, month)) in months.iter().enumerate() {
            if i as u32 >= self.max_calls {
                report.remaining = months.len() - i;
                tracing::warn!(max_calls = self.max_calls, remaining = report.remaining, "Reached maximum call count");
                break;
            }

            tracing::info!(year, month, "Downloading archive month");
            let body = self.fetch_month(year, month).await?;

            let path = output_dir.join(archive_file_name(year, month));
            tokio::fs::write(&path, body)
                .await
                .map_err(|source| ArchiveError::Write {
                    path: path.clone(),
                    source,
                })?;
            report.written.push(path);
        }

        Ok(report)
    }

    /// Determine if a status code should trigger a retry
    ///
    /// Retry on 429 and 500/502/503/504.
    pub(crate) fn should_retry(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }
}
