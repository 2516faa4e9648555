//! HTTP fetcher with bounded retry and linear backoff
//!
//! This module handles all HTTP requests for the crawl, including:
//! - Building the HTTP client with a polite user agent string
//! - Classifying failures as transient (retryable) or structural (skip)
//! - The process-wide retry counter and the cooldown it drives
//! - The retry-exactly-once policy
//!
//! # Retry policy
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Timeout / connection error | Cooldown, retry once |
//! | HTTP 429 / 5xx | Cooldown, retry once |
//! | Other non-success status | Immediate structural failure, no retry |
//! | Second transient failure | Retries exhausted, branch abandoned |
//!
//! The failure counter is never reset: cooldown durations ratchet upward
//! across the whole run regardless of which branch caused the failure.

use crate::config::UserAgentConfig;
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully fetched page: final URL plus body
///
/// The body is parsed by whichever extraction step consumes the page; pages
/// are never cached across traversal levels.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects
    pub url: Url,

    /// Raw response body
    pub body: String,
}

/// Failure modes of a fetch
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// Network-class failure that may succeed on retry
    #[error("Transient failure fetching {url}: {error}")]
    Transient { url: String, error: String },

    /// Transient failure that persisted through the single retry; the caller
    /// must abandon this branch of the traversal
    #[error("Retries exhausted for {url}: {error}")]
    RetriesExhausted { url: String, error: String },

    /// The page is broken rather than the connection; skip it, no retry
    #[error("Structural failure fetching {url}: {message}")]
    Structural { url: String, message: String },
}

/// Process-wide cumulative failure counter
///
/// Shared across all three traversal levels and never reset, so the cooldown
/// after the k-th cumulative failure is k times the base duration. Atomic so
/// a bounded-concurrency variant keeps the monotone-backoff invariant.
#[derive(Debug, Default)]
pub struct RetryState {
    failures: AtomicU32,
}

impl RetryState {
    /// Creates a fresh counter at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one failure and returns the new cumulative count
    pub fn record_failure(&self) -> u32 {
        self.failures.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current cumulative failure count
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }
}

/// Cooldown length after the `failures`-th cumulative failure
pub fn cooldown_duration(failures: u32, base_secs: u64) -> Duration {
    Duration::from_secs(u64::from(failures) * base_secs)
}

/// Blocks the (single) worker for the scaled cooldown, with a banner
async fn cooldown(failures: u32, base_secs: u64) {
    let duration = cooldown_duration(failures, base_secs);
    tracing::warn!("{}", "=".repeat(80));
    tracing::warn!("Sleeping for {:.1} minutes ...", duration.as_secs_f64() / 60.0);
    tokio::time::sleep(duration).await;
    tracing::warn!("{}", "=".repeat(80));
}

/// Diagnostics for a failed fetch: the target URL and the underlying error
fn log_failed_connection(url: &str, error: &str) {
    tracing::error!("Failed to connect to {}", url);
    tracing::error!("{}", error);
}

/// Builds the HTTP client with a polite user agent
///
/// User agent format: `CrawlerName/Version (+ContactURL; ContactEmail)`.
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs a single fetch attempt and classifies any failure
async fn fetch_once(client: &Client, url: &Url) -> Result<Page, FetchFailure> {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return Err(FetchFailure::Transient {
                url: url.to_string(),
                error,
            });
        }
    };

    let status = response.status();
    let final_url = response.url().clone();

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return Err(FetchFailure::Transient {
            url: url.to_string(),
            error: format!("HTTP {}", status),
        });
    }

    if !status.is_success() {
        return Err(FetchFailure::Structural {
            url: url.to_string(),
            message: format!("HTTP {}", status),
        });
    }

    match response.text().await {
        Ok(body) => Ok(Page {
            url: final_url,
            body,
        }),
        Err(e) => Err(FetchFailure::Transient {
            url: url.to_string(),
            error: e.to_string(),
        }),
    }
}

/// Fetches a URL, retrying exactly once after a scaled cooldown
///
/// On a transient failure the shared counter is bumped, the worker sleeps
/// `count × base_secs` seconds, and the fetch is attempted one more time.
/// A second transient failure is reported as [`FetchFailure::RetriesExhausted`]
/// and the caller must stop descending into this subtree. Structural failures
/// are returned immediately with no retry and no cooldown.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `retry` - The process-wide failure counter
/// * `base_secs` - Base cooldown duration in seconds
pub async fn fetch_with_retry(
    client: &Client,
    url: &Url,
    retry: &RetryState,
    base_secs: u64,
) -> Result<Page, FetchFailure> {
    match fetch_once(client, url).await {
        Ok(page) => Ok(page),
        Err(failure @ FetchFailure::Structural { .. }) => Err(failure),
        Err(FetchFailure::Transient {
            url: failed_url,
            error,
        }) => {
            log_failed_connection(&failed_url, &error);
            let failures = retry.record_failure();
            cooldown(failures, base_secs).await;

            // Try again
            match fetch_once(client, url).await {
                Ok(page) => Ok(page),
                Err(FetchFailure::Transient {
                    url: failed_url,
                    error,
                }) => {
                    log_failed_connection(&failed_url, &error);
                    tracing::error!("Tried again and still could not connect.");
                    Err(FetchFailure::RetriesExhausted {
                        url: failed_url,
                        error,
                    })
                }
                Err(failure) => Err(failure),
            }
        }
        Err(failure) => Err(failure),
    }
}
