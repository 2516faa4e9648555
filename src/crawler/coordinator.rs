//! Crawl coordinator - the three-level traversal state machine
//!
//! Drives ROOT → MONTH → ALL_LISTING → DOCUMENT in strict sequence: one
//! fetch in flight at a time, cooldown blocking the single worker. Failure
//! policy per level:
//!
//! - ROOT: any failure aborts the whole run
//! - MONTH / ALL_LISTING: exhausted retries terminate the whole remaining
//!   traversal (fail-fast); structural problems skip to the next month
//! - DOCUMENT: exhausted retries abandon the rest of this month's documents;
//!   structural problems skip to the next document; an out-of-set category
//!   is an expected filtering condition and is discarded silently

use crate::config::Config;
use crate::crawler::extract::{
    all_documents_link, document_links, document_record, month_links,
};
use crate::crawler::fetcher::{build_http_client, fetch_with_retry};
use crate::crawler::{FetchFailure, Page, RetryState};
use crate::output::{CorpusFile, RowSink, RunStats};
use crate::text::{normalize, StopWords};
use crate::GleanError;
use reqwest::Client;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

/// Main crawl coordinator
///
/// Owns the HTTP client, the process-wide retry counter, the stop-word set,
/// and the row sink for the duration of one run.
pub struct Coordinator<S: RowSink> {
    config: Config,
    client: Client,
    base: Url,
    subjects: HashSet<String>,
    retry: RetryState,
    stop_words: StopWords,
    sink: S,
    stats: RunStats,
}

impl<S: RowSink> Coordinator<S> {
    /// Creates a coordinator from a validated configuration and a row sink
    pub fn new(config: Config, sink: S) -> Result<Self, GleanError> {
        let base = Url::parse(&config.archive.base_url)?;
        let client = build_http_client(&config.user_agent)?;
        let subjects = config.archive.subjects.iter().cloned().collect();

        Ok(Self {
            config,
            client,
            base,
            subjects,
            retry: RetryState::new(),
            stop_words: StopWords::new(),
            sink,
            stats: RunStats::default(),
        })
    }

    /// Fetches one URL with the shared retry counter and configured cooldown
    async fn fetch(&self, url: &Url) -> Result<Page, FetchFailure> {
        fetch_with_retry(
            &self.client,
            url,
            &self.retry,
            self.config.crawler.cooldown_base_secs,
        )
        .await
    }

    /// Runs the traversal to completion and returns the run statistics
    ///
    /// Returns an error only for fatal conditions: an unreachable or
    /// malformed root page, or a cap list shorter than the discovered month
    /// list. Fail-fast termination after month-level retry exhaustion is a
    /// normal (early) completion, not an error.
    pub async fn run(mut self) -> Result<RunStats, GleanError> {
        let root_url = self.base.join(&self.config.archive.root_path)?;

        // ROOT: no months can be discovered without it, so failure is fatal
        let root_page = match self.fetch(&root_url).await {
            Ok(page) => page,
            Err(FetchFailure::Structural { url, message }) => {
                return Err(GleanError::RootMalformed {
                    url,
                    error: message,
                })
            }
            Err(failure) => {
                return Err(GleanError::RootUnreachable {
                    url: root_url.to_string(),
                    error: failure.to_string(),
                })
            }
        };
        tracing::info!("Connected to root page: {}", root_page.url);

        let months = month_links(&root_page, &self.config.archive.year_prefix, &self.base);
        drop(root_page);
        tracing::info!("Discovered {} month pages", months.len());

        // The cap list aligns positionally with the month list
        let caps = &self.config.crawler.monthly_caps;
        if caps.len() < months.len() {
            return Err(GleanError::CapListTooShort {
                caps: caps.len(),
                months: months.len(),
            });
        }
        if caps.len() > months.len() {
            tracing::warn!(
                "Cap list has {} entries for {} months; extra entries ignored",
                caps.len(),
                months.len()
            );
        }

        'months: for (month_index, month_url) in months.iter().enumerate() {
            let month_page = match self.fetch(month_url).await {
                Ok(page) => page,
                Err(FetchFailure::Structural { url, message }) => {
                    tracing::warn!("Skipping month page {}: {}", url, message);
                    continue;
                }
                Err(failure) => {
                    tracing::error!("{}", failure);
                    tracing::error!("Terminating traversal after month-level retry exhaustion");
                    break 'months;
                }
            };
            tracing::info!("Connected to month page: {}", month_page.url);

            // ALL_LISTING: the consolidated view with every document link
            let all_url = match all_documents_link(&month_page, &self.base) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping month {}: {}", month_page.url, e);
                    continue;
                }
            };
            drop(month_page);

            let listing_page = match self.fetch(&all_url).await {
                Ok(page) => page,
                Err(FetchFailure::Structural { url, message }) => {
                    tracing::warn!("Skipping month listing {}: {}", url, message);
                    continue;
                }
                Err(failure) => {
                    tracing::error!("{}", failure);
                    tracing::error!("Terminating traversal after listing-level retry exhaustion");
                    break 'months;
                }
            };
            tracing::info!("Connected to month ALL page: {}", listing_page.url);
            self.stats.months_visited += 1;

            let doc_urls = match document_links(&listing_page, &self.base) {
                Ok(urls) => urls,
                Err(e) => {
                    tracing::warn!("Skipping month listing {}: {}", listing_page.url, e);
                    continue;
                }
            };
            drop(listing_page);

            self.process_documents(month_index, &doc_urls).await?;
        }

        self.stats.fetch_failures = u64::from(self.retry.failures());
        Ok(self.stats)
    }

    /// Iterates one month's document links under its cap
    async fn process_documents(
        &mut self,
        month_index: usize,
        doc_urls: &[Url],
    ) -> Result<(), GleanError> {
        let cap = self.config.crawler.monthly_caps[month_index];

        // The counter starts at one and the cap check precedes the
        // increment, so a cap of N admits N-1 documents.
        let mut doc_ct: u32 = 1;
        for doc_url in doc_urls {
            if doc_ct >= cap {
                break;
            }
            doc_ct += 1;

            let doc_page = match self.fetch(doc_url).await {
                Ok(page) => page,
                Err(FetchFailure::Structural { url, message }) => {
                    tracing::warn!("Skipping document {}: {}", url, message);
                    self.stats.documents_skipped += 1;
                    continue;
                }
                Err(failure) => {
                    tracing::error!("{}", failure);
                    tracing::error!("Abandoning remaining documents for this month");
                    break;
                }
            };
            tracing::info!(
                "Connected to month {} document page {}: {}",
                month_index + 1,
                doc_ct,
                doc_page.url
            );

            let record = match document_record(&doc_page) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Skipping document: {}", e);
                    self.stats.documents_skipped += 1;
                    continue;
                }
            };
            drop(doc_page);

            // Expected filtering condition, not a fault
            if !self.subjects.contains(&record.category) {
                tracing::debug!(
                    "Discarding document with category '{}' outside the subject set",
                    record.category
                );
                self.stats.documents_discarded += 1;
                continue;
            }

            let row = normalize(&record.text, &record.category, &self.stop_words);
            self.sink.append_row(&row)?;
            self.stats.documents_written += 1;
        }

        Ok(())
    }
}

/// Runs a complete crawl with the file-backed corpus sink
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
///
/// # Returns
///
/// * `Ok(RunStats)` - Crawl completed (possibly fail-fast early)
/// * `Err(GleanError)` - Fatal abort
pub async fn run_crawl(config: Config) -> Result<RunStats, GleanError> {
    let sink = CorpusFile::new(Path::new(&config.output.corpus_path));
    let coordinator = Coordinator::new(config, sink)?;
    let stats = coordinator.run().await?;
    stats.log_summary();
    Ok(stats)
}
