//! Crawler module: fetching, extraction, and traversal orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with single-retry backoff and the shared failure counter
//! - Link and field extraction per traversal level
//! - The three-level traversal coordinator

mod coordinator;
mod extract;
mod fetcher;

pub use coordinator::{run_crawl, Coordinator};
pub use extract::{
    all_documents_link, document_links, document_record, month_links, DocumentRecord,
    ExtractError,
};
pub use fetcher::{
    build_http_client, cooldown_duration, fetch_with_retry, FetchFailure, Page, RetryState,
};

use crate::config::Config;
use crate::output::RunStats;
use crate::GleanError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Fetch the root page and discover month links
/// 3. Walk each month's all-documents listing under its cap
/// 4. Normalize each valid document and append it to the corpus
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(RunStats)` - Crawl completed
/// * `Err(GleanError)` - Fatal abort
pub async fn crawl(config: Config) -> Result<RunStats, GleanError> {
    run_crawl(config).await
}
