//! Run statistics accumulated during a crawl

/// Counters accumulated over one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Month pages successfully fetched and descended into
    pub months_visited: u64,

    /// Documents normalized and written to the corpus
    pub documents_written: u64,

    /// Documents discarded because their category was outside the subject set
    pub documents_discarded: u64,

    /// Document pages skipped for structural reasons (missing/malformed fields)
    pub documents_skipped: u64,

    /// Cumulative fetch failures (the final retry-counter value)
    pub fetch_failures: u64,
}

impl RunStats {
    /// Logs a one-line end-of-run summary
    pub fn log_summary(&self) {
        tracing::info!(
            "Run complete: {} months visited, {} rows written, {} discarded (invalid category), {} skipped (structural), {} fetch failures",
            self.months_visited,
            self.documents_written,
            self.documents_discarded,
            self.documents_skipped,
            self.fetch_failures,
        );
    }
}
