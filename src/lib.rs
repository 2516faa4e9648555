//! Gleaner: a labeled-abstract corpus builder
//!
//! This crate implements a sequential, polite crawler over a paginated
//! document archive (year → month → all-documents listing → document).
//! Each document's abstract is normalized into a labeled token row and
//! appended to a corpus file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod text;

use thiserror::Error;

/// Main error type for Gleaner operations
#[derive(Debug, Error)]
pub enum GleanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Root page unreachable at {url}: {error}")]
    RootUnreachable { url: String, error: String },

    #[error("Root page malformed at {url}: {error}")]
    RootMalformed { url: String, error: String },

    #[error("Cap list has {caps} entries but {months} month pages were discovered")]
    CapListTooShort { caps: usize, months: usize },

    #[error("Corpus sink error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Gleaner operations
pub type Result<T> = std::result::Result<T, GleanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{FetchFailure, Page, RetryState};
pub use output::{CorpusFile, RowSink, RunStats};
pub use text::{normalize, StopWords};
