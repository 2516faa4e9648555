use serde::Deserialize;

/// Main configuration structure for Gleaner
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Archive coordinates: where the crawl starts and what it selects
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Base URL of the archive site, used to resolve relative hrefs
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the year index page, joined onto the base URL
    #[serde(rename = "root-path")]
    pub root_path: String,

    /// Two-character prefix that month-link anchor text must start with
    /// (e.g. "19" for a 2019 run)
    #[serde(rename = "year-prefix")]
    pub year_prefix: String,

    /// Closed set of valid two-character category codes
    pub subjects: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Per-month document caps, indexed by month traversal order
    #[serde(rename = "monthly-caps")]
    pub monthly_caps: Vec<u32>,

    /// Base cooldown in seconds; the k-th cumulative failure sleeps k times this
    #[serde(rename = "cooldown-base-secs", default = "default_cooldown_base")]
    pub cooldown_base_secs: u64,
}

fn default_cooldown_base() -> u64 {
    300
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the append-only corpus file
    #[serde(rename = "corpus-path")]
    pub corpus_path: String,
}
