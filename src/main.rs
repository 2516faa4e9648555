//! Gleaner main entry point
//!
//! Command-line interface for the labeled-abstract corpus crawler.

use anyhow::Result;
use clap::Parser;
use gleaner::config::load_config_with_hash;
use gleaner::crawler::crawl;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Gleaner: a labeled-abstract corpus builder
///
/// Gleaner walks a paginated document archive month by month, pulls each
/// document's abstract, normalizes it into a labeled token row, and appends
/// the rows to a corpus file.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version = "1.0.0")]
#[command(about = "A labeled-abstract corpus crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    // Run the crawl; completion and fatal abort both print the elapsed time
    let start = Instant::now();
    match crawl(config).await {
        Ok(stats) => {
            tracing::info!("Corpus rows written: {}", stats.documents_written);
        }
        Err(e) => {
            tracing::error!("Crawl aborted: {}", e);
        }
    }
    println!("{:.2?}", start.elapsed());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &gleaner::config::Config, config_hash: &str) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Archive:");
    println!("  Base URL: {}", config.archive.base_url);
    println!("  Root path: {}", config.archive.root_path);
    println!("  Year prefix: {}", config.archive.year_prefix);
    println!("  Subjects: {}", config.archive.subjects.join(", "));

    println!("\nCrawler:");
    println!("  Monthly caps: {:?}", config.crawler.monthly_caps);
    println!("  Cooldown base: {}s", config.crawler.cooldown_base_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Corpus: {}", config.output.corpus_path);

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
    println!(
        "✓ Would crawl up to {} months from {}{}",
        config.crawler.monthly_caps.len(),
        config.archive.base_url,
        config.archive.root_path
    );
}
