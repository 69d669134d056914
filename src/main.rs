//! Archive-Scout main entry point
//!
//! Command-line interface for the sitemap-driven archive discoverer.

use anyhow::Context;
use archive_scout::config::load_config;
use archive_scout::crawler::crawl;
use archive_scout::storage::{SqliteStorage, Storage};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Archive-Scout: discover downloadable archives via sitemaps
///
/// Walks a site's XML sitemaps and HTML directory listings, recording every
/// archive URL for a later download phase.
#[derive(Parser, Debug)]
#[command(name = "archive-scout")]
#[command(version)]
#[command(about = "Discover downloadable archives via sitemaps", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show record counts from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    if cli.stats {
        return handle_stats(&config);
    }

    // The download phase expects its target directory to exist
    std::fs::create_dir_all(&config.output.download_dir)
        .with_context(|| format!("failed to create {}", config.output.download_dir))?;

    let summary = crawl(&config).await?;

    tracing::info!(
        "Done: {} URLs visited, {} sitemap records, {} archives queued",
        summary.visited,
        summary.sitemap_records,
        summary.archives
    );
    if summary.failures > 0 {
        tracing::warn!("{} URLs failed to fetch or parse", summary.failures);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("archive_scout=info,warn"),
            1 => EnvFilter::new("archive_scout=debug,info"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &archive_scout::config::Config) {
    println!("=== Archive-Scout Dry Run ===\n");

    println!("Crawler:");
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  User agent: {}", config.crawler.user_agent);
    println!(
        "  Descend into directory URLs: {}",
        config.crawler.descend_directories
    );

    println!("\nSite:");
    println!("  Origin: {}", config.site.origin);
    println!("  Archive suffixes: {:?}", config.site.archive_suffixes);

    println!("\nSeeds ({}):", config.site.seeds.len());
    for seed in &config.site.seeds {
        println!("  - {}", seed);
    }

    println!("\nSkipped entry points ({}):", config.site.skip.len());
    for url in &config.site.skip {
        println!("  - {}", url);
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Download dir: {}", config.output.download_dir);

    println!("\n\u{2713} Configuration is valid");
}

/// Handles the --stats mode: shows record counts from the database
fn handle_stats(config: &archive_scout::config::Config) -> anyhow::Result<()> {
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    println!("Database: {}\n", config.output.database_path);
    println!("Sitemap records: {}", storage.count_sitemap_records()?);
    println!("Archives queued: {}", storage.count_archive_records()?);

    Ok(())
}
