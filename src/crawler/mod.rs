//! Crawler module
//!
//! This module contains the core crawling logic:
//! - HTTP fetching with redirect handling
//! - Content classification (sitemap XML, HTML pages, terminal archives)
//! - The frontier loop with exactly-once-visit semantics

mod classifier;
mod fetcher;
mod frontier;

pub use classifier::{classify, parse_page, parse_sitemap, PageLink, ParsedContent};
pub use fetcher::{build_http_client, fetch_url, FetchedPage};
pub use frontier::{CrawlSummary, Crawler, Frontier};

use crate::config::Config;
use crate::storage::SqliteStorage;
use crate::ScoutError;
use std::path::Path;

/// Runs a complete crawl against the database named in the configuration
///
/// This is the main entry point used by the binary: it opens the SQLite
/// database, seeds the frontier, and drains it.
pub async fn crawl(config: &Config) -> Result<CrawlSummary, ScoutError> {
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let mut crawler = Crawler::new(config, storage)?;
    crawler.run().await
}
