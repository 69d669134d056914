//! Crawl frontier and main loop
//!
//! The frontier owns the pending and visited URL sets and drives the whole
//! crawl: pop a URL, classify it, fold discoveries back in, repeat until the
//! pending set drains. URL identity is plain textual equality after redirect
//! resolution. Pop order is arbitrary; it changes the traversal shape, never
//! the set of visited URLs.

use crate::config::Config;
use crate::crawler::classifier::{classify, PageLink, ParsedContent};
use crate::crawler::fetcher::{build_http_client, fetch_url};
use crate::storage::{ArchiveRecord, SitemapRecord, Storage};
use crate::url::{is_directory_url, ArchiveRules};
use crate::ScoutError;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Pending/visited URL state for one crawl run.
///
/// Owned exclusively by the [`Crawler`]; rebuilt fresh each run, never
/// persisted. A URL that reaches `visited` can never re-enter `pending`.
#[derive(Debug, Default)]
pub struct Frontier {
    pending: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded with `seeds`, with `skip` pre-marked visited
    pub fn new(seeds: &[String], skip: &[String]) -> Self {
        let mut frontier = Self {
            pending: HashSet::new(),
            visited: skip.iter().cloned().collect(),
        };
        for seed in seeds {
            frontier.push(seed.clone());
        }
        frontier
    }

    /// Removes and returns an arbitrary pending URL
    pub fn pop(&mut self) -> Option<String> {
        let url = self.pending.iter().next().cloned()?;
        self.pending.remove(&url);
        Some(url)
    }

    /// Enqueues a URL unless it has already been visited
    pub fn push(&mut self, url: String) {
        if !self.visited.contains(&url) {
            self.pending.insert(url);
        }
    }

    pub fn mark_visited(&mut self, url: String) {
        self.visited.insert(url);
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }
}

/// Counters reported when a crawl run finishes
#[derive(Debug, Default, Clone, Copy)]
pub struct CrawlSummary {
    /// URLs marked visited (fetched, short-circuited, or failed)
    pub visited: usize,
    /// Sitemap records newly inserted (re-discoveries are not counted)
    pub sitemap_records: usize,
    /// Archive records newly inserted
    pub archives: usize,
    /// URLs whose fetch or parse failed (treated as leaves)
    pub failures: usize,
}

/// Drives the crawl: fetch, classify, persist, repeat.
///
/// Generic over the storage backend so tests can run against an in-memory
/// database.
pub struct Crawler<S: Storage> {
    client: Client,
    storage: S,
    frontier: Frontier,
    rules: ArchiveRules,
    seeds: HashSet<String>,
    delay: Duration,
    descend_directories: bool,
}

impl<S: Storage> Crawler<S> {
    /// Creates a crawler from a validated configuration
    pub fn new(config: &Config, storage: S) -> Result<Self, ScoutError> {
        let client = build_http_client(&config.crawler.user_agent)?;
        let frontier = Frontier::new(&config.site.seeds, &config.site.skip);

        Ok(Self {
            client,
            storage,
            frontier,
            rules: ArchiveRules::from_site_config(&config.site),
            seeds: config.site.seeds.iter().cloned().collect(),
            delay: Duration::from_millis(config.crawler.request_delay_ms),
            descend_directories: config.crawler.descend_directories,
        })
    }

    /// Runs the crawl to frontier exhaustion
    ///
    /// Per-URL fetch and parse failures are logged and treated as "no
    /// children discovered". Storage failures abort the run: the whole point
    /// of the crawl is durable recording.
    pub async fn run(&mut self) -> Result<CrawlSummary, ScoutError> {
        let mut summary = CrawlSummary::default();

        while let Some(url) = self.frontier.pop() {
            if self.frontier.is_visited(&url) {
                continue;
            }

            // Bare directory URLs carry no content-type context; they are only
            // useful when reached as HTML pages. Unless the descend policy is
            // on, dropping them here preserves the reference behavior.
            if is_directory_url(&url) && !self.seeds.contains(&url) && !self.descend_directories {
                tracing::debug!("Skipping directory URL {}", url);
                continue;
            }

            self.frontier.mark_visited(url.clone());
            summary.visited += 1;

            match self.process_url(&url, &mut summary).await {
                Ok(()) => {}
                Err(e @ (ScoutError::Database(_) | ScoutError::Storage(_))) => return Err(e),
                Err(e) => {
                    tracing::warn!("Error processing {}: {}", url, e);
                    summary.failures += 1;
                }
            }
        }

        tracing::info!(
            "Crawl complete: {} visited, {} sitemap records, {} archives, {} failures",
            summary.visited,
            summary.sitemap_records,
            summary.archives,
            summary.failures
        );

        Ok(summary)
    }

    /// Processes one popped URL
    async fn process_url(
        &mut self,
        url: &str,
        summary: &mut CrawlSummary,
    ) -> Result<(), ScoutError> {
        // Archive URLs are terminal: recorded, never dereferenced
        if self.rules.is_archive_url(url) {
            if self.storage.upsert_archive_record(&ArchiveRecord {
                url: url.to_string(),
            })? {
                summary.archives += 1;
            }
            return Ok(());
        }

        let page = fetch_url(&self.client, url).await;

        // Politeness pause after every request, successful or not
        tokio::time::sleep(self.delay).await;

        let page = page?;

        let base_url = Url::parse(&page.final_url)?;
        let parsed = classify(&page.content_type, &page.body, &base_url, &self.rules)?;

        match parsed {
            ParsedContent::Sitemap(entries) => {
                if !entries.is_empty() {
                    tracing::info!("  \u{21b3} {} sitemap entries", entries.len());
                }
                for entry in entries {
                    let record = SitemapRecord {
                        url: entry.url.clone(),
                        last_modified: entry.last_modified,
                    };
                    if self.storage.upsert_sitemap_record(&record)? {
                        summary.sitemap_records += 1;
                    }
                    self.frontier.push(entry.url);
                }
            }
            ParsedContent::Page(links) => {
                let archives = links
                    .iter()
                    .filter(|l| matches!(l, PageLink::Archive(_)))
                    .count();
                if archives > 0 {
                    tracing::info!("  \u{21b3} Found {} archive links", archives);
                }
                for link in links {
                    match link {
                        PageLink::Archive(target) => {
                            if self
                                .storage
                                .upsert_archive_record(&ArchiveRecord { url: target })?
                            {
                                summary.archives += 1;
                            }
                        }
                        PageLink::Descend(target) => {
                            self.frontier.push(target);
                        }
                    }
                }
            }
            ParsedContent::Unrecognized => {}
        }

        Ok(())
    }

    /// Read access to the storage backend (used by tests and the stats mode)
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seeds_enter_pending() {
        let frontier = Frontier::new(&urls(&["https://example.test/sitemap.xml"]), &[]);
        assert_eq!(frontier.pending_len(), 1);
        assert_eq!(frontier.visited_len(), 0);
    }

    #[test]
    fn test_skip_list_is_pre_visited() {
        let frontier = Frontier::new(
            &urls(&["https://example.test/sitemap_index.xml"]),
            &urls(&[
                "https://example.test/page-sitemap.xml",
                "https://example.test/parties-sitemap.xml",
            ]),
        );
        assert!(frontier.is_visited("https://example.test/page-sitemap.xml"));
        assert_eq!(frontier.pending_len(), 1);
    }

    #[test]
    fn test_push_of_visited_url_is_ignored() {
        let mut frontier = Frontier::new(&[], &[]);
        frontier.mark_visited("https://example.test/a".to_string());
        frontier.push("https://example.test/a".to_string());
        assert_eq!(frontier.pending_len(), 0);
    }

    #[test]
    fn test_skipped_seed_is_never_pending() {
        // A URL in both seeds and skip stays skipped
        let frontier = Frontier::new(
            &urls(&["https://example.test/x.xml"]),
            &urls(&["https://example.test/x.xml"]),
        );
        assert_eq!(frontier.pending_len(), 0);
    }

    #[test]
    fn test_pop_drains_pending() {
        let mut frontier = Frontier::new(
            &urls(&["https://example.test/a", "https://example.test/b"]),
            &[],
        );
        let mut popped = HashSet::new();
        while let Some(url) = frontier.pop() {
            popped.insert(url);
        }
        assert_eq!(popped.len(), 2);
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_duplicate_push_collapses() {
        let mut frontier = Frontier::new(&[], &[]);
        frontier.push("https://example.test/a".to_string());
        frontier.push("https://example.test/a".to_string());
        assert_eq!(frontier.pending_len(), 1);
    }
}
