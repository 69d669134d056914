//! Storage trait definition
//!
//! The crawl frontier only needs two idempotent upserts; the read-back
//! operations exist for the `--stats` mode and for tests to assert final
//! database contents.

use crate::storage::{ArchiveRecord, SitemapRecord};
use thiserror::Error;

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable record of discovered sitemap and archive URLs.
///
/// Both upserts are idempotent: inserting a record whose URL already exists
/// is a no-op, and the first-stored `last_modified` value is preserved.
pub trait Storage {
    /// Records a sitemap-discovered URL, ignoring primary-key conflicts.
    /// Returns true when a new row was inserted.
    fn upsert_sitemap_record(&mut self, record: &SitemapRecord) -> StorageResult<bool>;

    /// Records an archive URL for the download phase, ignoring conflicts.
    /// Returns true when a new row was inserted.
    fn upsert_archive_record(&mut self, record: &ArchiveRecord) -> StorageResult<bool>;

    /// Looks up a sitemap record by URL
    fn get_sitemap_record(&self, url: &str) -> StorageResult<Option<SitemapRecord>>;

    /// Returns all recorded archive URLs, ordered by URL text
    fn list_archive_urls(&self) -> StorageResult<Vec<String>>;

    /// Counts rows in the `url` table
    fn count_sitemap_records(&self) -> StorageResult<u64>;

    /// Counts rows in the `to_download` table
    fn count_archive_records(&self) -> StorageResult<u64>;
}
