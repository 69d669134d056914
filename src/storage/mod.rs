//! Storage module for persisting crawl discoveries
//!
//! This module handles all database operations for the crawler:
//! - SQLite database initialization and schema management
//! - Idempotent upserts of sitemap and archive records
//! - Read-back queries for the stats mode and tests

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use chrono::NaiveDateTime;

/// A URL discovered in a sitemap, with its declared modification timestamp.
///
/// Immutable once created; persisted with ignore-on-conflict semantics so the
/// first-discovered timestamp wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapRecord {
    pub url: String,
    pub last_modified: Option<NaiveDateTime>,
}

/// A URL identified as a downloadable archive. Never fetched by the crawler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
    pub url: String,
}
