//! SQLite storage implementation

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use crate::storage::{ArchiveRecord, SitemapRecord};
use crate::ScoutError;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at the given path
    pub fn new(path: &Path) -> Result<Self, ScoutError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, ScoutError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    fn upsert_sitemap_record(&mut self, record: &SitemapRecord) -> StorageResult<bool> {
        // Timestamps are stored as timezone-naive ISO 8601 text
        let last_modified = record
            .last_modified
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string());

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO url (url, last_modified) VALUES (?1, ?2)",
            params![record.url, last_modified],
        )?;
        Ok(inserted > 0)
    }

    fn upsert_archive_record(&mut self, record: &ArchiveRecord) -> StorageResult<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO to_download (url) VALUES (?1)",
            params![record.url],
        )?;
        Ok(inserted > 0)
    }

    fn get_sitemap_record(&self, url: &str) -> StorageResult<Option<SitemapRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT url, last_modified FROM url WHERE url = ?1",
                params![url],
                |row| {
                    let url: String = row.get(0)?;
                    let last_modified: Option<String> = row.get(1)?;
                    Ok(SitemapRecord {
                        url,
                        last_modified: last_modified.and_then(|s| {
                            NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S").ok()
                        }),
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn list_archive_urls(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM to_download ORDER BY url")?;

        let urls = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(urls)
    }

    fn count_sitemap_records(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM url", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_archive_records(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM to_download", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_create_in_memory() {
        assert!(SqliteStorage::new_in_memory().is_ok());
    }

    #[test]
    fn test_sitemap_record_roundtrip() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let record = SitemapRecord {
            url: "https://example.test/a-sitemap.xml".to_string(),
            last_modified: Some(ts("2024-01-01T00:00:00")),
        };

        storage.upsert_sitemap_record(&record).unwrap();

        let loaded = storage
            .get_sitemap_record("https://example.test/a-sitemap.xml")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.url, record.url);
        assert_eq!(loaded.last_modified, record.last_modified);
    }

    #[test]
    fn test_sitemap_record_without_timestamp() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let record = SitemapRecord {
            url: "https://example.test/page/".to_string(),
            last_modified: None,
        };

        storage.upsert_sitemap_record(&record).unwrap();

        let loaded = storage
            .get_sitemap_record("https://example.test/page/")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.last_modified, None);
    }

    #[test]
    fn test_sitemap_upsert_is_idempotent() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = SitemapRecord {
            url: "https://example.test/a-sitemap.xml".to_string(),
            last_modified: Some(ts("2024-01-01T00:00:00")),
        };
        // Second discovery carries a different timestamp
        let second = SitemapRecord {
            url: "https://example.test/a-sitemap.xml".to_string(),
            last_modified: Some(
                NaiveDate::from_ymd_opt(2025, 6, 30)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
            ),
        };

        assert!(storage.upsert_sitemap_record(&first).unwrap());
        // Re-discovery reports no new row
        assert!(!storage.upsert_sitemap_record(&second).unwrap());

        assert_eq!(storage.count_sitemap_records().unwrap(), 1);

        // Original timestamp is preserved, not overwritten
        let loaded = storage
            .get_sitemap_record("https://example.test/a-sitemap.xml")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.last_modified, first.last_modified);
    }

    #[test]
    fn test_archive_upsert_is_idempotent() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let record = ArchiveRecord {
            url: "https://example.test/file.zip".to_string(),
        };

        assert!(storage.upsert_archive_record(&record).unwrap());
        assert!(!storage.upsert_archive_record(&record).unwrap());

        assert_eq!(storage.count_archive_records().unwrap(), 1);
        assert_eq!(
            storage.list_archive_urls().unwrap(),
            vec!["https://example.test/file.zip".to_string()]
        );
    }

    #[test]
    fn test_missing_record_is_none() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage
            .get_sitemap_record("https://example.test/unknown")
            .unwrap()
            .is_none());
    }
}
