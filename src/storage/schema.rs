//! Database schema definitions
//!
//! The two tables mirror what the later download phase consumes: `url` holds
//! every sitemap-discovered URL with its declared last-modified timestamp,
//! `to_download` holds archive URLs awaiting transfer. Both key on the URL
//! text, so re-discovery is a no-op at the storage layer.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Sitemap-discovered URLs with their declared modification timestamps
CREATE TABLE IF NOT EXISTS url (
    url TEXT PRIMARY KEY,
    last_modified DATETIME
);

-- Archive URLs queued for the download phase
CREATE TABLE IF NOT EXISTS to_download (
    url TEXT PRIMARY KEY
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
