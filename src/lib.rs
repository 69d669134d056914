//! Archive-Scout: a sitemap-driven archive discoverer
//!
//! This crate implements a crawler that walks a site's XML sitemaps and HTML
//! directory-listing pages, recording every downloadable archive URL it finds
//! for a later download phase and every sitemap URL with its last-modified
//! timestamp for incremental re-crawl decisions.

pub mod config;
pub mod crawler;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Archive-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed for {url}: {reason}")]
    Fetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Sitemap parse error: {0}")]
    SitemapParse(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

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

/// Result type alias for Archive-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlSummary, Crawler};
pub use storage::{ArchiveRecord, SitemapRecord, SqliteStorage, Storage};
pub use crate::url::ArchiveRules;
