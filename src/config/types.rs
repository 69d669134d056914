use serde::Deserialize;

/// Main configuration structure for Archive-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Pause between consecutive HTTP requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whether directory-style URLs popped from the queue are fetched.
    ///
    /// The reference behavior never dereferences a bare directory URL once it
    /// re-enters the queue; setting this to true fetches them as HTML pages.
    #[serde(rename = "descend-directories", default)]
    pub descend_directories: bool,
}

/// Target-site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site origin that descend links must stay within (e.g. "https://example.com")
    pub origin: String,

    /// Case-sensitive URL suffixes that mark a link as a downloadable archive
    #[serde(rename = "archive-suffixes", default = "default_archive_suffixes")]
    pub archive_suffixes: Vec<String>,

    /// Top-level sitemap URLs that seed the crawl queue
    pub seeds: Vec<String>,

    /// URLs pre-marked as visited before the crawl starts.
    ///
    /// These are known entry points whose children are reached through the
    /// seeds; if re-discovered as links they are skipped, never fetched.
    #[serde(default)]
    pub skip: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory that the later download phase writes archives into
    #[serde(rename = "download-dir")]
    pub download_dir: String,
}

fn default_request_delay_ms() -> u64 {
    100
}

fn default_user_agent() -> String {
    format!("archive-scout/{}", env!("CARGO_PKG_VERSION"))
}

fn default_archive_suffixes() -> Vec<String> {
    [".zip", ".7z", ".rar", "(Full%20Mix).mp3"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
