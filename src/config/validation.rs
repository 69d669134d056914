use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    // Anything under 10ms is effectively hammering the target site
    if config.request_delay_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "request-delay-ms must be >= 10ms, got {}ms",
            config.request_delay_ms
        )));
    }

    Ok(())
}

/// Validates the target-site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.origin, e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "origin must be http(s), got '{}'",
            config.origin
        )));
    }

    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in config.seeds.iter().chain(config.skip.iter()) {
        Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid URL '{}': {}", seed, e)))?;
    }

    if config.archive_suffixes.is_empty() {
        return Err(ConfigError::Validation(
            "archive-suffixes cannot be empty".to_string(),
        ));
    }

    if config.archive_suffixes.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::Validation(
            "archive-suffixes entries cannot be empty strings".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    if config.download_dir.is_empty() {
        return Err(ConfigError::Validation(
            "download-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
