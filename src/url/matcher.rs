use crate::config::SiteConfig;

/// Link-classification rules for the target site.
///
/// Suffix matching is case-sensitive and checked against the resolved URL
/// text; archive classification always wins over descend classification.
#[derive(Debug, Clone)]
pub struct ArchiveRules {
    suffixes: Vec<String>,
    origin: String,
}

impl ArchiveRules {
    pub fn new(suffixes: Vec<String>, origin: String) -> Self {
        Self { suffixes, origin }
    }

    pub fn from_site_config(site: &SiteConfig) -> Self {
        Self::new(site.archive_suffixes.clone(), site.origin.clone())
    }

    /// Checks whether a URL points at a downloadable archive
    ///
    /// # Examples
    ///
    /// ```
    /// use archive_scout::url::ArchiveRules;
    ///
    /// let rules = ArchiveRules::new(
    ///     vec![".zip".to_string(), "(Full%20Mix).mp3".to_string()],
    ///     "https://example.test".to_string(),
    /// );
    ///
    /// assert!(rules.is_archive_url("https://example.test/album.zip"));
    /// assert!(rules.is_archive_url("https://cdn.other.test/track%20(Full%20Mix).mp3"));
    /// assert!(!rules.is_archive_url("https://example.test/album.ZIP"));
    /// assert!(!rules.is_archive_url("https://example.test/page/"));
    /// ```
    pub fn is_archive_url(&self, url: &str) -> bool {
        self.suffixes.iter().any(|suffix| url.ends_with(suffix))
    }

    /// Checks whether a URL is a same-origin directory-style traversal candidate
    pub fn is_descend_url(&self, url: &str) -> bool {
        url.starts_with(&self.origin) && is_directory_url(url)
    }
}

/// Checks whether a URL is directory-style (ends with a path separator)
pub fn is_directory_url(url: &str) -> bool {
    url.ends_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ArchiveRules {
        ArchiveRules::new(
            vec![
                ".zip".to_string(),
                ".7z".to_string(),
                ".rar".to_string(),
                "(Full%20Mix).mp3".to_string(),
            ],
            "https://example.test".to_string(),
        )
    }

    #[test]
    fn test_plain_archive_suffixes() {
        let r = rules();
        assert!(r.is_archive_url("https://example.test/a.zip"));
        assert!(r.is_archive_url("https://example.test/b.7z"));
        assert!(r.is_archive_url("https://example.test/c.rar"));
    }

    #[test]
    fn test_compound_suffix() {
        let r = rules();
        assert!(r.is_archive_url("https://example.test/mixes/Song%20(Full%20Mix).mp3"));
        assert!(!r.is_archive_url("https://example.test/mixes/Song.mp3"));
    }

    #[test]
    fn test_suffix_matching_is_case_sensitive() {
        let r = rules();
        assert!(!r.is_archive_url("https://example.test/a.ZIP"));
        assert!(!r.is_archive_url("https://example.test/a.Rar"));
    }

    #[test]
    fn test_archive_match_ignores_origin() {
        // Archives on foreign hosts are still archives
        let r = rules();
        assert!(r.is_archive_url("https://cdn.other.test/a.zip"));
    }

    #[test]
    fn test_descend_requires_same_origin() {
        let r = rules();
        assert!(r.is_descend_url("https://example.test/albums/"));
        assert!(!r.is_descend_url("https://other.test/albums/"));
    }

    #[test]
    fn test_descend_requires_trailing_slash() {
        let r = rules();
        assert!(!r.is_descend_url("https://example.test/albums"));
        assert!(!r.is_descend_url("https://example.test/albums/index.html"));
    }

    #[test]
    fn test_directory_url() {
        assert!(is_directory_url("https://example.test/a/"));
        assert!(!is_directory_url("https://example.test/a"));
        assert!(!is_directory_url("https://example.test/a.zip"));
    }
}
