//! Response classification and parsing
//!
//! A fetched body is turned into exactly one [`ParsedContent`] value based on
//! its declared content type: a sitemap yields structured entries, an HTML
//! page yields classified links, and anything else is `Unrecognized`. The
//! frontier never branches on content-type strings itself.

use crate::storage::SitemapRecord;
use crate::url::ArchiveRules;
use crate::ScoutError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use quick_xml::events::Event;
use quick_xml::Reader;
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

/// Typed result of classifying one fetched response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedContent {
    /// Structured sitemap XML: each entry is both a persisted record and a
    /// further-traversal candidate
    Sitemap(Vec<SitemapRecord>),
    /// HTML page: links already resolved to absolute URLs and classified
    Page(Vec<PageLink>),
    /// Content type the crawler cannot parse; treated as a leaf
    Unrecognized,
}

/// A classified hyperlink discovered on an HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLink {
    /// Terminal downloadable artifact; recorded, never fetched
    Archive(String),
    /// Same-origin directory-style URL; candidate for further scraping
    Descend(String),
}

/// Classifies a fetched body by its declared content type
///
/// Sitemap XML parse failures are errors (the document is unusable); an
/// unrecognized content type is not, it simply produces no children.
pub fn classify(
    content_type: &str,
    body: &str,
    base_url: &Url,
    rules: &ArchiveRules,
) -> Result<ParsedContent, ScoutError> {
    if content_type.contains("text/xml") || content_type.contains("application/xml") {
        Ok(ParsedContent::Sitemap(parse_sitemap(body)?))
    } else if content_type.contains("text/html") {
        Ok(ParsedContent::Page(parse_page(body, base_url, rules)))
    } else {
        tracing::warn!("Unrecognized content type '{}', skipping", content_type);
        Ok(ParsedContent::Unrecognized)
    }
}

/// Parses sitemap XML into records
///
/// Handles both `<urlset>` and `<sitemapindex>` documents: the root's child
/// elements (`<url>` / `<sitemap>`) each contribute one record keyed by the
/// unqualified tag names of their fields. Namespace prefixes are ignored
/// entirely; only local names (`loc`, `lastmod`) are matched. An entry
/// without `loc` is skipped with a warning, it never aborts the document.
pub fn parse_sitemap(body: &str) -> Result<Vec<SitemapRecord>, ScoutError> {
    let mut reader = Reader::from_str(body);

    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut current_field: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                match depth {
                    2 => fields.clear(),
                    3 => {
                        current_field = Some(
                            String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned(),
                        )
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                if depth == 3 {
                    if let Some(field) = &current_field {
                        let text = t
                            .unescape()
                            .map_err(|e| ScoutError::SitemapParse(e.to_string()))?;
                        let text = text.trim();
                        if !text.is_empty() {
                            fields.insert(field.clone(), text.to_string());
                        }
                    }
                }
            }
            Ok(Event::CData(t)) => {
                if depth == 3 {
                    if let Some(field) = &current_field {
                        let text = String::from_utf8_lossy(&t.into_inner()).trim().to_string();
                        if !text.is_empty() {
                            fields.insert(field.clone(), text);
                        }
                    }
                }
            }
            Ok(Event::End(_)) => {
                if depth == 3 {
                    current_field = None;
                } else if depth == 2 {
                    match fields.remove("loc") {
                        Some(loc) => records.push(SitemapRecord {
                            url: loc,
                            last_modified: fields.get("lastmod").and_then(|s| parse_lastmod(s)),
                        }),
                        None => tracing::warn!("Sitemap entry without <loc>, skipping"),
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ScoutError::SitemapParse(e.to_string())),
            _ => {}
        }
    }

    Ok(records)
}

/// Parses a `lastmod` value
///
/// Sitemaps in the wild carry full RFC 3339 timestamps, timezone-naive
/// timestamps, or bare dates. Anything else logs a warning and becomes None.
fn parse_lastmod(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    tracing::warn!("Unparseable lastmod value '{}'", value);
    None
}

/// Extracts and classifies all anchor links from an HTML page
///
/// Each href is resolved against `base_url` (the post-redirect URL of the
/// fetched page). Archive-suffix matching is checked before the descend
/// check, so a URL can never be both.
pub fn parse_page(body: &str, base_url: &Url, rules: &ArchiveRules) -> Vec<PageLink> {
    let document = Html::parse_document(body);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let href = match element.value().attr("href") {
                Some(h) => h.trim(),
                None => continue,
            };

            if href.is_empty() || href.starts_with('#') {
                continue;
            }

            let resolved = match base_url.join(href) {
                Ok(u) => u,
                Err(_) => continue,
            };

            if resolved.scheme() != "http" && resolved.scheme() != "https" {
                continue;
            }

            let resolved = resolved.to_string();

            if rules.is_archive_url(&resolved) {
                links.push(PageLink::Archive(resolved));
            } else if rules.is_descend_url(&resolved) {
                links.push(PageLink::Descend(resolved));
            }
        }
    }

    links
}
