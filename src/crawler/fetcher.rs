//! HTTP fetcher implementation
//!
//! One GET per URL with redirect following. The post-redirect URL is what the
//! classifier resolves relative links against, so it is carried alongside the
//! body and declared content type.

use crate::ScoutError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Result of a successful fetch
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value (empty if the server sent none)
    pub content_type: String,
    /// Response body
    pub body: String,
}

/// Builds the HTTP client used for the whole crawl
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, following redirects
///
/// Emits one progress log line with the response status and final URL.
/// Network failures and non-2xx final statuses both map to
/// [`ScoutError::Fetch`]; the frontier decides what to do with that.
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedPage, ScoutError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ScoutError::Fetch {
            url: url.to_string(),
            status: None,
            reason: e.to_string(),
        })?;

    let status = response.status();
    let final_url = response.url().to_string();

    tracing::info!("[{}] {}", status.as_u16(), final_url);

    if !status.is_success() {
        return Err(ScoutError::Fetch {
            url: url.to_string(),
            status: Some(status.as_u16()),
            reason: format!("HTTP {}", status.as_u16()),
        });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response.text().await.map_err(|e| ScoutError::Fetch {
        url: url.to_string(),
        status: Some(status.as_u16()),
        reason: e.to_string(),
    })?;

    Ok(FetchedPage {
        final_url,
        status: status.as_u16(),
        content_type,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client("TestScout/1.0").is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success_carries_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<urlset/>", "text/xml"))
            .mount(&server)
            .await;

        let client = build_http_client("TestScout/1.0").unwrap();
        let page = fetch_url(&client, &format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.content_type, "text/xml");
        assert_eq!(page.body, "<urlset/>");
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("location", "/new"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("moved here", "text/html"))
            .mount(&server)
            .await;

        let client = build_http_client("TestScout/1.0").unwrap();
        let page = fetch_url(&client, &format!("{}/old", server.uri()))
            .await
            .unwrap();

        // final_url reflects the redirect target, not the request URL
        assert_eq!(page.final_url, format!("{}/new", server.uri()));
        assert_eq!(page.body, "moved here");
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client("TestScout/1.0").unwrap();
        let err = fetch_url(&client, &format!("{}/missing", server.uri()))
            .await
            .unwrap_err();

        match err {
            ScoutError::Fetch { status, .. } => assert_eq!(status, Some(404)),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }
}
