use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::models::RawItem;

use super::{Derived, Enricher};

const USER_AGENT_STRING: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Fetches an article page and converts it to readable plain text.
/// Pages that yield no usable text are marked permanently unavailable so
/// they are not refetched every cycle.
pub struct ArticleFetcher {
    client: Client,
}

impl ArticleFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// Extract readable content from HTML using html2text.
    fn extract_content(&self, html: &str) -> Option<String> {
        let text = match html2text::from_read(html.as_bytes(), 80) {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!("Failed to convert HTML to text: {}", e);
                return None;
            }
        };

        // Clean up the text - remove excessive whitespace
        let cleaned: String = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if cleaned.len() > 200 {
            Some(cleaned)
        } else {
            tracing::debug!("Extracted content too short ({} chars)", cleaned.len());
            None
        }
    }
}

impl Default for ArticleFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Enricher for ArticleFetcher {
    async fn derive(&self, item: &RawItem) -> Result<Derived> {
        if Url::parse(&item.url).is_err() {
            return Ok(Derived::NotAvailable);
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));

        let response = self.client.get(&item.url).headers(headers).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch article: HTTP {}",
                response.status()
            )
            .into());
        }

        let html = response.text().await?;

        match self.extract_content(&html) {
            Some(content) => Ok(Derived::Content(content)),
            None => Ok(Derived::NotAvailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_pages_yield_no_content() {
        let fetcher = ArticleFetcher::new();
        assert!(fetcher.extract_content("<html><body>hi</body></html>").is_none());
    }

    #[test]
    fn long_pages_are_converted_and_cleaned() {
        let fetcher = ArticleFetcher::new();
        let body = "A paragraph of article text with enough words to matter. ".repeat(10);
        let html = format!("<html><body><p>{body}</p></body></html>");
        let content = fetcher.extract_content(&html).unwrap();
        assert!(content.len() > 200);
        assert!(!content.contains("<p>"));
    }
}
