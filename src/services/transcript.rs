use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;

use crate::error::Result;
use crate::models::RawItem;

use super::{Derived, Enricher};

const TIMEDTEXT_URL: &str = "https://video.google.com/timedtext";

/// Fetches auto-generated captions for a YouTube video via the timedtext
/// endpoint. An empty caption document means captions are disabled for
/// the video — a permanent condition, not a failure.
pub struct TranscriptFetcher {
    client: Client,
    text_re: Regex,
}

impl TranscriptFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        let text_re = Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("valid regex");
        Self { client, text_re }
    }

    fn extract_text(&self, xml: &str) -> String {
        let lines: Vec<String> = self
            .text_re
            .captures_iter(xml)
            .map(|cap| decode_entities(cap[1].trim()))
            .filter(|line| !line.is_empty())
            .collect();
        lines.join(" ")
    }
}

impl Default for TranscriptFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Enricher for TranscriptFetcher {
    async fn derive(&self, item: &RawItem) -> Result<Derived> {
        let response = self
            .client
            .get(TIMEDTEXT_URL)
            .query(&[("lang", "en"), ("v", item.natural_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch transcript: HTTP {}",
                response.status()
            )
            .into());
        }

        let xml = response.text().await?;
        // The endpoint returns 200 with an empty body when no track exists.
        if xml.trim().is_empty() {
            return Ok(Derived::NotAvailable);
        }

        let transcript = self.extract_text(&xml);
        if transcript.is_empty() {
            return Ok(Derived::NotAvailable);
        }

        Ok(Derived::Content(transcript))
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;#39;", "'")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_joins_caption_lines() {
        let fetcher = TranscriptFetcher::new();
        let xml = r#"<?xml version="1.0"?>
<transcript>
  <text start="0.0" dur="2.5">hello &amp; welcome</text>
  <text start="2.5" dur="3.0">to the show</text>
</transcript>"#;
        assert_eq!(fetcher.extract_text(xml), "hello & welcome to the show");
    }

    #[test]
    fn empty_document_yields_nothing() {
        let fetcher = TranscriptFetcher::new();
        assert_eq!(fetcher.extract_text("<transcript></transcript>"), "");
    }
}
