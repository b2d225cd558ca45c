use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use feed_rs::parser;
use reqwest::Client;

use crate::error::Result;
use crate::models::{NewItem, SourceKind};

use super::SourceAdapter;

/// Adapter for a dated RSS/Atom blog feed. Used for both the OpenAI and
/// Anthropic news feeds; entries without a publish date are dropped.
pub struct BlogFeedAdapter {
    kind: SourceKind,
    client: Client,
    feed_url: String,
}

impl BlogFeedAdapter {
    pub fn new(kind: SourceKind, feed_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("news-digest/1.0")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            kind,
            client,
            feed_url,
        }
    }
}

#[async_trait]
impl SourceAdapter for BlogFeedAdapter {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, window_hours: u32) -> Result<Vec<NewItem>> {
        let response = self.client.get(&self.feed_url).send().await?;

        if !response.status().is_success() {
            return Err(
                anyhow::anyhow!("Failed to fetch feed: HTTP {}", response.status()).into(),
            );
        }

        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;

        let cutoff = Utc::now() - chrono::Duration::hours(window_hours as i64);
        let kind = self.kind;
        let items = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let published = entry.published.or(entry.updated)?;
                if published < cutoff {
                    return None;
                }
                Some(NewItem {
                    source_kind: kind,
                    natural_key: entry.id,
                    title: entry
                        .title
                        .map(|t| t.content)
                        .unwrap_or_else(|| "Untitled".to_string()),
                    url: entry
                        .links
                        .first()
                        .map(|l| l.href.clone())
                        .unwrap_or_default(),
                    description: entry.summary.map(|s| s.content),
                    published_at: published,
                })
            })
            .collect();

        Ok(items)
    }
}
