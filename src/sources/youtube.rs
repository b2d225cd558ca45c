use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use feed_rs::parser;
use reqwest::Client;

use crate::error::Result;
use crate::models::{NewItem, SourceKind};

use super::SourceAdapter;

const CHANNEL_FEED_URL: &str = "https://www.youtube.com/feeds/videos.xml";

/// Pulls recent uploads from a set of YouTube channels via their RSS
/// feeds. Transcripts are fetched later by the enrichment stage.
pub struct YouTubeAdapter {
    client: Client,
    channel_ids: Vec<String>,
}

impl YouTubeAdapter {
    pub fn new(channel_ids: Vec<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("news-digest/1.0")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            channel_ids,
        }
    }

    async fn fetch_channel(&self, channel_id: &str, window_hours: u32) -> Result<Vec<NewItem>> {
        let url = format!("{CHANNEL_FEED_URL}?channel_id={channel_id}");
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(
                anyhow::anyhow!("Failed to fetch channel feed: HTTP {}", response.status()).into(),
            );
        }

        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;

        let cutoff = Utc::now() - chrono::Duration::hours(window_hours as i64);
        let items = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let published = entry.published.or(entry.updated)?;
                if published < cutoff {
                    return None;
                }
                // Channel feed entry ids look like "yt:video:VIDEOID".
                let video_id = entry
                    .id
                    .rsplit(':')
                    .next()
                    .unwrap_or(entry.id.as_str())
                    .to_string();
                let description = entry
                    .summary
                    .map(|s| s.content)
                    .or_else(|| {
                        entry
                            .media
                            .first()
                            .and_then(|m| m.description.as_ref())
                            .map(|d| d.content.clone())
                    });
                Some(NewItem {
                    source_kind: SourceKind::Youtube,
                    natural_key: video_id.clone(),
                    title: entry
                        .title
                        .map(|t| t.content)
                        .unwrap_or_else(|| "Untitled".to_string()),
                    url: entry
                        .links
                        .first()
                        .map(|l| l.href.clone())
                        .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={video_id}")),
                    description,
                    published_at: published,
                })
            })
            .collect();

        Ok(items)
    }
}

#[async_trait]
impl SourceAdapter for YouTubeAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Youtube
    }

    async fn fetch(&self, window_hours: u32) -> Result<Vec<NewItem>> {
        let mut items = Vec::new();
        for channel_id in &self.channel_ids {
            let videos = self.fetch_channel(channel_id, window_hours).await?;
            tracing::debug!("Fetched {} videos from channel {}", videos.len(), channel_id);
            items.extend(videos);
        }
        Ok(items)
    }
}
