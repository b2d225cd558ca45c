mod blog;
mod motorsport;
mod youtube;

pub use blog::BlogFeedAdapter;
pub use motorsport::MotorsportFeedAdapter;
pub use youtube::YouTubeAdapter;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewItem, SourceKind};

/// One adapter per content source. Implementations fetch and normalize
/// candidates for a lookback window; ingestion stays source-agnostic.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Candidates with `published_at >= now - window_hours`. Transport and
    /// parse failures surface as errors; the caller isolates them per
    /// source.
    async fn fetch(&self, window_hours: u32) -> Result<Vec<NewItem>>;
}

/// Drop malformed records before they reach the store. A record needs a
/// natural key, a title, and a URL to be usable anywhere downstream.
pub fn validate(candidates: Vec<NewItem>) -> Vec<NewItem> {
    candidates
        .into_iter()
        .filter(|item| {
            let ok = !item.natural_key.trim().is_empty()
                && !item.title.trim().is_empty()
                && !item.url.trim().is_empty();
            if !ok {
                tracing::debug!(
                    source = %item.source_kind,
                    key = %item.natural_key,
                    "rejecting malformed record"
                );
            }
            ok
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn candidate(key: &str, title: &str, url: &str) -> NewItem {
        NewItem {
            source_kind: SourceKind::Openai,
            natural_key: key.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            description: None,
            published_at: Utc::now(),
        }
    }

    #[test]
    fn validate_rejects_empty_fields() {
        let kept = validate(vec![
            candidate("k1", "Title", "https://example.com/1"),
            candidate("", "Title", "https://example.com/2"),
            candidate("k3", "  ", "https://example.com/3"),
            candidate("k4", "Title", ""),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].natural_key, "k1");
    }
}
