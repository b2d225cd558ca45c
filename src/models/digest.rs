use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SourceKind;

/// One AI-generated summary, tied to exactly one raw item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Digest {
    /// `{source_kind}:{natural_key}` — at most one digest per item.
    pub id: String,
    pub source_kind: SourceKind,
    pub source_item_key: String,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDigest {
    pub source_kind: SourceKind,
    pub source_item_key: String,
    pub url: String,
    pub title: String,
    pub summary: String,
    /// Publish time of the source item when known; insert time otherwise.
    pub created_at: DateTime<Utc>,
}

impl NewDigest {
    pub fn id(&self) -> String {
        format!("{}:{}", self.source_kind, self.source_item_key)
    }
}
