use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel stored in `derived_content` when enrichment is permanently
/// impossible (captions disabled, article body unextractable). Distinct
/// from NULL, which means "not yet attempted".
pub const CONTENT_UNAVAILABLE: &str = "__UNAVAILABLE__";

/// The fixed set of content origins the pipeline pulls from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Youtube,
    Openai,
    Anthropic,
    F1,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Youtube,
        SourceKind::Openai,
        SourceKind::Anthropic,
        SourceKind::F1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Youtube => "youtube",
            SourceKind::Openai => "openai",
            SourceKind::Anthropic => "anthropic",
            SourceKind::F1 => "f1",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::Youtube => "YouTube",
            SourceKind::Openai => "OpenAI",
            SourceKind::Anthropic => "Anthropic",
            SourceKind::F1 => "Formula 1",
        }
    }

    /// Whether digesting an item of this kind requires enrichment to have
    /// produced derived content first (transcript or converted body).
    pub fn requires_derived_content(&self) -> bool {
        matches!(self, SourceKind::Youtube | SourceKind::Anthropic)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(SourceKind::Youtube),
            "openai" => Ok(SourceKind::Openai),
            "anthropic" => Ok(SourceKind::Anthropic),
            "f1" => Ok(SourceKind::F1),
            other => Err(format!("unknown source kind: {other}")),
        }
    }
}

/// A stored content item, one row per `(source_kind, natural_key)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    pub source_kind: SourceKind,
    pub natural_key: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub derived_content: Option<String>,
    pub published_at: DateTime<Utc>,
    pub ingested_at: DateTime<Utc>,
}

impl RawItem {
    pub fn digest_id(&self) -> String {
        format!("{}:{}", self.source_kind, self.natural_key)
    }

    /// The text handed to the summarizer: derived content when present,
    /// otherwise the feed description.
    pub fn summarizable_content(&self) -> &str {
        match self.derived_content.as_deref() {
            Some(content) if content != CONTENT_UNAVAILABLE => content,
            _ => self.description.as_deref().unwrap_or_default(),
        }
    }
}

/// A candidate produced by a source adapter, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub source_kind: SourceKind,
    pub natural_key: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
}
